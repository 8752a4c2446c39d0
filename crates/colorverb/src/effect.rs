//! Color requests and their resolution into a canonical style.
//!
//! A color verb accepts its color in one of five shapes:
//!
//! | Shape | Foreground | Background | Attributes |
//! |-------|------------|------------|------------|
//! | [`Effect`] | `fg` | `bg` | `attributes` |
//! | [`FgEffect`] | `color` | - | `attributes` |
//! | [`BgEffect`] | - | `color` | `attributes` |
//! | packed `u32` | bits 0–23 | - | bits 24–31 |
//! | packed `u64` | bits 0–23 | bits 24–47 | bits 48–55 |
//!
//! Within each 24-bit color field red occupies the high byte and blue the low
//! byte, so `0xRRGGBB` reads the way it is written. Bits 56–63 of a packed
//! `u64` carry nothing and are ignored.
//!
//! Every shape resolves to a [`ResolvedStyle`]. A shape that does not carry a
//! channel resolves that channel to `None`, never to black.
//!
//! ```rust
//! use colorverb::{Attributes, ColorRequest, FgEffect, Rgb, BOLD32};
//!
//! let packed = ColorRequest::Packed32(0xff0000 | BOLD32).resolve();
//! let record = ColorRequest::Fg(FgEffect::new(Rgb(255, 0, 0), Attributes::BOLD)).resolve();
//! assert_eq!(packed, record);
//! assert_eq!(packed.background, None);
//! ```

use std::fmt;

use bitflags::bitflags;

use crate::error::ColorVerbError;
use crate::value::Value;

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Decodes the low 24 bits of `word` as `0xRRGGBB`.
    pub const fn from_packed(word: u32) -> Self {
        Rgb((word >> 16) as u8, (word >> 8) as u8, word as u8)
    }

    /// Encodes this color as `0xRRGGBB`.
    pub const fn packed(self) -> u32 {
        (self.0 as u32) << 16 | (self.1 as u32) << 8 | self.2 as u32
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

bitflags! {
    /// Text attributes, one bit each.
    ///
    /// Escape sequences list them in ascending bit order regardless of how
    /// the set was built.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Attributes: u8 {
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const SLOW_BLINK = 1 << 4;
        const RAPID_BLINK = 1 << 5;
        const CROSSED_OUT = 1 << 6;
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (i, (name, _)) in self.iter_names().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

const SHIFT32: u32 = 24;
const SHIFT64: u32 = 48;

pub const BOLD32: u32 = (Attributes::BOLD.bits() as u32) << SHIFT32;
pub const DIM32: u32 = (Attributes::DIM.bits() as u32) << SHIFT32;
pub const ITALIC32: u32 = (Attributes::ITALIC.bits() as u32) << SHIFT32;
pub const UNDERLINE32: u32 = (Attributes::UNDERLINE.bits() as u32) << SHIFT32;
pub const SLOW_BLINK32: u32 = (Attributes::SLOW_BLINK.bits() as u32) << SHIFT32;
pub const RAPID_BLINK32: u32 = (Attributes::RAPID_BLINK.bits() as u32) << SHIFT32;
pub const CROSSED_OUT32: u32 = (Attributes::CROSSED_OUT.bits() as u32) << SHIFT32;

pub const BOLD64: u64 = (Attributes::BOLD.bits() as u64) << SHIFT64;
pub const DIM64: u64 = (Attributes::DIM.bits() as u64) << SHIFT64;
pub const ITALIC64: u64 = (Attributes::ITALIC.bits() as u64) << SHIFT64;
pub const UNDERLINE64: u64 = (Attributes::UNDERLINE.bits() as u64) << SHIFT64;
pub const SLOW_BLINK64: u64 = (Attributes::SLOW_BLINK.bits() as u64) << SHIFT64;
pub const RAPID_BLINK64: u64 = (Attributes::RAPID_BLINK.bits() as u64) << SHIFT64;
pub const CROSSED_OUT64: u64 = (Attributes::CROSSED_OUT.bits() as u64) << SHIFT64;

/// Packs a foreground color and attributes into the `u32` shape.
pub const fn pack32(fg: Rgb, attributes: Attributes) -> u32 {
    (attributes.bits() as u32) << SHIFT32 | fg.packed()
}

/// Packs background, foreground and attributes into the `u64` shape.
pub const fn pack64(bg: Rgb, fg: Rgb, attributes: Attributes) -> u64 {
    (attributes.bits() as u64) << SHIFT64 | (bg.packed() as u64) << 24 | fg.packed() as u64
}

/// Foreground, background and attributes set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    pub fg: Rgb,
    pub bg: Rgb,
    pub attributes: Attributes,
}

impl Effect {
    pub fn new(fg: Rgb, bg: Rgb, attributes: Attributes) -> Self {
        Self { fg, bg, attributes }
    }
}

/// A foreground color with attributes; the background is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FgEffect {
    pub color: Rgb,
    pub attributes: Attributes,
}

impl FgEffect {
    pub fn new(color: Rgb, attributes: Attributes) -> Self {
        Self { color, attributes }
    }
}

/// A background color with attributes; the foreground is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BgEffect {
    pub color: Rgb,
    pub attributes: Attributes,
}

impl BgEffect {
    pub fn new(color: Rgb, attributes: Attributes) -> Self {
        Self { color, attributes }
    }
}

/// The five accepted shapes of a color verb argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRequest {
    Effect(Effect),
    Fg(FgEffect),
    Bg(BgEffect),
    Packed32(u32),
    Packed64(u64),
}

/// The canonical form every [`ColorRequest`] reduces to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedStyle {
    pub foreground: Option<Rgb>,
    pub background: Option<Rgb>,
    pub attributes: Attributes,
}

impl ColorRequest {
    /// Reduces this request to its resolved style by field copy and bit extraction.
    pub fn resolve(&self) -> ResolvedStyle {
        match *self {
            ColorRequest::Effect(e) => ResolvedStyle {
                foreground: Some(e.fg),
                background: Some(e.bg),
                attributes: e.attributes,
            },
            ColorRequest::Fg(e) => ResolvedStyle {
                foreground: Some(e.color),
                background: None,
                attributes: e.attributes,
            },
            ColorRequest::Bg(e) => ResolvedStyle {
                foreground: None,
                background: Some(e.color),
                attributes: e.attributes,
            },
            ColorRequest::Packed32(word) => ResolvedStyle {
                foreground: Some(Rgb::from_packed(word)),
                background: None,
                attributes: Attributes::from_bits_truncate((word >> SHIFT32) as u8),
            },
            ColorRequest::Packed64(word) => ResolvedStyle {
                foreground: Some(Rgb::from_packed(word as u32)),
                background: Some(Rgb::from_packed((word >> 24) as u32)),
                attributes: Attributes::from_bits_truncate((word >> SHIFT64) as u8),
            },
        }
    }
}

impl TryFrom<&Value> for ColorRequest {
    type Error = ColorVerbError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match *value {
            Value::Effect(e) => Ok(ColorRequest::Effect(e)),
            Value::FgEffect(e) => Ok(ColorRequest::Fg(e)),
            Value::BgEffect(e) => Ok(ColorRequest::Bg(e)),
            Value::U32(word) => Ok(ColorRequest::Packed32(word)),
            Value::U64(word) => Ok(ColorRequest::Packed64(word)),
            _ => Err(ColorVerbError::UnsupportedEncoding {
                value_type: value.type_name(),
            }),
        }
    }
}

/// Resolves a positional argument consumed by a color verb.
pub fn resolve(value: &Value) -> crate::Result<ResolvedStyle> {
    ColorRequest::try_from(value).map(|request| request.resolve())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod packed {
        use super::*;

        #[test]
        fn rgb_packing_is_rrggbb() {
            assert_eq!(Rgb::from_packed(0x123456), Rgb(0x12, 0x34, 0x56));
            assert_eq!(Rgb(0x12, 0x34, 0x56).packed(), 0x123456);
            assert_eq!(Rgb::from_packed(0xff_123456), Rgb(0x12, 0x34, 0x56));
        }

        #[test]
        fn attribute_constants_sit_in_the_top_byte() {
            assert_eq!(BOLD32, 0x0100_0000);
            assert_eq!(CROSSED_OUT32, 0x4000_0000);
            assert_eq!(BOLD64, 0x0001_0000_0000_0000);
            assert_eq!(CROSSED_OUT64, 0x0040_0000_0000_0000);
        }

        #[test]
        fn packed64_layout_table() {
            // (word, background, foreground, attributes)
            let cases: &[(u64, Rgb, Rgb, Attributes)] = &[
                (0x0000_0000_00ff_0000, Rgb(0, 0, 0), Rgb(255, 0, 0), Attributes::empty()),
                (0x0000_ff00_0000_0000, Rgb(255, 0, 0), Rgb(0, 0, 0), Attributes::empty()),
                (0x0000_0000_ff00_0000, Rgb(0, 0, 255), Rgb(0, 0, 0), Attributes::empty()),
                (0x0000_0000_0000_00ff, Rgb(0, 0, 0), Rgb(0, 0, 255), Attributes::empty()),
                (0x0001_0000_0000_0000, Rgb(0, 0, 0), Rgb(0, 0, 0), Attributes::BOLD),
                (
                    0x0009_aadd_44ff_0000,
                    Rgb(0xaa, 0xdd, 0x44),
                    Rgb(0xff, 0x00, 0x00),
                    Attributes::BOLD.union(Attributes::UNDERLINE),
                ),
                (
                    0xff00_0000_0000_0000,
                    Rgb(0, 0, 0),
                    Rgb(0, 0, 0),
                    Attributes::empty(),
                ),
            ];

            for &(word, bg, fg, attributes) in cases {
                let style = ColorRequest::Packed64(word).resolve();
                assert_eq!(style.background, Some(bg), "background of {word:#018x}");
                assert_eq!(style.foreground, Some(fg), "foreground of {word:#018x}");
                assert_eq!(style.attributes, attributes, "attributes of {word:#018x}");
            }
        }

        #[test]
        fn pack64_inverts_resolution() {
            let word = pack64(Rgb(1, 2, 3), Rgb(4, 5, 6), Attributes::ITALIC);
            assert_eq!(word, 0x0004_0102_0304_0506);
            let style = ColorRequest::Packed64(word).resolve();
            assert_eq!(style.background, Some(Rgb(1, 2, 3)));
            assert_eq!(style.foreground, Some(Rgb(4, 5, 6)));
            assert_eq!(style.attributes, Attributes::ITALIC);
        }

        #[test]
        fn packed32_ignores_unassigned_bit() {
            let style = ColorRequest::Packed32(0x80_000000 | DIM32).resolve();
            assert_eq!(style.attributes, Attributes::DIM);
        }

        #[test]
        fn pack32_matches_constants() {
            assert_eq!(
                pack32(Rgb(0xff, 0, 0), Attributes::BOLD | Attributes::DIM),
                0xff0000 | BOLD32 | DIM32
            );
        }
    }

    mod resolution {
        use super::*;

        #[test]
        fn effect_sets_both_channels() {
            let effect = Effect::new(Rgb(1, 2, 3), Rgb(4, 5, 6), Attributes::BOLD);
            let style = ColorRequest::Effect(effect).resolve();
            assert_eq!(style.foreground, Some(Rgb(1, 2, 3)));
            assert_eq!(style.background, Some(Rgb(4, 5, 6)));
            assert_eq!(style.attributes, Attributes::BOLD);
        }

        #[test]
        fn fg_effect_leaves_background_absent() {
            let effect = FgEffect::new(Rgb(0, 0, 0), Attributes::empty());
            let style = ColorRequest::Fg(effect).resolve();
            assert_eq!(style.foreground, Some(Rgb(0, 0, 0)));
            assert_eq!(style.background, None);
        }

        #[test]
        fn bg_effect_leaves_foreground_absent() {
            let effect = BgEffect::new(Rgb(0x20, 0, 0x80), Attributes::DIM);
            let style = ColorRequest::Bg(effect).resolve();
            assert_eq!(style.foreground, None);
            assert_eq!(style.background, Some(Rgb(0x20, 0, 0x80)));
            assert_eq!(style.attributes, Attributes::DIM);
        }

        #[test]
        fn packed32_equals_fg_effect() {
            let attrs = Attributes::UNDERLINE | Attributes::RAPID_BLINK;
            let packed = ColorRequest::Packed32(pack32(Rgb(9, 8, 7), attrs)).resolve();
            let record = ColorRequest::Fg(FgEffect::new(Rgb(9, 8, 7), attrs)).resolve();
            assert_eq!(packed, record);
        }

        #[test]
        fn values_map_to_requests() {
            assert_eq!(
                ColorRequest::try_from(&Value::U32(0xff)),
                Ok(ColorRequest::Packed32(0xff))
            );
            assert_eq!(
                ColorRequest::try_from(&Value::U64(0xff)),
                Ok(ColorRequest::Packed64(0xff))
            );
        }

        #[test]
        fn non_color_values_are_rejected() {
            for value in [
                Value::Int(1),
                Value::Float(1.0),
                Value::Char('x'),
                Value::Bool(true),
                Value::Str("red".into()),
            ] {
                let err = resolve(&value).unwrap_err();
                assert_eq!(
                    err,
                    ColorVerbError::UnsupportedEncoding {
                        value_type: value.type_name()
                    }
                );
            }
        }
    }
}

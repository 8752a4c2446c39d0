//! SGR escape sequences for resolved styles.
//!
//! A rendered chunk is always `CSI params m chunk CSI 0 m`, where `params`
//! joins, in order and separated by `;`:
//!
//! - `38;2;R;G;B` when a foreground is present
//! - `48;2;R;G;B` when a background is present
//! - one code per set attribute, in ascending bit order
//!
//! The chunk is closed by a full reset so that text following it is never
//! styled, whatever the chunk itself contained.

use std::fmt;

use crate::effect::{Attributes, ResolvedStyle};

pub const CSI: &str = "\x1b[";
pub const SGR: &str = "m";
pub const RESET: &str = "\x1b[0m";

/// SGR parameter for each attribute, in ascending bit order.
const ATTRIBUTE_CODES: [(Attributes, u8); 7] = [
    (Attributes::BOLD, 1),
    (Attributes::DIM, 2),
    (Attributes::ITALIC, 3),
    (Attributes::UNDERLINE, 4),
    (Attributes::SLOW_BLINK, 5),
    (Attributes::RAPID_BLINK, 6),
    (Attributes::CROSSED_OUT, 9),
];

impl fmt::Display for ResolvedStyle {
    /// Writes the opening sequence, without the chunk or the reset.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(CSI)?;
        let mut sep = "";
        if let Some(fg) = self.foreground {
            write!(f, "38;2;{};{};{}", fg.0, fg.1, fg.2)?;
            sep = ";";
        }
        if let Some(bg) = self.background {
            write!(f, "{sep}48;2;{};{};{}", bg.0, bg.1, bg.2)?;
            sep = ";";
        }
        for (attribute, code) in ATTRIBUTE_CODES {
            if self.attributes.contains(attribute) {
                write!(f, "{sep}{code}")?;
                sep = ";";
            }
        }
        f.write_str(SGR)
    }
}

/// Wraps `chunk` in the escape sequence for `style` followed by a reset.
pub fn render(style: &ResolvedStyle, chunk: &str) -> String {
    format!("{style}{chunk}{RESET}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{pack64, BgEffect, ColorRequest, Effect, FgEffect, Rgb};

    fn bare(attributes: Attributes) -> ResolvedStyle {
        ResolvedStyle {
            foreground: None,
            background: None,
            attributes,
        }
    }

    fn fg(r: u8, g: u8, b: u8, attributes: Attributes) -> ResolvedStyle {
        ColorRequest::Fg(FgEffect::new(Rgb(r, g, b), attributes)).resolve()
    }

    #[test]
    fn foreground_only() {
        assert_eq!(
            render(&fg(255, 0, 0, Attributes::BOLD), "42"),
            "\x1b[38;2;255;0;0;1m42\x1b[0m"
        );
    }

    #[test]
    fn background_only() {
        let effect = BgEffect::new(Rgb(0x20, 0, 0x80), Attributes::empty());
        let style = ColorRequest::Bg(effect).resolve();
        assert_eq!(render(&style, "x"), "\x1b[48;2;32;0;128mx\x1b[0m");
    }

    #[test]
    fn both_channels() {
        let effect = Effect::new(Rgb(1, 2, 3), Rgb(4, 5, 6), Attributes::empty());
        let style = ColorRequest::Effect(effect).resolve();
        assert_eq!(render(&style, "x"), "\x1b[38;2;1;2;3;48;2;4;5;6mx\x1b[0m");
    }

    #[test]
    fn packed64_renders_background_after_foreground() {
        let word = pack64(Rgb(0xaa, 0xdd, 0x44), Rgb(0xff, 0, 0), Attributes::BOLD);
        let style = ColorRequest::Packed64(word).resolve();
        assert_eq!(
            render(&style, "Hello"),
            "\x1b[38;2;255;0;0;48;2;170;221;68;1mHello\x1b[0m"
        );
    }

    #[test]
    fn every_attribute_code() {
        let cases = [
            (Attributes::BOLD, "1"),
            (Attributes::DIM, "2"),
            (Attributes::ITALIC, "3"),
            (Attributes::UNDERLINE, "4"),
            (Attributes::SLOW_BLINK, "5"),
            (Attributes::RAPID_BLINK, "6"),
            (Attributes::CROSSED_OUT, "9"),
        ];
        for (attribute, code) in cases {
            assert_eq!(
                render(&fg(0, 0, 0, attribute), ""),
                format!("\x1b[38;2;0;0;0;{code}m\x1b[0m")
            );
        }
    }

    #[test]
    fn attributes_follow_bit_order() {
        let attributes = Attributes::CROSSED_OUT | Attributes::BOLD | Attributes::UNDERLINE;
        assert_eq!(
            render(&fg(1, 1, 1, attributes), "x"),
            "\x1b[38;2;1;1;1;1;4;9mx\x1b[0m"
        );
    }

    #[test]
    fn attributes_without_color() {
        let style = bare(Attributes::ITALIC | Attributes::DIM);
        assert_eq!(render(&style, "x"), "\x1b[2;3mx\x1b[0m");
    }

    #[test]
    fn degenerate_style_still_brackets() {
        let rendered = render(&bare(Attributes::empty()), "plain");
        assert_eq!(rendered, "\x1b[mplain\x1b[0m");
        assert!(rendered.starts_with(CSI));
        assert!(rendered.ends_with(RESET));
    }

    #[test]
    fn display_is_the_opening_sequence() {
        assert_eq!(fg(9, 8, 7, Attributes::empty()).to_string(), "\x1b[38;2;9;8;7m");
    }
}

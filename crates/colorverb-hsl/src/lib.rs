//! HSL conversions and gradients for colorverb colors.
//!
//! Colors go in and come out as [`colorverb::Rgb`], so a gradient step can be
//! handed straight to a color verb:
//!
//! ```rust
//! use colorverb::{csprintf, Attributes, FgEffect, Rgb};
//! use colorverb_hsl::gradient;
//!
//! let mut out = String::new();
//! for color in gradient(Rgb(255, 0, 0), Rgb(0, 0, 255), 3) {
//!     out += &csprintf!("%C{#}", FgEffect::new(color, Attributes::empty())).unwrap();
//! }
//! assert!(out.starts_with("\x1b[38;2;255;0;0m#"));
//! ```
//!
//! # Precision
//!
//! Channels are scaled back to bytes by truncation, not rounding. Converting
//! a color to HSL and back can therefore lose one unit per channel.
//!
//! # Hue
//!
//! Gradients interpolate hue linearly over `0.0..=1.0` and never wrap around
//! the color wheel. A gradient from magenta to red passes through blue, green
//! and yellow.

use std::iter::FusedIterator;

pub use colorverb::Rgb;

// ─── HSL type ───────────────────────────────────────────────────────────────

/// Hue, saturation and lightness, each in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    pub fn from_rgb(rgb: Rgb) -> Self {
        let r = channel(rgb.0);
        let g = channel(rgb.1);
        let b = channel(rgb.2);

        let max = r.max(g.max(b));
        let min = r.min(g.min(b));
        let l = (max + min) / 2.0;

        if max == min {
            return Self { h: 0.0, s: 0.0, l };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        // Ties resolve to red, then green.
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Self { h: h / 6.0, s, l }
    }

    /// Converts back to RGB, truncating each channel.
    pub fn to_rgb(self) -> Rgb {
        if self.s == 0.0 {
            let v = byte(self.l);
            return Rgb(v, v, v);
        }

        let q = if self.l < 0.5 {
            self.l * (1.0 + self.s)
        } else {
            self.l + self.s - self.l * self.s
        };
        let p = 2.0 * self.l - q;

        Rgb(
            byte(hue_to_channel(p, q, self.h + 1.0 / 3.0)),
            byte(hue_to_channel(p, q, self.h)),
            byte(hue_to_channel(p, q, self.h - 1.0 / 3.0)),
        )
    }

    /// The point `t` of the way from `self` to `other`, per component.
    pub fn lerp(&self, other: &Hsl, t: f64) -> Hsl {
        Hsl {
            h: self.h + (other.h - self.h) * t,
            s: self.s + (other.s - self.s) * t,
            l: self.l + (other.l - self.l) * t,
        }
    }
}

impl From<Rgb> for Hsl {
    fn from(rgb: Rgb) -> Self {
        Hsl::from_rgb(rgb)
    }
}

impl From<Hsl> for Rgb {
    fn from(hsl: Hsl) -> Self {
        hsl.to_rgb()
    }
}

fn channel(c: u8) -> f64 {
    c as f64 / 255.0
}

/// `as` saturates, so values marginally outside `0.0..=1.0` clamp.
fn byte(v: f64) -> u8 {
    (v * 255.0) as u8
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

// ─── Gradient ───────────────────────────────────────────────────────────────

/// Returns `steps` colors from `start` to `end`, interpolated in HSL.
///
/// The first color is `start` converted through HSL, and with two or more
/// steps the last is `end` converted the same way. A single step yields only
/// the start color; zero steps yield nothing.
pub fn gradient(start: Rgb, end: Rgb, steps: usize) -> HslGradient {
    HslGradient {
        start: Hsl::from_rgb(start),
        end: Hsl::from_rgb(end),
        steps,
        index: 0,
    }
}

/// Iterator returned by [`gradient`].
#[derive(Debug, Clone)]
pub struct HslGradient {
    start: Hsl,
    end: Hsl,
    steps: usize,
    index: usize,
}

impl HslGradient {
    fn position(&self, index: usize) -> f64 {
        if self.steps < 2 {
            0.0
        } else {
            index as f64 / (self.steps - 1) as f64
        }
    }
}

impl Iterator for HslGradient {
    type Item = Rgb;

    fn next(&mut self) -> Option<Rgb> {
        if self.index >= self.steps {
            return None;
        }
        let t = HslGradient::position(self, self.index);
        self.index += 1;
        Some(self.start.lerp(&self.end, t).to_rgb())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.steps - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for HslGradient {}

impl FusedIterator for HslGradient {}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb(255, 0, 0);
    const GREEN: Rgb = Rgb(0, 255, 0);
    const BLUE: Rgb = Rgb(0, 0, 255);
    const BLACK: Rgb = Rgb(0, 0, 0);
    const WHITE: Rgb = Rgb(255, 255, 255);

    // =====================================================================
    // RGB → HSL
    // =====================================================================

    #[test]
    fn primaries_to_hsl() {
        assert_eq!(Hsl::from_rgb(RED), Hsl::new(0.0, 1.0, 0.5));
        assert_eq!(Hsl::from_rgb(GREEN), Hsl::new(2.0 / 6.0, 1.0, 0.5));
        assert_eq!(Hsl::from_rgb(BLUE), Hsl::new(4.0 / 6.0, 1.0, 0.5));
    }

    #[test]
    fn grays_have_no_hue_or_saturation() {
        assert_eq!(Hsl::from_rgb(BLACK), Hsl::new(0.0, 0.0, 0.0));
        assert_eq!(Hsl::from_rgb(WHITE), Hsl::new(0.0, 0.0, 1.0));
        let gray = Hsl::from_rgb(Rgb(51, 51, 51));
        assert_eq!((gray.h, gray.s), (0.0, 0.0));
        assert!((gray.l - 0.2).abs() < 1e-12);
    }

    #[test]
    fn hue_below_red_wraps_to_top() {
        // Magenta-ish: red is max, blue above green.
        let hsl = Hsl::from_rgb(Rgb(255, 0, 128));
        assert!(hsl.h > 5.0 / 6.0 && hsl.h < 1.0, "h = {}", hsl.h);
    }

    #[test]
    fn dark_and_light_saturation_branches() {
        let dark = Hsl::from_rgb(Rgb(100, 0, 0));
        assert!(dark.l < 0.5);
        assert!((dark.s - 1.0).abs() < 1e-12);

        let light = Hsl::from_rgb(Rgb(255, 200, 200));
        assert!(light.l > 0.5);
        assert!((light.s - 1.0).abs() < 1e-12);
    }

    // =====================================================================
    // HSL → RGB
    // =====================================================================

    #[test]
    fn primaries_round_trip_exactly() {
        for color in [RED, GREEN, BLUE, BLACK, WHITE] {
            assert_eq!(Hsl::from_rgb(color).to_rgb(), color);
        }
    }

    #[test]
    fn gray_lightness_truncates() {
        assert_eq!(Hsl::new(0.0, 0.0, 0.5).to_rgb(), Rgb(127, 127, 127));
    }

    #[test]
    fn from_impls_match_methods() {
        let hsl: Hsl = RED.into();
        assert_eq!(hsl, Hsl::from_rgb(RED));
        let rgb: Rgb = hsl.into();
        assert_eq!(rgb, RED);
    }

    // =====================================================================
    // Gradients
    // =====================================================================

    #[test]
    fn red_to_blue_passes_through_green() {
        let colors: Vec<_> = gradient(RED, BLUE, 3).collect();
        assert_eq!(colors, vec![RED, GREEN, BLUE]);
    }

    #[test]
    fn black_to_white_midpoint() {
        let colors: Vec<_> = gradient(BLACK, WHITE, 3).collect();
        assert_eq!(colors, vec![BLACK, Rgb(127, 127, 127), WHITE]);
    }

    #[test]
    fn single_step_is_start() {
        assert_eq!(gradient(RED, BLUE, 1).collect::<Vec<_>>(), vec![RED]);
    }

    #[test]
    fn zero_steps_is_empty() {
        assert_eq!(gradient(RED, BLUE, 0).next(), None);
    }

    #[test]
    fn exact_size() {
        let mut colors = gradient(RED, BLUE, 5);
        assert_eq!(colors.len(), 5);
        colors.next();
        colors.next();
        assert_eq!(colors.len(), 3);
        assert_eq!(colors.by_ref().count(), 3);
        assert_eq!(colors.len(), 0);
        assert_eq!(colors.next(), None);
    }
}

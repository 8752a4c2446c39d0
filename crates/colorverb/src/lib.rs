//! printf-style formatting with a `%C{...}` verb for truecolor terminal styling.
//!
//! Templates use the usual printf verbs plus one more: `%C{text}` renders
//! `text` in the color given by the next argument. The enclosed text can hold
//! standard verbs and further color verbs, which take the arguments that
//! follow the color:
//!
//! ```rust
//! use colorverb::{csprintf, Attributes, FgEffect, Rgb};
//!
//! let red = FgEffect::new(Rgb(255, 0, 0), Attributes::BOLD);
//! let out = csprintf!("%C{%d}", red, 42).unwrap();
//! assert_eq!(out, "\x1b[38;2;255;0;0;1m42\x1b[0m");
//! ```
//!
//! # Color arguments
//!
//! A color verb accepts five shapes (see [`effect`] for the bit layouts):
//!
//! - [`Effect`]: foreground, background and attributes
//! - [`FgEffect`] / [`BgEffect`]: one channel and attributes
//! - `u32`: `attributes << 24 | 0xRRGGBB`, foreground only
//! - `u64`: `attributes << 48 | bg << 24 | fg`
//!
//! ```rust
//! use colorverb::{csprintf, BOLD64, UNDERLINE32};
//!
//! let out = csprintf!(
//!     "%C{Hello} %C{World}",
//!     0xaadd44_ff0000u64 | BOLD64,
//!     0x00ff00u32 | UNDERLINE32,
//! )
//! .unwrap();
//! assert!(out.starts_with("\x1b[38;2;255;0;0;48;2;170;221;68;1mHello\x1b[0m"));
//! ```
//!
//! # Processing
//!
//! Formatting runs in two stages. [`substitute()`] replaces every color verb
//! with its escape-wrapped text and returns the residual template together
//! with the arguments its standard verbs still need. A [`FormattedWrite`]
//! implementation then formats the residual template; [`Printf`] is the
//! bundled one. Substitution errors are reported before anything is written.
//!
//! # Plain output
//!
//! [`ColorMode::Remove`] renders color verbs as their bare text, still
//! consuming and validating their color arguments:
//!
//! ```rust
//! use colorverb::{args, ColorMode, ColorVerbs};
//!
//! let plain = ColorVerbs::new().mode(ColorMode::Remove);
//! let out = plain.sprintf("[%C{%s}]", &args![0xff0000u32, "ok"]).unwrap();
//! assert_eq!(out, "[ok]");
//! ```

pub mod effect;
mod error;
pub mod escape;
mod format;
pub mod scanner;
mod substitute;
mod value;

use std::io::{self, Write};

use tracing::debug;

pub use effect::{
    pack32, pack64, Attributes, BgEffect, ColorRequest, Effect, FgEffect, ResolvedStyle, Rgb,
    BOLD32, BOLD64, CROSSED_OUT32, CROSSED_OUT64, DIM32, DIM64, ITALIC32, ITALIC64,
    RAPID_BLINK32, RAPID_BLINK64, SLOW_BLINK32, SLOW_BLINK64, UNDERLINE32, UNDERLINE64,
};
pub use error::{ColorVerbError, FormatError, Result};
pub use format::{format_standard, FormattedWrite, Printf, MAX_COUNT};
pub use substitute::{substitute, ColorMode, Substitution};
pub use value::Value;

/// Configured entry point for color verb formatting.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorVerbs {
    mode: ColorMode,
    strict: bool,
}

impl ColorVerbs {
    /// Applies escape codes and tolerates leftover arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how color verbs are rendered.
    pub fn mode(mut self, mode: ColorMode) -> Self {
        self.mode = mode;
        self
    }

    /// Makes the bundled formatter reject arguments no verb consumed.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Replaces the color verbs of `template`, leaving standard verbs.
    pub fn substitute<'a>(&self, template: &str, args: &'a [Value]) -> Result<Substitution<'a>> {
        substitute(template, args, self.mode)
    }

    /// Substitutes color verbs, then hands the residual template to `formatter`.
    ///
    /// The formatter's result, byte count or error, is returned as is. If
    /// substitution fails the formatter is never called.
    pub fn format_with<F>(
        &self,
        formatter: &mut F,
        template: &str,
        args: &[Value],
    ) -> std::result::Result<usize, F::Error>
    where
        F: FormattedWrite,
        F::Error: From<ColorVerbError>,
    {
        debug!(
            template_len = template.len(),
            args = args.len(),
            mode = ?self.mode,
            "substituting color verbs"
        );
        let substitution = self.substitute(template, args)?;
        debug!(
            residual_len = substitution.template.len(),
            residual_args = substitution.args.len(),
            "formatting residual template"
        );
        formatter.write_formatted(&substitution.template, &substitution.args)
    }

    /// Formats into a string.
    pub fn sprintf(
        &self,
        template: &str,
        args: &[Value],
    ) -> std::result::Result<String, FormatError> {
        let mut printf = Printf::new(Vec::new()).strict(self.strict);
        self.format_with(&mut printf, template, args)?;
        String::from_utf8(printf.into_inner())
            .map_err(|err| FormatError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))
    }

    /// Formats to `writer`, returning the number of bytes written.
    pub fn fprintf<W: Write>(
        &self,
        writer: W,
        template: &str,
        args: &[Value],
    ) -> std::result::Result<usize, FormatError> {
        let mut printf = Printf::new(writer).strict(self.strict);
        self.format_with(&mut printf, template, args)
    }

    /// Formats to standard output, returning the number of bytes written.
    pub fn printf(
        &self,
        template: &str,
        args: &[Value],
    ) -> std::result::Result<usize, FormatError> {
        let mut printf = Printf::stdout().strict(self.strict);
        self.format_with(&mut printf, template, args)
    }
}

/// [`ColorVerbs::sprintf`] with default settings.
pub fn sprintf(template: &str, args: &[Value]) -> std::result::Result<String, FormatError> {
    ColorVerbs::new().sprintf(template, args)
}

/// [`ColorVerbs::fprintf`] with default settings.
pub fn fprintf<W: Write>(
    writer: W,
    template: &str,
    args: &[Value],
) -> std::result::Result<usize, FormatError> {
    ColorVerbs::new().fprintf(writer, template, args)
}

/// [`ColorVerbs::printf`] with default settings.
pub fn printf(template: &str, args: &[Value]) -> std::result::Result<usize, FormatError> {
    ColorVerbs::new().printf(template, args)
}

/// Formats to standard output with heterogeneous arguments.
///
/// ```rust,no_run
/// colorverb::cprintf!("%C{%s}\n", 0x00ff00u32, "green").unwrap();
/// ```
#[macro_export]
macro_rules! cprintf {
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::printf($template, &$crate::args![$($arg),*])
    };
}

/// Formats into a `String` with heterogeneous arguments.
#[macro_export]
macro_rules! csprintf {
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::sprintf($template, &$crate::args![$($arg),*])
    };
}

/// Formats to a writer with heterogeneous arguments.
#[macro_export]
macro_rules! cfprintf {
    ($writer:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $crate::fprintf($writer, $template, &$crate::args![$($arg),*])
    };
}

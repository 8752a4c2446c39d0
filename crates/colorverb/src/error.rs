//! Error types for color verb substitution and standard verb formatting.

use thiserror::Error;

/// Errors raised while substituting `%C{...}` verbs.
///
/// All of these are detected before anything is written, so a failed call
/// never leaves a partial escape sequence on the output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorVerbError {
    /// The argument consumed by a color verb is not one of the five color shapes.
    #[error("unsupported color encoding: {value_type} cannot be used with %C{{...}}")]
    UnsupportedEncoding { value_type: &'static str },

    /// A verb needs more arguments than were supplied.
    #[error("verb at byte {offset} needs {needed} argument(s) but only {available} remain")]
    ArgumentUnderflow {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A `%C{` without a closing `}`.
    #[error("unterminated color verb starting at byte {offset}")]
    MalformedColorVerb { offset: usize },
}

/// Result type for color verb operations.
pub type Result<T> = std::result::Result<T, ColorVerbError>;

/// Errors raised by the bundled standard verb formatter.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error(transparent)]
    ColorVerb(#[from] ColorVerbError),

    #[error("missing argument for %{verb} at byte {offset}")]
    MissingArgument { verb: char, offset: usize },

    #[error("%{verb} cannot format {value_type} values")]
    BadArgument {
        verb: char,
        value_type: &'static str,
    },

    #[error("%{0} is not supported")]
    UnsupportedVerb(char),

    #[error("width {width} at byte {offset} exceeds the limit of {limit}")]
    WidthTooLarge {
        width: usize,
        limit: usize,
        offset: usize,
    },

    #[error("precision {precision} at byte {offset} exceeds the limit of {limit}")]
    PrecisionTooLarge {
        precision: usize,
        limit: usize,
        offset: usize,
    },

    #[error("color verb at byte {offset} reached the standard formatter")]
    UnexpectedColorVerb { offset: usize },

    #[error("{0} argument(s) left unused")]
    ExtraArguments(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

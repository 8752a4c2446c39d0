//! Positional argument values.
//!
//! Arguments are heterogeneous, so they are carried as a [`Value`]. Which
//! verb consumes a value decides how it is read: a `u32` or `u64` taken by a
//! color verb is a packed color, while the same value taken by `%d` or `%x`
//! is just a number.

use std::fmt;

use crate::effect::{BgEffect, Effect, FgEffect};

/// A positional argument for a color verb template.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Foreground and background color with attributes.
    Effect(Effect),
    /// Foreground color with attributes.
    FgEffect(FgEffect),
    /// Background color with attributes.
    BgEffect(BgEffect),
    /// A `u32`; a packed foreground color when used by a color verb.
    U32(u32),
    /// A `u64`; packed background and foreground when used by a color verb.
    U64(u64),
    /// Any other integer.
    Int(i64),
    Float(f64),
    Char(char),
    Str(String),
    Bool(bool),
}

impl Value {
    /// Name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Effect(_) => "Effect",
            Value::FgEffect(_) => "FgEffect",
            Value::BgEffect(_) => "BgEffect",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
        }
    }

    /// The value as a signed integer, if it is integral.
    ///
    /// `U64` values above `i64::MAX` wrap, as a C cast would.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(n) => Some(n),
            Value::U32(n) => Some(n as i64),
            Value::U64(n) => Some(n as i64),
            Value::Char(c) => Some(c as i64),
            _ => None,
        }
    }

    /// The value as a float, if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(n) => Some(n),
            Value::Int(n) => Some(n as f64),
            Value::U32(n) => Some(n as f64),
            Value::U64(n) => Some(n as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Effect(e) => write!(f, "{{{} {} {}}}", e.fg, e.bg, e.attributes),
            Value::FgEffect(e) => write!(f, "{{{} {}}}", e.color, e.attributes),
            Value::BgEffect(e) => write!(f, "{{{} {}}}", e.color, e.attributes),
            Value::U32(n) => write!(f, "{n}"),
            Value::U64(n) => write!(f, "{n}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Int(n as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, isize, u8, u16);

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::U32(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::U64(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::U64(n as u64)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<Effect> for Value {
    fn from(e: Effect) -> Self {
        Value::Effect(e)
    }
}

impl From<FgEffect> for Value {
    fn from(e: FgEffect) -> Self {
        Value::FgEffect(e)
    }
}

impl From<BgEffect> for Value {
    fn from(e: BgEffect) -> Self {
        Value::BgEffect(e)
    }
}

/// Builds an array of [`Value`]s from heterogeneous expressions.
///
/// ```rust
/// use colorverb::{args, Value};
///
/// let args = args![0xff0000u32, 42, "x"];
/// assert_eq!(args[1], Value::Int(42));
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        [$($crate::Value::from($arg)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{Attributes, Rgb};

    #[test]
    fn integer_conversions() {
        assert_eq!(Value::from(-3i8), Value::Int(-3));
        assert_eq!(Value::from(200u8), Value::Int(200));
        assert_eq!(Value::from(7i32), Value::Int(7));
        assert_eq!(Value::from(7u32), Value::U32(7));
        assert_eq!(Value::from(7u64), Value::U64(7));
        assert_eq!(Value::from(7usize), Value::U64(7));
    }

    #[test]
    fn numeric_views() {
        assert_eq!(Value::Char('A').as_i64(), Some(65));
        assert_eq!(Value::U64(u64::MAX).as_i64(), Some(-1));
        assert_eq!(Value::Str("1".into()).as_i64(), None);
        assert_eq!(Value::Int(2).as_f64(), Some(2.0));
        assert_eq!(Value::Bool(true).as_f64(), None);
    }

    #[test]
    fn display() {
        assert_eq!(Value::Str("hi".into()).to_string(), "hi");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(
            Value::FgEffect(FgEffect::new(Rgb(255, 0, 0), Attributes::empty())).to_string(),
            "{#ff0000 -}"
        );
        let effect = Effect::new(
            Rgb(0, 0, 0),
            Rgb(255, 255, 255),
            Attributes::BOLD | Attributes::DIM,
        );
        assert_eq!(
            Value::Effect(effect).to_string(),
            "{#000000 #ffffff BOLD|DIM}"
        );
    }

    #[test]
    fn args_macro() {
        let args = crate::args!['x', true, 1.5];
        assert_eq!(
            args,
            [Value::Char('x'), Value::Bool(true), Value::Float(1.5)]
        );
    }
}

//! The standard verb formatter.
//!
//! Once color verbs are substituted, the residual template holds only
//! standard verbs. Anything implementing [`FormattedWrite`] can take it from
//! there; [`Printf`] is the bundled implementation, with C `printf`
//! semantics over [`Value`] arguments:
//!
//! | Verb | Accepts | Output |
//! |------|---------|--------|
//! | `d` `i` `u` | integers, chars | decimal (`u` wraps negatives to 64 bits) |
//! | `o` `x` `X` | integers, chars, strings | octal / hex; strings hex-encode their bytes |
//! | `f` `F` `e` `E` `g` `G` | numbers | fixed / exponent (`e+NN`) / shortest |
//! | `c` | chars, integer code points | the character |
//! | `s` `v` | anything | the value's display form |
//!
//! Flags `-`, `+`, space, `0` and `#`, width and precision (literal or `*`)
//! behave as in C, up to [`MAX_COUNT`]. `a`, `A`, `p` and `n` are recognised
//! but rejected.

use std::io::Write;

use console::Term;

use crate::error::FormatError;
use crate::scanner::{Count, Scanner, VerbKind, VerbSpec};
use crate::value::Value;

/// Largest width or precision the formatter accepts.
pub const MAX_COUNT: usize = 1_000_000;

/// Fraction digits past which every `f64` expands to zeros.
const EXACT_DIGITS: usize = 1100;

/// A sink that formats a template containing only standard verbs.
pub trait FormattedWrite {
    type Error;

    /// Formats `template` with `args` and writes it, returning the bytes written.
    fn write_formatted(&mut self, template: &str, args: &[&Value]) -> Result<usize, Self::Error>;
}

/// Formats standard verbs and writes the result to an [`std::io::Write`].
#[derive(Debug)]
pub struct Printf<W> {
    writer: W,
    strict: bool,
}

impl<W: Write> Printf<W> {
    /// A lenient formatter writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            strict: false,
        }
    }

    /// Rejects arguments left over after the last verb.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Gets a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Unwraps this `Printf`, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl Printf<Term> {
    /// A formatter writing to standard output.
    pub fn stdout() -> Self {
        Self::new(Term::stdout())
    }
}

impl<W: Write> FormattedWrite for Printf<W> {
    type Error = FormatError;

    fn write_formatted(&mut self, template: &str, args: &[&Value]) -> Result<usize, FormatError> {
        let output = format_standard(template, args, self.strict)?;
        self.writer.write_all(output.as_bytes())?;
        self.writer.flush()?;
        Ok(output.len())
    }
}

/// Formats a template of standard verbs into a string.
///
/// A color verb in `template` is an error: substitute first.
pub fn format_standard(
    template: &str,
    args: &[&Value],
    strict: bool,
) -> Result<String, FormatError> {
    let mut output = String::with_capacity(template.len());
    let mut args = args.iter().copied();
    let mut last = 0;

    for verb in Scanner::new(template) {
        let verb = verb?;
        let offset = verb.span.start;
        push_literal(&mut output, &template[last..offset]);

        let VerbKind::Standard(spec) = verb.kind else {
            return Err(FormatError::UnexpectedColorVerb { offset });
        };
        let mut next = || {
            args.next().ok_or(FormatError::MissingArgument {
                verb: spec.specifier,
                offset,
            })
        };

        let mut layout = Layout::from_flags(&spec);
        match spec.width {
            Some(Count::Literal(n)) => layout.width = Some(n),
            Some(Count::Star) => {
                let n = star_count(next()?)?;
                layout.left |= n < 0;
                layout.width = Some(n.unsigned_abs() as usize);
            }
            None => {}
        }
        match spec.precision {
            Some(Count::Literal(n)) => layout.precision = Some(n),
            Some(Count::Star) => {
                let n = star_count(next()?)?;
                layout.precision = usize::try_from(n).ok();
            }
            None => {}
        }
        if let Some(width) = layout.width.filter(|&n| n > MAX_COUNT) {
            return Err(FormatError::WidthTooLarge {
                width,
                limit: MAX_COUNT,
                offset,
            });
        }
        if let Some(precision) = layout.precision.filter(|&n| n > MAX_COUNT) {
            return Err(FormatError::PrecisionTooLarge {
                precision,
                limit: MAX_COUNT,
                offset,
            });
        }
        let value = next()?;

        format_verb(&mut output, spec.specifier, &layout, value)?;
        last = verb.span.end;
    }
    push_literal(&mut output, &template[last..]);

    if strict {
        let extra = args.count();
        if extra > 0 {
            return Err(FormatError::ExtraArguments(extra));
        }
    }
    Ok(output)
}

fn push_literal(output: &mut String, text: &str) {
    if text.contains("%%") {
        output.push_str(&text.replace("%%", "%"));
    } else {
        output.push_str(text);
    }
}

fn star_count(value: &Value) -> Result<i64, FormatError> {
    value.as_i64().ok_or(FormatError::BadArgument {
        verb: '*',
        value_type: value.type_name(),
    })
}

/// Flags, width and precision after `*` counts are resolved.
#[derive(Debug, Default)]
struct Layout {
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    alt: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

impl Layout {
    fn from_flags(spec: &VerbSpec<'_>) -> Self {
        Self {
            left: spec.has_flag('-'),
            zero: spec.has_flag('0'),
            plus: spec.has_flag('+'),
            space: spec.has_flag(' '),
            alt: spec.has_flag('#'),
            ..Self::default()
        }
    }

    fn sign(&self, negative: bool) -> &'static str {
        if negative {
            "-"
        } else if self.plus {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        }
    }

    /// Pads `sign + prefix + body` to the width. Zero padding goes between
    /// the prefix and the body, and only when `zero_ok`.
    fn pad(&self, output: &mut String, sign: &str, prefix: &str, body: &str, zero_ok: bool) {
        let len = sign.chars().count() + prefix.chars().count() + body.chars().count();
        let fill = self.width.map_or(0, |width| width.saturating_sub(len));
        if self.left {
            output.push_str(sign);
            output.push_str(prefix);
            output.push_str(body);
            output.extend(std::iter::repeat(' ').take(fill));
        } else if self.zero && zero_ok {
            output.push_str(sign);
            output.push_str(prefix);
            output.extend(std::iter::repeat('0').take(fill));
            output.push_str(body);
        } else {
            output.extend(std::iter::repeat(' ').take(fill));
            output.push_str(sign);
            output.push_str(prefix);
            output.push_str(body);
        }
    }
}

fn format_verb(
    output: &mut String,
    verb: char,
    layout: &Layout,
    value: &Value,
) -> Result<(), FormatError> {
    let bad = || FormatError::BadArgument {
        verb,
        value_type: value.type_name(),
    };

    match verb {
        'd' | 'i' | 'u' => {
            let mut n = integer(value).ok_or_else(bad)?;
            if verb == 'u' && n < 0 {
                n += 1 << 64;
            }
            let digits = min_digits(n.unsigned_abs().to_string(), layout.precision);
            layout.pad(output, layout.sign(n < 0), "", &digits, layout.precision.is_none());
        }
        'o' | 'x' | 'X' => {
            if let (Value::Str(s), 'x' | 'X') = (value, verb) {
                let hex: String = s.bytes().map(|b| format!("{b:02x}")).collect();
                let hex = if verb == 'X' { hex.to_uppercase() } else { hex };
                layout.pad(output, "", "", &hex, false);
                return Ok(());
            }
            let n = integer(value).ok_or_else(bad)?;
            // Negative values print as their 64-bit two's complement.
            let n = if n < 0 { (n + (1 << 64)) as u128 } else { n as u128 };
            let (digits, prefix) = match verb {
                'o' => {
                    let digits = format!("{n:o}");
                    let alt = layout.alt && layout.precision.is_none() && n != 0;
                    let prefix = if alt { "0" } else { "" };
                    (digits, prefix)
                }
                'x' => (format!("{n:x}"), if layout.alt && n != 0 { "0x" } else { "" }),
                _ => (format!("{n:X}"), if layout.alt && n != 0 { "0X" } else { "" }),
            };
            let digits = min_digits(digits, layout.precision);
            layout.pad(output, "", prefix, &digits, layout.precision.is_none());
        }
        'f' | 'F' | 'e' | 'E' | 'g' | 'G' => {
            let x = value.as_f64().ok_or_else(bad)?;
            let upper = verb.is_ascii_uppercase();
            let sign = layout.sign(x.is_sign_negative() && !x.is_nan());
            if !x.is_finite() {
                let body = match (x.is_nan(), upper) {
                    (true, false) => "nan",
                    (true, true) => "NAN",
                    (false, false) => "inf",
                    (false, true) => "INF",
                };
                layout.pad(output, sign, "", body, false);
                return Ok(());
            }
            let x = x.abs();
            let precision = layout.precision.unwrap_or(6);
            let body = match verb {
                'f' | 'F' => {
                    let mut body = fixed_form(x, precision);
                    if layout.alt && precision == 0 {
                        body.push('.');
                    }
                    body
                }
                'e' | 'E' => exponent_form(x, precision, upper),
                _ => general_form(x, precision, layout.alt, upper),
            };
            layout.pad(output, sign, "", &body, true);
        }
        'c' => {
            let c = match *value {
                Value::Char(c) => c,
                _ => integer(value)
                    .and_then(|n| u32::try_from(n).ok())
                    .and_then(char::from_u32)
                    .ok_or_else(bad)?,
            };
            layout.pad(output, "", "", c.encode_utf8(&mut [0; 4]), false);
        }
        's' | 'v' => {
            let text = value.to_string();
            let text = match layout.precision {
                Some(max) => text.chars().take(max).collect(),
                None => text,
            };
            layout.pad(output, "", "", &text, false);
        }
        other => return Err(FormatError::UnsupportedVerb(other)),
    }
    Ok(())
}

fn integer(value: &Value) -> Option<i128> {
    match *value {
        Value::Int(n) => Some(n.into()),
        Value::U32(n) => Some(n.into()),
        Value::U64(n) => Some(n.into()),
        Value::Char(c) => Some(u32::from(c).into()),
        _ => None,
    }
}

/// Left-pads `digits` with zeros to the precision. A zero precision prints
/// zero as nothing, as in C.
fn min_digits(digits: String, precision: Option<usize>) -> String {
    match precision {
        Some(0) if digits == "0" => String::new(),
        Some(p) if p > digits.len() => format!("{}{digits}", "0".repeat(p - digits.len())),
        _ => digits,
    }
}

/// `ddd.ddd`. Precisions past [`EXACT_DIGITS`] are zero-filled, since the
/// runtime precision of `format!` is limited to `u16::MAX`.
fn fixed_form(x: f64, precision: usize) -> String {
    let digits = precision.min(EXACT_DIGITS);
    let mut body = format!("{x:.digits$}");
    body.extend(std::iter::repeat('0').take(precision - digits));
    body
}

/// `d.ddde+NN`, as C prints `%e`.
fn exponent_form(x: f64, precision: usize, upper: bool) -> String {
    let digits = precision.min(EXACT_DIGITS);
    let rust = format!("{x:.digits$e}");
    let Some((mantissa, exponent)) = rust.split_once('e') else {
        return rust;
    };
    let zeros = "0".repeat(precision - digits);
    let exponent: i32 = exponent.parse().unwrap_or_default();
    let e = if upper { 'E' } else { 'e' };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}{zeros}{e}{sign}{:02}", exponent.unsigned_abs())
}

/// `%g`: fixed or exponent form, whichever C would pick, trailing zeros
/// removed unless `alt`.
fn general_form(x: f64, precision: usize, alt: bool, upper: bool) -> String {
    let p = precision.max(1);
    let exponent = if x == 0.0 {
        0
    } else {
        let digits = (p - 1).min(EXACT_DIGITS);
        let rounded = format!("{x:.digits$e}");
        rounded
            .split_once('e')
            .and_then(|(_, e)| e.parse::<i64>().ok())
            .unwrap_or_default()
    };

    if (p as i64) > exponent && exponent >= -4 {
        let decimals = (p as i64 - 1 - exponent) as usize;
        let fixed = fixed_form(x, decimals);
        if alt {
            fixed
        } else {
            trim_fraction(&fixed).to_string()
        }
    } else {
        let exp = exponent_form(x, p - 1, upper);
        if alt {
            return exp;
        }
        match exp.find(['e', 'E']) {
            Some(at) => format!("{}{}", trim_fraction(&exp[..at]), &exp[at..]),
            None => exp,
        }
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

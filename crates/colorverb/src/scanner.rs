//! Single-pass scanner for color verbs and standard verbs.
//!
//! The scanner walks a template left to right and yields every verb
//! occurrence with its byte span. Text between occurrences is literal and is
//! represented only by the gaps between spans.
//!
//! - `%C{...}` is a color verb. Its inner text may hold standard verbs and
//!   further color verbs; the closing `}` is the first one not claimed by a
//!   nested `%C{`. The inner text is not scanned here, the substitution pass
//!   rescans it.
//! - `%[flags][width][.precision][length]specifier` is a standard verb.
//! - `%%` is a literal percent sign and never an occurrence.
//! - Any other `%` is literal text.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ColorVerbError, Result};

const COLOR_OPEN: &str = "%C{";

static STANDARD_VERB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^%(?P<flags>[-+#0 ]*)(?P<width>\d+|\*)?(?:\.(?P<precision>\d+|\*))?(?P<length>hh|ll|[hljztL])?(?P<specifier>[diuoxXfFeEgGaAcspnv])",
    )
    .expect("standard verb pattern is valid")
});

/// A width or precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    Literal(usize),
    /// `*`: taken from the argument list, before the verb's own value.
    Star,
}

/// The parts of a standard verb, left for the formatter to interpret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbSpec<'a> {
    pub flags: &'a str,
    pub width: Option<Count>,
    pub precision: Option<Count>,
    pub length: Option<&'a str>,
    pub specifier: char,
}

impl VerbSpec<'_> {
    /// Number of arguments the verb consumes: its value plus one per `*`.
    pub fn arity(&self) -> usize {
        1 + [self.width, self.precision]
            .iter()
            .filter(|count| matches!(count, Some(Count::Star)))
            .count()
    }

    pub fn has_flag(&self, flag: char) -> bool {
        self.flags.contains(flag)
    }
}

/// What kind of verb an occurrence is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerbKind<'a> {
    /// `%C{inner}`.
    Color { inner: &'a str },
    Standard(VerbSpec<'a>),
}

/// One verb occurrence and its byte span in the scanned template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verb<'a> {
    pub kind: VerbKind<'a>,
    pub span: Range<usize>,
}

/// Iterator over the verb occurrences of a template.
///
/// Yields occurrences in template order with non-overlapping spans. After an
/// error it yields nothing more.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    template: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(template: &'a str) -> Self {
        Self {
            template,
            pos: 0,
            done: false,
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Verb<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let Some(found) = self.template[self.pos..].find('%') else {
                self.done = true;
                break;
            };
            let start = self.pos + found;
            let tail = &self.template[start..];

            if tail.starts_with("%%") {
                self.pos = start + 2;
                continue;
            }

            if let Some(body) = tail.strip_prefix(COLOR_OPEN) {
                let Some(close) = closing_brace(body) else {
                    self.done = true;
                    return Some(Err(ColorVerbError::MalformedColorVerb { offset: start }));
                };
                let end = start + COLOR_OPEN.len() + close + 1;
                self.pos = end;
                return Some(Ok(Verb {
                    kind: VerbKind::Color {
                        inner: &body[..close],
                    },
                    span: start..end,
                }));
            }

            if let Some((spec, len)) = parse_standard(tail) {
                self.pos = start + len;
                return Some(Ok(Verb {
                    kind: VerbKind::Standard(spec),
                    span: start..start + len,
                }));
            }

            // A lone '%' that starts no verb is literal.
            self.pos = start + 1;
        }
        None
    }
}

impl std::iter::FusedIterator for Scanner<'_> {}

/// Scans `template` into its verb occurrences.
pub fn scan(template: &str) -> Result<Vec<Verb<'_>>> {
    Scanner::new(template).collect()
}

/// Offset of the `}` closing a color verb whose body starts `body`.
fn closing_brace(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if bytes[i + 1..].starts_with(b"%") => i += 2,
            b'%' if bytes[i + 1..].starts_with(b"C{") => {
                depth += 1;
                i += COLOR_OPEN.len();
            }
            b'}' if depth == 0 => return Some(i),
            b'}' => {
                depth -= 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}

/// Parses a standard verb at the start of `tail`, returning it and its length.
fn parse_standard(tail: &str) -> Option<(VerbSpec<'_>, usize)> {
    let caps = STANDARD_VERB.captures(tail)?;
    let len = caps.get(0)?.end();
    let width = match caps.name("width") {
        Some(m) => Some(parse_count(m.as_str())?),
        None => None,
    };
    let precision = match caps.name("precision") {
        Some(m) => Some(parse_count(m.as_str())?),
        None => None,
    };
    let spec = VerbSpec {
        flags: caps.name("flags").map_or("", |m| m.as_str()),
        width,
        precision,
        length: caps.name("length").map(|m| m.as_str()),
        specifier: caps.name("specifier")?.as_str().chars().next()?,
    };
    Some((spec, len))
}

/// A count too large for `usize` makes the verb invalid, hence literal.
fn parse_count(text: &str) -> Option<Count> {
    if text == "*" {
        Some(Count::Star)
    } else {
        text.parse().ok().map(Count::Literal)
    }
}

//! Argument allocation and recursive color verb substitution.
//!
//! A pass walks the verbs of one template in order while an [`ArgCursor`]
//! hands out positional arguments:
//!
//! - a standard verb takes its arity's worth of arguments; the verb stays in
//!   the residual template and the arguments go to the residual list.
//! - a color verb takes one argument, its color request, and then runs a
//!   nested pass over its inner text with the arguments that follow. The
//!   cursor then skips everything the nested pass consumed. The rendered
//!   chunk replaces the verb, and the residual arguments of the nested pass
//!   (those of the standard verbs left inside the chunk) join the outer list
//!   at that position. Color requests consumed by nested verbs never reach
//!   the residual list.
//!
//! Every argument is therefore consumed exactly once. Arguments past the last
//! occurrence of the top-level template are forwarded untouched.
//!
//! Literal text is copied with every lone `%` doubled. Once a color verb is
//! replaced by its bare text, a trailing `%` would otherwise meet the text
//! after the verb and read as a new verb.

use tracing::trace;

use crate::effect;
use crate::error::{ColorVerbError, Result};
use crate::escape;
use crate::scanner::{Scanner, VerbKind};
use crate::value::Value;

/// How color verbs are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Wrap the verb's text in ANSI escape codes.
    #[default]
    Apply,

    /// Emit only the verb's text, for plain output.
    /// Color requests are still consumed and validated.
    Remove,
}

/// A template with its color verbs replaced, and the arguments left for the
/// standard verbs it still contains.
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution<'a> {
    pub template: String,
    pub args: Vec<&'a Value>,
    /// Arguments consumed by verb occurrences, color requests included.
    /// Forwarded trailing arguments are not counted.
    pub consumed: usize,
}

/// Position in an argument list, shared by one pass.
#[derive(Debug)]
struct ArgCursor<'a> {
    args: &'a [Value],
    pos: usize,
}

impl<'a> ArgCursor<'a> {
    fn new(args: &'a [Value]) -> Self {
        Self { args, pos: 0 }
    }

    fn remaining(&self) -> &'a [Value] {
        &self.args[self.pos..]
    }

    fn consumed(&self) -> usize {
        self.pos
    }

    /// Takes the next `count` arguments for the verb at `offset`.
    fn take(&mut self, count: usize, offset: usize) -> Result<&'a [Value]> {
        let available = self.args.len() - self.pos;
        if count > available {
            return Err(ColorVerbError::ArgumentUnderflow {
                offset,
                needed: count,
                available,
            });
        }
        let taken = &self.args[self.pos..self.pos + count];
        self.pos += count;
        Ok(taken)
    }

    /// Skips arguments a nested pass consumed from [`Self::remaining`].
    fn skip(&mut self, count: usize) {
        debug_assert!(count <= self.args.len() - self.pos, "nested pass over-consumed");
        self.pos += count;
    }
}

/// Substitutes every color verb in `template`.
///
/// On error nothing has been rendered; the first failure in template order
/// is returned, whatever its nesting depth.
pub fn substitute<'a>(
    template: &str,
    args: &'a [Value],
    mode: ColorMode,
) -> Result<Substitution<'a>> {
    let pass = run_pass(template, args, mode, 0, 0)?;
    let mut residual = pass.args;
    residual.extend(&args[pass.consumed..]);
    Ok(Substitution {
        template: pass.template,
        args: residual,
        consumed: pass.consumed,
    })
}

struct Pass<'a> {
    template: String,
    args: Vec<&'a Value>,
    consumed: usize,
}

/// One pass over `template`. `base` is the template's byte offset within the
/// top-level template, for error reporting.
fn run_pass<'a>(
    template: &str,
    args: &'a [Value],
    mode: ColorMode,
    base: usize,
    depth: usize,
) -> Result<Pass<'a>> {
    let mut cursor = ArgCursor::new(args);
    let mut output = String::with_capacity(template.len());
    let mut residual = Vec::new();
    let mut last = 0;

    for verb in Scanner::new(template) {
        let verb = verb?;
        let offset = base + verb.span.start;
        push_literal(&mut output, &template[last..verb.span.start]);

        match verb.kind {
            VerbKind::Standard(ref spec) => {
                let taken = cursor.take(spec.arity(), offset)?;
                trace!(offset, depth, arity = taken.len(), "standard verb");
                output.push_str(&template[verb.span.clone()]);
                residual.extend(taken);
            }
            VerbKind::Color { inner } => {
                let request = &cursor.take(1, offset)?[0];
                let style = effect::resolve(request)?;
                let inner_base = offset + "%C{".len();
                let nested = run_pass(inner, cursor.remaining(), mode, inner_base, depth + 1)?;
                cursor.skip(nested.consumed);
                trace!(offset, depth, consumed = 1 + nested.consumed, "color verb");

                match mode {
                    ColorMode::Apply => output.push_str(&escape::render(&style, &nested.template)),
                    ColorMode::Remove => output.push_str(&nested.template),
                }
                residual.extend(nested.args);
            }
        }
        last = verb.span.end;
    }

    push_literal(&mut output, &template[last..]);
    Ok(Pass {
        template: output,
        args: residual,
        consumed: cursor.consumed(),
    })
}

/// Copies a literal run, keeping `%%` pairs and doubling lone `%`.
fn push_literal(output: &mut String, text: &str) {
    let mut rest = text;
    while let Some(at) = rest.find('%') {
        output.push_str(&rest[..at]);
        output.push_str("%%");
        rest = &rest[at + 1..];
        rest = rest.strip_prefix('%').unwrap_or(rest);
    }
    output.push_str(rest);
}

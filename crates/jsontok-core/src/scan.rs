//! Lexical scanning over a [`Cursor`].
//!
//! These routines know JSON's punctuation but nothing about the values
//! being built. The untyped and typed builders in [`crate::parser`] drive
//! them with closures that produce their own element types.

use crate::cursor::Cursor;
use crate::error::{JsonError, Result};
use crate::parser::MAX_DEPTH;
use tracing::trace;

/// Which branch the dispatcher selected. The opening delimiter, if any,
/// has already been consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Branch {
    Object,
    Array,
    String,
    Scalar,
}

/// Skip whitespace and pick a branch from the current character.
pub(crate) fn dispatch(cur: &mut Cursor) -> Branch {
    cur.skip_whitespace();
    let branch = match cur.current() {
        Some('{') => Branch::Object,
        Some('[') => Branch::Array,
        Some('"') => Branch::String,
        _ => return Branch::Scalar,
    };
    cur.advance();
    trace!(position = cur.position(), ?branch, "dispatch");
    branch
}

/// An unquoted token: everything up to whitespace, `,`, `}`, `]` or EOF.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Bare {
    pub text: String,
    /// Every character is an ASCII decimal digit (vacuously true when empty).
    pub is_number: bool,
    pub start: usize,
}

/// The literal forms a bare token can take before any type hint applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Literal {
    Empty,
    Bool(bool),
    Null,
    Other,
}

impl Bare {
    pub(crate) fn literal(&self) -> Literal {
        match self.text.as_str() {
            "" => Literal::Empty,
            "true" => Literal::Bool(true),
            "false" => Literal::Bool(false),
            "null" => Literal::Null,
            _ => Literal::Other,
        }
    }
}

/// Read a bare token. The terminating delimiter is left under the cursor.
pub(crate) fn scan_bare(cur: &mut Cursor) -> Bare {
    let start = cur.position();
    let mut text = String::new();
    let mut is_number = true;
    while let Some(c) = cur.current() {
        if c.is_whitespace() || matches!(c, ',' | '}' | ']') {
            break;
        }
        is_number = is_number && c.is_ascii_digit();
        text.push(c);
        cur.advance();
    }
    trace!(start, token = %text, "scanned bare token");
    Bare {
        text,
        is_number,
        start,
    }
}

/// Read a string body. The opening quote must already be consumed; the
/// closing quote is consumed here.
pub(crate) fn scan_string(cur: &mut Cursor) -> Result<String> {
    let mut out = String::new();
    loop {
        match cur.current() {
            None => return Err(JsonError::unexpected('"', None, cur.position())),
            Some('"') => {
                cur.advance();
                return Ok(out);
            }
            Some('\\') => {
                cur.advance();
                decode_escape(cur, &mut out);
            }
            Some(c) => {
                out.push(c);
                cur.advance();
            }
        }
    }
}

/// Decode the escape whose backslash was just consumed.
///
/// Unknown escapes, and `\u` without four hex digits, pass the escaped
/// character through unchanged.
fn decode_escape(cur: &mut Cursor, out: &mut String) {
    // EOF is reported by the string loop as a missing closing quote.
    let Some(c) = cur.current() else {
        return;
    };
    cur.advance();
    match c {
        'b' => out.push('\u{0008}'),
        'f' => out.push('\u{000c}'),
        'n' => out.push('\n'),
        'r' => out.push('\r'),
        't' => out.push('\t'),
        'u' => match hex4_at(cur, 0) {
            Some(unit) => {
                skip(cur, 4);
                push_code_unit(cur, unit, out);
            }
            None => out.push('u'),
        },
        other => out.push(other),
    }
}

/// Push one UTF-16 code unit, pairing a high surrogate with an immediately
/// following `\uXXXX` low surrogate.
fn push_code_unit(cur: &mut Cursor, unit: u16, out: &mut String) {
    if (0xD800..0xDC00).contains(&unit) && cur.current() == Some('\\') && cur.peek(1) == Some('u')
    {
        if let Some(low) = hex4_at(cur, 2).filter(|low| (0xDC00..0xE000).contains(low)) {
            skip(cur, 6);
            out.extend(
                char::decode_utf16([unit, low]).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)),
            );
            return;
        }
    }
    out.extend(char::decode_utf16([unit]).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)));
}

/// Big-endian value of the four hex digits starting `offset` characters ahead.
fn hex4_at(cur: &Cursor, offset: usize) -> Option<u16> {
    let mut unit: u16 = 0;
    for i in 0..4 {
        let digit = cur.peek(offset + i)?.to_digit(16)?;
        unit = (unit << 4) | digit as u16;
    }
    Some(unit)
}

fn skip(cur: &mut Cursor, n: usize) {
    for _ in 0..n {
        cur.advance();
    }
}

/// Open a nesting level for the delimiter just consumed.
fn enter(cur: &mut Cursor) -> Result<()> {
    if cur.descend() > MAX_DEPTH {
        return Err(JsonError::too_deep(
            MAX_DEPTH,
            cur.position().saturating_sub(1),
        ));
    }
    Ok(())
}

/// Drive an array body. The opening `[` must already be consumed.
///
/// `element` parses one element starting at a non-whitespace character
/// other than `,` or `]`. An element that consumes nothing (a stray `}`)
/// is kept, and the offending character skipped after it.
pub(crate) fn scan_array<T>(
    cur: &mut Cursor,
    mut element: impl FnMut(&mut Cursor) -> Result<T>,
) -> Result<Vec<T>> {
    enter(cur)?;
    let mut items = Vec::new();
    loop {
        cur.skip_whitespace();
        match cur.current() {
            None => return Err(JsonError::unexpected(']', None, cur.position())),
            Some(',') => cur.advance(),
            Some(']') => {
                cur.advance();
                cur.ascend();
                trace!(len = items.len(), "array closed");
                return Ok(items);
            }
            Some(c) => {
                let before = cur.position();
                items.push(element(cur)?);
                if cur.position() == before {
                    trace!(position = before, stray = %c, "skipping stray character in array");
                    cur.advance();
                }
            }
        }
    }
}

/// Drive an object body. The opening `{` must already be consumed.
///
/// `member` is called with the current key once the `:` has been consumed;
/// it must parse the value from the cursor. Characters that are neither
/// `:`, `,` nor `}` between members are skipped.
pub(crate) fn scan_object(
    cur: &mut Cursor,
    mut member: impl FnMut(&mut Cursor, &str) -> Result<()>,
) -> Result<()> {
    enter(cur)?;
    let mut key = String::new();
    let mut parsing_key = true;
    loop {
        cur.skip_whitespace();
        let Some(c) = cur.current() else {
            return Err(JsonError::unexpected('}', None, cur.position()));
        };

        if parsing_key {
            match c {
                '"' => {
                    cur.advance();
                    key = scan_string(cur)?;
                    trace!(key = %key, "object key");
                    parsing_key = false;
                }
                // Empty object, or a trailing comma before the brace.
                '}' => {
                    cur.advance();
                    cur.ascend();
                    return Ok(());
                }
                other => return Err(JsonError::unexpected('"', Some(other), cur.position())),
            }
            continue;
        }

        match c {
            ':' => {
                cur.advance();
                cur.skip_whitespace();
                member(cur, &key)?;
            }
            ',' => {
                cur.advance();
                parsing_key = true;
            }
            '}' => {
                cur.advance();
                cur.ascend();
                return Ok(());
            }
            other => {
                trace!(position = cur.position(), stray = %other, "skipping stray character in object");
                cur.advance();
            }
        }
    }
}

//! Recursive-descent builders for untyped and typed parsing.
//!
//! Both builders share the scanners in [`crate::scan`]; they differ only in
//! what they build from each branch. The typed builder carries a
//! [`TypeDesc`] down the recursion and picks the element, value or field
//! description for each nested call.
//!
//! # Leniency
//!
//! - Unquoted `true`, `false` and `null` are literals; other bare words must
//!   parse as numbers (untyped) or as the hinted scalar (typed).
//! - Trailing commas, and stray characters between object members, are
//!   skipped.
//! - Values under record keys with no matching field are skipped without
//!   being converted, so a bare word there is not an error.
//! - Anything after the first complete value is ignored.
//!
//! Arrays and objects may nest at most [`MAX_DEPTH`] levels deep.

use crate::coerce::{classify, coerce_bare, coerce_string};
use crate::cursor::Cursor;
use crate::error::{JsonError, Result};
use crate::scan::{dispatch, scan_array, scan_bare, scan_object, scan_string, Branch};
use crate::typed::{Record, Typed};
use crate::types::TypeDesc;
use crate::value::{Map, Value};
use indexmap::IndexMap;
use tracing::{debug, trace};

/// How many arrays and objects may be open at once. Deeper input fails
/// with [`JsonError::TooDeep`].
pub const MAX_DEPTH: usize = 128;

/// Parse JSON text into an untyped [`Value`].
///
/// Empty (or all-whitespace) input yields `Value::Str("")`.
///
/// ```
/// use jsontok_core::{parse, Value};
///
/// let v = parse(r#"{"a": [1, 2.5, "x"], "b": null}"#).unwrap();
/// assert_eq!(v.get("a").and_then(|a| a.at(0)), Some(&Value::Integer(1)));
/// assert_eq!(v.get("b"), Some(&Value::Null));
/// ```
pub fn parse(text: &str) -> Result<Value> {
    debug!(bytes = text.len(), "parsing untyped");
    let mut cur = Cursor::new(text);
    let value = parse_value(&mut cur)?;
    note_trailing(&mut cur);
    Ok(value)
}

/// Parse JSON text into a [`Typed`] value shaped by `desc`.
///
/// ```
/// use jsontok_core::{parse_typed, ScalarKind, StructDesc, TypeDesc};
///
/// let desc = TypeDesc::record(
///     StructDesc::new("Point")
///         .field("X", TypeDesc::scalar(ScalarKind::I32))
///         .field("Y", TypeDesc::scalar(ScalarKind::I32)),
/// );
/// let p = parse_typed(r#"{"x": 3, "y": 4, "z": 5}"#, &desc).unwrap();
/// assert_eq!(p.to_string(), r#"{"X":3,"Y":4}"#);
/// ```
pub fn parse_typed(text: &str, desc: &TypeDesc) -> Result<Typed> {
    debug!(bytes = text.len(), target = %desc, "parsing typed");
    let mut cur = Cursor::new(text);
    let typed = parse_typed_value(&mut cur, desc)?;
    note_trailing(&mut cur);
    Ok(typed)
}

fn note_trailing(cur: &mut Cursor) {
    cur.skip_whitespace();
    if !cur.is_eof() {
        trace!(position = cur.position(), "ignoring text after the first value");
    }
}

pub(crate) fn parse_value(cur: &mut Cursor) -> Result<Value> {
    match dispatch(cur) {
        Branch::Object => parse_object(cur).map(Value::Obj),
        Branch::Array => parse_array(cur).map(Value::Arr),
        Branch::String => scan_string(cur).map(Value::Str),
        Branch::Scalar => classify(scan_bare(cur)),
    }
}

fn parse_object(cur: &mut Cursor) -> Result<Map> {
    let mut map = Map::new();
    scan_object(cur, |cur, key| {
        let value = parse_value(cur)?;
        map.insert(key.to_string(), value);
        Ok(())
    })?;
    Ok(map)
}

fn parse_array(cur: &mut Cursor) -> Result<Vec<Value>> {
    scan_array(cur, parse_value)
}

/// Consume one value without building it. Bare tokens are not converted;
/// missing delimiters are still errors.
fn skip_value(cur: &mut Cursor) -> Result<()> {
    match dispatch(cur) {
        Branch::Object => scan_object(cur, |cur, _| skip_value(cur)),
        Branch::Array => scan_array(cur, skip_value).map(drop),
        Branch::String => scan_string(cur).map(drop),
        Branch::Scalar => {
            scan_bare(cur);
            Ok(())
        }
    }
}

pub(crate) fn parse_typed_value(cur: &mut Cursor, desc: &TypeDesc) -> Result<Typed> {
    if let TypeDesc::Any = desc {
        return parse_value(cur).map(Typed::Untyped);
    }
    match dispatch(cur) {
        Branch::Object => parse_typed_object(cur, desc),
        Branch::Array => parse_typed_array(cur, desc),
        Branch::String => {
            let position = cur.position();
            let text = scan_string(cur)?;
            coerce_string(text, desc, position)
        }
        Branch::Scalar => coerce_bare(scan_bare(cur), desc),
    }
}

/// Object body under a hint. The `{` is already consumed.
fn parse_typed_object(cur: &mut Cursor, desc: &TypeDesc) -> Result<Typed> {
    match desc {
        TypeDesc::Optional { inner } => parse_typed_object(cur, inner),
        TypeDesc::Any => parse_object(cur).map(|map| Typed::Untyped(Value::Obj(map))),
        TypeDesc::Dictionary { value } => {
            let mut dict = IndexMap::new();
            scan_object(cur, |cur, key| {
                let item = parse_typed_value(cur, value)?;
                dict.insert(key.to_string(), item);
                Ok(())
            })?;
            Ok(Typed::Dictionary(dict))
        }
        TypeDesc::Record(shape) => {
            let mut record = Record::new(shape);
            scan_object(cur, |cur, key| {
                match shape.find_field(key) {
                    Some(field) => {
                        let item = parse_typed_value(cur, &field.ty)?;
                        record.set(&field.name, item);
                    }
                    None => {
                        trace!(key, record = %shape.name, "discarding unknown field");
                        skip_value(cur)?;
                    }
                }
                Ok(())
            })?;
            Ok(Typed::Record(record))
        }
        other => Err(JsonError::coercion(
            "object",
            other,
            cur.position().saturating_sub(1),
        )),
    }
}

/// Array body under a hint. The `[` is already consumed.
fn parse_typed_array(cur: &mut Cursor, desc: &TypeDesc) -> Result<Typed> {
    match desc {
        TypeDesc::Optional { inner } => parse_typed_array(cur, inner),
        TypeDesc::Any => parse_array(cur).map(|items| Typed::Untyped(Value::Arr(items))),
        TypeDesc::FixedArray { element } => {
            let items = scan_array(cur, |cur| parse_typed_value(cur, element))?;
            Ok(Typed::Array(items.into_boxed_slice()))
        }
        TypeDesc::List { element } => {
            scan_array(cur, |cur| parse_typed_value(cur, element)).map(Typed::List)
        }
        other => Err(JsonError::coercion(
            "array",
            other,
            cur.position().saturating_sub(1),
        )),
    }
}

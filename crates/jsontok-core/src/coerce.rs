//! Scalar classification and type-directed conversion.

use crate::error::{JsonError, Result};
use crate::scan::{Bare, Literal};
use crate::typed::{Scalar, Typed};
use crate::types::{ScalarKind, TypeDesc};
use crate::value::Value;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Classify a bare token with no type hint.
///
/// Order: empty → `Str("")`, `true`/`false`, `null`, pure digit run →
/// `Integer`, anything else → `Float`. A digit run too large for `i64`
/// falls through to `Float`; text that is not a number is an error.
pub(crate) fn classify(bare: Bare) -> Result<Value> {
    match bare.literal() {
        Literal::Empty => Ok(Value::Str(String::new())),
        Literal::Bool(b) => Ok(Value::Bool(b)),
        Literal::Null => Ok(Value::Null),
        Literal::Other => {
            if bare.is_number {
                if let Ok(n) = bare.text.parse::<i64>() {
                    return Ok(Value::Integer(n));
                }
            }
            bare.text
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| JsonError::coercion(&bare.text, "number", bare.start))
        }
    }
}

/// Convert a bare token under a type hint.
///
/// `true`, `false` and `null` keep their literal meaning whatever the hint.
/// An empty token is only accepted by string, optional and untyped hints.
pub(crate) fn coerce_bare(bare: Bare, desc: &TypeDesc) -> Result<Typed> {
    match (bare.literal(), desc) {
        (_, TypeDesc::Any) => classify(bare).map(Typed::Untyped),
        (Literal::Bool(b), _) => Ok(Typed::Bool(b)),
        (Literal::Null, _) => Ok(Typed::Null),
        (Literal::Empty, TypeDesc::Scalar {
            kind: ScalarKind::String,
        }) => Ok(Typed::Scalar(Scalar::Str(String::new()))),
        (Literal::Empty, TypeDesc::Optional { .. }) => Ok(Typed::Null),
        (_, TypeDesc::Optional { inner }) => coerce_bare(bare, inner),
        (_, TypeDesc::Scalar { kind }) => coerce_text(&bare.text, *kind, bare.start),
        (_, other) => Err(JsonError::coercion(&bare.text, other, bare.start)),
    }
}

/// Finish a quoted string under a type hint.
///
/// A string hint keeps the text. Any other scalar hint converts it the way
/// a bare token would be, so `"36"` fits a `u8`. Container hints reject it.
pub(crate) fn coerce_string(text: String, desc: &TypeDesc, position: usize) -> Result<Typed> {
    match desc {
        TypeDesc::Any => Ok(Typed::Untyped(Value::Str(text))),
        TypeDesc::Optional { inner } => coerce_string(text, inner, position),
        TypeDesc::Scalar {
            kind: ScalarKind::String,
        } => Ok(Typed::Scalar(Scalar::Str(text))),
        TypeDesc::Scalar { kind } => coerce_text(&text, *kind, position),
        other => Err(JsonError::coercion(&text, other, position)),
    }
}

/// Convert text to one scalar kind.
pub(crate) fn coerce_text(text: &str, kind: ScalarKind, position: usize) -> Result<Typed> {
    let fail = || JsonError::coercion(text, kind, position);
    let scalar = match kind {
        // Exact `true`/`false` never get here; this accepts other casings.
        ScalarKind::Bool => {
            return match text.to_ascii_lowercase().as_str() {
                "true" => Ok(Typed::Bool(true)),
                "false" => Ok(Typed::Bool(false)),
                _ => Err(fail()),
            };
        }
        ScalarKind::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Scalar::Char(c),
                _ => return Err(fail()),
            }
        }
        ScalarKind::I8 => Scalar::I8(text.parse().map_err(|_| fail())?),
        ScalarKind::I16 => Scalar::I16(text.parse().map_err(|_| fail())?),
        ScalarKind::I32 => Scalar::I32(text.parse().map_err(|_| fail())?),
        ScalarKind::I64 => Scalar::I64(text.parse().map_err(|_| fail())?),
        ScalarKind::U8 => Scalar::U8(text.parse().map_err(|_| fail())?),
        ScalarKind::U16 => Scalar::U16(text.parse().map_err(|_| fail())?),
        ScalarKind::U32 => Scalar::U32(text.parse().map_err(|_| fail())?),
        ScalarKind::U64 => Scalar::U64(text.parse().map_err(|_| fail())?),
        ScalarKind::F32 => Scalar::F32(text.parse().map_err(|_| fail())?),
        ScalarKind::F64 => Scalar::F64(text.parse().map_err(|_| fail())?),
        ScalarKind::String => Scalar::Str(text.to_string()),
        ScalarKind::DateTime => Scalar::DateTime(parse_date_time(text).ok_or_else(fail)?),
    };
    Ok(Typed::Scalar(scalar))
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a date/time. Accepts RFC 3339, RFC 2822, and zone-less
/// `YYYY-MM-DD[T| ]HH:MM[:SS[.fff]]` or `YYYY-MM-DD`, the latter two read
/// as UTC.
pub fn parse_date_time(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt);
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

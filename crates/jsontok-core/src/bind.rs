//! Binding typed parse results to Rust types.
//!
//! A [`JsonBind`] type describes itself as a [`TypeDesc`] and knows how to
//! take a [`Typed`] value apart. [`from_str`] runs both halves:
//!
//! ```
//! use jsontok_core::bind_record;
//!
//! #[derive(Debug, PartialEq)]
//! struct User {
//!     name: String,
//!     age: u32,
//!     tags: Vec<String>,
//! }
//!
//! bind_record!(User { name: String, age: u32, tags: Vec<String> });
//!
//! let user: User = jsontok_core::from_str(
//!     r#"{"Name": "ada", "AGE": 36, "tags": ["math"], "unused": {"x": 1}}"#,
//! )
//! .unwrap();
//! assert_eq!(user.name, "ada");
//! assert_eq!(user.age, 36);
//! assert_eq!(user.tags, vec!["math".to_string()]);
//! ```
//!
//! Record fields that are absent from the input bind through
//! [`JsonBind::absent`]: zero for numbers, `false` for booleans, empty
//! strings and containers, `None`, and nested records built from their own
//! defaults. An explicit `null` still only binds to `Option<T>` (or
//! [`Value`]).
//!
//! Self-referential records are not supported: describing them would
//! recurse without end.

use crate::error::{JsonError, Result};
use crate::parser::parse_typed;
use crate::typed::{Record, Scalar, Typed};
use crate::types::{ScalarKind, TypeDesc};
use crate::value::Value;
use chrono::{DateTime, FixedOffset, Utc};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// A Rust type that typed parsing can produce.
pub trait JsonBind: Sized {
    /// The description used to steer the parser.
    fn describe() -> TypeDesc;

    /// Convert the parser's output into `Self`.
    fn from_typed(value: Typed) -> Result<Self>;

    /// The value of a record field the input never mentioned.
    fn absent() -> Result<Self> {
        Err(JsonError::mismatch(Self::describe(), "missing field"))
    }
}

/// Parse `text` directly into `T`.
pub fn from_str<T: JsonBind>(text: &str) -> Result<T> {
    let desc = T::describe();
    T::from_typed(parse_typed(text, &desc)?)
}

macro_rules! bind_integer {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl JsonBind for $ty {
            fn describe() -> TypeDesc {
                TypeDesc::scalar(ScalarKind::$kind)
            }

            fn from_typed(value: Typed) -> Result<Self> {
                let wide = match &value {
                    Typed::Scalar(scalar) => scalar.as_i128(),
                    Typed::Untyped(Value::Integer(n)) => Some(i128::from(*n)),
                    _ => None,
                };
                wide.and_then(|n| <$ty>::try_from(n).ok())
                    .ok_or_else(|| JsonError::mismatch(ScalarKind::$kind, value.kind()))
            }
        }
    )*};
}

bind_integer!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
);

fn float_of(value: &Typed) -> Option<f64> {
    match value {
        Typed::Scalar(Scalar::F64(f)) => Some(*f),
        Typed::Scalar(Scalar::F32(f)) => Some(f64::from(*f)),
        Typed::Scalar(scalar) => scalar.as_i128().map(|n| n as f64),
        Typed::Untyped(v) => v.as_f64(),
        _ => None,
    }
}

impl JsonBind for f64 {
    fn describe() -> TypeDesc {
        TypeDesc::scalar(ScalarKind::F64)
    }

    fn from_typed(value: Typed) -> Result<Self> {
        float_of(&value).ok_or_else(|| JsonError::mismatch(ScalarKind::F64, value.kind()))
    }
}

impl JsonBind for f32 {
    fn describe() -> TypeDesc {
        TypeDesc::scalar(ScalarKind::F32)
    }

    fn from_typed(value: Typed) -> Result<Self> {
        float_of(&value)
            .map(|f| f as f32)
            .ok_or_else(|| JsonError::mismatch(ScalarKind::F32, value.kind()))
    }
}

impl JsonBind for bool {
    fn describe() -> TypeDesc {
        TypeDesc::scalar(ScalarKind::Bool)
    }

    fn from_typed(value: Typed) -> Result<Self> {
        match value {
            Typed::Bool(b) | Typed::Untyped(Value::Bool(b)) => Ok(b),
            other => Err(JsonError::mismatch(ScalarKind::Bool, other.kind())),
        }
    }
}

/// Accepts a char scalar or a one-character string.
impl JsonBind for char {
    fn describe() -> TypeDesc {
        TypeDesc::scalar(ScalarKind::Char)
    }

    fn from_typed(value: Typed) -> Result<Self> {
        if let Typed::Scalar(Scalar::Char(c)) = value {
            return Ok(c);
        }
        let single = value.as_str().and_then(|s| {
            let mut chars = s.chars();
            chars.next().filter(|_| chars.next().is_none())
        });
        single.ok_or_else(|| JsonError::mismatch(ScalarKind::Char, value.kind()))
    }
}

impl JsonBind for String {
    fn describe() -> TypeDesc {
        TypeDesc::scalar(ScalarKind::String)
    }

    fn from_typed(value: Typed) -> Result<Self> {
        match value {
            Typed::Scalar(Scalar::Str(s)) | Typed::Untyped(Value::Str(s)) => Ok(s),
            other => Err(JsonError::mismatch(ScalarKind::String, other.kind())),
        }
    }

    fn absent() -> Result<Self> {
        Ok(String::new())
    }
}

impl JsonBind for DateTime<FixedOffset> {
    fn describe() -> TypeDesc {
        TypeDesc::scalar(ScalarKind::DateTime)
    }

    fn from_typed(value: Typed) -> Result<Self> {
        match value {
            Typed::Scalar(Scalar::DateTime(dt)) => Ok(dt),
            other => Err(JsonError::mismatch(ScalarKind::DateTime, other.kind())),
        }
    }

    fn absent() -> Result<Self> {
        Ok(Self::default())
    }
}

impl JsonBind for DateTime<Utc> {
    fn describe() -> TypeDesc {
        TypeDesc::scalar(ScalarKind::DateTime)
    }

    fn from_typed(value: Typed) -> Result<Self> {
        DateTime::<FixedOffset>::from_typed(value).map(|dt| dt.with_timezone(&Utc))
    }

    fn absent() -> Result<Self> {
        Ok(Self::default())
    }
}

/// `Null` binds to `None`.
impl<T: JsonBind> JsonBind for Option<T> {
    fn describe() -> TypeDesc {
        TypeDesc::optional(T::describe())
    }

    fn from_typed(value: Typed) -> Result<Self> {
        match value {
            Typed::Null | Typed::Untyped(Value::Null) => Ok(None),
            other => T::from_typed(other).map(Some),
        }
    }

    fn absent() -> Result<Self> {
        Ok(None)
    }
}

/// Elements of a list, a fixed array, or an untyped array.
fn elements<T: JsonBind>(value: Typed, expected: &TypeDesc) -> Result<Vec<T>> {
    let items = match value {
        Typed::List(items) => items,
        Typed::Array(items) => items.into_vec(),
        Typed::Untyped(Value::Arr(items)) => items.into_iter().map(Typed::Untyped).collect(),
        other => return Err(JsonError::mismatch(expected, other.kind())),
    };
    items.into_iter().map(T::from_typed).collect()
}

impl<T: JsonBind> JsonBind for Vec<T> {
    fn describe() -> TypeDesc {
        TypeDesc::list(T::describe())
    }

    fn from_typed(value: Typed) -> Result<Self> {
        elements(value, &Self::describe())
    }

    fn absent() -> Result<Self> {
        Ok(Vec::new())
    }
}

impl<T: JsonBind> JsonBind for Box<[T]> {
    fn describe() -> TypeDesc {
        TypeDesc::fixed_array(T::describe())
    }

    fn from_typed(value: Typed) -> Result<Self> {
        elements(value, &Self::describe()).map(Vec::into_boxed_slice)
    }

    fn absent() -> Result<Self> {
        Ok(Box::default())
    }
}

/// Entries of a dictionary or an untyped object, in input order.
fn entries<T: JsonBind>(value: Typed, expected: &TypeDesc) -> Result<Vec<(String, T)>> {
    let map = match value {
        Typed::Dictionary(map) => map,
        Typed::Untyped(Value::Obj(map)) => map
            .into_iter()
            .map(|(k, v)| (k, Typed::Untyped(v)))
            .collect(),
        other => return Err(JsonError::mismatch(expected, other.kind())),
    };
    map.into_iter()
        .map(|(k, v)| T::from_typed(v).map(|v| (k, v)))
        .collect()
}

impl<T: JsonBind, S: BuildHasher + Default> JsonBind for HashMap<String, T, S> {
    fn describe() -> TypeDesc {
        TypeDesc::dictionary(T::describe())
    }

    fn from_typed(value: Typed) -> Result<Self> {
        Ok(entries(value, &Self::describe())?.into_iter().collect())
    }

    fn absent() -> Result<Self> {
        Ok(Self::default())
    }
}

impl<T: JsonBind> JsonBind for BTreeMap<String, T> {
    fn describe() -> TypeDesc {
        TypeDesc::dictionary(T::describe())
    }

    fn from_typed(value: Typed) -> Result<Self> {
        Ok(entries(value, &Self::describe())?.into_iter().collect())
    }

    fn absent() -> Result<Self> {
        Ok(Self::default())
    }
}

impl<T: JsonBind, S: BuildHasher + Default> JsonBind for IndexMap<String, T, S> {
    fn describe() -> TypeDesc {
        TypeDesc::dictionary(T::describe())
    }

    fn from_typed(value: Typed) -> Result<Self> {
        Ok(entries(value, &Self::describe())?.into_iter().collect())
    }

    fn absent() -> Result<Self> {
        Ok(Self::default())
    }
}

/// Any subtree, kept untyped. A missing record field binds to `Null`.
impl JsonBind for Value {
    fn describe() -> TypeDesc {
        TypeDesc::Any
    }

    fn from_typed(value: Typed) -> Result<Self> {
        match value {
            Typed::Untyped(v) => Ok(v),
            Typed::Null => Ok(Value::Null),
            other => Err(JsonError::mismatch(TypeDesc::Any, other.kind())),
        }
    }

    fn absent() -> Result<Self> {
        Ok(Value::Null)
    }
}

/// Unwrap a record produced for the struct named `name`.
#[doc(hidden)]
pub fn expect_record(value: Typed, name: &str) -> Result<Record> {
    match value {
        Typed::Record(record) => Ok(record),
        other => Err(JsonError::mismatch(format!("record {name}"), other.kind())),
    }
}

/// A record of `T`'s shape with every field absent.
#[doc(hidden)]
pub fn absent_record<T: JsonBind>() -> Result<T> {
    match T::describe() {
        TypeDesc::Record(shape) => T::from_typed(Typed::Record(Record::new(&shape))),
        other => Err(JsonError::mismatch(other, "missing field")),
    }
}

/// Move one declared field out of a record and bind it. A field the input
/// never assigned, whose default is `Null`, binds through
/// [`JsonBind::absent`].
#[doc(hidden)]
pub fn take_field<T: JsonBind>(record: &mut Record, field: &str) -> Result<T> {
    let assigned = record.is_assigned(field);
    let value = record.take(field).unwrap_or(Typed::Null);
    let bound = if !assigned && value.is_null() {
        T::absent()
    } else {
        T::from_typed(value)
    };
    bound.map_err(|err| match err {
        JsonError::Mismatch { expected, found } => JsonError::Mismatch {
            expected: format!("{expected} for field {}.{field}", record.name),
            found,
        },
        other => other,
    })
}

/// Implement [`JsonBind`] for a struct with named fields.
///
/// Each listed field becomes a record field of the same name, matched
/// case-insensitively against object keys. Every struct field must be
/// listed with its type.
#[macro_export]
macro_rules! bind_record {
    ($ty:ident { $($field:ident : $fty:ty),* $(,)? }) => {
        impl $crate::JsonBind for $ty {
            fn describe() -> $crate::TypeDesc {
                $crate::TypeDesc::record(
                    $crate::StructDesc::new(stringify!($ty))
                        $(.field(stringify!($field), <$fty as $crate::JsonBind>::describe()))*
                )
            }

            fn from_typed(value: $crate::Typed) -> $crate::Result<Self> {
                #[allow(unused_mut, unused_variables)]
                let mut record = $crate::bind::expect_record(value, stringify!($ty))?;
                Ok(Self {
                    $($field: $crate::bind::take_field::<$fty>(&mut record, stringify!($field))?,)*
                })
            }

            fn absent() -> $crate::Result<Self> {
                $crate::bind::absent_record::<Self>()
            }
        }
    };
}


//! Results of a typed parse.

use crate::types::{ScalarKind, StructDesc, TypeDesc};
use crate::value::Value;
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// A scalar converted to the width or form its description asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    Str(String),
    DateTime(DateTime<FixedOffset>),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::I8(_) => ScalarKind::I8,
            Scalar::I16(_) => ScalarKind::I16,
            Scalar::I32(_) => ScalarKind::I32,
            Scalar::I64(_) => ScalarKind::I64,
            Scalar::U8(_) => ScalarKind::U8,
            Scalar::U16(_) => ScalarKind::U16,
            Scalar::U32(_) => ScalarKind::U32,
            Scalar::U64(_) => ScalarKind::U64,
            Scalar::F32(_) => ScalarKind::F32,
            Scalar::F64(_) => ScalarKind::F64,
            Scalar::Char(_) => ScalarKind::Char,
            Scalar::Str(_) => ScalarKind::String,
            Scalar::DateTime(_) => ScalarKind::DateTime,
        }
    }

    /// Integer scalars as `i128`, wide enough for every source width.
    pub fn as_i128(&self) -> Option<i128> {
        Some(match *self {
            Scalar::I8(n) => n.into(),
            Scalar::I16(n) => n.into(),
            Scalar::I32(n) => n.into(),
            Scalar::I64(n) => n.into(),
            Scalar::U8(n) => n.into(),
            Scalar::U16(n) => n.into(),
            Scalar::U32(n) => n.into(),
            Scalar::U64(n) => n.into(),
            _ => return None,
        })
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::I8(n) => serializer.serialize_i8(*n),
            Scalar::I16(n) => serializer.serialize_i16(*n),
            Scalar::I32(n) => serializer.serialize_i32(*n),
            Scalar::I64(n) => serializer.serialize_i64(*n),
            Scalar::U8(n) => serializer.serialize_u8(*n),
            Scalar::U16(n) => serializer.serialize_u16(*n),
            Scalar::U32(n) => serializer.serialize_u32(*n),
            Scalar::U64(n) => serializer.serialize_u64(*n),
            Scalar::F32(f) => serializer.serialize_f32(*f),
            Scalar::F64(f) => serializer.serialize_f64(*f),
            Scalar::Char(c) => serializer.serialize_char(*c),
            Scalar::Str(s) => serializer.serialize_str(s),
            Scalar::DateTime(dt) => serializer.serialize_str(&dt.to_rfc3339()),
        }
    }
}

/// A value shaped by a [`TypeDesc`].
#[derive(Debug, Clone, PartialEq)]
pub enum Typed {
    Null,
    /// `true`/`false` literals stay booleans whatever the hint.
    Bool(bool),
    Scalar(Scalar),
    /// Fixed-size array; its length is the number of parsed elements.
    Array(Box<[Typed]>),
    List(Vec<Typed>),
    Dictionary(IndexMap<String, Typed>),
    Record(Record),
    /// A subtree parsed without a hint ([`TypeDesc::Any`]).
    Untyped(Value),
}

impl Typed {
    /// The value a field holds before the parser assigns it: zero for
    /// numbers, `false` for booleans, `'\0'` for chars, `Null` otherwise.
    pub fn default_for(desc: &TypeDesc) -> Typed {
        let TypeDesc::Scalar { kind } = desc else {
            return Typed::Null;
        };
        match kind {
            ScalarKind::Bool => Typed::Bool(false),
            ScalarKind::Char => Typed::Scalar(Scalar::Char('\0')),
            ScalarKind::I8 => Typed::Scalar(Scalar::I8(0)),
            ScalarKind::I16 => Typed::Scalar(Scalar::I16(0)),
            ScalarKind::I32 => Typed::Scalar(Scalar::I32(0)),
            ScalarKind::I64 => Typed::Scalar(Scalar::I64(0)),
            ScalarKind::U8 => Typed::Scalar(Scalar::U8(0)),
            ScalarKind::U16 => Typed::Scalar(Scalar::U16(0)),
            ScalarKind::U32 => Typed::Scalar(Scalar::U32(0)),
            ScalarKind::U64 => Typed::Scalar(Scalar::U64(0)),
            ScalarKind::F32 => Typed::Scalar(Scalar::F32(0.0)),
            ScalarKind::F64 => Typed::Scalar(Scalar::F64(0.0)),
            ScalarKind::String | ScalarKind::DateTime => Typed::Null,
        }
    }

    /// Short description of the variant, used in mismatch errors.
    pub fn kind(&self) -> String {
        match self {
            Typed::Null => "null".to_string(),
            Typed::Bool(_) => "bool".to_string(),
            Typed::Scalar(s) => s.kind().to_string(),
            Typed::Array(_) => "fixed array".to_string(),
            Typed::List(_) => "list".to_string(),
            Typed::Dictionary(_) => "dictionary".to_string(),
            Typed::Record(r) => format!("record {}", r.name),
            Typed::Untyped(v) => format!("untyped {}", v.kind()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Typed::Null)
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Typed::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Typed::Scalar(Scalar::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Typed::Record(r) => Some(r),
            _ => None,
        }
    }
}

impl Serialize for Typed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Typed::Null => serializer.serialize_unit(),
            Typed::Bool(b) => serializer.serialize_bool(*b),
            Typed::Scalar(s) => s.serialize(serializer),
            Typed::Array(items) => items.serialize(serializer),
            Typed::List(items) => items.serialize(serializer),
            Typed::Dictionary(map) => map.serialize(serializer),
            Typed::Record(record) => record.serialize(serializer),
            Typed::Untyped(value) => value.serialize(serializer),
        }
    }
}

/// Compact JSON.
impl fmt::Display for Typed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// An instance of a [`StructDesc`]. Every declared field is present, in
/// declaration order, starting from [`Typed::default_for`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    fields: IndexMap<String, Typed>,
    /// Parallel to `fields`: set once the input supplied a value.
    assigned: Vec<bool>,
}

impl Record {
    pub fn new(desc: &StructDesc) -> Self {
        Self {
            name: desc.name.clone(),
            fields: desc
                .fields
                .iter()
                .map(|f| (f.name.clone(), Typed::default_for(&f.ty)))
                .collect(),
            assigned: vec![false; desc.fields.len()],
        }
    }

    /// Field by declared name (exact match).
    pub fn get(&self, field: &str) -> Option<&Typed> {
        self.fields.get(field)
    }

    /// Overwrite a declared field. Returns `false` for undeclared names.
    pub fn set(&mut self, field: &str, value: Typed) -> bool {
        match self.fields.get_full_mut(field) {
            Some((index, _, slot)) => {
                *slot = value;
                self.assigned[index] = true;
                true
            }
            None => false,
        }
    }

    /// Whether `field` was given a value, as opposed to holding its default.
    pub fn is_assigned(&self, field: &str) -> bool {
        self.fields
            .get_index_of(field)
            .is_some_and(|index| self.assigned[index])
    }

    /// Move a field out, leaving `Null` behind.
    pub fn take(&mut self, field: &str) -> Option<Typed> {
        self.fields
            .get_mut(field)
            .map(|slot| std::mem::replace(slot, Typed::Null))
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Typed)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

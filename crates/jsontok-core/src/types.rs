//! Type descriptions that steer typed parsing.
//!
//! A [`TypeDesc`] is an immutable tree supplied by the caller. It can be
//! built with the constructor helpers, deserialized from a JSON schema
//! document, or derived from a Rust type through [`crate::JsonBind`].
//!
//! Schema documents use an internally tagged form:
//!
//! ```json
//! {"type": "record", "name": "User", "fields": [
//!   {"name": "name", "type": {"type": "scalar", "kind": "string"}},
//!   {"name": "tags", "type": {"type": "list", "element": {"type": "scalar", "kind": "string"}}}
//! ]}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar coercion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    DateTime,
}

impl ScalarKind {
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Char => "char",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::String => "string",
            ScalarKind::DateTime => "date_time",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The target shape of a typed parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypeDesc {
    /// No hint: the subtree is parsed as an untyped [`crate::Value`].
    Any,
    Scalar { kind: ScalarKind },
    /// A fixed-size array sized by the number of parsed elements.
    FixedArray { element: Box<TypeDesc> },
    /// A growable list.
    List { element: Box<TypeDesc> },
    /// String keys mapping to values of one type.
    Dictionary { value: Box<TypeDesc> },
    /// A structured type with named fields.
    Record(StructDesc),
    /// Accepts `null` (and an empty bare token) in addition to `inner`.
    Optional { inner: Box<TypeDesc> },
}

impl TypeDesc {
    pub fn scalar(kind: ScalarKind) -> Self {
        TypeDesc::Scalar { kind }
    }

    pub fn fixed_array(element: TypeDesc) -> Self {
        TypeDesc::FixedArray {
            element: Box::new(element),
        }
    }

    pub fn list(element: TypeDesc) -> Self {
        TypeDesc::List {
            element: Box::new(element),
        }
    }

    pub fn dictionary(value: TypeDesc) -> Self {
        TypeDesc::Dictionary {
            value: Box::new(value),
        }
    }

    pub fn optional(inner: TypeDesc) -> Self {
        TypeDesc::Optional {
            inner: Box::new(inner),
        }
    }

    pub fn record(desc: StructDesc) -> Self {
        TypeDesc::Record(desc)
    }

    /// Read a schema document.
    pub fn from_schema(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Any => f.write_str("any"),
            TypeDesc::Scalar { kind } => write!(f, "{kind}"),
            TypeDesc::FixedArray { element } => write!(f, "[{element}]"),
            TypeDesc::List { element } => write!(f, "list<{element}>"),
            TypeDesc::Dictionary { value } => write!(f, "map<string, {value}>"),
            TypeDesc::Record(desc) => write!(f, "record {}", desc.name),
            TypeDesc::Optional { inner } => write!(f, "option<{inner}>"),
        }
    }
}

/// A named structured type and its fields in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDesc {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDesc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDesc {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDesc,
}

impl StructDesc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field declaration.
    pub fn field(mut self, name: impl Into<String>, ty: TypeDesc) -> Self {
        self.fields.push(FieldDesc {
            name: name.into(),
            ty,
        });
        self
    }

    /// Case-insensitive field lookup. The first declared match wins.
    pub fn find_field(&self, key: &str) -> Option<&FieldDesc> {
        self.fields.iter().find(|f| eq_ignore_case(&f.name, key))
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

//! # jsontok-core
//!
//! A lenient, recursive-descent JSON parser with two modes.
//!
//! - **Untyped**: text becomes a [`Value`] tree. Numbers that are pure digit
//!   runs become integers, every other number a float.
//! - **Typed**: a [`TypeDesc`] steers the parse. Scalars are converted to the
//!   requested width, object keys are matched to record fields
//!   case-insensitively, and unknown keys are parsed and discarded.
//!
//! The parser tolerates trailing commas, unquoted scalars, stray characters
//! between object members and trailing text after the first value.
//!
//! ## Quick start
//!
//! ```rust
//! use jsontok_core::{parse, parse_typed, ScalarKind, TypeDesc, Value};
//!
//! let v = parse(r#"{"name": "Alice", "scores": [95, 87, 92,]}"#).unwrap();
//! assert_eq!(v.get("name").and_then(Value::as_str), Some("Alice"));
//! assert_eq!(v.to_string(), r#"{"name":"Alice","scores":[95,87,92]}"#);
//!
//! let desc = TypeDesc::list(TypeDesc::scalar(ScalarKind::U8));
//! let bytes = parse_typed("[1, 2, 255]", &desc).unwrap();
//! assert_eq!(bytes.to_string(), "[1,2,255]");
//! assert!(parse_typed("[256]", &desc).is_err());
//! ```
//!
//! ## Modules
//!
//! - [`parser`]: entry points and the untyped/typed builders
//! - [`value`]: the untyped [`Value`] tree
//! - [`types`]: [`TypeDesc`] descriptions, also loadable from a JSON schema
//! - [`typed`]: [`Typed`] results of a typed parse
//! - [`bind`]: [`JsonBind`] and [`bind_record!`] for parsing straight into Rust types
//! - [`client`]: GET-and-parse HTTP client (feature `http`)
//! - [`error`]: structural and conversion errors

pub mod bind;
#[cfg(feature = "http")]
pub mod client;
mod coerce;
mod cursor;
pub mod error;
pub mod parser;
mod scan;
pub mod typed;
pub mod types;
pub mod value;

pub use bind::{from_str, JsonBind};
#[cfg(feature = "http")]
pub use client::{JsonClient, QueryParams};
pub use coerce::parse_date_time;
pub use error::{Found, JsonError, Result};
pub use parser::{parse, parse_typed, MAX_DEPTH};
pub use typed::{Record, Scalar, Typed};
pub use types::{FieldDesc, ScalarKind, StructDesc, TypeDesc};
pub use value::{Map, Value};

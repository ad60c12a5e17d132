//! Error types for parsing, coercion and binding.

use std::fmt;
use thiserror::Error;

/// The character found where a delimiter was required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Found {
    Char(char),
    /// The input ran out.
    Eof,
}

impl From<Option<char>> for Found {
    fn from(c: Option<char>) -> Self {
        c.map_or(Found::Eof, Found::Char)
    }
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Found::Char(c) => write!(f, "{c}"),
            Found::Eof => f.write_str("EOF"),
        }
    }
}

/// Errors that can occur while parsing or binding JSON text.
#[derive(Error, Debug)]
pub enum JsonError {
    /// A required delimiter (`"`, `}`, `]`) was missing.
    /// `position` is the 0-based character index where the parser stopped.
    #[error("Unexpected '{found}' at position {position}. Expected '{expected}'")]
    UnexpectedCharacter {
        expected: char,
        found: Found,
        position: usize,
    },

    /// Arrays and objects were nested past [`crate::parser::MAX_DEPTH`].
    /// `position` is the index of the delimiter that opened one level too many.
    #[error("Nesting deeper than {limit} levels at position {position}")]
    TooDeep { limit: usize, position: usize },

    /// A scalar or string could not be converted to the hinted target type.
    #[error("Cannot convert {text:?} to {target} at position {position}")]
    Coercion {
        text: String,
        target: String,
        position: usize,
    },

    /// A typed result did not fit the Rust type it was bound to.
    #[error("Type mismatch: expected {expected}, found {found}")]
    Mismatch { expected: String, found: String },

    /// A schema document could not be deserialized into a type description.
    #[error("Schema error: {0}")]
    Schema(#[from] serde_json::Error),

    /// The base or request URL was not usable.
    #[cfg(feature = "http")]
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The GET request failed or its body could not be read.
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(String),
}

impl JsonError {
    /// Build a structural error from the cursor state.
    pub(crate) fn unexpected(expected: char, found: Option<char>, position: usize) -> Self {
        JsonError::UnexpectedCharacter {
            expected,
            found: found.into(),
            position,
        }
    }

    pub(crate) fn too_deep(limit: usize, position: usize) -> Self {
        JsonError::TooDeep { limit, position }
    }

    pub(crate) fn coercion(text: &str, target: impl fmt::Display, position: usize) -> Self {
        JsonError::Coercion {
            text: text.to_string(),
            target: target.to_string(),
            position,
        }
    }

    pub(crate) fn mismatch(expected: impl fmt::Display, found: impl fmt::Display) -> Self {
        JsonError::Mismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// True for missing-delimiter and nesting-limit errors.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            JsonError::UnexpectedCharacter { .. } | JsonError::TooDeep { .. }
        )
    }

    /// True for scalar, date/time and binding conversion failures.
    pub fn is_coercion(&self) -> bool {
        matches!(self, JsonError::Coercion { .. } | JsonError::Mismatch { .. })
    }
}

/// Convenience alias used throughout jsontok-core.
pub type Result<T> = std::result::Result<T, JsonError>;

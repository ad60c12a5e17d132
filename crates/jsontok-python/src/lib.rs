//! # jsontok-python
//!
//! Python bindings for jsontok-core, built with PyO3.
//!
//! Exposes the following functions to Python as the `jsontok` module:
//!
//! - `parse(text)`: lenient JSON text -> compact standard JSON
//! - `parse_typed(text, schema)`: typed parse against a schema document -> compact JSON

use jsontok_core::TypeDesc;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Parse lenient JSON text and return it as compact, standard JSON.
///
/// Args:
///     text: JSON text; trailing commas and unquoted scalars are accepted.
///
/// Returns:
///     The normalized JSON string.
///
/// Raises:
///     ValueError: On a missing delimiter or an unconvertible scalar.
#[pyfunction]
fn parse(text: &str) -> PyResult<String> {
    jsontok_core::parse(text)
        .map(|value| value.to_string())
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Parse JSON text against a schema document.
///
/// Record fields are matched case-insensitively and unknown keys are dropped.
///
/// Args:
///     text: JSON text.
///     schema: A schema document, e.g.
///         `{"type": "list", "element": {"type": "scalar", "kind": "u8"}}`.
///
/// Returns:
///     The typed result rendered as compact JSON.
///
/// Raises:
///     ValueError: If the schema is invalid or the text does not fit it.
#[pyfunction]
fn parse_typed(text: &str, schema: &str) -> PyResult<String> {
    let desc = TypeDesc::from_schema(schema).map_err(|e| PyValueError::new_err(e.to_string()))?;
    jsontok_core::parse_typed(text, &desc)
        .map(|typed| typed.to_string())
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// The `jsontok` Python module, implemented in Rust via PyO3.
#[pymodule]
fn jsontok(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(parse, m)?)?;
    m.add_function(wrap_pyfunction!(parse_typed, m)?)?;
    Ok(())
}

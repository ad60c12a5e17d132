//! WASM bindings for jsontok-core.
//!
//! Exposes `parse` and `parseTyped` as `#[wasm_bindgen]` functions callable
//! from JavaScript/TypeScript. Both return compact JSON text; the HTTP client
//! is not compiled in (use `fetch` on the JS side and pass the body here).
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p jsontok-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/jsontok_wasm.wasm
//! ```

use jsontok_core::TypeDesc;
use wasm_bindgen::prelude::*;

/// Parse lenient JSON text and return it as compact, standard JSON.
///
/// Throws a JS error on structural or conversion failures.
#[wasm_bindgen]
pub fn parse(text: &str) -> std::result::Result<String, JsValue> {
    jsontok_core::parse(text)
        .map(|value| value.to_string())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse JSON text against a schema document and return the typed result
/// as compact JSON.
#[wasm_bindgen(js_name = parseTyped)]
pub fn parse_typed(text: &str, schema: &str) -> std::result::Result<String, JsValue> {
    let desc = TypeDesc::from_schema(schema).map_err(|e| JsValue::from_str(&e.to_string()))?;
    jsontok_core::parse_typed(text, &desc)
        .map(|typed| typed.to_string())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

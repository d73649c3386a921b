// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
//
// SPDX-License-Identifier: MIT
#![warn(clippy::redundant_clone)]
#![warn(missing_docs)]

//! # Micheline type tools
//!
//! Decoding of Micheline JSON, rendering of Michelson types into normalized
//! descriptors, and structural checks of values against types.
//!
//! # Usage
//!
//! Everything starts from [ast::Micheline], obtained with
//! [ast::Micheline::from_json] or [ast::Micheline::from_json_str]. A
//! Micheline tree can represent both a type and a value, so:
//!
//! - [typedef::render] turns a type into a [typedef::TypeDef], flattening
//!   `pair` into `struct` and `or` into `union`;
//! - [implements::implements] tells whether a value has the shape of a type,
//!   regardless of nested or comb encodings and of annotations;
//! - [entrypoints::entrypoints] lists the entrypoints of a parameter type.
//!
//! Each of these has a `_with` form taking a [context::Ctx], which bounds the
//! nesting depth of the trees walked. [`context::Ctx::default()`] is a
//! reasonable start.
//!
//! [render_json] and [implements_json] combine decoding with the above for
//! callers that only deal in JSON text.

pub mod ast;
pub mod context;
pub mod depth;
pub mod entrypoints;
pub mod flatten;
pub mod implements;
pub mod json;
pub mod prim;
pub mod typedef;

use serde_json::Value;

use ast::Micheline;
use json::DecodeError;
use typedef::RenderError;

/// Errors of the text-level helpers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Input is not valid Micheline JSON.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// Input decoded, but is not a valid type.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Render a type given as Micheline JSON text into its descriptor JSON.
pub fn render_json(ty: &str) -> Result<Value, Error> {
    let ty = Micheline::from_json_str(ty)?;
    Ok(typedef::render(&ty)?.to_json())
}

/// Check a value against a type, both given as Micheline JSON text. Only
/// decoding can fail; a mismatch is `Ok(false)`.
pub fn implements_json(value: &str, ty: &str) -> Result<bool, Error> {
    let value = Micheline::from_json_str(value)?;
    let ty = Micheline::from_json_str(ty)?;
    Ok(implements::implements(&value, &ty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn render_text() {
        assert_eq!(
            render_json(r#"{"prim":"set","args":[{"prim":"key_hash"}],"annots":["%admins"]}"#),
            Ok(json!({"name": "admins", "type": "set", "args": [{"name": "@item", "type": "key_hash"}]}))
        );
    }

    #[test]
    fn render_text_errors() {
        assert!(matches!(
            render_json(r#"{"prim":"pair","args":[{"prim":"nat"}]}"#),
            Err(Error::Render(RenderError::InvalidTypeShape(_)))
        ));
        assert!(matches!(
            render_json(r#"{"prom":"nat"}"#),
            Err(Error::Decode(DecodeError::NotANode(_)))
        ));
        assert!(matches!(
            render_json("{"),
            Err(Error::Decode(DecodeError::Syntax(_)))
        ));
    }

    #[test]
    fn implements_text() {
        let ty = r#"{"prim":"pair","args":[{"prim":"address"},{"prim":"pair","args":[{"prim":"address"},{"prim":"nat"}]}]}"#;
        let value = r#"{"prim":"Pair","args":[{"string":"tz1a"},{"string":"tz1b"},{"int":"7"}]}"#;
        assert_eq!(implements_json(value, ty), Ok(true));
        assert_eq!(implements_json(r#"{"int":"7"}"#, ty), Ok(false));
        assert!(implements_json(r#"{"int":"07"}"#, ty).is_err());
    }
}

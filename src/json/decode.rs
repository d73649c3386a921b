// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
//
// SPDX-License-Identifier: MIT

//! Micheline deserialization from JSON.

use num_bigint::BigInt;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    ast::{annotations::AnnotationError, Annotation, Annotations, Micheline},
    context::Ctx,
    depth::{DepthLimit, TooDeep},
    prim::{Prim, PrimError},
};

/// Errors possible while decoding Micheline JSON.
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum DecodeError {
    /// The JSON value is neither an application, a literal nor a sequence.
    #[error("not a Micheline node: {0}")]
    NotANode(Value),
    /// Unknown primitive name.
    #[error(transparent)]
    UnknownPrim(#[from] PrimError),
    /// Integer literal is not a canonical decimal string.
    #[error("invalid integer literal: {0:?}")]
    InvalidInt(String),
    /// Bytes literal is not an even-length lowercase hex string.
    #[error("invalid hex sequence: {0:?}")]
    InvalidHex(String),
    /// Malformed annotation.
    #[error(transparent)]
    BadAnnotation(#[from] AnnotationError),
    /// Two annotations of the same kind on one node.
    #[error("duplicate annotation: {0}")]
    DuplicateAnnotation(String),
    /// The input text is not JSON.
    #[error("malformed JSON: {0}")]
    Syntax(String),
    /// The document is nested deeper than allowed.
    #[error(transparent)]
    TooDeep(#[from] TooDeep),
}

impl Micheline {
    /// Decode a JSON value with the default [Ctx].
    pub fn from_json(value: &Value) -> Result<Micheline, DecodeError> {
        Micheline::from_json_with(&Ctx::default(), value)
    }

    /// Decode a JSON value.
    pub fn from_json_with(ctx: &Ctx, value: &Value) -> Result<Micheline, DecodeError> {
        decode_node(value, ctx.depth_limit()).inspect_err(|err| debug!(%err, "decoding failed"))
    }

    /// Parse and decode JSON text with the default [Ctx].
    pub fn from_json_str(text: &str) -> Result<Micheline, DecodeError> {
        Micheline::from_json_str_with(&Ctx::default(), text)
    }

    /// Parse and decode JSON text.
    ///
    /// The nesting of the text is checked before it is parsed, so
    /// pathological inputs are rejected without deep recursion.
    pub fn from_json_str_with(ctx: &Ctx, text: &str) -> Result<Micheline, DecodeError> {
        // An application node nests two JSON levels per Micheline level
        // (object, then `args` array), plus one for a trailing `annots`.
        check_nesting(text, ctx.max_depth.saturating_mul(2).saturating_add(1))?;
        let mut de = serde_json::Deserializer::from_str(text);
        de.disable_recursion_limit();
        let value =
            Value::deserialize(&mut de).map_err(|err| DecodeError::Syntax(err.to_string()))?;
        de.end()
            .map_err(|err| DecodeError::Syntax(err.to_string()))?;
        Micheline::from_json_with(ctx, &value)
    }
}

/// Reject text whose bracket nesting exceeds `limit`, ignoring brackets
/// inside string literals.
fn check_nesting(text: &str, limit: usize) -> Result<(), TooDeep> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for b in text.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                if depth > limit {
                    return Err(TooDeep { limit });
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

fn decode_node(value: &Value, depth: DepthLimit) -> Result<Micheline, DecodeError> {
    let depth = depth.descend()?;
    match value {
        Value::Array(items) => Ok(Micheline::Seq(decode_seq(items, depth)?)),
        Value::Object(obj) => decode_object(value, obj, depth),
        _ => Err(DecodeError::NotANode(value.clone())),
    }
}

fn decode_seq(items: &[Value], depth: DepthLimit) -> Result<Vec<Micheline>, DecodeError> {
    items.iter().map(|item| decode_node(item, depth)).collect()
}

fn decode_object(
    value: &Value,
    obj: &Map<String, Value>,
    depth: DepthLimit,
) -> Result<Micheline, DecodeError> {
    let not_a_node = || DecodeError::NotANode(value.clone());
    if let Some(prim) = obj.get("prim") {
        if obj
            .keys()
            .any(|k| !matches!(k.as_str(), "prim" | "args" | "annots"))
        {
            return Err(not_a_node());
        }
        let prim = Prim::from_name(prim.as_str().ok_or_else(not_a_node)?)?;
        let args = match obj.get("args") {
            None => Vec::new(),
            // empty arrays are not canonical, the encoder omits them
            Some(Value::Array(args)) if !args.is_empty() => decode_seq(args, depth)?,
            Some(_) => return Err(not_a_node()),
        };
        let anns = match obj.get("annots") {
            None => Annotations::new(),
            Some(Value::Array(anns)) if !anns.is_empty() => {
                decode_annots(anns).ok_or_else(not_a_node)??
            }
            Some(_) => return Err(not_a_node()),
        };
        return Ok(Micheline::App(prim, args, anns));
    }
    let mut fields = obj.iter();
    match (fields.next(), fields.next()) {
        (Some((key, Value::String(s))), None) => match key.as_str() {
            "int" => decode_int(s),
            "string" => Ok(Micheline::String(s.clone())),
            "bytes" => decode_bytes(s),
            _ => Err(not_a_node()),
        },
        _ => Err(not_a_node()),
    }
}

/// `None` when some element is not a JSON string.
fn decode_annots(anns: &[Value]) -> Option<Result<Annotations, DecodeError>> {
    let mut out: Vec<Annotation> = Vec::with_capacity(anns.len());
    for ann in anns {
        let ann = match Annotation::parse(ann.as_str()?) {
            Ok(ann) => ann,
            Err(err) => return Some(Err(err.into())),
        };
        if out.iter().any(|seen| seen.same_kind(&ann)) {
            return Some(Err(DecodeError::DuplicateAnnotation(ann.to_string())));
        }
        out.push(ann);
    }
    Some(Ok(out.into_iter().collect()))
}

fn decode_int(s: &str) -> Result<Micheline, DecodeError> {
    let invalid = || DecodeError::InvalidInt(s.to_owned());
    let digits = s.strip_prefix('-').unwrap_or(s);
    // only the canonical form is accepted, so that encoding gives back the
    // same text
    let canonical = match digits.as_bytes() {
        [] => false,
        [b'0'] => digits.len() == s.len(),
        [b'0', ..] => false,
        ds => ds.iter().all(u8::is_ascii_digit),
    };
    if !canonical {
        return Err(invalid());
    }
    s.parse::<BigInt>()
        .map(Micheline::Int)
        .map_err(|_| invalid())
}

fn decode_bytes(s: &str) -> Result<Micheline, DecodeError> {
    if s.bytes().any(|b| b.is_ascii_uppercase()) {
        return Err(DecodeError::InvalidHex(s.to_owned()));
    }
    hex::decode(s)
        .map(Micheline::Bytes)
        .map_err(|_| DecodeError::InvalidHex(s.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::micheline::test_helpers::*;
    use serde_json::json;

    #[track_caller]
    fn check(json: Value, expected: Micheline) {
        assert_eq!(Micheline::from_json(&json), Ok(expected));
    }

    #[test]
    fn literals() {
        check(json!({"int": "42"}), Micheline::from(42));
        check(json!({"int": "-7"}), Micheline::from(-7));
        check(json!({"int": "0"}), Micheline::from(0));
        check(json!({"string": "tz1abc"}), Micheline::from("tz1abc"));
        check(json!({"bytes": "00ff"}), Micheline::Bytes(vec![0x00, 0xff]));
        check(json!({"bytes": ""}), Micheline::Bytes(vec![]));
    }

    #[test]
    fn big_int_keeps_precision() {
        let text = "123456789012345678901234567890123456789012345678901234567890";
        let m = Micheline::from_json(&json!({ "int": text })).unwrap();
        assert_eq!(m, Micheline::Int(text.parse().unwrap()));
    }

    #[test]
    fn applications_and_sequences() {
        check(json!({"prim": "Unit"}), app!(Unit));
        check(
            json!({"prim": "Pair", "args": [{"int": "1"}, {"string": "a"}]}),
            app!(Pair[1, "a"]),
        );
        check(json!([]), seq! {});
        check(
            json!([{"prim": "True"}, [{"int": "3"}]]),
            seq! { app!(True); seq!{ 3 } },
        );
        check(json!({"prim": "Elt"}), app!(Elt));
    }

    #[test]
    fn annotations() {
        let m = Micheline::from_json(&json!({
            "prim": "address",
            "annots": ["%from_", ":owner"]
        }))
        .unwrap();
        assert_eq!(
            m,
            Micheline::App(
                Prim::address,
                vec![],
                [
                    Annotation::Field("from_".into()),
                    Annotation::Type("owner".into())
                ]
                .into()
            )
        );
    }

    #[test]
    fn not_a_node() {
        for bad in [
            json!(1),
            json!("int"),
            json!(null),
            json!({}),
            json!({"int": 5}),
            json!({"int": "5", "string": "x"}),
            json!({"float": "1.5"}),
            json!({"prim": 5}),
            json!({"prim": "pair", "args": {}}),
            json!({"prim": "pair", "annots": "%x"}),
            json!({"prim": "pair", "annots": [5]}),
            json!({"prim": "pair", "extra": true}),
            json!({"prim": "Elt", "args": []}),
            json!({"prim": "nat", "annots": []}),
        ] {
            assert_eq!(
                Micheline::from_json(&bad),
                Err(DecodeError::NotANode(bad.clone())),
                "{bad}"
            );
        }
    }

    #[test]
    fn nested_error_cites_inner_value() {
        let inner = json!({"nat": "1"});
        assert_eq!(
            Micheline::from_json(&json!({"prim": "Some", "args": [inner.clone()]})),
            Err(DecodeError::NotANode(inner))
        );
    }

    #[test]
    fn bad_literals() {
        for bad in ["", "-", "+1", "01", "-0", "1.0", "1e3", " 1"] {
            assert_eq!(
                Micheline::from_json(&json!({ "int": bad })),
                Err(DecodeError::InvalidInt(bad.into())),
                "{bad}"
            );
        }
        for bad in ["0", "zz", "00FF"] {
            assert_eq!(
                Micheline::from_json(&json!({ "bytes": bad })),
                Err(DecodeError::InvalidHex(bad.into())),
                "{bad}"
            );
        }
    }

    #[test]
    fn bad_prims_and_annotations() {
        assert_eq!(
            Micheline::from_json(&json!({"prim": "pear"})),
            Err(DecodeError::UnknownPrim(PrimError("pear".into())))
        );
        assert_eq!(
            Micheline::from_json(&json!({"prim": "nat", "annots": ["amount"]})),
            Err(DecodeError::BadAnnotation(AnnotationError("amount".into())))
        );
        assert_eq!(
            Micheline::from_json(&json!({"prim": "nat", "annots": ["%a", "%b"]})),
            Err(DecodeError::DuplicateAnnotation("%b".into()))
        );
        assert_eq!(
            Micheline::from_json(&json!({"prim": "nat", "annots": ["%@", "%f"]})),
            Err(DecodeError::DuplicateAnnotation("%f".into()))
        );
        assert_eq!(
            Micheline::from_json(&json!({"prim": "nat", "annots": ["@v", "@%%"]})),
            Err(DecodeError::DuplicateAnnotation("@%%".into()))
        );
        assert!(Micheline::from_json(&json!({"prim": "nat", "annots": ["%@", "@%", ":t"]})).is_ok());
    }

    #[test]
    fn text_input() {
        assert_eq!(
            Micheline::from_json_str(r#"{"prim":"Some","args":[{"int":"1"}]}"#),
            Ok(app!(Some[1]))
        );
        assert!(matches!(
            Micheline::from_json_str(r#"{"prim":"#),
            Err(DecodeError::Syntax(_))
        ));
        assert!(matches!(
            Micheline::from_json_str(r#"{"int":"1"} x"#),
            Err(DecodeError::Syntax(_))
        ));
    }

    #[test]
    fn depth_limit() {
        let ctx = Ctx { max_depth: 3 };
        let ok = json!({"prim": "Some", "args": [{"prim": "Some", "args": [{"int": "1"}]}]});
        assert!(Micheline::from_json_with(&ctx, &ok).is_ok());
        let deep = json!({"prim": "Some", "args": [ok]});
        assert_eq!(
            Micheline::from_json_with(&ctx, &deep),
            Err(DecodeError::TooDeep(TooDeep { limit: 3 }))
        );
        assert!(Micheline::from_json_str_with(&ctx, &deep.to_string()).is_err());
    }

    #[test]
    fn nesting_scan_ignores_strings() {
        assert!(check_nesting(r#"{"string": "[[[[[[[[\"{{{{"}"#, 2).is_ok());
        assert!(check_nesting("[[[]]]", 2).is_err());
        assert!(check_nesting("[[]][[]]", 2).is_ok());
    }

    #[test]
    fn deep_text_beyond_serde_default_limit() {
        let depth = 300;
        let text = format!(
            "{}{{\"int\":\"1\"}}{}",
            r#"{"prim":"Some","args":["#.repeat(depth),
            "]}".repeat(depth)
        );
        let mut m = Micheline::from_json_str(&text).unwrap();
        for _ in 0..depth {
            m = match m {
                Micheline::App(Prim::Some, mut args, _) => args.pop().unwrap(),
                other => panic!("unexpected {other:?}"),
            };
        }
        assert_eq!(m, Micheline::from(1));
    }
}

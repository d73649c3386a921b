// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
//
// SPDX-License-Identifier: MIT

//! Micheline serialization to JSON.

use serde_json::{Map, Value};

use crate::ast::Micheline;

impl Micheline {
    /// Encode as a JSON value. `args` and `annots` are omitted when empty,
    /// integers are decimal strings and bytes are lowercase hex.
    pub fn to_json(&self) -> Value {
        encode_micheline(self)
    }

    /// Encode as compact JSON text.
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }
}

fn literal(key: &str, text: String) -> Value {
    let mut obj = Map::with_capacity(1);
    obj.insert(key.to_owned(), Value::String(text));
    Value::Object(obj)
}

fn encode_micheline(m: &Micheline) -> Value {
    match m {
        Micheline::Int(i) => literal("int", i.to_string()),
        Micheline::String(s) => literal("string", s.clone()),
        Micheline::Bytes(b) => literal("bytes", hex::encode(b)),
        Micheline::Seq(items) => Value::Array(items.iter().map(encode_micheline).collect()),
        Micheline::App(prim, args, anns) => {
            let mut obj = Map::with_capacity(3);
            obj.insert("prim".to_owned(), Value::String(prim.to_string()));
            if !args.is_empty() {
                obj.insert(
                    "args".to_owned(),
                    Value::Array(args.iter().map(encode_micheline).collect()),
                );
            }
            if !anns.is_empty() {
                obj.insert(
                    "annots".to_owned(),
                    Value::Array(anns.iter().map(|ann| Value::String(ann.to_string())).collect()),
                );
            }
            Value::Object(obj)
        }
    }
}

// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
//
// SPDX-License-Identifier: MIT

//! Conversion between [Micheline] and its canonical JSON form.
//!
//! - application: `{"prim": .., "args": [..], "annots": [..]}`, with `args`
//!   and `annots` omitted when empty;
//! - literals: `{"int": "<decimal>"}`, `{"string": ..}`, `{"bytes": "<hex>"}`;
//! - sequence: a bare JSON array.
//!
//! Functions are defined as associated functions on [Micheline]. The serde
//! impls below go through the same codec, so [Micheline] can be embedded in
//! any serde-derived envelope.

mod decode;
mod encode;

pub use decode::*;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::ast::Micheline;

impl Serialize for Micheline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Micheline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Micheline::from_json(&value).map_err(de::Error::custom)
    }
}

// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
//
// SPDX-License-Identifier: MIT

//! Rendering of Michelson types into normalized type descriptors.
//!
//! Binary `pair` and `or` trees are flattened into `struct` and `union`
//! descriptors whose fields are named after their `%` annotations, or
//! positionally when there is none. Containers name their children after
//! their role (`@item`, `@key`, `@value`, ...). `option` has no descriptor of
//! its own and instead marks its child as optional.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::ast::micheline::{micheline_literals, micheline_scalar_types};
use crate::ast::Micheline;
use crate::context::Ctx;
use crate::depth::{DepthLimit, TooDeep};
use crate::flatten::flatten_comb;
use crate::prim::Prim;

/// Type rendering error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// A type constructor with the wrong arity, or a node that is not a type.
    #[error("invalid type shape: {0}")]
    InvalidTypeShape(String),
    /// Two entrypoints of a parameter type share a name.
    #[error("duplicate entrypoint: {0}")]
    DuplicateEntrypoint(String),
    /// The type is nested deeper than allowed.
    #[error(transparent)]
    TooDeep(#[from] TooDeep),
}

/// A rendered type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeDef {
    /// Field name, empty when neither an annotation nor a positional
    /// convention applies.
    pub name: String,
    /// Type name: a primitive name, `struct`, `union`, or
    /// `sapling_state(N)`-style names with the memo size folded in.
    #[serde(rename = "type")]
    pub ty: String,
    /// Child descriptors; empty for scalars.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeDef>,
    /// Set when the type was wrapped in `option`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl TypeDef {
    fn new(name: impl Into<String>, ty: impl Into<String>, args: Vec<TypeDef>) -> Self {
        TypeDef {
            name: name.into(),
            ty: ty.into(),
            args,
            optional: false,
        }
    }

    fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// JSON form of the descriptor, `{"name", "type", "args"?, "optional"?}`,
    /// as produced by its `Serialize` impl.
    pub fn to_json(&self) -> Value {
        json!(self)
    }
}

/// Render a type with the default [Ctx].
pub fn render(ty: &Micheline) -> Result<TypeDef, RenderError> {
    render_with(&Ctx::default(), ty)
}

/// Render a type.
pub fn render_with(ctx: &Ctx, ty: &Micheline) -> Result<TypeDef, RenderError> {
    let res = render_node(ty, ctx.depth_limit());
    if let Err(err) = &res {
        debug!(%err, "type rendering failed");
    }
    res
}

pub(crate) fn render_node(ty: &Micheline, depth: DepthLimit) -> Result<TypeDef, RenderError> {
    let depth = depth.descend()?;
    let unexpected = || Err(RenderError::InvalidTypeShape(format!("{ty:?}")));
    let (prim, args) = match ty {
        Micheline::App(prim, args, _) => (*prim, args.as_slice()),
        Micheline::Seq(..) | micheline_literals!() => return unexpected(),
    };
    let name = ty.field_annotation().unwrap_or_default();
    let child = |arg: &Micheline, role: &str| render_node(arg, depth).map(|td| td.named(role));
    Ok(match (prim, args) {
        (micheline_scalar_types!(), []) => TypeDef::new(name, prim.as_str(), vec![]),

        (
            Prim::sapling_state | Prim::sapling_transaction | Prim::sapling_transaction_deprecated,
            [Micheline::Int(memo_size)],
        ) => TypeDef::new(name, format!("{prim}({memo_size})"), vec![]),

        (Prim::set | Prim::list, [item]) => {
            TypeDef::new(name, prim.as_str(), vec![child(item, "@item")?])
        }

        (Prim::map | Prim::big_map, [key, value]) => TypeDef::new(
            name,
            prim.as_str(),
            vec![child(key, "@key")?, child(value, "@value")?],
        ),

        (Prim::lambda, [param, ret]) => TypeDef::new(
            name,
            prim.as_str(),
            vec![child(param, "@param")?, child(ret, "@return")?],
        ),

        (Prim::ticket, [value]) => TypeDef::new(name, prim.as_str(), vec![child(value, "@value")?]),

        (Prim::contract, [param]) => TypeDef::new(name, prim.as_str(), vec![child(param, "0")?]),

        (Prim::option, [inner]) => TypeDef {
            optional: true,
            ..render_node(inner, depth)?.named(name)
        },

        (Prim::pair, [_, _, ..]) => TypeDef::new(
            name,
            "struct",
            render_fields(args, Prim::pair, depth, |i| i.to_string())?,
        ),

        (Prim::or, [_, _]) => TypeDef::new(
            name,
            "union",
            render_fields(args, Prim::or, depth, |i| format!("@or_{i}"))?,
        ),

        _ => return unexpected(),
    })
}

/// Render the flattened fields of a `pair` or `or`. Each field is named by
/// its own `%` annotation, or else by `positional` applied to its index among
/// all fields at this level.
fn render_fields(
    args: &[Micheline],
    kind: Prim,
    depth: DepthLimit,
    positional: impl Fn(usize) -> String,
) -> Result<Vec<TypeDef>, RenderError> {
    flatten_comb(args, kind)
        .into_iter()
        .enumerate()
        .map(|(i, field)| {
            let name = match field.field_annotation() {
                Some(ann) => ann.to_owned(),
                None => positional(i),
            };
            Ok(render_node(field, depth)?.named(name))
        })
        .collect()
}

impl Micheline {
    /// Render this node as a type, see [render].
    pub fn render_type(&self) -> Result<TypeDef, RenderError> {
        render(self)
    }
}

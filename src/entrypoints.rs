// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
//
// SPDX-License-Identifier: MIT

//! Entrypoints of a contract parameter type.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::Micheline;
use crate::context::Ctx;
use crate::depth::DepthLimit;
use crate::prim::Prim;
use crate::typedef::{render_node, RenderError, TypeDef};

/// Name of the entrypoint that accepts the whole parameter.
pub const DEFAULT_ENTRYPOINT: &str = "default";

/// A single entrypoint of a parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrypoint {
    /// Entrypoint name, from the `%` annotation of its node or positional.
    pub name: String,
    /// Path from the root of the `or` tree, one `L` or `R` per level.
    pub branch: String,
    /// Rendered type of the entrypoint argument, named after the entrypoint.
    pub typedef: TypeDef,
}

/// Enumerate the entrypoints of `param` with the default [Ctx].
pub fn entrypoints(param: &Micheline) -> Result<Vec<Entrypoint>, RenderError> {
    entrypoints_with(&Ctx::default(), param)
}

/// Enumerate the entrypoints of `param`, in left-to-right pre-order of its
/// `or` tree, followed by [DEFAULT_ENTRYPOINT] when no entrypoint carries
/// that name.
pub fn entrypoints_with(ctx: &Ctx, param: &Micheline) -> Result<Vec<Entrypoint>, RenderError> {
    let mut collector = Collector {
        seen: HashSet::new(),
        out: Vec::new(),
    };
    let depth = ctx.depth_limit();
    collector.walk(param, String::new(), true, depth)?;
    if !collector.seen.contains(DEFAULT_ENTRYPOINT) {
        collector.push(DEFAULT_ENTRYPOINT.to_owned(), String::new(), param, depth)?;
    }
    debug!(count = collector.out.len(), "collected entrypoints");
    Ok(collector.out)
}

struct Collector {
    seen: HashSet<String>,
    out: Vec<Entrypoint>,
}

impl Collector {
    fn walk(
        &mut self,
        node: &Micheline,
        branch: String,
        is_root: bool,
        depth: DepthLimit,
    ) -> Result<(), RenderError> {
        let inner = depth.descend()?;
        let children = match node {
            Micheline::App(Prim::or, args, _) => match args.as_slice() {
                [l, r] => Some((l, r)),
                _ => None,
            },
            _ => None,
        };
        match node.field_annotation() {
            Some(name) => self.push(name.to_owned(), branch.clone(), node, depth)?,
            None if children.is_none() && !is_root => {
                let name = format!("@entrypoint_{}", self.out.len());
                self.push(name, branch.clone(), node, depth)?
            }
            None => {}
        }
        if let Some((l, r)) = children {
            self.walk(l, format!("{branch}L"), false, inner)?;
            self.walk(r, format!("{branch}R"), false, inner)?;
        }
        Ok(())
    }

    fn push(
        &mut self,
        name: String,
        branch: String,
        node: &Micheline,
        depth: DepthLimit,
    ) -> Result<(), RenderError> {
        if !self.seen.insert(name.clone()) {
            return Err(RenderError::DuplicateEntrypoint(name));
        }
        let typedef = TypeDef {
            name: name.clone(),
            ..render_node(node, depth)?
        };
        self.out.push(Entrypoint {
            name,
            branch,
            typedef,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::micheline::test_helpers::*;
    use crate::depth::TooDeep;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ty(value: serde_json::Value) -> Micheline {
        Micheline::from_json(&value).unwrap()
    }

    fn summary(eps: &[Entrypoint]) -> Vec<(&str, &str, &str)> {
        eps.iter()
            .map(|ep| (ep.name.as_str(), ep.branch.as_str(), ep.typedef.ty.as_str()))
            .collect()
    }

    #[test]
    fn named_leaves() {
        let param = ty(json!({"prim": "or", "args": [
            {"prim": "or", "args": [
                {"prim": "pair", "annots": ["%transfer"], "args": [
                    {"prim": "address", "annots": [":from"]},
                    {"prim": "pair", "args": [{"prim": "address"}, {"prim": "nat"}]}
                ]},
                {"prim": "pair", "annots": ["%approve"], "args": [{"prim": "address"}, {"prim": "nat"}]}
            ]},
            {"prim": "nat", "annots": ["%burn"]}
        ]}));
        let eps = entrypoints(&param).unwrap();
        assert_eq!(
            summary(&eps),
            vec![
                ("transfer", "LL", "struct"),
                ("approve", "LR", "struct"),
                ("burn", "R", "nat"),
                ("default", "", "union"),
            ]
        );
        assert_eq!(eps[0].typedef.name, "transfer");
        assert_eq!(eps[0].typedef.args.len(), 3);
        assert_eq!(eps[3].typedef.args.len(), 3);
    }

    #[test]
    fn explicit_default_is_not_duplicated() {
        let param = ty(json!({"prim": "or", "args": [
            {"prim": "unit", "annots": ["%default"]},
            {"prim": "nat", "annots": ["%other"]}
        ]}));
        assert_eq!(
            summary(&entrypoints(&param).unwrap()),
            vec![("default", "L", "unit"), ("other", "R", "nat")]
        );
    }

    #[test]
    fn annotated_inner_or_and_anonymous_leaves() {
        let param = ty(json!({"prim": "or", "args": [
            {"prim": "or", "annots": ["%admin"], "args": [
                {"prim": "address", "annots": ["%set_admin"]},
                {"prim": "bool"}
            ]},
            {"prim": "or", "args": [{"prim": "nat"}, {"prim": "unit", "annots": ["%ping"]}]}
        ]}));
        assert_eq!(
            summary(&entrypoints(&param).unwrap()),
            vec![
                ("admin", "L", "union"),
                ("set_admin", "LL", "address"),
                ("@entrypoint_2", "LR", "bool"),
                ("@entrypoint_3", "RL", "nat"),
                ("ping", "RR", "unit"),
                ("default", "", "union"),
            ]
        );
    }

    #[test]
    fn annotated_root() {
        let param = ty(json!({"prim": "nat", "annots": ["%main"]}));
        let eps = entrypoints(&param).unwrap();
        assert_eq!(summary(&eps), vec![("main", "", "nat"), ("default", "", "nat")]);
        assert_eq!(eps[1].typedef.name, "default");
    }

    #[test]
    fn plain_parameter_is_only_default() {
        let eps = entrypoints(&app!(list[app!(nat)])).unwrap();
        assert_eq!(summary(&eps), vec![("default", "", "list")]);
        assert_eq!(
            serde_json::to_value(&eps[0]).unwrap(),
            json!({"name": "default", "branch": "", "typedef": {
                "name": "default", "type": "list", "args": [{"name": "@item", "type": "nat"}]
            }})
        );
    }

    #[test]
    fn duplicate_names() {
        let param = ty(json!({"prim": "or", "args": [
            {"prim": "unit", "annots": ["%go"]},
            {"prim": "nat", "annots": ["%go"]}
        ]}));
        assert_eq!(
            entrypoints(&param),
            Err(RenderError::DuplicateEntrypoint("go".into()))
        );
    }

    #[test]
    fn invalid_leaf() {
        let param = app!(or[app!(nat), app!(pair[app!(nat)])]);
        assert!(matches!(
            entrypoints(&param),
            Err(RenderError::InvalidTypeShape(_))
        ));
    }

    #[test]
    fn deep_parameter() {
        let mut param = app!(unit);
        for _ in 0..20 {
            param = Micheline::prim2(Prim::or, app!(nat), param);
        }
        assert_eq!(
            entrypoints_with(&Ctx { max_depth: 8 }, &param),
            Err(RenderError::TooDeep(TooDeep { limit: 8 }))
        );
        assert_eq!(entrypoints(&param).unwrap().len(), 22);
    }
}

// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
//
// SPDX-License-Identifier: MIT

//! Flattening of binary `pair`/`or` trees into flat field lists.
//!
//! `pair a (pair b c)` and the comb `pair a b c` flatten to the same list
//! `[a, b, c]`, which is what makes rendering insensitive to the encoding.
//! A nested node carrying a `%` annotation is a named field of its own and is
//! not spliced.

use crate::ast::Micheline;
use crate::prim::Prim;

/// Whether an application of `kind` with `arity` arguments is well-formed
/// enough to be spliced. Malformed nodes are left in place as single entries.
fn spliceable(kind: Prim, arity: usize) -> bool {
    match kind {
        Prim::or => arity == 2,
        _ => arity >= 2,
    }
}

/// Flatten the arguments `args` of a `kind` application, splicing nested
/// unannotated `kind` applications in place, left to right.
pub fn flatten_comb(args: &[Micheline], kind: Prim) -> Vec<&Micheline> {
    let mut out = Vec::with_capacity(args.len());
    let mut stack = vec![args.iter()];
    while let Some(top) = stack.last_mut() {
        let Some(arg) = top.next() else {
            stack.pop();
            continue;
        };
        match arg {
            Micheline::App(prim, inner, anns)
                if *prim == kind && spliceable(kind, inner.len()) && anns.field().is_none() =>
            {
                stack.push(inner.iter())
            }
            _ => out.push(arg),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::micheline::test_helpers::*;
    use serde_json::json;

    fn ty(value: serde_json::Value) -> Micheline {
        Micheline::from_json(&value).unwrap()
    }

    fn args(m: &Micheline) -> &[Micheline] {
        match m {
            Micheline::App(_, args, _) => args,
            _ => panic!("not an application: {m:?}"),
        }
    }

    #[test]
    fn right_comb_and_comb_agree() {
        let nested = app!(pair[app!(nat), app!(pair[app!(key), app!(signature)])]);
        let comb = app!(pair[app!(nat), app!(key), app!(signature)]);
        let fields = [app!(nat), app!(key), app!(signature)];
        let expected: Vec<&Micheline> = fields.iter().collect();
        assert_eq!(flatten_comb(args(&nested), Prim::pair), expected);
        assert_eq!(flatten_comb(args(&comb), Prim::pair), expected);
    }

    #[test]
    fn left_nested_keeps_order() {
        let nested = app!(Pair[app!(Pair[1, 2]), app!(Pair[3, 4])]);
        let flat: Vec<Micheline> = (1..=4i128).map(Micheline::from).collect();
        assert_eq!(
            flatten_comb(args(&nested), Prim::Pair),
            flat.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn annotated_nested_node_is_one_entry() {
        let t = ty(json!({"prim": "pair", "args": [
            {"prim": "nat"},
            {"prim": "pair", "annots": ["%inner"], "args": [{"prim": "int"}, {"prim": "int"}]}
        ]}));
        let flat = flatten_comb(args(&t), Prim::pair);
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[1].field_annotation(), Some("inner"));
    }

    #[test]
    fn other_kinds_are_not_spliced() {
        let t = app!(pair[app!(nat), app!(or[app!(int), app!(pair[app!(nat), app!(nat)])])]);
        assert_eq!(flatten_comb(args(&t), Prim::pair).len(), 2);
    }

    #[test]
    fn malformed_nodes_stay_in_place() {
        let t = app!(pair[app!(nat), app!(pair[app!(int)])]);
        assert_eq!(
            flatten_comb(args(&t), Prim::pair),
            vec![&app!(nat), &app!(pair[app!(int)])]
        );
        let t = app!(or[app!(nat), app!(or[app!(int), app!(int), app!(int)])]);
        assert_eq!(flatten_comb(args(&t), Prim::or).len(), 2);
    }
}

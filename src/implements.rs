// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
//
// SPDX-License-Identifier: MIT

//! Structural conformance of Micheline values to Michelson types.
//!
//! Only constructor kinds, arity and literal kinds are compared. Annotations
//! play no role, and `pair`/`Pair` nodes are unfolded as right combs on both
//! sides, so nested and comb encodings are interchangeable.

use tracing::trace;

use crate::ast::Micheline;
use crate::context::Ctx;
use crate::depth::DepthLimit;
use crate::prim::Prim;

/// Whether `value` structurally implements `ty`, with the default [Ctx].
pub fn implements(value: &Micheline, ty: &Micheline) -> bool {
    implements_with(&Ctx::default(), value, ty)
}

/// Whether `value` structurally implements `ty`. Never fails: malformed
/// types and trees nested past [Ctx::max_depth] answer `false`.
pub fn implements_with(ctx: &Ctx, value: &Micheline, ty: &Micheline) -> bool {
    matches(value, ty, ctx.depth_limit())
}

impl Micheline {
    /// Whether this value structurally implements `ty`, see [implements].
    pub fn implements(&self, ty: &Micheline) -> bool {
        implements(self, ty)
    }
}

fn matches(value: &Micheline, ty: &Micheline, depth: DepthLimit) -> bool {
    use Micheline as V;
    let depth = match depth.descend() {
        Ok(depth) => depth,
        Err(err) => {
            trace!(%err, "giving up on a deep value");
            return false;
        }
    };
    let Micheline::App(prim, targs, _) = ty else {
        trace!(?ty, "not a type");
        return false;
    };
    let ok = match (prim, targs.as_slice(), value) {
        (Prim::int | Prim::nat | Prim::mutez, [], V::Int(_)) => true,
        (Prim::timestamp, [], V::Int(_) | V::String(_)) => true,
        (
            Prim::string
            | Prim::key_hash
            | Prim::address
            | Prim::key
            | Prim::signature
            | Prim::chain_id
            | Prim::tx_rollup_l2_address,
            [],
            V::String(_) | V::Bytes(_),
        ) => true,
        (
            Prim::bytes
            | Prim::bls12_381_g1
            | Prim::bls12_381_g2
            | Prim::chest
            | Prim::chest_key,
            [],
            V::Bytes(_),
        ) => true,
        (Prim::bls12_381_fr, [], V::Bytes(_) | V::Int(_)) => true,
        (Prim::bool, [], V::App(Prim::True | Prim::False, vargs, _)) => vargs.is_empty(),
        (Prim::unit, [], V::App(Prim::Unit, vargs, _)) => vargs.is_empty(),

        (Prim::sapling_state, [V::Int(_)], V::Seq(_) | V::Int(_)) => true,
        (
            Prim::sapling_transaction | Prim::sapling_transaction_deprecated,
            [V::Int(_)],
            V::Bytes(_),
        ) => true,

        (Prim::pair, [_, _, ..], V::App(Prim::Pair, vargs, _)) if vargs.len() >= 2 => {
            matches_comb(vargs, targs, depth)
        }

        (Prim::or, [l, r], V::App(side @ (Prim::Left | Prim::Right), vargs, _)) => {
            match (side, vargs.as_slice()) {
                (Prim::Left, [x]) => matches(x, l, depth),
                (Prim::Right, [x]) => matches(x, r, depth),
                _ => false,
            }
        }

        (Prim::option, [inner], V::App(Prim::Some, vargs, _)) => match vargs.as_slice() {
            [x] => matches(x, inner, depth),
            _ => false,
        },
        (Prim::option, [_], V::App(Prim::None, vargs, _)) => vargs.is_empty(),

        (Prim::list | Prim::set, [item], V::Seq(items)) => {
            items.iter().all(|x| matches(x, item, depth))
        }

        (Prim::map | Prim::big_map, [key, val], V::Seq(elts)) => {
            elts.iter().all(|elt| match elt {
                V::App(Prim::Elt, kv, _) => match kv.as_slice() {
                    [k, v] => matches(k, key, depth) && matches(v, val, depth),
                    _ => false,
                },
                _ => {
                    trace!(?elt, "map element is not Elt");
                    false
                }
            })
        }
        (Prim::big_map, [_, _], V::Int(_)) => true,

        (Prim::lambda, [_, _], V::Seq(_)) => true,
        (Prim::lambda, [_, _], V::App(Prim::Lambda_rec, vargs, _)) => {
            matches!(vargs.as_slice(), [V::Seq(_)])
        }

        (Prim::contract, [_], V::String(_) | V::Bytes(_)) => true,
        (Prim::ticket, [_], V::String(_) | V::Bytes(_)) => true,
        (Prim::ticket, [_], V::App(Prim::Pair | Prim::Ticket, vargs, _)) => vargs.len() >= 2,

        _ => false,
    };
    if !ok {
        trace!(?prim, ?value, "value does not implement type");
    }
    ok
}

/// Match the arguments of a `Pair` value against the arguments of a `pair`
/// type, reading both as right combs: `Pair a b c` is `Pair a (Pair b c)`.
/// A trailing value `Pair` is unfolded only while the type still has more
/// than one field left, and a trailing type `pair` only while the value has,
/// so a `Pair` standing for a single field is matched whole.
fn matches_comb(vargs: &[Micheline], targs: &[Micheline], depth: DepthLimit) -> bool {
    let (mut vs, mut ts) = (vargs, targs);
    loop {
        match (vs, ts) {
            ([v], [t]) => return matches(v, t, depth),
            ([v], [_, _, ..]) => match v {
                Micheline::App(Prim::Pair, inner, _) if inner.len() >= 2 => vs = inner.as_slice(),
                _ => {
                    trace!(fields = ts.len(), ?v, "value comb is too short");
                    return false;
                }
            },
            ([_, _, ..], [t]) => match t {
                Micheline::App(Prim::pair, inner, _) if inner.len() >= 2 => ts = inner.as_slice(),
                _ => {
                    trace!(items = vs.len(), ?t, "value comb is too long");
                    return false;
                }
            },
            ([v, vrest @ ..], [t, trest @ ..]) => {
                if !matches(v, t, depth) {
                    return false;
                }
                vs = vrest;
                ts = trest;
            }
            _ => return false,
        }
    }
}

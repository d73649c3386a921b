// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
//
// SPDX-License-Identifier: MIT

use num_bigint::{BigInt, BigUint};

use super::annotations::{first_field_annotation, Annotations};
use crate::prim::Prim;

/// A generic Micheline node. Both Michelson types and Michelson values are
/// represented with it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Micheline {
    /// Arbitrary-precision integer literal.
    Int(BigInt),
    /// String literal.
    String(String),
    /// Byte string literal.
    Bytes(Vec<u8>),
    /// Application of a Micheline primitive to some arguments with optional
    /// annotations. The primitive is the first field, arguments are the second
    /// field, annotations are the last field.
    App(Prim, Vec<Micheline>, Annotations),
    /// Sequence of nodes with no enclosing primitive.
    Seq(Vec<Micheline>),
}

impl Micheline {
    /// Application of `prim` to no arguments.
    pub fn prim0(prim: Prim) -> Self {
        Micheline::App(prim, Vec::new(), Annotations::new())
    }

    /// Application of `prim` to a single argument.
    pub fn prim1(prim: Prim, arg: Micheline) -> Self {
        Micheline::App(prim, vec![arg], Annotations::new())
    }

    /// Application of `prim` to two arguments.
    pub fn prim2(prim: Prim, arg1: Micheline, arg2: Micheline) -> Self {
        Micheline::App(prim, vec![arg1, arg2], Annotations::new())
    }

    /// Sequence of the given nodes.
    pub fn seq(args: impl IntoIterator<Item = Micheline>) -> Self {
        Micheline::Seq(args.into_iter().collect())
    }

    /// The primitive of an application node.
    pub fn prim(&self) -> Option<Prim> {
        match self {
            Micheline::App(prim, ..) => Some(*prim),
            _ => None,
        }
    }

    /// Name of the first `%` annotation of an application node, see
    /// [first_field_annotation].
    pub fn field_annotation(&self) -> Option<&str> {
        first_field_annotation(self)
    }
}

impl From<i128> for Micheline {
    fn from(x: i128) -> Self {
        Micheline::Int(x.into())
    }
}

impl From<BigInt> for Micheline {
    fn from(x: BigInt) -> Self {
        Micheline::Int(x)
    }
}

impl From<BigUint> for Micheline {
    fn from(x: BigUint) -> Self {
        Micheline::Int(x.into())
    }
}

impl From<String> for Micheline {
    fn from(x: String) -> Self {
        Micheline::String(x)
    }
}

impl From<Vec<u8>> for Micheline {
    fn from(x: Vec<u8>) -> Self {
        Micheline::Bytes(x)
    }
}

impl From<()> for Micheline {
    fn from(_: ()) -> Self {
        Micheline::prim0(Prim::Unit)
    }
}

impl From<bool> for Micheline {
    fn from(x: bool) -> Self {
        Micheline::prim0(if x { Prim::True } else { Prim::False })
    }
}

impl From<&str> for Micheline {
    fn from(s: &str) -> Self {
        Micheline::from(s.to_owned())
    }
}

/// Pattern synonym matching all primitives that are types without
/// arguments. Useful for total matches.
macro_rules! micheline_scalar_types {
    () => {
        Prim::int
            | Prim::nat
            | Prim::string
            | Prim::bytes
            | Prim::mutez
            | Prim::bool
            | Prim::key_hash
            | Prim::timestamp
            | Prim::address
            | Prim::key
            | Prim::signature
            | Prim::chain_id
            | Prim::bls12_381_g1
            | Prim::bls12_381_g2
            | Prim::bls12_381_fr
            | Prim::never
            | Prim::unit
            | Prim::operation
            | Prim::chest
            | Prim::chest_key
            | Prim::tx_rollup_l2_address
    };
}

/// Pattern synonym matching all Micheline literals. Useful for total
/// matches.
macro_rules! micheline_literals {
    () => {
        Micheline::Int(..) | Micheline::String(..) | Micheline::Bytes(..)
    };
}

pub(crate) use {micheline_literals, micheline_scalar_types};

// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
//
// SPDX-License-Identifier: MIT

//! The closed vocabulary of Michelson primitives.
//!
//! Instructions are part of the vocabulary too: lambda values and `code`
//! sections are carried as applications of instruction primitives, and the
//! JSON codec must be able to read them back.

use strum_macros::{EnumCount, EnumIter, EnumString, IntoStaticStr};

/// Unknown primitive error
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
#[error("unknown primitive: {0}")]
pub struct PrimError(pub String);

/// A Michelson primitive. Variants are declared in protocol tag order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumCount, EnumIter,
)]
#[allow(non_camel_case_types, clippy::upper_case_acronyms, missing_docs)]
#[repr(u8)]
pub enum Prim {
    parameter,
    storage,
    code,
    False,
    Elt,
    Left,
    None,
    Pair,
    Right,
    Some,
    True,
    Unit,
    PACK,
    UNPACK,
    BLAKE2B,
    SHA256,
    SHA512,
    ABS,
    ADD,
    AMOUNT,
    AND,
    BALANCE,
    CAR,
    CDR,
    CHECK_SIGNATURE,
    COMPARE,
    CONCAT,
    CONS,
    CREATE_ACCOUNT,
    CREATE_CONTRACT,
    IMPLICIT_ACCOUNT,
    DIP,
    DROP,
    DUP,
    EDIV,
    EMPTY_MAP,
    EMPTY_SET,
    EQ,
    EXEC,
    FAILWITH,
    GE,
    GET,
    GT,
    HASH_KEY,
    IF,
    IF_CONS,
    IF_LEFT,
    IF_NONE,
    INT,
    LAMBDA,
    LE,
    LEFT,
    LOOP,
    LSL,
    LSR,
    LT,
    MAP,
    MEM,
    MUL,
    NEG,
    NEQ,
    NIL,
    NONE,
    NOT,
    NOW,
    OR,
    PAIR,
    PUSH,
    RIGHT,
    SIZE,
    SOME,
    SOURCE,
    SENDER,
    SELF,
    STEPS_TO_QUOTA,
    SUB,
    SWAP,
    TRANSFER_TOKENS,
    SET_DELEGATE,
    UNIT,
    UPDATE,
    XOR,
    ITER,
    LOOP_LEFT,
    ADDRESS,
    CONTRACT,
    ISNAT,
    CAST,
    RENAME,
    bool,
    contract,
    int,
    key,
    key_hash,
    lambda,
    list,
    map,
    big_map,
    nat,
    option,
    or,
    pair,
    set,
    signature,
    string,
    bytes,
    mutez,
    timestamp,
    unit,
    operation,
    address,
    SLICE,
    DIG,
    DUG,
    EMPTY_BIG_MAP,
    APPLY,
    chain_id,
    CHAIN_ID,
    LEVEL,
    SELF_ADDRESS,
    never,
    NEVER,
    UNPAIR,
    VOTING_POWER,
    TOTAL_VOTING_POWER,
    KECCAK,
    SHA3,
    PAIRING_CHECK,
    bls12_381_g1,
    bls12_381_g2,
    bls12_381_fr,
    sapling_state,
    sapling_transaction_deprecated,
    SAPLING_EMPTY_STATE,
    SAPLING_VERIFY_UPDATE,
    ticket,
    TICKET_DEPRECATED,
    READ_TICKET,
    SPLIT_TICKET,
    JOIN_TICKETS,
    GET_AND_UPDATE,
    chest,
    chest_key,
    OPEN_CHEST,
    VIEW,
    view,
    constant,
    SUB_MUTEZ,
    tx_rollup_l2_address,
    MIN_BLOCK_TIME,
    sapling_transaction,
    EMIT,
    Lambda_rec,
    LAMBDA_REC,
    TICKET,
    BYTES,
    NAT,
    Ticket,
}

impl Prim {
    /// Look up a primitive by its exact, case-sensitive name.
    pub fn from_name(name: &str) -> Result<Self, PrimError> {
        name.parse().map_err(|_| PrimError(name.to_owned()))
    }

    /// The primitive's name as it appears in source and in JSON.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for Prim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
//
// SPDX-License-Identifier: MIT

//! Recursion budget for walks over untrusted trees.

/// The nesting of a tree exceeds the configured limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("nesting exceeds the depth limit of {limit}")]
pub struct TooDeep {
    /// The limit that was exceeded.
    pub limit: usize,
}

/// Remaining nesting budget. Passed by value down a recursive walk, so each
/// branch sees only the budget left at its own depth.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DepthLimit {
    limit: usize,
    remaining: usize,
}

impl DepthLimit {
    pub fn new(limit: usize) -> Self {
        DepthLimit {
            limit,
            remaining: limit,
        }
    }

    /// Budget for the children of the node being entered.
    pub fn descend(self) -> Result<Self, TooDeep> {
        match self.remaining.checked_sub(1) {
            Some(remaining) => Ok(DepthLimit { remaining, ..self }),
            None => Err(TooDeep { limit: self.limit }),
        }
    }
}

// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
//
// SPDX-License-Identifier: MIT

//! Tunables shared by decoding, rendering and matching.

use crate::depth::DepthLimit;

/// Default nesting limit for Micheline trees.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Configuration for the operations of this crate. Construct it with
/// [`Ctx::default()`] and adjust fields as needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ctx {
    /// Maximum nesting of a Micheline tree. Decoding and rendering fail with
    /// [crate::depth::TooDeep] past it, matching answers `false`.
    pub max_depth: usize,
}

impl Default for Ctx {
    fn default() -> Self {
        Ctx {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Ctx {
    pub(crate) fn depth_limit(&self) -> DepthLimit {
        DepthLimit::new(self.max_depth)
    }
}

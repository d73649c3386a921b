// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
//
// SPDX-License-Identifier: MIT

//! The generic Micheline tree and its annotations.

pub mod annotations;
pub mod micheline;

pub use annotations::{first_field_annotation, strip_sigil, Annotation, Annotations};
pub use micheline::Micheline;

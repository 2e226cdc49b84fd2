// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod draft;
mod error;
mod policy;
mod state;
mod validation;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{SUBMIT_FIELD, apply};
pub use command::Command;
pub use draft::ResolutionDraft;
pub use error::CoreError;
pub use policy::{CreationPolicy, FormContext};
pub use state::{
    Effect, FieldError, FormFields, FormState, FormStep, ParentInput, TransitionResult,
};
pub use validation::validate_submission;

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
    clippy::all
)]

mod error;
mod maintenance;
mod ports;
mod session;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, translate_collaborator_error, translate_core_error, translate_domain_error,
};
pub use maintenance::{
    change_expediente_tramite, deactivate_expediente, deactivate_resolution, expire_overdue,
    transition_expediente,
};
pub use ports::{
    CollaboratorError, CurrentUser, EmpresaLookup, ExpedienteLookup, ExpedientePatch,
    NewExpediente, ResolutionPatch, ResolutionRepository, StaticUser,
};
pub use session::{Collaborators, CreationSession};

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

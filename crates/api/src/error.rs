// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::ports::CollaboratorError;
use resoluciones::{CoreError, FieldError};
use resoluciones_domain::DomainError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A domain rule was violated.
    #[error("Domain rule violation ({rule}): {message}")]
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The form failed validation; one message per field.
    #[error("Form rejected with {} error(s)", errors.len())]
    FormRejected {
        /// Field-level messages.
        errors: Vec<FieldError>,
    },
    /// The command does not fit the current state of the flow.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// A human-readable description of the problem.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A collaborator failed to read or write.
    #[error("Persistence failure: {message}")]
    PersistenceFailure {
        /// A description of the failure.
        message: String,
    },
    /// The flow was aborted by a data or schema mismatch.
    #[error("Fatal: {message}")]
    Fatal {
        /// A description of the failure.
        message: String,
    },
}

impl From<FieldError> for ApiError {
    fn from(err: FieldError) -> Self {
        Self::InvalidInput {
            field: err.field.to_string(),
            message: err.message,
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let field: String = err.field().to_string();
    match err {
        DomainError::UnknownTramiteType(_)
        | DomainError::LegacyTramiteLabel(_)
        | DomainError::ParentBelongsToDifferentEmpresa { .. }
        | DomainError::DateArithmeticOverflow { .. } => ApiError::Fatal {
            message: err.to_string(),
        },
        DomainError::InvalidFormat { reason, .. } => ApiError::InvalidInput {
            field,
            message: reason,
        },
        DomainError::InvalidDuration { .. } | DomainError::VigenciaRequired { .. } => {
            ApiError::InvalidInput {
                field,
                message: err.to_string(),
            }
        }
        DomainError::DuplicateNumber { .. } => ApiError::DomainRuleViolation {
            rule: String::from("unique_number_per_year"),
            message: err.to_string(),
        },
        DomainError::ParentRequiredButMissing { .. } => ApiError::DomainRuleViolation {
            rule: String::from("parent_required"),
            message: err.to_string(),
        },
        DomainError::IneligibleParent { .. } | DomainError::ParentWithoutVigencia { .. } => {
            ApiError::DomainRuleViolation {
                rule: String::from("eligible_parent"),
                message: err.to_string(),
            }
        }
        DomainError::InvalidStateTransition { .. } => ApiError::DomainRuleViolation {
            rule: String::from("expediente_state_transition"),
            message: err.to_string(),
        },
        DomainError::ExpedienteInactive(_) => ApiError::DomainRuleViolation {
            rule: String::from("active_expediente"),
            message: err.to_string(),
        },
        DomainError::TramiteLocked(_) => ApiError::DomainRuleViolation {
            rule: String::from("immutable_tramite"),
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::UnknownExpediente(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Expediente"),
            message: format!("Expediente {id} is not among the empresa's expedientes"),
        },
        CoreError::UnknownResolution(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Resolution"),
            message: format!("Resolution {id} is not among the empresa's resolutions"),
        },
        CoreError::InvalidTransition { .. }
        | CoreError::SubmissionInFlight
        | CoreError::ManualEntryNotAllowed
        | CoreError::IncompleteForm(_) => ApiError::InvalidRequest {
            message: err.to_string(),
        },
    }
}

/// Translates a collaborator failure into an API error.
#[must_use]
pub fn translate_collaborator_error(err: CollaboratorError) -> ApiError {
    match err {
        CollaboratorError::NotFound { resource, id } => ApiError::ResourceNotFound {
            resource_type: resource.to_string(),
            message: format!("{resource} {id} does not exist"),
        },
        CollaboratorError::Conflict(_)
        | CollaboratorError::Rejected(_)
        | CollaboratorError::Unavailable(_) => ApiError::PersistenceFailure {
            message: err.to_string(),
        },
    }
}

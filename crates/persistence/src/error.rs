// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use resoluciones_api::CollaboratorError;
use resoluciones_domain::DomainError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The requested record was not found.
    NotFound { resource: &'static str, id: String },
    /// The full number is already stored for its year.
    DuplicateNumber(String),
    /// A record with the same identifier already exists.
    DuplicateKey { resource: &'static str, id: String },
    /// The expediente already originated a resolution.
    ExpedienteAlreadyResolved {
        expediente: String,
        resolution: String,
    },
    /// A record references a row that does not exist or does not match.
    ForeignKeyViolation {
        resource: &'static str,
        reference: String,
    },
    /// The record is malformed.
    InvalidRecord(String),
    /// The update breaks a lifecycle rule of the stored record.
    RuleViolation(DomainError),
    /// Serialization/deserialization error.
    SerializationError(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::DuplicateNumber(number) => write!(f, "Number {number} is already stored"),
            Self::DuplicateKey { resource, id } => {
                write!(f, "{resource} {id} already exists")
            }
            Self::ExpedienteAlreadyResolved {
                expediente,
                resolution,
            } => write!(
                f,
                "Expediente {expediente} already originated resolution {resolution}"
            ),
            Self::ForeignKeyViolation {
                resource,
                reference,
            } => write!(f, "{resource} references unknown or mismatched {reference}"),
            Self::InvalidRecord(msg) => write!(f, "Invalid record: {msg}"),
            Self::RuleViolation(err) => write!(f, "Rule violation: {err}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::RuleViolation(err)
    }
}

impl From<PersistenceError> for CollaboratorError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { resource, id } => Self::NotFound { resource, id },
            PersistenceError::DuplicateNumber(_)
            | PersistenceError::DuplicateKey { .. }
            | PersistenceError::ExpedienteAlreadyResolved { .. } => {
                Self::Conflict(err.to_string())
            }
            PersistenceError::ForeignKeyViolation { .. }
            | PersistenceError::InvalidRecord(_)
            | PersistenceError::RuleViolation(_)
            | PersistenceError::SerializationError(_) => Self::Rejected(err.to_string()),
        }
    }
}

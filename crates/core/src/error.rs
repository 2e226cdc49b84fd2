// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::state::FormStep;
use resoluciones_domain::DomainError;

/// Errors that can occur during form transitions.
///
/// Validation failures are not errors: they are recorded on the form as
/// field-level messages. These variants describe commands that cannot be
/// applied at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A domain rule was violated.
    #[error("Domain violation: {0}")]
    DomainViolation(#[from] DomainError),
    /// The command is not accepted in the current step.
    #[error("Command '{command}' is not allowed while {step}")]
    InvalidTransition {
        /// The step the form was in.
        step: FormStep,
        /// The rejected command.
        command: &'static str,
    },
    /// The form is waiting for the persistence response.
    #[error("A submission is already in flight")]
    SubmissionInFlight,
    /// The selected expediente was not offered for the empresa.
    #[error("Expediente {0} is not among the empresa's expedientes")]
    UnknownExpediente(String),
    /// The selected parent was not loaded for the empresa.
    #[error("Resolution {0} is not among the empresa's resolutions")]
    UnknownResolution(String),
    /// Manual expediente entry requested while the empresa has expedientes.
    #[error("Manual expediente entry is only available when the empresa has no expedientes")]
    ManualEntryNotAllowed,
    /// A selection the command depends on has not been made.
    #[error("Form is incomplete: {0} has not been resolved")]
    IncompleteForm(&'static str),
}

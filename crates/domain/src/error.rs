// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{EstadoExpediente, TipoTramite};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A number, date or reference was malformed.
    #[error("Invalid format for '{field}': {reason}")]
    InvalidFormat {
        /// The form field the value was entered in.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// The full number is already used in the same calendar year.
    #[error("Number {full_number} is already in use; next available is {suggested}")]
    DuplicateNumber {
        /// The rejected full number (e.g. `R-0003-2025`).
        full_number: String,
        /// The next free full number for the same prefix and year.
        suggested: String,
    },
    /// The procedure type label is not one of the known values.
    #[error("Unknown tramite type: '{0}'")]
    UnknownTramiteType(String),
    /// A legacy procedure type label that has no agreed mapping yet.
    #[error("Legacy tramite label '{0}' requires a data migration decision")]
    LegacyTramiteLabel(String),
    /// The vigency duration is outside the accepted range.
    #[error("Invalid vigency duration: {years} years. Must be between {min} and {max}")]
    InvalidDuration {
        /// The rejected duration.
        years: u8,
        /// The minimum accepted duration.
        min: u8,
        /// The maximum accepted duration.
        max: u8,
    },
    /// A parent resolution is required for this procedure type.
    #[error("A parent resolution is required for tramite {tipo_tramite}")]
    ParentRequiredButMissing {
        /// The procedure type that requires the parent.
        tipo_tramite: TipoTramite,
    },
    /// The selected parent resolution belongs to another empresa.
    #[error("Resolution {parent_id} belongs to empresa {actual}, not {expected}")]
    ParentBelongsToDifferentEmpresa {
        /// The selected parent resolution.
        parent_id: String,
        /// The empresa of the expediente being resolved.
        expected: String,
        /// The empresa that owns the selected parent.
        actual: String,
    },
    /// The selected parent exists but does not satisfy the eligibility filter.
    #[error("Resolution {parent_id} cannot be used as parent: {reason}")]
    IneligibleParent {
        /// The selected parent resolution.
        parent_id: String,
        /// Why the parent was rejected.
        reason: String,
    },
    /// The parent has no vigency window to inherit from.
    #[error("Resolution {parent_id} has no vigency window")]
    ParentWithoutVigencia {
        /// The parent resolution.
        parent_id: String,
    },
    /// Vigency fields must be populated for this procedure type.
    #[error("Vigency start date is required for tramite {tipo_tramite}")]
    VigenciaRequired {
        /// The procedure type that owns a vigency window.
        tipo_tramite: TipoTramite,
    },
    /// Date arithmetic overflow.
    #[error("Date arithmetic overflow while {operation}")]
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// The requested expediente state transition is not allowed.
    #[error("Cannot transition expediente from {from} to {to}")]
    InvalidStateTransition {
        /// The current state.
        from: EstadoExpediente,
        /// The requested state.
        to: EstadoExpediente,
    },
    /// The expediente has been deactivated and can no longer change.
    #[error("Expediente {0} is inactive")]
    ExpedienteInactive(String),
    /// The procedure type cannot change once a resolution references the expediente.
    #[error("Tramite type of expediente {0} is locked by an issued resolution")]
    TramiteLocked(String),
}

impl DomainError {
    /// Returns whether this error must abort the whole creation flow.
    ///
    /// Fatal errors indicate a data or schema mismatch; everything else is
    /// resolved by re-prompting the user.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnknownTramiteType(_)
                | Self::LegacyTramiteLabel(_)
                | Self::ParentBelongsToDifferentEmpresa { .. }
                | Self::DateArithmeticOverflow { .. }
        )
    }

    /// Returns the form field a recoverable error should be shown next to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidFormat { field, .. } => field,
            Self::DuplicateNumber { .. } => "numero",
            Self::UnknownTramiteType(_)
            | Self::LegacyTramiteLabel(_)
            | Self::TramiteLocked(_) => "tipoTramite",
            Self::InvalidDuration { .. } => "aniosVigencia",
            Self::ParentRequiredButMissing { .. }
            | Self::ParentBelongsToDifferentEmpresa { .. }
            | Self::IneligibleParent { .. }
            | Self::ParentWithoutVigencia { .. } => "resolucionPadreId",
            Self::VigenciaRequired { .. } | Self::DateArithmeticOverflow { .. } => {
                "fechaVigenciaInicio"
            }
            Self::InvalidStateTransition { .. } | Self::ExpedienteInactive(_) => "estado",
        }
    }
}

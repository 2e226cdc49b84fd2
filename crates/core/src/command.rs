// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use resoluciones_domain::{
    Empresa, Expediente, ExpedienteId, NumberingSnapshot, Resolution, ResolutionId, TipoTramite,
};
use time::Date;

/// A command represents user intent or a collaborator response as data only.
///
/// Commands are the only way to move the creation form forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The user picked the empresa the resolution is issued to.
    SelectEmpresa(Empresa),
    /// The empresa's expedientes arrived.
    ExpedientesLoaded(Vec<Expediente>),
    /// The user picked one of the offered expedientes.
    SelectExpediente(ExpedienteId),
    /// An expediente was created on the fly and becomes the selection.
    ExpedienteCreated(Expediente),
    /// The user asked to type the expediente by hand.
    StartManualExpediente,
    /// The user described an expediente unknown to the system.
    EnterManualExpediente {
        /// The expediente number as typed.
        numero: String,
        /// The expediente's emission date.
        fecha_emision: Date,
        /// The procedure type.
        tipo_tramite: TipoTramite,
        /// Free-text description.
        descripcion: Option<String>,
    },
    /// The expediente choice is final; load candidate parents.
    ConfirmExpediente,
    /// The empresa's resolutions arrived.
    CandidateParentsLoaded(Vec<Resolution>),
    /// The authority-wide numbers for a year arrived.
    ExistingNumbersLoaded {
        /// The year the snapshot belongs to.
        year: i32,
        /// The issued full numbers.
        numbers: NumberingSnapshot,
    },
    /// The number field changed.
    ChangeNumero(String),
    /// The emission date changed.
    ChangeFechaEmision(Date),
    /// The user picked a parent offered by the system.
    SelectParent(ResolutionId),
    /// The user typed a parent reference by hand.
    EnterManualParent(String),
    /// The user removed the parent reference.
    ClearParent,
    /// The vigency start date changed.
    ChangeVigenciaInicio(Date),
    /// The vigency duration changed.
    ChangeAniosVigencia(u8),
    /// The description changed.
    ChangeDescripcion(Option<String>),
    /// The observations changed.
    ChangeObservaciones(Option<String>),
    /// Run full validation on the current fields.
    Validate,
    /// Send the validated draft to persistence.
    Submit,
    /// Persistence accepted the draft.
    SubmissionSucceeded(Resolution),
    /// Persistence rejected the draft or could not be reached.
    SubmissionFailed(String),
    /// A fatal condition was detected outside the reducer.
    Abort(String),
}

impl Command {
    /// Returns the command name used in errors and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SelectEmpresa(_) => "SelectEmpresa",
            Self::ExpedientesLoaded(_) => "ExpedientesLoaded",
            Self::SelectExpediente(_) => "SelectExpediente",
            Self::ExpedienteCreated(_) => "ExpedienteCreated",
            Self::StartManualExpediente => "StartManualExpediente",
            Self::EnterManualExpediente { .. } => "EnterManualExpediente",
            Self::ConfirmExpediente => "ConfirmExpediente",
            Self::CandidateParentsLoaded(_) => "CandidateParentsLoaded",
            Self::ExistingNumbersLoaded { .. } => "ExistingNumbersLoaded",
            Self::ChangeNumero(_) => "ChangeNumero",
            Self::ChangeFechaEmision(_) => "ChangeFechaEmision",
            Self::SelectParent(_) => "SelectParent",
            Self::EnterManualParent(_) => "EnterManualParent",
            Self::ClearParent => "ClearParent",
            Self::ChangeVigenciaInicio(_) => "ChangeVigenciaInicio",
            Self::ChangeAniosVigencia(_) => "ChangeAniosVigencia",
            Self::ChangeDescripcion(_) => "ChangeDescripcion",
            Self::ChangeObservaciones(_) => "ChangeObservaciones",
            Self::Validate => "Validate",
            Self::Submit => "Submit",
            Self::SubmissionSucceeded(_) => "SubmissionSucceeded",
            Self::SubmissionFailed(_) => "SubmissionFailed",
            Self::Abort(_) => "Abort",
        }
    }

    /// Returns whether this command edits a form field.
    #[must_use]
    pub const fn is_field_edit(&self) -> bool {
        matches!(
            self,
            Self::ChangeNumero(_)
                | Self::ChangeFechaEmision(_)
                | Self::SelectParent(_)
                | Self::EnterManualParent(_)
                | Self::ClearParent
                | Self::ChangeVigenciaInicio(_)
                | Self::ChangeAniosVigencia(_)
                | Self::ChangeDescripcion(_)
                | Self::ChangeObservaciones(_)
        )
    }
}

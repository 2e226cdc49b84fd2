// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::draft::ResolutionDraft;
use crate::policy::CreationPolicy;
use resoluciones_domain::{
    DomainError, Empresa, EmpresaId, Expediente, HierarchyDecision, InheritanceMode,
    NumberPrefix, NumberingSnapshot, Resolution, ResolutionId, format_number,
};
use time::Date;

/// The step the creation form is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormStep {
    /// No empresa chosen yet.
    SelectingEmpresa,
    /// Waiting for, or choosing among, the empresa's expedientes.
    SelectingExpediente,
    /// The empresa has no expedientes; the user types one by hand.
    ManualExpedienteEntry,
    /// A persisted expediente has been chosen.
    SystemExpediente,
    /// Waiting for candidate parent resolutions.
    ComputingHierarchy,
    /// The resolution fields are editable.
    EditingFields,
    /// The fields passed validation and await confirmation.
    Validating,
    /// The draft was handed to persistence.
    Submitting,
    /// The resolution exists. Terminal.
    Created,
    /// The flow was aborted by a fatal error. Terminal.
    Failed,
}

impl FormStep {
    /// Returns whether no further command is accepted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Created | Self::Failed)
    }

    /// Returns the step name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SelectingEmpresa => "selecting empresa",
            Self::SelectingExpediente => "selecting expediente",
            Self::ManualExpedienteEntry => "entering a manual expediente",
            Self::SystemExpediente => "holding a system expediente",
            Self::ComputingHierarchy => "computing hierarchy",
            Self::EditingFields => "editing fields",
            Self::Validating => "validating",
            Self::Submitting => "submitting",
            Self::Created => "created",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for FormStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parent reference as entered in the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParentInput {
    /// No parent.
    #[default]
    None,
    /// A candidate offered by the system.
    System(ResolutionId),
    /// A validated `R-####-####` typed by hand.
    Manual(String),
}

/// Editable resolution fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    /// Digits typed so far, at most four.
    pub numero: String,
    /// Issuance date; its year scopes the number.
    pub fecha_emision: Option<Date>,
    /// The parent reference.
    pub parent: ParentInput,
    /// Start of the vigency window.
    pub fecha_vigencia_inicio: Option<Date>,
    /// End of the vigency window, always derived.
    pub fecha_vigencia_fin: Option<Date>,
    /// Duration in years.
    pub anios_vigencia: u8,
    /// How the current dates relate to the parent, if they came from one.
    pub inheritance: Option<InheritanceMode>,
    /// Free-text description.
    pub descripcion: Option<String>,
    /// Free-text observations.
    pub observaciones: Option<String>,
}

impl FormFields {
    /// Creates empty fields with the policy defaults.
    #[must_use]
    pub const fn new(policy: &CreationPolicy) -> Self {
        Self {
            numero: String::new(),
            fecha_emision: None,
            parent: ParentInput::None,
            fecha_vigencia_inicio: None,
            fecha_vigencia_fin: None,
            anios_vigencia: policy.default_anios_vigencia,
            inheritance: None,
            descripcion: None,
            observaciones: None,
        }
    }
}

/// A message to display next to a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The wire name of the field.
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl From<&DomainError> for FieldError {
    fn from(error: &DomainError) -> Self {
        Self::new(error.field(), error.to_string())
    }
}

/// Collaborator call the driver must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the expedientes of an empresa.
    LoadExpedientes {
        /// The selected empresa.
        empresa_id: EmpresaId,
    },
    /// Fetch the resolutions of an empresa.
    LoadCandidateParents {
        /// The selected empresa.
        empresa_id: EmpresaId,
    },
    /// Fetch every issued resolution number for a year.
    LoadExistingNumbers {
        /// The emission year.
        year: i32,
    },
    /// Persist the validated draft.
    Persist(ResolutionDraft),
}

/// The complete, immutable state of one creation form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    /// The current step.
    pub step: FormStep,
    /// The selected empresa.
    pub empresa: Option<Empresa>,
    /// The empresa's expedientes, once loaded.
    pub expediente_options: Option<Vec<Expediente>>,
    /// The selected or synthetic expediente.
    pub expediente: Option<Expediente>,
    /// Every resolution loaded for the empresa, eligible or not.
    pub parent_pool: Vec<Resolution>,
    /// The resolved hierarchy.
    pub decision: Option<HierarchyDecision>,
    /// The editable fields.
    pub fields: FormFields,
    /// Issued numbers for `numbers_year`.
    pub existing_numbers: NumberingSnapshot,
    /// The year `existing_numbers` belongs to, once loaded.
    pub numbers_year: Option<i32>,
    /// Messages for the current fields.
    pub errors: Vec<FieldError>,
    /// The draft produced by the last successful validation.
    pub draft: Option<ResolutionDraft>,
    /// The persisted resolution.
    pub created: Option<Resolution>,
    /// Why the flow failed.
    pub failure: Option<String>,
}

impl FormState {
    /// Creates a fresh form.
    #[must_use]
    pub fn new(policy: &CreationPolicy) -> Self {
        Self {
            step: FormStep::SelectingEmpresa,
            empresa: None,
            expediente_options: None,
            expediente: None,
            parent_pool: Vec::new(),
            decision: None,
            fields: FormFields::new(policy),
            existing_numbers: NumberingSnapshot::new(),
            numbers_year: None,
            errors: Vec::new(),
            draft: None,
            created: None,
            failure: None,
        }
    }

    /// The full number the current fields would produce, once digits are typed.
    #[must_use]
    pub fn full_number(&self) -> Option<String> {
        let fecha_emision: Date = self.fields.fecha_emision?;
        if self.fields.numero.is_empty() {
            return None;
        }
        Some(format_number(
            &self.fields.numero,
            fecha_emision.year(),
            NumberPrefix::Resolucion,
        ))
    }

    /// Returns the first message recorded for `field`.
    #[must_use]
    pub fn error_for(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field == field)
    }

    /// Returns whether any message is recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns whether the loaded numbers match the emission year.
    #[must_use]
    pub fn numbers_are_current(&self) -> bool {
        match (self.numbers_year, self.fields.fecha_emision) {
            (Some(year), Some(fecha)) => year == fecha.year(),
            _ => false,
        }
    }

    pub(crate) fn clear_errors_for(&mut self, field: &str) {
        self.errors.retain(|error| error.field != field);
    }

    pub(crate) fn record(&mut self, error: &DomainError) {
        let field_error: FieldError = FieldError::from(error);
        self.clear_errors_for(field_error.field);
        self.errors.push(field_error);
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(&CreationPolicy::default())
    }
}

/// The result of applying a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The state after the command.
    pub new_state: FormState,
    /// The collaborator call to perform next, if any.
    pub effect: Option<Effect>,
}

impl TransitionResult {
    pub(crate) const fn settled(new_state: FormState) -> Self {
        Self {
            new_state,
            effect: None,
        }
    }

    pub(crate) const fn with_effect(new_state: FormState, effect: Effect) -> Self {
        Self {
            new_state,
            effect: Some(effect),
        }
    }
}

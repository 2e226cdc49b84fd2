// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::policy::FormContext;
use crate::state::{Effect, FieldError, FormState, FormStep, ParentInput, TransitionResult};
use crate::validation::validate_submission;
use resoluciones_domain::{
    DomainError, Empresa, Expediente, HierarchyDecision, InheritanceMode, InheritedDates,
    NumberPrefix, NumberingSnapshot, ParentReference, Resolution, ResolutionId, TipoTramite,
    compute_end, ensure_unique, format_number, inherit_dates, is_applicable, resolve,
    sanitize_while_typing, select_parent, validate_duration, validate_number_input,
};
use time::Date;

/// Field name used for messages that come back from persistence.
pub const SUBMIT_FIELD: &str = "submit";

/// Applies a command to the creation form, producing a new state.
///
/// This function is pure: collaborator calls are requested through the
/// returned `Effect` and their results come back as further commands.
///
/// # Arguments
///
/// * `state` - The current form (immutable)
/// * `command` - The command to apply
/// * `ctx` - The reference date, issuing user and defaults
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new state and the next effect
/// * `Err(CoreError)` if the command cannot be applied in the current step
///
/// # Errors
///
/// Returns an error if:
/// - The command is not accepted in the current step
/// - A submission is in flight
/// - A selection the command depends on is missing
pub fn apply(
    state: &FormState,
    command: Command,
    ctx: &FormContext,
) -> Result<TransitionResult, CoreError> {
    if state.step.is_terminal() {
        return Err(invalid(state, &command));
    }

    if state.step == FormStep::Submitting {
        return match command {
            Command::SubmissionSucceeded(resolution) => {
                Ok(submission_succeeded(state, resolution))
            }
            Command::SubmissionFailed(message) => Ok(submission_failed(state, message)),
            _ => Err(CoreError::SubmissionInFlight),
        };
    }

    if let Command::Abort(reason) = command {
        return Ok(TransitionResult::settled(fail(state, reason)));
    }

    match state.step {
        FormStep::SelectingEmpresa => apply_selecting_empresa(state, command),
        FormStep::SelectingExpediente => apply_selecting_expediente(state, command),
        FormStep::ManualExpedienteEntry | FormStep::SystemExpediente => {
            apply_expediente_chosen(state, command)
        }
        FormStep::ComputingHierarchy => apply_computing_hierarchy(state, command, ctx),
        FormStep::EditingFields => apply_editing(state, command, ctx),
        FormStep::Validating => apply_validating(state, command, ctx),
        FormStep::Submitting | FormStep::Created | FormStep::Failed => {
            Err(invalid(state, &command))
        }
    }
}

fn apply_selecting_empresa(
    state: &FormState,
    command: Command,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::SelectEmpresa(empresa) => Ok(select_empresa(state, empresa)),
        other => Err(invalid(state, &other)),
    }
}

fn select_empresa(state: &FormState, empresa: Empresa) -> TransitionResult {
    let empresa_id = empresa.id.clone();
    let mut new_state: FormState = FormState {
        step: FormStep::SelectingExpediente,
        empresa: Some(empresa),
        expediente_options: None,
        expediente: None,
        parent_pool: Vec::new(),
        decision: None,
        errors: Vec::new(),
        draft: None,
        ..state.clone()
    };
    new_state.fields.parent = ParentInput::None;
    TransitionResult::with_effect(new_state, Effect::LoadExpedientes { empresa_id })
}

fn apply_selecting_expediente(
    state: &FormState,
    command: Command,
) -> Result<TransitionResult, CoreError> {
    match command {
        // Re-selecting the empresa starts the expediente choice over.
        Command::SelectEmpresa(empresa) => Ok(select_empresa(state, empresa)),
        Command::ExpedientesLoaded(expedientes) => {
            let empresa: &Empresa = require_empresa(state)?;
            let options: Vec<Expediente> = expedientes
                .into_iter()
                .filter(|expediente| expediente.empresa_id == empresa.id)
                .filter(|expediente| {
                    expediente.esta_activo && expediente.estado.admits_resolution()
                })
                .collect();
            Ok(TransitionResult::settled(FormState {
                expediente_options: Some(options),
                ..state.clone()
            }))
        }
        Command::SelectExpediente(id) => {
            let options: &[Expediente] = state
                .expediente_options
                .as_deref()
                .ok_or(CoreError::IncompleteForm("expedientes"))?;
            let expediente: Expediente = options
                .iter()
                .find(|expediente| expediente.id == id)
                .cloned()
                .ok_or_else(|| CoreError::UnknownExpediente(id.to_string()))?;
            Ok(TransitionResult::settled(FormState {
                step: FormStep::SystemExpediente,
                expediente: Some(expediente),
                ..state.clone()
            }))
        }
        Command::ExpedienteCreated(expediente) => {
            let empresa: &Empresa = require_empresa(state)?;
            if expediente.empresa_id != empresa.id {
                return Err(CoreError::UnknownExpediente(expediente.id.to_string()));
            }
            let mut options: Vec<Expediente> =
                state.expediente_options.clone().unwrap_or_default();
            options.push(expediente.clone());
            Ok(TransitionResult::settled(FormState {
                step: FormStep::SystemExpediente,
                expediente_options: Some(options),
                expediente: Some(expediente),
                ..state.clone()
            }))
        }
        Command::StartManualExpediente => {
            let options: &[Expediente] = state
                .expediente_options
                .as_deref()
                .ok_or(CoreError::IncompleteForm("expedientes"))?;
            if !options.is_empty() {
                return Err(CoreError::ManualEntryNotAllowed);
            }
            Ok(TransitionResult::settled(FormState {
                step: FormStep::ManualExpedienteEntry,
                ..state.clone()
            }))
        }
        other => Err(invalid(state, &other)),
    }
}

fn apply_expediente_chosen(
    state: &FormState,
    command: Command,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::EnterManualExpediente {
            numero,
            fecha_emision,
            tipo_tramite,
            descripcion,
        } if state.step == FormStep::ManualExpedienteEntry => Ok(enter_manual_expediente(
            state,
            &numero,
            fecha_emision,
            tipo_tramite,
            descripcion,
        )),
        Command::ConfirmExpediente => {
            let empresa: &Empresa = require_empresa(state)?;
            if state.expediente.is_none() {
                return Err(CoreError::IncompleteForm("expediente"));
            }
            let empresa_id = empresa.id.clone();
            Ok(TransitionResult::with_effect(
                FormState {
                    step: FormStep::ComputingHierarchy,
                    ..state.clone()
                },
                Effect::LoadCandidateParents { empresa_id },
            ))
        }
        other => Err(invalid(state, &other)),
    }
}

fn enter_manual_expediente(
    state: &FormState,
    numero: &str,
    fecha_emision: Date,
    tipo_tramite: TipoTramite,
    descripcion: Option<String>,
) -> TransitionResult {
    let mut new_state: FormState = state.clone();
    new_state.clear_errors_for("numero");

    let Some(empresa) = &state.empresa else {
        return TransitionResult::settled(new_state);
    };

    match validate_number_input(numero) {
        Ok(digits) => {
            let full_number: String =
                format_number(&digits, fecha_emision.year(), NumberPrefix::Expediente);
            new_state.expediente = Some(Expediente::manual(
                &full_number,
                fecha_emision,
                tipo_tramite,
                empresa.id.clone(),
                descripcion,
            ));
        }
        Err(e) => {
            new_state.expediente = None;
            new_state.record(&e);
        }
    }

    TransitionResult::settled(new_state)
}

fn apply_computing_hierarchy(
    state: &FormState,
    command: Command,
    ctx: &FormContext,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::CandidateParentsLoaded(resolutions) => {
            let expediente: &Expediente = state
                .expediente
                .as_ref()
                .ok_or(CoreError::IncompleteForm("expediente"))?;
            let decision: HierarchyDecision = resolve(expediente, &resolutions, ctx.today);

            let mut new_state: FormState = FormState {
                step: FormStep::EditingFields,
                parent_pool: resolutions,
                decision: Some(decision),
                ..state.clone()
            };

            let fecha_emision: Date = new_state.fields.fecha_emision.unwrap_or(ctx.today);
            new_state.fields.fecha_emision = Some(fecha_emision);
            if is_applicable(expediente.tipo_tramite)
                && new_state.fields.fecha_vigencia_inicio.is_none()
            {
                new_state.fields.fecha_vigencia_inicio = Some(fecha_emision);
                recompute_fin(&mut new_state);
            }

            Ok(TransitionResult::with_effect(
                new_state,
                Effect::LoadExistingNumbers {
                    year: fecha_emision.year(),
                },
            ))
        }
        other => Err(invalid(state, &other)),
    }
}

#[allow(clippy::too_many_lines)]
fn apply_editing(
    state: &FormState,
    command: Command,
    ctx: &FormContext,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::ExistingNumbersLoaded { year, numbers } => {
            Ok(TransitionResult::settled(numbers_loaded(state, year, numbers)))
        }
        Command::ChangeNumero(raw) => {
            let mut new_state: FormState = state.clone();
            new_state.fields.numero = sanitize_while_typing(&raw);
            precheck_number(&mut new_state);
            Ok(TransitionResult::settled(new_state))
        }
        Command::ChangeFechaEmision(fecha) => {
            let mut new_state: FormState = state.clone();
            new_state.fields.fecha_emision = Some(fecha);
            new_state.clear_errors_for("fechaEmision");
            if new_state.numbers_are_current() {
                precheck_number(&mut new_state);
                return Ok(TransitionResult::settled(new_state));
            }
            new_state.existing_numbers = NumberingSnapshot::new();
            new_state.numbers_year = None;
            new_state.clear_errors_for("numero");
            Ok(TransitionResult::with_effect(
                new_state,
                Effect::LoadExistingNumbers { year: fecha.year() },
            ))
        }
        Command::SelectParent(id) => Ok(TransitionResult::settled(select_system_parent(
            state, &id, ctx,
        )?)),
        Command::EnterManualParent(raw) => {
            let decision: &HierarchyDecision = require_decision(state)?;
            let mut new_state: FormState = state.clone();
            new_state.clear_errors_for("resolucionPadreId");
            if !decision.allow_manual_fallback {
                new_state.record(&DomainError::IneligibleParent {
                    parent_id: raw.trim().to_string(),
                    reason: String::from("eligible parents exist; pick one of them"),
                });
                return Ok(TransitionResult::settled(new_state));
            }
            drop_copied_dates(&mut new_state);
            match ParentReference::manual(&raw) {
                Ok(ParentReference::Manual(number)) => {
                    new_state.fields.parent = ParentInput::Manual(number);
                }
                Ok(ParentReference::System(_)) => {}
                Err(e) => {
                    new_state.fields.parent = ParentInput::None;
                    new_state.record(&e);
                }
            }
            Ok(TransitionResult::settled(new_state))
        }
        Command::ClearParent => {
            let mut new_state: FormState = state.clone();
            new_state.fields.parent = ParentInput::None;
            new_state.clear_errors_for("resolucionPadreId");
            drop_copied_dates(&mut new_state);
            Ok(TransitionResult::settled(new_state))
        }
        Command::ChangeVigenciaInicio(inicio) => {
            require_owned_window(state, "ChangeVigenciaInicio")?;
            let mut new_state: FormState = state.clone();
            new_state.fields.fecha_vigencia_inicio = Some(inicio);
            new_state.fields.inheritance = None;
            recompute_fin(&mut new_state);
            Ok(TransitionResult::settled(new_state))
        }
        Command::ChangeAniosVigencia(anios) => {
            require_owned_window(state, "ChangeAniosVigencia")?;
            let mut new_state: FormState = state.clone();
            new_state.fields.anios_vigencia = anios;
            new_state.fields.inheritance = None;
            recompute_fin(&mut new_state);
            Ok(TransitionResult::settled(new_state))
        }
        Command::ChangeDescripcion(descripcion) => {
            let mut new_state: FormState = state.clone();
            new_state.fields.descripcion = descripcion;
            Ok(TransitionResult::settled(new_state))
        }
        Command::ChangeObservaciones(observaciones) => {
            let mut new_state: FormState = state.clone();
            new_state.fields.observaciones = observaciones;
            Ok(TransitionResult::settled(new_state))
        }
        Command::Validate => Ok(TransitionResult::settled(validate(state, ctx))),
        other => Err(invalid(state, &other)),
    }
}

fn apply_validating(
    state: &FormState,
    command: Command,
    ctx: &FormContext,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::Submit => {
            let draft = state
                .draft
                .clone()
                .ok_or(CoreError::IncompleteForm("draft"))?;
            Ok(TransitionResult::with_effect(
                FormState {
                    step: FormStep::Submitting,
                    ..state.clone()
                },
                Effect::Persist(draft),
            ))
        }
        Command::Validate => Ok(TransitionResult::settled(validate(state, ctx))),
        // Any edit invalidates the draft and reopens the fields.
        edit if edit.is_field_edit() || matches!(edit, Command::ExistingNumbersLoaded { .. }) => {
            let reopened: FormState = FormState {
                step: FormStep::EditingFields,
                draft: None,
                ..state.clone()
            };
            apply_editing(&reopened, edit, ctx)
        }
        other => Err(invalid(state, &other)),
    }
}

fn numbers_loaded(state: &FormState, year: i32, numbers: NumberingSnapshot) -> FormState {
    let mut new_state: FormState = state.clone();
    // Stale responses for a previous emission year are dropped.
    if new_state.fields.fecha_emision.map(|fecha| fecha.year()) != Some(year) {
        return new_state;
    }
    new_state.existing_numbers = numbers;
    new_state.numbers_year = Some(year);
    precheck_number(&mut new_state);
    new_state
}

/// Live duplicate check while typing. Format errors wait for validation.
fn precheck_number(state: &mut FormState) {
    state.clear_errors_for("numero");
    if !state.numbers_are_current() {
        return;
    }
    let Some(full_number) = state.full_number() else {
        return;
    };
    if let Err(e) = ensure_unique(&full_number, &state.existing_numbers) {
        state.record(&e);
    }
}

fn select_system_parent(
    state: &FormState,
    id: &ResolutionId,
    ctx: &FormContext,
) -> Result<FormState, CoreError> {
    let decision: &HierarchyDecision = require_decision(state)?;
    let expediente: &Expediente = state
        .expediente
        .as_ref()
        .ok_or(CoreError::IncompleteForm("expediente"))?;
    let parent: &Resolution = state
        .parent_pool
        .iter()
        .find(|candidate| &candidate.id == id)
        .ok_or_else(|| CoreError::UnknownResolution(id.to_string()))?;

    let mut new_state: FormState = state.clone();
    new_state.clear_errors_for("resolucionPadreId");

    if let Err(e) = select_parent(expediente, parent, ctx.today) {
        if e.is_fatal() {
            return Ok(fail(state, e.to_string()));
        }
        new_state.record(&e);
        return Ok(new_state);
    }

    drop_copied_dates(&mut new_state);
    new_state.fields.parent = ParentInput::System(id.clone());

    match inherit_dates(decision.tipo_tramite, parent) {
        Ok(Some(inherited)) => apply_inherited(&mut new_state, inherited),
        Ok(None) => {}
        Err(e) if e.is_fatal() => return Ok(fail(state, e.to_string())),
        Err(e) => new_state.record(&e),
    }

    Ok(new_state)
}

fn apply_inherited(state: &mut FormState, inherited: InheritedDates) {
    state.fields.fecha_vigencia_inicio = Some(inherited.fecha_vigencia_inicio);
    state.fields.fecha_vigencia_fin = Some(inherited.fecha_vigencia_fin);
    state.fields.anios_vigencia = inherited.anios_vigencia;
    state.fields.inheritance = Some(inherited.mode);
    state.clear_errors_for("aniosVigencia");
    state.clear_errors_for("fechaVigenciaInicio");
}

/// HIJO dates mirror the parent and go away with it.
fn drop_copied_dates(state: &mut FormState) {
    if state.fields.inheritance == Some(InheritanceMode::Copied) {
        state.fields.fecha_vigencia_inicio = None;
        state.fields.fecha_vigencia_fin = None;
    }
    state.fields.inheritance = None;
}

fn recompute_fin(state: &mut FormState) {
    state.clear_errors_for("aniosVigencia");
    state.clear_errors_for("fechaVigenciaInicio");

    if let Err(e) = validate_duration(state.fields.anios_vigencia) {
        state.fields.fecha_vigencia_fin = None;
        state.record(&e);
        return;
    }
    let Some(inicio) = state.fields.fecha_vigencia_inicio else {
        state.fields.fecha_vigencia_fin = None;
        return;
    };
    match compute_end(inicio, state.fields.anios_vigencia) {
        Ok(fin) => state.fields.fecha_vigencia_fin = Some(fin),
        Err(e) => {
            state.fields.fecha_vigencia_fin = None;
            state.record(&e);
        }
    }
}

fn validate(state: &FormState, ctx: &FormContext) -> FormState {
    match validate_submission(state, ctx) {
        Ok(draft) => FormState {
            step: FormStep::Validating,
            errors: Vec::new(),
            draft: Some(draft),
            ..state.clone()
        },
        Err(errors) => {
            if let Some(fatal) = errors.iter().find(|e| e.is_fatal()) {
                return fail(state, fatal.to_string());
            }
            FormState {
                step: FormStep::EditingFields,
                errors: errors.iter().map(FieldError::from).collect(),
                draft: None,
                ..state.clone()
            }
        }
    }
}

fn submission_succeeded(state: &FormState, resolution: Resolution) -> TransitionResult {
    let mut new_state: FormState = FormState {
        step: FormStep::Created,
        errors: Vec::new(),
        ..state.clone()
    };
    new_state.existing_numbers.insert(resolution.full_number());
    new_state.created = Some(resolution);
    TransitionResult::settled(new_state)
}

fn submission_failed(state: &FormState, message: String) -> TransitionResult {
    let mut new_state: FormState = FormState {
        step: FormStep::EditingFields,
        draft: None,
        ..state.clone()
    };
    new_state.errors.push(FieldError::new(SUBMIT_FIELD, message));
    TransitionResult::settled(new_state)
}

fn fail(state: &FormState, reason: String) -> FormState {
    FormState {
        step: FormStep::Failed,
        draft: None,
        failure: Some(reason),
        ..state.clone()
    }
}

fn require_empresa(state: &FormState) -> Result<&Empresa, CoreError> {
    state
        .empresa
        .as_ref()
        .ok_or(CoreError::IncompleteForm("empresa"))
}

fn require_decision(state: &FormState) -> Result<&HierarchyDecision, CoreError> {
    state
        .decision
        .as_ref()
        .ok_or(CoreError::IncompleteForm("hierarchy"))
}

fn require_owned_window(state: &FormState, command: &'static str) -> Result<(), CoreError> {
    let owns_window: bool = state
        .expediente
        .as_ref()
        .is_some_and(|expediente| is_applicable(expediente.tipo_tramite));
    if owns_window {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            step: state.step,
            command,
        })
    }
}

fn invalid(state: &FormState, command: &Command) -> CoreError {
    CoreError::InvalidTransition {
        step: state.step,
        command: command.name(),
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Full-form validation run when the user asks to submit.
//!
//! Every rule is checked and every failure collected, so the form can show
//! all messages at once.

use crate::draft::ResolutionDraft;
use crate::policy::FormContext;
use crate::state::{FormState, ParentInput};
use resoluciones_domain::{
    DomainError, Empresa, Expediente, HierarchyDecision, InheritanceMode, NumberPrefix,
    ParentReference, ParentEnforcement, Resolution, compute_end, ensure_unique, format_number,
    is_applicable, select_parent, validate_duration, validate_number_input,
};
use time::Date;

/// Validates the whole form and builds the draft to persist.
///
/// # Arguments
///
/// * `state` - The form after hierarchy resolution
/// * `ctx` - The reference date and issuing user
///
/// # Errors
///
/// Returns every rule the form violates:
/// - Missing empresa, expediente or emission date
/// - Malformed or duplicate number, or a number whose year was not loaded
/// - Missing parent where submission is blocked without one
/// - A system parent that no longer passes selection
/// - Missing or out-of-range vigency for PADRE resolutions
pub fn validate_submission(
    state: &FormState,
    ctx: &FormContext,
) -> Result<ResolutionDraft, Vec<DomainError>> {
    let mut errors: Vec<DomainError> = Vec::new();

    let (Some(empresa), Some(expediente), Some(decision)) =
        (&state.empresa, &state.expediente, &state.decision)
    else {
        return Err(vec![DomainError::InvalidFormat {
            field: "expedienteId",
            reason: String::from("Empresa and expediente must be selected"),
        }]);
    };

    let fecha_emision: Option<Date> = state.fields.fecha_emision;
    if fecha_emision.is_none() {
        errors.push(DomainError::InvalidFormat {
            field: "fechaEmision",
            reason: String::from("Emission date is required"),
        });
    }

    let numero: Option<String> = match validate_number_input(&state.fields.numero) {
        Ok(numero) => Some(numero),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    if let (Some(numero), Some(fecha)) = (&numero, fecha_emision) {
        if state.numbers_are_current() {
            let full_number: String =
                format_number(numero, fecha.year(), NumberPrefix::Resolucion);
            if let Err(e) = ensure_unique(&full_number, &state.existing_numbers) {
                errors.push(e);
            }
        } else {
            errors.push(DomainError::InvalidFormat {
                field: "numero",
                reason: format!("Issued numbers for {} are still loading", fecha.year()),
            });
        }
    }

    let parent: Option<ParentReference> =
        match validate_parent(state, expediente, decision, ctx.today) {
            Ok(parent) => parent,
            Err(e) => {
                errors.push(e);
                None
            }
        };

    let vigencia: Option<(Option<Date>, Option<Date>, Option<u8>)> =
        match validate_vigencia(state, expediente) {
            Ok(vigencia) => Some(vigencia),
            Err(e) => {
                errors.push(e);
                None
            }
        };

    let (Some(numero), Some(fecha_emision), Some((inicio, fin, anios)), true) =
        (numero, fecha_emision, vigencia, errors.is_empty())
    else {
        return Err(errors);
    };

    Ok(build_draft(
        empresa,
        expediente,
        decision,
        state,
        ctx,
        DraftParts {
            numero,
            fecha_emision,
            parent,
            inicio,
            fin,
            anios,
        },
    ))
}

struct DraftParts {
    numero: String,
    fecha_emision: Date,
    parent: Option<ParentReference>,
    inicio: Option<Date>,
    fin: Option<Date>,
    anios: Option<u8>,
}

fn build_draft(
    empresa: &Empresa,
    expediente: &Expediente,
    decision: &HierarchyDecision,
    state: &FormState,
    ctx: &FormContext,
    parts: DraftParts,
) -> ResolutionDraft {
    ResolutionDraft {
        numero: parts.numero,
        fecha_emision: parts.fecha_emision,
        tipo_resolucion: decision.tipo_resolucion,
        tipo_tramite: expediente.tipo_tramite,
        expediente_id: expediente.id.clone(),
        empresa_id: empresa.id.clone(),
        resolucion_padre_id: parts.parent,
        fecha_vigencia_inicio: parts.inicio,
        fecha_vigencia_fin: parts.fin,
        anios_vigencia: parts.anios,
        usuario_emision_id: ctx.usuario_emision_id.clone(),
        descripcion: state.fields.descripcion.clone(),
        observaciones: state.fields.observaciones.clone(),
    }
}

fn validate_parent(
    state: &FormState,
    expediente: &Expediente,
    decision: &HierarchyDecision,
    today: Date,
) -> Result<Option<ParentReference>, DomainError> {
    let enforcement: ParentEnforcement = decision.parent_enforcement();

    match &state.fields.parent {
        ParentInput::None if enforcement.blocks_submission() => {
            Err(DomainError::ParentRequiredButMissing {
                tipo_tramite: expediente.tipo_tramite,
            })
        }
        ParentInput::None => Ok(None),
        ParentInput::System(id) => {
            let parent: &Resolution = state
                .parent_pool
                .iter()
                .find(|candidate| &candidate.id == id)
                .ok_or_else(|| DomainError::IneligibleParent {
                    parent_id: id.to_string(),
                    reason: String::from("the resolution was not found for the empresa"),
                })?;
            select_parent(expediente, parent, today)?;
            Ok(Some(ParentReference::System(id.clone())))
        }
        ParentInput::Manual(number) => {
            if !decision.allow_manual_fallback {
                return Err(DomainError::IneligibleParent {
                    parent_id: number.clone(),
                    reason: String::from("eligible parents exist; pick one of them"),
                });
            }
            ParentReference::manual(number).map(Some)
        }
    }
}

/// Returns the dates to store: owned for PADRE, display copies for HIJO.
fn validate_vigencia(
    state: &FormState,
    expediente: &Expediente,
) -> Result<(Option<Date>, Option<Date>, Option<u8>), DomainError> {
    let fields = &state.fields;

    if !is_applicable(expediente.tipo_tramite) {
        if fields.inheritance == Some(InheritanceMode::Copied) {
            return Ok((
                fields.fecha_vigencia_inicio,
                fields.fecha_vigencia_fin,
                Some(fields.anios_vigencia),
            ));
        }
        return Ok((None, None, None));
    }

    let inicio: Date = fields
        .fecha_vigencia_inicio
        .ok_or(DomainError::VigenciaRequired {
            tipo_tramite: expediente.tipo_tramite,
        })?;
    validate_duration(fields.anios_vigencia)?;
    let fin: Date = compute_end(inicio, fields.anios_vigencia)?;

    Ok((Some(inicio), Some(fin), Some(fields.anios_vigencia)))
}

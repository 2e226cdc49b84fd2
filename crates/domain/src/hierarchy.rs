// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Parent/child resolution hierarchy.
//!
//! Given an expediente and the resolutions already issued by the authority,
//! decides which resolutions may be cited as parent and which dates a new
//! resolution inherits from that parent.
//!
//! ## Invariants
//!
//! - A candidate parent always belongs to the expediente's empresa
//! - A candidate parent is an active PADRE resolution
//! - RENOVACION may cite an expired (VENCIDA) parent
//! - INCREMENTO, SUSTITUCION and OTROS only cite parents still in force
//! - An empty candidate list unlocks the manual `R-####-####` fallback

use crate::classifier::{Classification, ParentEnforcement, classify};
use crate::error::DomainError;
use crate::types::{
    EstadoResolucion, Expediente, Resolution, ResolutionId, TipoResolucion, TipoTramite,
};
use crate::vigencia::{DEFAULT_ANIOS_VIGENCIA, compute_end, validate_duration, years_between};
use time::Date;

/// The outcome of resolving the hierarchy for a new resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyDecision {
    /// The originating procedure type.
    pub tipo_tramite: TipoTramite,
    /// PADRE or HIJO, derived from the procedure type.
    pub tipo_resolucion: TipoResolucion,
    /// The classification the decision was built from.
    pub classification: Classification,
    /// Parents the user may pick from.
    pub candidates: Vec<Resolution>,
    /// Whether a free-text `R-####-####` parent may be entered instead.
    pub allow_manual_fallback: bool,
}

impl HierarchyDecision {
    /// How strictly a parent is demanded.
    #[must_use]
    pub const fn parent_enforcement(&self) -> ParentEnforcement {
        self.classification.parent_enforcement
    }

    /// Finds a candidate by id.
    #[must_use]
    pub fn find_candidate(&self, id: &ResolutionId) -> Option<&Resolution> {
        self.candidates.iter().find(|candidate| &candidate.id == id)
    }
}

/// Dates a new resolution takes from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InheritedDates {
    /// Start of the window.
    pub fecha_vigencia_inicio: Date,
    /// End of the window.
    pub fecha_vigencia_fin: Date,
    /// Duration in years.
    pub anios_vigencia: u8,
    /// Whether the dates are binding copies or an overridable suggestion.
    pub mode: InheritanceMode,
}

/// How inherited dates are to be treated by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InheritanceMode {
    /// HIJO resolutions display the parent's window verbatim.
    Copied,
    /// RENOVACION proposes a continuation the user may override.
    Suggested,
}

/// Resolves the hierarchy for a new resolution on `expediente`.
///
/// # Arguments
///
/// * `expediente` - The expediente being resolved (system or synthetic)
/// * `candidate_parents` - Resolutions fetched for the empresa
/// * `today` - The reference date for vigency checks
#[must_use]
pub fn resolve(
    expediente: &Expediente,
    candidate_parents: &[Resolution],
    today: Date,
) -> HierarchyDecision {
    let tipo_tramite: TipoTramite = expediente.tipo_tramite;
    let classification: Classification = classify(tipo_tramite);

    let (candidates, allow_manual_fallback) = if classification.parent_enforcement.accepts_parent()
    {
        let candidates: Vec<Resolution> = candidate_parents
            .iter()
            .filter(|parent| parent.empresa_id == expediente.empresa_id)
            .filter(|parent| check_eligibility(tipo_tramite, parent, today).is_ok())
            .cloned()
            .collect();
        let allow_manual_fallback: bool = candidates.is_empty();
        (candidates, allow_manual_fallback)
    } else {
        (Vec::new(), false)
    };

    HierarchyDecision {
        tipo_tramite,
        tipo_resolucion: classification.tipo_resolucion(),
        classification,
        candidates,
        allow_manual_fallback,
    }
}

/// Validates a parent picked from the system for `expediente`.
///
/// # Errors
///
/// Returns an error if:
/// - The parent belongs to another empresa (fatal)
/// - The procedure type does not take a parent
/// - The parent fails the eligibility filter for the procedure type
pub fn select_parent(
    expediente: &Expediente,
    parent: &Resolution,
    today: Date,
) -> Result<(), DomainError> {
    if parent.empresa_id != expediente.empresa_id {
        return Err(DomainError::ParentBelongsToDifferentEmpresa {
            parent_id: parent.id.to_string(),
            expected: expediente.empresa_id.to_string(),
            actual: parent.empresa_id.to_string(),
        });
    }

    check_eligibility(expediente.tipo_tramite, parent, today).map_err(|reason| {
        DomainError::IneligibleParent {
            parent_id: parent.id.to_string(),
            reason,
        }
    })
}

/// Computes the dates a new resolution takes from `parent`.
///
/// Returns `Ok(None)` for procedure types that neither inherit nor continue
/// a window.
///
/// # Errors
///
/// Returns an error if:
/// - The parent has no vigency window
/// - The continuation window cannot be computed
pub fn inherit_dates(
    tipo_tramite: TipoTramite,
    parent: &Resolution,
) -> Result<Option<InheritedDates>, DomainError> {
    let classification: Classification = classify(tipo_tramite);
    if !classification.parent_enforcement.accepts_parent() {
        return Ok(None);
    }

    let (Some(inicio), Some(fin)) = (parent.fecha_vigencia_inicio, parent.fecha_vigencia_fin)
    else {
        return Err(DomainError::ParentWithoutVigencia {
            parent_id: parent.id.to_string(),
        });
    };

    let parent_anios: u8 = u8::try_from(years_between(inicio, fin))
        .ok()
        .filter(|anios| validate_duration(*anios).is_ok())
        .or(parent.anios_vigencia)
        .unwrap_or(DEFAULT_ANIOS_VIGENCIA);

    if classification.inherits_vigency {
        return Ok(Some(InheritedDates {
            fecha_vigencia_inicio: inicio,
            fecha_vigencia_fin: fin,
            anios_vigencia: parent_anios,
            mode: InheritanceMode::Copied,
        }));
    }

    let continuation: Date = fin
        .next_day()
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("continuing vigency after {fin}"),
        })?;

    Ok(Some(InheritedDates {
        fecha_vigencia_inicio: continuation,
        fecha_vigencia_fin: compute_end(continuation, parent_anios)?,
        anios_vigencia: parent_anios,
        mode: InheritanceMode::Suggested,
    }))
}

fn check_eligibility(
    tipo_tramite: TipoTramite,
    parent: &Resolution,
    today: Date,
) -> Result<(), String> {
    if !classify(tipo_tramite).parent_enforcement.accepts_parent() {
        return Err(format!("tramite {tipo_tramite} does not take a parent"));
    }
    if parent.tipo_resolucion != TipoResolucion::Padre {
        return Err(String::from("only PADRE resolutions can be cited as parent"));
    }
    if !parent.esta_activo {
        return Err(String::from("the resolution is inactive"));
    }

    match tipo_tramite {
        TipoTramite::Renovacion => {
            if matches!(
                parent.estado,
                EstadoResolucion::Vigente | EstadoResolucion::Vencida
            ) {
                Ok(())
            } else {
                Err(format!("a {} resolution cannot be renewed", parent.estado))
            }
        }
        TipoTramite::Incremento | TipoTramite::Sustitucion | TipoTramite::Otros => {
            if parent.estado != EstadoResolucion::Vigente {
                return Err(format!("the resolution is {}", parent.estado));
            }
            match parent.fecha_vigencia_fin {
                Some(fin) if fin > today => Ok(()),
                Some(fin) => Err(format!("the authorization expired on {fin}")),
                None => Err(String::from("the resolution has no vigency window")),
            }
        }
        TipoTramite::AutorizacionNueva => Err(format!("tramite {tipo_tramite} does not take a parent")),
    }
}

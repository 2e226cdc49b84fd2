// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operations on expedientes and resolutions that already exist.

use crate::error::{ApiError, translate_collaborator_error, translate_domain_error};
use crate::ports::{ExpedienteLookup, ExpedientePatch, ResolutionPatch, ResolutionRepository};
use resoluciones_domain::{
    EmpresaId, EstadoExpediente, EstadoResolucion, Expediente, ExpedienteId, Resolution,
    ResolutionId, TipoTramite, status_on,
};
use time::Date;
use tracing::{debug, info};

/// Marks the empresa's in-force resolutions whose window ended before `today` as VENCIDA.
///
/// Returns the updated resolutions.
///
/// # Errors
///
/// Returns an error if the repository cannot list or update resolutions.
#[allow(clippy::future_not_send)]
pub async fn expire_overdue<R: ResolutionRepository>(
    repository: &R,
    empresa_id: &EmpresaId,
    today: Date,
) -> Result<Vec<Resolution>, ApiError> {
    let resolutions: Vec<Resolution> = repository
        .list_by_empresa(empresa_id)
        .await
        .map_err(translate_collaborator_error)?;

    let overdue: Vec<&Resolution> = resolutions
        .iter()
        .filter(|resolution| resolution.esta_activo)
        .filter(|resolution| resolution.estado == EstadoResolucion::Vigente)
        .filter(|resolution| {
            resolution
                .fecha_vigencia_fin
                .is_some_and(|fin| status_on(fin, today) == EstadoResolucion::Vencida)
        })
        .collect();

    let mut expired: Vec<Resolution> = Vec::with_capacity(overdue.len());
    for resolution in overdue {
        debug!(resolucion = %resolution.full_number(), "Expiring resolution");
        let updated: Resolution = repository
            .update(
                &resolution.id,
                ResolutionPatch::estado(EstadoResolucion::Vencida),
            )
            .await
            .map_err(translate_collaborator_error)?;
        expired.push(updated);
    }

    info!(
        empresa = %empresa_id,
        %today,
        expired = expired.len(),
        "Expiry sweep completed"
    );
    Ok(expired)
}

/// Deactivates a resolution. Resolutions are never deleted.
///
/// Deactivating an inactive resolution returns it unchanged.
///
/// # Errors
///
/// Returns an error if the resolution does not exist or cannot be updated.
#[allow(clippy::future_not_send)]
pub async fn deactivate_resolution<R: ResolutionRepository>(
    repository: &R,
    id: &ResolutionId,
) -> Result<Resolution, ApiError> {
    let existing: Resolution = repository
        .get_by_id(id)
        .await
        .map_err(translate_collaborator_error)?;
    if !existing.esta_activo {
        return Ok(existing);
    }

    let updated: Resolution = repository
        .update(id, ResolutionPatch::deactivate())
        .await
        .map_err(translate_collaborator_error)?;
    info!(resolucion = %updated.full_number(), %id, "Deactivated resolution");
    Ok(updated)
}

/// Moves an expediente to a new processing state.
///
/// # Errors
///
/// Returns an error if:
/// - The expediente does not exist or is inactive
/// - The transition is not allowed from the current state
/// - The store rejects the update
#[allow(clippy::future_not_send)]
pub async fn transition_expediente<X: ExpedienteLookup>(
    expedientes: &X,
    id: &ExpedienteId,
    estado: EstadoExpediente,
) -> Result<Expediente, ApiError> {
    let existing: Expediente = expedientes
        .get_by_id(id)
        .await
        .map_err(translate_collaborator_error)?;
    let patch: ExpedientePatch = ExpedientePatch::estado(estado);
    patch
        .apply_to(&existing, false)
        .map_err(translate_domain_error)?;

    let updated: Expediente = expedientes
        .update(id, patch)
        .await
        .map_err(translate_collaborator_error)?;
    info!(
        expediente = %updated.full_number(),
        from = %existing.estado,
        to = %updated.estado,
        "Moved expediente"
    );
    Ok(updated)
}

/// Changes the procedure type of an expediente.
///
/// The type is locked once any stored resolution cites the expediente.
///
/// # Errors
///
/// Returns an error if:
/// - The expediente does not exist
/// - A resolution already cites the expediente
/// - A collaborator fails
#[allow(clippy::future_not_send)]
pub async fn change_expediente_tramite<X: ExpedienteLookup, R: ResolutionRepository>(
    expedientes: &X,
    resoluciones: &R,
    id: &ExpedienteId,
    tipo_tramite: TipoTramite,
) -> Result<Expediente, ApiError> {
    let existing: Expediente = expedientes
        .get_by_id(id)
        .await
        .map_err(translate_collaborator_error)?;
    let referenced: bool = resoluciones
        .list_by_empresa(&existing.empresa_id)
        .await
        .map_err(translate_collaborator_error)?
        .iter()
        .any(|resolution| &resolution.expediente_id == id);
    debug!(expediente = %id, referenced, "Checked resolutions citing expediente");

    let patch: ExpedientePatch = ExpedientePatch::tipo_tramite(tipo_tramite);
    patch
        .apply_to(&existing, referenced)
        .map_err(translate_domain_error)?;

    let updated: Expediente = expedientes
        .update(id, patch)
        .await
        .map_err(translate_collaborator_error)?;
    info!(expediente = %updated.full_number(), tramite = %tipo_tramite, "Changed procedure type");
    Ok(updated)
}

/// Deactivates an expediente. Expedientes are never deleted.
///
/// Deactivating an inactive expediente returns it unchanged.
///
/// # Errors
///
/// Returns an error if the expediente does not exist or cannot be updated.
#[allow(clippy::future_not_send)]
pub async fn deactivate_expediente<X: ExpedienteLookup>(
    expedientes: &X,
    id: &ExpedienteId,
) -> Result<Expediente, ApiError> {
    let existing: Expediente = expedientes
        .get_by_id(id)
        .await
        .map_err(translate_collaborator_error)?;
    if !existing.esta_activo {
        return Ok(existing);
    }

    let updated: Expediente = expedientes
        .update(id, ExpedientePatch::deactivate())
        .await
        .map_err(translate_collaborator_error)?;
    info!(expediente = %updated.full_number(), %id, "Deactivated expediente");
    Ok(updated)
}

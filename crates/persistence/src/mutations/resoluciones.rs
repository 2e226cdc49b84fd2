// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use resoluciones::ResolutionDraft;
use resoluciones_api::ResolutionPatch;
use resoluciones_domain::{Expediente, Resolution, ResolutionId, validate_number_input};
use tracing::{debug, info};
use uuid::Uuid;

use crate::data_models::Tables;
use crate::error::PersistenceError;
use crate::queries::expedientes::get_expediente;

/// Stores a validated draft, assigning a fresh identifier.
///
/// The unique number index is checked here, under the store lock, so two
/// forms racing for the same number cannot both succeed.
///
/// # Errors
///
/// Returns an error if the draft breaks a key, reference, unique number or
/// reuses an expediente that already originated a resolution.
pub fn create_resolution(
    tables: &mut Tables,
    draft: &ResolutionDraft,
) -> Result<Resolution, PersistenceError> {
    let resolution: Resolution = draft
        .clone()
        .into_resolution(ResolutionId::new(Uuid::new_v4().to_string()));

    insert_resolution(tables, resolution.clone())?;
    info!(
        resolucion = %resolution.full_number(),
        id = %resolution.id,
        empresa = %resolution.empresa_id,
        "Stored new resolution"
    );
    Ok(resolution)
}

/// Inserts a resolution as given.
///
/// # Errors
///
/// Returns an error if:
/// - The number is not a 4-digit sequence
/// - The identifier is taken
/// - The empresa or a non-manual expediente does not exist, or belongs elsewhere
/// - A system parent does not exist or belongs to another empresa
/// - The full number is already stored
/// - A stored expediente already originated another resolution
pub fn insert_resolution(
    tables: &mut Tables,
    resolution: Resolution,
) -> Result<(), PersistenceError> {
    check_row(tables, &resolution)?;
    check_parent(tables, &resolution)?;
    store(tables, resolution);
    Ok(())
}

/// Inserts a batch of resolutions whose parents may appear later in the batch.
///
/// Parent references are checked once every row is in place; on failure the
/// batch is rolled back.
///
/// # Errors
///
/// Returns the first key, reference or unique number violation.
pub fn insert_resolutions(
    tables: &mut Tables,
    resolutions: Vec<Resolution>,
) -> Result<(), PersistenceError> {
    let mut inserted: Vec<ResolutionId> = Vec::with_capacity(resolutions.len());
    let mut outcome: Result<(), PersistenceError> = Ok(());

    for resolution in resolutions {
        if let Err(e) = check_row(tables, &resolution) {
            outcome = Err(e);
            break;
        }
        inserted.push(resolution.id.clone());
        store(tables, resolution);
    }

    if outcome.is_ok() {
        outcome = inserted.iter().try_for_each(|id| {
            tables
                .resoluciones
                .get(id)
                .map_or(Ok(()), |resolution| check_parent(tables, resolution))
        });
    }

    if outcome.is_err() {
        for id in &inserted {
            if let Some(resolution) = tables.resoluciones.remove(id) {
                tables.resolution_numbers.remove(&resolution.full_number());
                tables.resolved_expedientes.remove(&resolution.expediente_id);
            }
        }
    }
    outcome
}

/// Applies a partial update to a stored resolution.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the resolution does not exist.
pub fn update_resolution(
    tables: &mut Tables,
    id: &ResolutionId,
    patch: &ResolutionPatch,
) -> Result<Resolution, PersistenceError> {
    let stored: &mut Resolution =
        tables
            .resoluciones
            .get_mut(id)
            .ok_or_else(|| PersistenceError::NotFound {
                resource: "Resolution",
                id: id.to_string(),
            })?;

    *stored = patch.apply_to(stored);
    debug!(
        resolucion = %stored.full_number(),
        estado = %stored.estado,
        esta_activo = stored.esta_activo,
        "Updated resolution"
    );
    Ok(stored.clone())
}

fn check_row(tables: &Tables, resolution: &Resolution) -> Result<(), PersistenceError> {
    let canonical: String = validate_number_input(&resolution.numero)
        .map_err(|e| PersistenceError::InvalidRecord(e.to_string()))?;
    if canonical != resolution.numero {
        return Err(PersistenceError::InvalidRecord(format!(
            "Number {} is not zero-padded",
            resolution.numero
        )));
    }

    if tables.resoluciones.contains_key(&resolution.id) {
        return Err(PersistenceError::DuplicateKey {
            resource: "Resolution",
            id: resolution.id.to_string(),
        });
    }
    if !tables.empresas.contains_key(&resolution.empresa_id) {
        return Err(PersistenceError::ForeignKeyViolation {
            resource: "Resolution",
            reference: format!("empresa {}", resolution.empresa_id),
        });
    }

    // Manual expedientes are synthetic and never stored.
    if !resolution.expediente_id.is_manual() {
        let expediente: Expediente = get_expediente(tables, &resolution.expediente_id).map_err(
            |_| PersistenceError::ForeignKeyViolation {
                resource: "Resolution",
                reference: format!("expediente {}", resolution.expediente_id),
            },
        )?;
        if expediente.empresa_id != resolution.empresa_id {
            return Err(PersistenceError::ForeignKeyViolation {
                resource: "Resolution",
                reference: format!("expediente {}", expediente.id),
            });
        }
    }

    let full_number: String = resolution.full_number();
    if tables.resolution_numbers.contains_key(&full_number) {
        return Err(PersistenceError::DuplicateNumber(full_number));
    }
    if let Some(existing) = tables.resolved_expedientes.get(&resolution.expediente_id) {
        return Err(PersistenceError::ExpedienteAlreadyResolved {
            expediente: resolution.expediente_id.to_string(),
            resolution: existing.to_string(),
        });
    }
    Ok(())
}

fn check_parent(tables: &Tables, resolution: &Resolution) -> Result<(), PersistenceError> {
    let Some(parent_id) = resolution
        .resolucion_padre_id
        .as_ref()
        .and_then(|parent| parent.system_id())
    else {
        return Ok(());
    };

    match tables.resoluciones.get(parent_id) {
        Some(parent) if parent.empresa_id == resolution.empresa_id => Ok(()),
        _ => Err(PersistenceError::ForeignKeyViolation {
            resource: "Resolution",
            reference: format!("parent resolution {parent_id}"),
        }),
    }
}

fn store(tables: &mut Tables, resolution: Resolution) {
    debug!(
        resolucion = %resolution.full_number(),
        id = %resolution.id,
        "Inserted resolution"
    );
    tables
        .resolution_numbers
        .insert(resolution.full_number(), resolution.id.clone());
    if !resolution.expediente_id.is_manual() {
        tables
            .resolved_expedientes
            .insert(resolution.expediente_id.clone(), resolution.id.clone());
    }
    tables
        .resoluciones
        .insert(resolution.id.clone(), resolution);
}

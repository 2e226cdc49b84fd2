// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use resoluciones_api::{ExpedientePatch, NewExpediente};
use resoluciones_domain::{Expediente, ExpedienteId, validate_number_input};
use tracing::{debug, info};
use uuid::Uuid;

use crate::data_models::Tables;
use crate::error::PersistenceError;

/// Creates an expediente from form data, assigning a fresh identifier.
///
/// # Errors
///
/// Returns an error if:
/// - The number is not a valid sequence
/// - The empresa does not exist
/// - The full number is already stored
pub fn create_expediente(
    tables: &mut Tables,
    data: NewExpediente,
) -> Result<Expediente, PersistenceError> {
    let numero: String = validate_number_input(&data.numero)
        .map_err(|e| PersistenceError::InvalidRecord(e.to_string()))?;

    let mut expediente: Expediente = Expediente::new(
        ExpedienteId::new(Uuid::new_v4().to_string()),
        numero,
        data.fecha_emision,
        data.tipo_tramite,
        data.empresa_id,
    );
    expediente.descripcion = data.descripcion;

    insert_expediente(tables, expediente.clone())?;
    info!(
        expediente = %expediente.full_number(),
        id = %expediente.id,
        "Stored new expediente"
    );
    Ok(expediente)
}

/// Inserts an expediente as given.
///
/// # Errors
///
/// Returns an error if:
/// - The expediente is a synthetic manual entry
/// - The identifier is taken
/// - The empresa does not exist
/// - The full number is already stored
pub fn insert_expediente(
    tables: &mut Tables,
    expediente: Expediente,
) -> Result<(), PersistenceError> {
    if expediente.is_manual() {
        return Err(PersistenceError::InvalidRecord(format!(
            "Manual expediente {} is never stored",
            expediente.full_number()
        )));
    }
    if tables.expedientes.contains_key(&expediente.id) {
        return Err(PersistenceError::DuplicateKey {
            resource: "Expediente",
            id: expediente.id.to_string(),
        });
    }
    if !tables.empresas.contains_key(&expediente.empresa_id) {
        return Err(PersistenceError::ForeignKeyViolation {
            resource: "Expediente",
            reference: format!("empresa {}", expediente.empresa_id),
        });
    }

    let full_number: String = expediente.full_number();
    if tables.expediente_numbers.contains_key(&full_number) {
        return Err(PersistenceError::DuplicateNumber(full_number));
    }

    debug!(expediente = %full_number, id = %expediente.id, "Inserted expediente");
    tables
        .expediente_numbers
        .insert(full_number, expediente.id.clone());
    tables.expedientes.insert(expediente.id.clone(), expediente);
    Ok(())
}

/// Applies a partial update to a stored expediente.
///
/// Whether a resolution cites the expediente is read from the stored
/// resolutions, so the procedure type lock holds for every caller.
///
/// # Errors
///
/// Returns an error if:
/// - The expediente does not exist
/// - The patch breaks a lifecycle rule (state graph, inactive expediente,
///   procedure type lock)
pub fn update_expediente(
    tables: &mut Tables,
    id: &ExpedienteId,
    patch: &ExpedientePatch,
) -> Result<Expediente, PersistenceError> {
    let referenced: bool = tables
        .resoluciones
        .values()
        .any(|resolution| &resolution.expediente_id == id);
    let stored: &mut Expediente =
        tables
            .expedientes
            .get_mut(id)
            .ok_or_else(|| PersistenceError::NotFound {
                resource: "Expediente",
                id: id.to_string(),
            })?;

    *stored = patch.apply_to(stored, referenced)?;
    debug!(
        expediente = %stored.full_number(),
        estado = %stored.estado,
        tramite = %stored.tipo_tramite,
        esta_activo = stored.esta_activo,
        referenced,
        "Updated expediente"
    );
    Ok(stored.clone())
}

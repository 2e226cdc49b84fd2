// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use resoluciones_domain::{EmpresaId, Expediente, ExpedienteId};
use tracing::debug;

use crate::data_models::Tables;
use crate::error::PersistenceError;

/// Retrieves an expediente by identifier.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no expediente has this identifier.
pub fn get_expediente(tables: &Tables, id: &ExpedienteId) -> Result<Expediente, PersistenceError> {
    tables
        .expedientes
        .get(id)
        .cloned()
        .ok_or_else(|| PersistenceError::NotFound {
            resource: "Expediente",
            id: id.to_string(),
        })
}

/// Lists the expedientes of an empresa, oldest first.
///
/// Inactive expedientes are included; callers decide what to offer.
#[must_use]
pub fn list_expedientes_by_empresa(tables: &Tables, empresa_id: &EmpresaId) -> Vec<Expediente> {
    let mut expedientes: Vec<Expediente> = tables
        .expedientes
        .values()
        .filter(|expediente| &expediente.empresa_id == empresa_id)
        .cloned()
        .collect();
    expedientes.sort_by(|a, b| {
        (a.fecha_emision, &a.numero).cmp(&(b.fecha_emision, &b.numero))
    });

    debug!(
        empresa = %empresa_id,
        count = expedientes.len(),
        "Listed expedientes"
    );
    expedientes
}

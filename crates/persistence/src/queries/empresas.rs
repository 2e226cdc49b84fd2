// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use resoluciones_domain::{Empresa, EmpresaId};
use tracing::debug;

use crate::data_models::Tables;
use crate::error::PersistenceError;

/// Retrieves an empresa by identifier.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no empresa has this identifier.
pub fn get_empresa(tables: &Tables, id: &EmpresaId) -> Result<Empresa, PersistenceError> {
    debug!(empresa = %id, "Looking up empresa");
    tables
        .empresas
        .get(id)
        .cloned()
        .ok_or_else(|| PersistenceError::NotFound {
            resource: "Empresa",
            id: id.to_string(),
        })
}

/// Lists every empresa ordered by company name.
#[must_use]
pub fn list_empresas(tables: &Tables) -> Vec<Empresa> {
    let mut empresas: Vec<Empresa> = tables.empresas.values().cloned().collect();
    empresas.sort_by(|a, b| a.razon_social.cmp(&b.razon_social));
    empresas
}

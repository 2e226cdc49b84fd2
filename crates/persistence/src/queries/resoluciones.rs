// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use resoluciones_domain::{EmpresaId, NumberingSnapshot, Resolution, ResolutionId};
use tracing::debug;

use crate::data_models::Tables;
use crate::error::PersistenceError;

/// Retrieves a resolution by identifier.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no resolution has this identifier.
pub fn get_resolution(tables: &Tables, id: &ResolutionId) -> Result<Resolution, PersistenceError> {
    tables
        .resoluciones
        .get(id)
        .cloned()
        .ok_or_else(|| PersistenceError::NotFound {
            resource: "Resolution",
            id: id.to_string(),
        })
}

/// Lists the resolutions of an empresa, oldest first.
#[must_use]
pub fn list_resolutions_by_empresa(tables: &Tables, empresa_id: &EmpresaId) -> Vec<Resolution> {
    let mut resolutions: Vec<Resolution> = tables
        .resoluciones
        .values()
        .filter(|resolution| &resolution.empresa_id == empresa_id)
        .cloned()
        .collect();
    resolutions.sort_by(|a, b| {
        (a.fecha_emision, &a.numero).cmp(&(b.fecha_emision, &b.numero))
    });

    debug!(
        empresa = %empresa_id,
        count = resolutions.len(),
        "Listed resolutions"
    );
    resolutions
}

/// Returns every resolution full number issued in `year`, across all empresas.
#[must_use]
pub fn issued_numbers(tables: &Tables, year: i32) -> NumberingSnapshot {
    let suffix: String = format!("-{year}");
    let snapshot: NumberingSnapshot = tables
        .resolution_numbers
        .keys()
        .filter(|number| number.ends_with(&suffix))
        .cloned()
        .collect();

    debug!(year, count = snapshot.len(), "Loaded issued resolution numbers");
    snapshot
}

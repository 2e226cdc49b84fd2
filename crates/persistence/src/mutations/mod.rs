// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Writes to the store tables.
//!
//! Every mutation checks keys, references and unique numbers before touching
//! a table, so a failed write leaves the tables unchanged.

pub mod expedientes;
pub mod resoluciones;

use resoluciones_domain::Empresa;
use tracing::debug;

use crate::data_models::Tables;
use crate::error::PersistenceError;

/// Inserts an empresa.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateKey` if the identifier is taken.
pub fn insert_empresa(tables: &mut Tables, empresa: Empresa) -> Result<(), PersistenceError> {
    if tables.empresas.contains_key(&empresa.id) {
        return Err(PersistenceError::DuplicateKey {
            resource: "Empresa",
            id: empresa.id.to_string(),
        });
    }

    debug!(empresa = %empresa.id, ruc = %empresa.ruc, "Inserted empresa");
    tables.empresas.insert(empresa.id.clone(), empresa);
    Ok(())
}

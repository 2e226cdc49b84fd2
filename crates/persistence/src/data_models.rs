// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Stored rows and the serialized form of a whole store.

use resoluciones_domain::{
    Empresa, EmpresaId, Expediente, ExpedienteId, Resolution, ResolutionId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The tables of one store, with their unique indexes.
///
/// The number indexes map a full number (`E-0001-2025`, `R-0007-2025`) to the
/// row that holds it. `resolved_expedientes` maps a stored expediente to the
/// one resolution it originated. The mutations keep every index in step with
/// the row tables.
#[derive(Debug, Default)]
pub struct Tables {
    pub empresas: BTreeMap<EmpresaId, Empresa>,
    pub expedientes: BTreeMap<ExpedienteId, Expediente>,
    pub resoluciones: BTreeMap<ResolutionId, Resolution>,
    pub expediente_numbers: BTreeMap<String, ExpedienteId>,
    pub resolution_numbers: BTreeMap<String, ResolutionId>,
    pub resolved_expedientes: BTreeMap<ExpedienteId, ResolutionId>,
}

/// Every record of a store, in insertion-independent order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    /// Empresas.
    #[serde(default)]
    pub empresas: Vec<Empresa>,
    /// Expedientes.
    #[serde(default)]
    pub expedientes: Vec<Expediente>,
    /// Resolutions.
    #[serde(default)]
    pub resoluciones: Vec<Resolution>,
}

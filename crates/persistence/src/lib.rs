// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory store for empresas, expedientes and resoluciones.
//!
//! `Persistence` implements every collaborator port of `resoluciones-api`
//! and owns the authoritative unique index on full numbers: the creation
//! form only pre-checks uniqueness against a snapshot, and a number taken
//! between the snapshot and the write is rejected here as a conflict.
//!
//! A store can be exported to and restored from JSON, which is how the
//! command line keeps data between runs.
//!
//! ## Testing
//!
//! Each `new_in_memory()` call receives a unique store name, so tests running
//! in parallel never share rows and their log lines can be told apart.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use resoluciones_domain::{Empresa, Expediente, ExpedienteId, Resolution};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::info;

/// Atomic counter for generating unique in-memory store names.
static STORE_COUNTER: AtomicU64 = AtomicU64::new(0);

mod data_models;
mod error;
mod mutations;
mod ports;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::StoreSnapshot;
pub use error::PersistenceError;

use data_models::Tables;

/// Store shared by every session of a process.
///
/// All access goes through one lock; each operation holds it for a single
/// read or write and never across a collaborator call.
#[derive(Debug)]
pub struct Persistence {
    name: String,
    pub(crate) tables: Mutex<Tables>,
}

impl Default for Persistence {
    fn default() -> Self {
        Self::new_in_memory()
    }
}

impl Persistence {
    /// Creates an empty store.
    #[must_use]
    pub fn new_in_memory() -> Self {
        Self::with_tables(Tables::default())
    }

    /// Creates a store holding the records of `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns an error if any record breaks a key, reference or unique number.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self, PersistenceError> {
        let mut tables: Tables = Tables::default();
        for empresa in snapshot.empresas {
            mutations::insert_empresa(&mut tables, empresa)?;
        }
        for expediente in snapshot.expedientes {
            mutations::expedientes::insert_expediente(&mut tables, expediente)?;
        }
        mutations::resoluciones::insert_resolutions(&mut tables, snapshot.resoluciones)?;

        let (empresas, expedientes, resoluciones) = (
            tables.empresas.len(),
            tables.expedientes.len(),
            tables.resoluciones.len(),
        );
        let store: Self = Self::with_tables(tables);
        info!(
            store = %store.name,
            empresas,
            expedientes,
            resoluciones,
            "Restored store"
        );
        Ok(store)
    }

    /// Creates a store from the JSON form of a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a record is rejected.
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let snapshot: StoreSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    fn with_tables(tables: Tables) -> Self {
        let store_id: u64 = STORE_COUNTER.fetch_add(1, Ordering::SeqCst);
        Self {
            name: format!("memstore_{store_id}"),
            tables: Mutex::new(tables),
        }
    }

    /// The name this store logs under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Copies every record out of the store.
    pub async fn snapshot(&self) -> StoreSnapshot {
        let tables = self.tables.lock().await;
        StoreSnapshot {
            empresas: tables.empresas.values().cloned().collect(),
            expedientes: tables.expedientes.values().cloned().collect(),
            resoluciones: tables.resoluciones.values().cloned().collect(),
        }
    }

    /// Serializes every record as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub async fn to_json(&self) -> Result<String, PersistenceError> {
        let snapshot: StoreSnapshot = self.snapshot().await;
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Inserts an empresa.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is taken.
    pub async fn insert_empresa(&self, empresa: Empresa) -> Result<(), PersistenceError> {
        let mut tables = self.tables.lock().await;
        mutations::insert_empresa(&mut tables, empresa)
    }

    /// Inserts an expediente as given.
    ///
    /// # Errors
    ///
    /// Returns an error if the record breaks a key, reference or unique number.
    pub async fn insert_expediente(&self, expediente: Expediente) -> Result<(), PersistenceError> {
        let mut tables = self.tables.lock().await;
        mutations::expedientes::insert_expediente(&mut tables, expediente)
    }

    /// Inserts a resolution as given.
    ///
    /// # Errors
    ///
    /// Returns an error if the record breaks a key, reference or unique number.
    pub async fn insert_resolution(&self, resolution: Resolution) -> Result<(), PersistenceError> {
        let mut tables = self.tables.lock().await;
        mutations::resoluciones::insert_resolution(&mut tables, resolution)
    }

    /// Retrieves an expediente by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the expediente does not exist.
    pub async fn expediente(&self, id: &ExpedienteId) -> Result<Expediente, PersistenceError> {
        let tables = self.tables.lock().await;
        queries::expedientes::get_expediente(&tables, id)
    }
}

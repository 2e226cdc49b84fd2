// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collaborators the creation flow depends on.
//!
//! Implementations live outside this crate; the in-memory store in the
//! persistence crate implements every trait here.

use resoluciones::ResolutionDraft;
use resoluciones_domain::{
    DomainError, Empresa, EmpresaId, EstadoExpediente, EstadoResolucion, Expediente,
    ExpedienteId, NumberingSnapshot, Resolution, ResolutionId, TipoTramite,
};
use serde::{Deserialize, Serialize};
use time::Date;

time::serde::format_description!(fecha_iso, Date, "[year]-[month]-[day]");

/// Failure reported by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// The requested record does not exist.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// The kind of record.
        resource: &'static str,
        /// The identifier that was looked up.
        id: String,
    },
    /// A uniqueness or integrity constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),
    /// The collaborator rejected the payload.
    #[error("Rejected: {0}")]
    Rejected(String),
    /// The collaborator could not be reached.
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

/// Data for an expediente created during the flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpediente {
    /// The number as typed; normalized by the store.
    pub numero: String,
    /// Issuance date.
    #[serde(with = "fecha_iso")]
    pub fecha_emision: Date,
    /// Procedure type.
    pub tipo_tramite: TipoTramite,
    /// The owning empresa.
    pub empresa_id: EmpresaId,
    /// Free-text description.
    #[serde(default)]
    pub descripcion: Option<String>,
}

/// Partial update of a persisted expediente.
///
/// Expedientes are never reactivated; a patch can only switch one off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpedientePatch {
    /// New processing state.
    #[serde(default)]
    pub estado: Option<EstadoExpediente>,
    /// New procedure type.
    #[serde(default)]
    pub tipo_tramite: Option<TipoTramite>,
    /// Replacement description.
    #[serde(default)]
    pub descripcion: Option<String>,
    /// Switches the expediente off.
    #[serde(default)]
    pub deactivate: bool,
}

impl ExpedientePatch {
    /// A patch that only moves the processing state.
    #[must_use]
    pub const fn estado(estado: EstadoExpediente) -> Self {
        Self {
            estado: Some(estado),
            tipo_tramite: None,
            descripcion: None,
            deactivate: false,
        }
    }

    /// A patch that only changes the procedure type.
    #[must_use]
    pub const fn tipo_tramite(tipo_tramite: TipoTramite) -> Self {
        Self {
            estado: None,
            tipo_tramite: Some(tipo_tramite),
            descripcion: None,
            deactivate: false,
        }
    }

    /// A patch that deactivates the expediente.
    #[must_use]
    pub const fn deactivate() -> Self {
        Self {
            estado: None,
            tipo_tramite: None,
            descripcion: None,
            deactivate: true,
        }
    }

    /// Returns `expediente` with the patch applied.
    ///
    /// `referenced_by_resolution` must come from the resolutions actually
    /// stored; it locks the procedure type.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The procedure type changes while a resolution cites the expediente
    /// - The state change is not allowed, or the expediente is inactive
    pub fn apply_to(
        &self,
        expediente: &Expediente,
        referenced_by_resolution: bool,
    ) -> Result<Expediente, DomainError> {
        let mut updated: Expediente = expediente.clone();
        if let Some(tipo_tramite) = self.tipo_tramite {
            updated = updated.change_tramite(tipo_tramite, referenced_by_resolution)?;
        }
        if let Some(estado) = self.estado {
            updated = updated.transition_to(estado)?;
        }
        if let Some(descripcion) = &self.descripcion {
            updated.descripcion = Some(descripcion.clone());
        }
        if self.deactivate {
            updated = updated.deactivate();
        }
        Ok(updated)
    }
}

/// Partial update of a persisted resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionPatch {
    /// New legal status.
    #[serde(default)]
    pub estado: Option<EstadoResolucion>,
    /// New activity flag.
    #[serde(default)]
    pub esta_activo: Option<bool>,
    /// Replacement observations.
    #[serde(default)]
    pub observaciones: Option<String>,
}

impl ResolutionPatch {
    /// A patch that only changes the legal status.
    #[must_use]
    pub const fn estado(estado: EstadoResolucion) -> Self {
        Self {
            estado: Some(estado),
            esta_activo: None,
            observaciones: None,
        }
    }

    /// A patch that deactivates the resolution.
    #[must_use]
    pub const fn deactivate() -> Self {
        Self {
            estado: None,
            esta_activo: Some(false),
            observaciones: None,
        }
    }

    /// Returns `resolution` with the patch applied.
    #[must_use]
    pub fn apply_to(&self, resolution: &Resolution) -> Resolution {
        let mut updated: Resolution = resolution.clone();
        if let Some(estado) = self.estado {
            updated.estado = estado;
        }
        if let Some(esta_activo) = self.esta_activo {
            updated.esta_activo = esta_activo;
        }
        if let Some(observaciones) = &self.observaciones {
            updated.observaciones = Some(observaciones.clone());
        }
        updated
    }
}

/// Read access to empresas.
#[allow(async_fn_in_trait)]
pub trait EmpresaLookup {
    /// Fetches one empresa.
    async fn get_by_id(&self, id: &EmpresaId) -> Result<Empresa, CollaboratorError>;

    /// Lists every empresa.
    async fn list(&self) -> Result<Vec<Empresa>, CollaboratorError>;
}

/// Access to expedientes.
#[allow(async_fn_in_trait)]
pub trait ExpedienteLookup {
    /// Lists the expedientes of an empresa.
    async fn list_by_empresa(
        &self,
        empresa_id: &EmpresaId,
    ) -> Result<Vec<Expediente>, CollaboratorError>;

    /// Fetches one expediente.
    async fn get_by_id(&self, id: &ExpedienteId) -> Result<Expediente, CollaboratorError>;

    /// Creates an expediente.
    async fn create(&self, data: NewExpediente) -> Result<Expediente, CollaboratorError>;

    /// Applies a partial update.
    ///
    /// The store re-checks the patch against the resolutions it holds.
    async fn update(
        &self,
        id: &ExpedienteId,
        patch: ExpedientePatch,
    ) -> Result<Expediente, CollaboratorError>;
}

/// Access to resolutions.
///
/// The repository owns the authoritative unique index on full numbers.
#[allow(async_fn_in_trait)]
pub trait ResolutionRepository {
    /// Lists the resolutions of an empresa.
    async fn list_by_empresa(
        &self,
        empresa_id: &EmpresaId,
    ) -> Result<Vec<Resolution>, CollaboratorError>;

    /// Fetches one resolution.
    async fn get_by_id(&self, id: &ResolutionId) -> Result<Resolution, CollaboratorError>;

    /// Persists a validated draft and returns the stored resolution.
    async fn create(&self, draft: &ResolutionDraft) -> Result<Resolution, CollaboratorError>;

    /// Applies a partial update.
    async fn update(
        &self,
        id: &ResolutionId,
        patch: ResolutionPatch,
    ) -> Result<Resolution, CollaboratorError>;

    /// Every resolution full number issued in `year`, across all empresas.
    async fn list_full_numbers(&self, year: i32) -> Result<NumberingSnapshot, CollaboratorError>;
}

/// The user driving the session.
pub trait CurrentUser {
    /// The user's identifier.
    fn id(&self) -> String;
}

/// A fixed user, for tools and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticUser(pub String);

impl CurrentUser for StaticUser {
    fn id(&self) -> String {
        self.0.clone()
    }
}

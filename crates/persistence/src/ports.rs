// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collaborator port implementations.

use resoluciones::ResolutionDraft;
use resoluciones_api::{
    CollaboratorError, EmpresaLookup, ExpedienteLookup, ExpedientePatch, NewExpediente,
    ResolutionPatch, ResolutionRepository,
};
use resoluciones_domain::{
    Empresa, EmpresaId, Expediente, ExpedienteId, NumberingSnapshot, Resolution, ResolutionId,
};
use tracing::warn;

use crate::error::PersistenceError;
use crate::{Persistence, mutations, queries};

impl EmpresaLookup for Persistence {
    async fn get_by_id(&self, id: &EmpresaId) -> Result<Empresa, CollaboratorError> {
        let tables = self.tables.lock().await;
        Ok(queries::empresas::get_empresa(&tables, id)?)
    }

    async fn list(&self) -> Result<Vec<Empresa>, CollaboratorError> {
        let tables = self.tables.lock().await;
        Ok(queries::empresas::list_empresas(&tables))
    }
}

impl ExpedienteLookup for Persistence {
    async fn list_by_empresa(
        &self,
        empresa_id: &EmpresaId,
    ) -> Result<Vec<Expediente>, CollaboratorError> {
        let tables = self.tables.lock().await;
        Ok(queries::expedientes::list_expedientes_by_empresa(
            &tables, empresa_id,
        ))
    }

    async fn get_by_id(&self, id: &ExpedienteId) -> Result<Expediente, CollaboratorError> {
        let tables = self.tables.lock().await;
        Ok(queries::expedientes::get_expediente(&tables, id)?)
    }

    async fn create(&self, data: NewExpediente) -> Result<Expediente, CollaboratorError> {
        let mut tables = self.tables.lock().await;
        mutations::expedientes::create_expediente(&mut tables, data)
            .map_err(|e| rejected_write(self, "expediente", e))
    }

    async fn update(
        &self,
        id: &ExpedienteId,
        patch: ExpedientePatch,
    ) -> Result<Expediente, CollaboratorError> {
        let mut tables = self.tables.lock().await;
        mutations::expedientes::update_expediente(&mut tables, id, &patch)
            .map_err(|e| rejected_write(self, "expediente", e))
    }
}

impl ResolutionRepository for Persistence {
    async fn list_by_empresa(
        &self,
        empresa_id: &EmpresaId,
    ) -> Result<Vec<Resolution>, CollaboratorError> {
        let tables = self.tables.lock().await;
        Ok(queries::resoluciones::list_resolutions_by_empresa(
            &tables, empresa_id,
        ))
    }

    async fn get_by_id(&self, id: &ResolutionId) -> Result<Resolution, CollaboratorError> {
        let tables = self.tables.lock().await;
        Ok(queries::resoluciones::get_resolution(&tables, id)?)
    }

    async fn create(&self, draft: &ResolutionDraft) -> Result<Resolution, CollaboratorError> {
        let mut tables = self.tables.lock().await;
        mutations::resoluciones::create_resolution(&mut tables, draft)
            .map_err(|e| rejected_write(self, "resolution", e))
    }

    async fn update(
        &self,
        id: &ResolutionId,
        patch: ResolutionPatch,
    ) -> Result<Resolution, CollaboratorError> {
        let mut tables = self.tables.lock().await;
        Ok(mutations::resoluciones::update_resolution(
            &mut tables,
            id,
            &patch,
        )?)
    }

    async fn list_full_numbers(&self, year: i32) -> Result<NumberingSnapshot, CollaboratorError> {
        let tables = self.tables.lock().await;
        Ok(queries::resoluciones::issued_numbers(&tables, year))
    }
}

fn rejected_write(store: &Persistence, record: &str, err: PersistenceError) -> CollaboratorError {
    warn!(store = store.name(), record, error = %err, "Write rejected");
    err.into()
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use crate::{
    CollaboratorError, Collaborators, CreationSession, EmpresaLookup, ExpedienteLookup,
    ExpedientePatch, NewExpediente, ResolutionPatch, ResolutionRepository, StaticUser,
};
use resoluciones::{CreationPolicy, ResolutionDraft};
use resoluciones_domain::{
    Empresa, EmpresaId, EstadoResolucion, Expediente, ExpedienteId, ExternalMetadata,
    NumberingSnapshot, Resolution, ResolutionId, TipoResolucion, TipoTramite,
};
use std::cell::{Cell, RefCell};
use time::Date;
use time::macros::date;

pub const EMPRESA: &str = "emp-001";

/// Collaborators backed by plain vectors.
#[derive(Debug, Default)]
pub struct FakeBackend {
    pub empresas: Vec<Empresa>,
    pub expedientes: RefCell<Vec<Expediente>>,
    pub resoluciones: RefCell<Vec<Resolution>>,
    pub fail_writes: Cell<bool>,
    pub fail_reads: Cell<bool>,
}

impl FakeBackend {
    pub fn with_empresa() -> Self {
        Self {
            empresas: vec![Empresa::new(
                EmpresaId::new(EMPRESA),
                "20123456789",
                "Transportes Andinos SAC",
            )],
            ..Self::default()
        }
    }

    pub fn session(&self) -> CreationSession<'_, Self, Self, Self> {
        CreationSession::new(
            Collaborators {
                empresas: self,
                expedientes: self,
                resoluciones: self,
            },
            &StaticUser(String::from("user-01")),
            today(),
            CreationPolicy::default(),
        )
    }

    fn check_reads(&self) -> Result<(), CollaboratorError> {
        if self.fail_reads.get() {
            return Err(CollaboratorError::Unavailable(String::from("backend down")));
        }
        Ok(())
    }
}

impl EmpresaLookup for FakeBackend {
    async fn get_by_id(&self, id: &EmpresaId) -> Result<Empresa, CollaboratorError> {
        self.check_reads()?;
        self.empresas
            .iter()
            .find(|empresa| &empresa.id == id)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound {
                resource: "Empresa",
                id: id.to_string(),
            })
    }

    async fn list(&self) -> Result<Vec<Empresa>, CollaboratorError> {
        self.check_reads()?;
        Ok(self.empresas.clone())
    }
}

impl ExpedienteLookup for FakeBackend {
    async fn list_by_empresa(
        &self,
        empresa_id: &EmpresaId,
    ) -> Result<Vec<Expediente>, CollaboratorError> {
        self.check_reads()?;
        Ok(self
            .expedientes
            .borrow()
            .iter()
            .filter(|expediente| &expediente.empresa_id == empresa_id)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: &ExpedienteId) -> Result<Expediente, CollaboratorError> {
        self.check_reads()?;
        self.expedientes
            .borrow()
            .iter()
            .find(|expediente| &expediente.id == id)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound {
                resource: "Expediente",
                id: id.to_string(),
            })
    }

    async fn create(&self, data: NewExpediente) -> Result<Expediente, CollaboratorError> {
        let id: String = format!("exp-{}", self.expedientes.borrow().len() + 1);
        let mut expediente: Expediente = Expediente::new(
            ExpedienteId::new(id),
            format!("{:0>4}", data.numero),
            data.fecha_emision,
            data.tipo_tramite,
            data.empresa_id,
        );
        expediente.descripcion = data.descripcion;
        self.expedientes.borrow_mut().push(expediente.clone());
        Ok(expediente)
    }

    async fn update(
        &self,
        id: &ExpedienteId,
        patch: ExpedientePatch,
    ) -> Result<Expediente, CollaboratorError> {
        if self.fail_writes.get() {
            return Err(CollaboratorError::Rejected(format!("{id} is read-only")));
        }
        let referenced: bool = self
            .resoluciones
            .borrow()
            .iter()
            .any(|resolution| &resolution.expediente_id == id);
        let mut expedientes = self.expedientes.borrow_mut();
        let stored: &mut Expediente = expedientes
            .iter_mut()
            .find(|expediente| &expediente.id == id)
            .ok_or_else(|| CollaboratorError::NotFound {
                resource: "Expediente",
                id: id.to_string(),
            })?;
        *stored = patch
            .apply_to(stored, referenced)
            .map_err(|e| CollaboratorError::Rejected(e.to_string()))?;
        Ok(stored.clone())
    }
}

impl ResolutionRepository for FakeBackend {
    async fn list_by_empresa(
        &self,
        empresa_id: &EmpresaId,
    ) -> Result<Vec<Resolution>, CollaboratorError> {
        self.check_reads()?;
        Ok(self
            .resoluciones
            .borrow()
            .iter()
            .filter(|resolution| &resolution.empresa_id == empresa_id)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: &ResolutionId) -> Result<Resolution, CollaboratorError> {
        self.resoluciones
            .borrow()
            .iter()
            .find(|resolution| &resolution.id == id)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound {
                resource: "Resolution",
                id: id.to_string(),
            })
    }

    async fn create(&self, draft: &ResolutionDraft) -> Result<Resolution, CollaboratorError> {
        if self.fail_writes.get() {
            return Err(CollaboratorError::Conflict(format!(
                "{} already stored",
                draft.full_number()
            )));
        }
        let id: String = format!("res-{}", self.resoluciones.borrow().len() + 1);
        let resolution: Resolution = draft.clone().into_resolution(ResolutionId::new(id));
        self.resoluciones.borrow_mut().push(resolution.clone());
        Ok(resolution)
    }

    async fn update(
        &self,
        id: &ResolutionId,
        patch: ResolutionPatch,
    ) -> Result<Resolution, CollaboratorError> {
        let mut resoluciones = self.resoluciones.borrow_mut();
        let stored: &mut Resolution = resoluciones
            .iter_mut()
            .find(|resolution| &resolution.id == id)
            .ok_or_else(|| CollaboratorError::NotFound {
                resource: "Resolution",
                id: id.to_string(),
            })?;
        *stored = patch.apply_to(stored);
        Ok(stored.clone())
    }

    async fn list_full_numbers(&self, year: i32) -> Result<NumberingSnapshot, CollaboratorError> {
        self.check_reads()?;
        Ok(self
            .resoluciones
            .borrow()
            .iter()
            .filter(|resolution| resolution.fecha_emision.year() == year)
            .map(Resolution::full_number)
            .collect())
    }
}

pub fn today() -> Date {
    date!(2025 - 06 - 01)
}

pub fn create_test_expediente(id: &str, tipo_tramite: TipoTramite) -> Expediente {
    Expediente::new(
        ExpedienteId::new(id),
        String::from("0001"),
        date!(2025 - 03 - 01),
        tipo_tramite,
        EmpresaId::new(EMPRESA),
    )
}

pub fn create_test_padre(id: &str, numero: &str, estado: EstadoResolucion, fin: Date) -> Resolution {
    Resolution {
        id: ResolutionId::new(id),
        numero: numero.to_string(),
        fecha_emision: date!(2020 - 01 - 10),
        tipo_resolucion: TipoResolucion::Padre,
        tipo_tramite: TipoTramite::AutorizacionNueva,
        expediente_id: ExpedienteId::new("exp-0"),
        empresa_id: EmpresaId::new(EMPRESA),
        resolucion_padre_id: None,
        fecha_vigencia_inicio: Some(date!(2020 - 01 - 10)),
        fecha_vigencia_fin: Some(fin),
        anios_vigencia: Some(5),
        estado,
        esta_activo: true,
        usuario_emision_id: String::from("user-00"),
        descripcion: None,
        observaciones: None,
        metadatos_externos: ExternalMetadata::new(),
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use crate::Persistence;
use resoluciones::{CreationPolicy, ResolutionDraft};
use resoluciones_api::{Collaborators, CreationSession, StaticUser};
use resoluciones_domain::{
    Empresa, EmpresaId, EstadoResolucion, Expediente, ExpedienteId, ExternalMetadata,
    ParentReference, Resolution, ResolutionId, TipoResolucion, TipoTramite,
};
use time::Date;
use time::macros::date;

pub const EMPRESA: &str = "emp-001";
pub const OTRA_EMPRESA: &str = "emp-999";

pub fn today() -> Date {
    date!(2025 - 06 - 01)
}

/// A store with two empresas and one expediente per procedure type for `EMPRESA`.
pub async fn create_seeded_store() -> Persistence {
    let store: Persistence = Persistence::new_in_memory();
    store
        .insert_empresa(Empresa::new(
            EmpresaId::new(EMPRESA),
            "20123456789",
            "Transportes Andinos SAC",
        ))
        .await
        .unwrap();
    store
        .insert_empresa(Empresa::new(
            EmpresaId::new(OTRA_EMPRESA),
            "20987654321",
            "Buses del Sur EIRL",
        ))
        .await
        .unwrap();

    for (numero, tipo_tramite) in [
        ("0001", TipoTramite::AutorizacionNueva),
        ("0002", TipoTramite::Renovacion),
        ("0003", TipoTramite::Incremento),
        ("0004", TipoTramite::Sustitucion),
        ("0005", TipoTramite::Otros),
    ] {
        store
            .insert_expediente(create_test_expediente(numero, tipo_tramite))
            .await
            .unwrap();
    }
    store
}

/// Expedientes are keyed `exp-<numero>`.
pub fn create_test_expediente(numero: &str, tipo_tramite: TipoTramite) -> Expediente {
    Expediente::new(
        ExpedienteId::new(format!("exp-{numero}")),
        numero.to_string(),
        date!(2025 - 03 - 01),
        tipo_tramite,
        EmpresaId::new(EMPRESA),
    )
}

pub fn create_test_padre(
    id: &str,
    numero: &str,
    estado: EstadoResolucion,
    inicio: Date,
    fin: Date,
) -> Resolution {
    Resolution {
        id: ResolutionId::new(id),
        numero: numero.to_string(),
        fecha_emision: inicio,
        tipo_resolucion: TipoResolucion::Padre,
        tipo_tramite: TipoTramite::AutorizacionNueva,
        expediente_id: ExpedienteId::new("exp-0001"),
        empresa_id: EmpresaId::new(EMPRESA),
        resolucion_padre_id: None,
        fecha_vigencia_inicio: Some(inicio),
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

pub fn create_test_hijo(id: &str, numero: &str, parent: &Resolution) -> Resolution {
    Resolution {
        id: ResolutionId::new(id),
        numero: numero.to_string(),
        fecha_emision: date!(2024 - 05 - 02),
        tipo_resolucion: TipoResolucion::Hijo,
        tipo_tramite: TipoTramite::Incremento,
        expediente_id: ExpedienteId::new("exp-0003"),
        empresa_id: parent.empresa_id.clone(),
        resolucion_padre_id: Some(ParentReference::System(parent.id.clone())),
        fecha_vigencia_inicio: parent.fecha_vigencia_inicio,
        fecha_vigencia_fin: parent.fecha_vigencia_fin,
        anios_vigencia: parent.anios_vigencia,
        ..parent.clone()
    }
}

pub fn create_test_draft(numero: &str) -> ResolutionDraft {
    ResolutionDraft {
        numero: numero.to_string(),
        fecha_emision: date!(2025 - 03 - 01),
        tipo_resolucion: TipoResolucion::Padre,
        tipo_tramite: TipoTramite::AutorizacionNueva,
        expediente_id: ExpedienteId::new("exp-0001"),
        empresa_id: EmpresaId::new(EMPRESA),
        resolucion_padre_id: None,
        fecha_vigencia_inicio: Some(date!(2025 - 03 - 01)),
        fecha_vigencia_fin: Some(date!(2030 - 03 - 01)),
        anios_vigencia: Some(5),
        usuario_emision_id: String::from("user-01"),
        descripcion: None,
        observaciones: None,
    }
}

pub fn create_test_session(
    store: &Persistence,
) -> CreationSession<'_, Persistence, Persistence, Persistence> {
    CreationSession::new(
        Collaborators {
            empresas: store,
            expedientes: store,
            resoluciones: store,
        },
        &StaticUser(String::from("user-01")),
        today(),
        CreationPolicy::default(),
    )
}

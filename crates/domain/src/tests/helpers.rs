// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    EmpresaId, EstadoResolucion, Expediente, ExpedienteId, ExternalMetadata, Resolution,
    ResolutionId, TipoResolucion, TipoTramite,
};
use time::Date;
use time::macros::date;

pub const EMPRESA: &str = "emp-001";
pub const OTRA_EMPRESA: &str = "emp-999";

pub fn today() -> Date {
    date!(2025 - 06 - 01)
}

pub fn create_test_expediente(tipo_tramite: TipoTramite) -> Expediente {
    Expediente::new(
        ExpedienteId::new("exp-1"),
        String::from("0001"),
        date!(2025 - 03 - 01),
        tipo_tramite,
        EmpresaId::new(EMPRESA),
    )
}

pub fn create_test_padre(
    id: &str,
    empresa: &str,
    estado: EstadoResolucion,
    inicio: Date,
    fin: Date,
) -> Resolution {
    Resolution {
        id: ResolutionId::new(id),
        numero: String::from("0001"),
        fecha_emision: inicio,
        tipo_resolucion: TipoResolucion::Padre,
        tipo_tramite: TipoTramite::AutorizacionNueva,
        expediente_id: ExpedienteId::new(format!("exp-of-{id}")),
        empresa_id: EmpresaId::new(empresa),
        resolucion_padre_id: None,
        fecha_vigencia_inicio: Some(inicio),
        fecha_vigencia_fin: Some(fin),
        anios_vigencia: Some(5),
        estado,
        esta_activo: true,
        usuario_emision_id: String::from("user-1"),
        descripcion: None,
        observaciones: None,
        metadatos_externos: ExternalMetadata::new(),
    }
}

pub fn create_vigente_padre(id: &str, empresa: &str) -> Resolution {
    create_test_padre(
        id,
        empresa,
        EstadoResolucion::Vigente,
        date!(2023 - 01 - 10),
        date!(2028 - 01 - 10),
    )
}

pub fn create_vencida_padre(id: &str, empresa: &str) -> Resolution {
    create_test_padre(
        id,
        empresa,
        EstadoResolucion::Vencida,
        date!(2015 - 01 - 10),
        date!(2020 - 01 - 10),
    )
}

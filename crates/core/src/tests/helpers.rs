// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Command, FormContext, FormState, TransitionResult, apply};
use resoluciones_domain::{
    Empresa, EmpresaId, EstadoResolucion, Expediente, ExpedienteId, ExternalMetadata,
    NumberingSnapshot, Resolution, ResolutionId, TipoResolucion, TipoTramite,
};
use time::Date;
use time::macros::date;

pub const EMPRESA: &str = "emp-001";
pub const OTRA_EMPRESA: &str = "emp-999";

pub fn create_test_context() -> FormContext {
    FormContext::new(date!(2025 - 06 - 01), "user-01")
}

pub fn create_test_empresa() -> Empresa {
    Empresa::new(
        EmpresaId::new(EMPRESA),
        "20123456789",
        "Transportes Andinos SAC",
    )
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
        expediente_id: ExpedienteId::new("exp-0"),
        empresa_id: EmpresaId::new(empresa),
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

pub fn create_vigente_padre(id: &str) -> Resolution {
    create_test_padre(
        id,
        EMPRESA,
        EstadoResolucion::Vigente,
        date!(2023 - 01 - 10),
        date!(2028 - 01 - 10),
    )
}

pub fn create_vencida_padre(id: &str) -> Resolution {
    create_test_padre(
        id,
        EMPRESA,
        EstadoResolucion::Vencida,
        date!(2015 - 01 - 10),
        date!(2020 - 01 - 10),
    )
}

/// Applies a command that must succeed.
pub fn step(state: &FormState, command: Command) -> TransitionResult {
    apply(state, command, &create_test_context()).unwrap()
}

/// Applies a sequence of commands that must all succeed.
pub fn drive(state: FormState, commands: Vec<Command>) -> FormState {
    commands
        .into_iter()
        .fold(state, |current, command| step(&current, command).new_state)
}

/// Drives a fresh form up to `EditingFields` for a single system expediente.
pub fn editing_form(
    tipo_tramite: TipoTramite,
    parents: Vec<Resolution>,
    numbers: NumberingSnapshot,
) -> FormState {
    drive(
        FormState::default(),
        vec![
            Command::SelectEmpresa(create_test_empresa()),
            Command::ExpedientesLoaded(vec![create_test_expediente(tipo_tramite)]),
            Command::SelectExpediente(ExpedienteId::new("exp-1")),
            Command::ConfirmExpediente,
            Command::CandidateParentsLoaded(parents),
            Command::ExistingNumbersLoaded {
                year: 2025,
                numbers,
            },
        ],
    )
}

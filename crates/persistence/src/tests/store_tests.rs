// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    EMPRESA, OTRA_EMPRESA, create_seeded_store, create_test_draft, create_test_expediente,
    create_test_hijo, create_test_padre,
};
use crate::{Persistence, PersistenceError};
use resoluciones_api::{
    CollaboratorError, EmpresaLookup, ExpedienteLookup, ExpedientePatch, NewExpediente,
    ResolutionPatch, ResolutionRepository,
};
use resoluciones_domain::{
    Empresa, EmpresaId, EstadoExpediente, EstadoResolucion, Expediente, ExpedienteId,
    NumberingSnapshot, ParentReference, Resolution, ResolutionId, TipoTramite,
};
use time::Date;
use time::macros::date;

#[tokio::test]
async fn test_new_stores_have_distinct_names() {
    let first: Persistence = Persistence::new_in_memory();
    let second: Persistence = Persistence::new_in_memory();

    assert_ne!(first.name(), second.name());
    assert!(first.name().starts_with("memstore_"));
}

#[tokio::test]
async fn test_empresas_are_listed_by_name() {
    let store: Persistence = create_seeded_store().await;

    let empresas: Vec<Empresa> = EmpresaLookup::list(&store).await.unwrap();

    let names: Vec<&str> = empresas.iter().map(|e| e.razon_social.as_str()).collect();
    assert_eq!(names, vec!["Buses del Sur EIRL", "Transportes Andinos SAC"]);
}

#[tokio::test]
async fn test_unknown_empresa_is_not_found() {
    let store: Persistence = create_seeded_store().await;

    let result = EmpresaLookup::get_by_id(&store, &EmpresaId::new("emp-404")).await;

    assert_eq!(
        result,
        Err(CollaboratorError::NotFound {
            resource: "Empresa",
            id: String::from("emp-404"),
        })
    );
}

#[tokio::test]
async fn test_expedientes_are_scoped_to_empresa() {
    let store: Persistence = create_seeded_store().await;

    let own: Vec<Expediente> =
        ExpedienteLookup::list_by_empresa(&store, &EmpresaId::new(EMPRESA))
            .await
            .unwrap();
    let other: Vec<Expediente> =
        ExpedienteLookup::list_by_empresa(&store, &EmpresaId::new(OTRA_EMPRESA))
            .await
            .unwrap();

    assert_eq!(own.len(), 5);
    assert_eq!(own[0].full_number(), "E-0001-2025");
    assert!(other.is_empty());
}

#[tokio::test]
async fn test_create_expediente_pads_number_and_assigns_id() {
    let store: Persistence = create_seeded_store().await;

    let created: Expediente = ExpedienteLookup::create(
        &store,
        NewExpediente {
            numero: String::from("42"),
            fecha_emision: date!(2025 - 04 - 15),
            tipo_tramite: TipoTramite::Incremento,
            empresa_id: EmpresaId::new(OTRA_EMPRESA),
            descripcion: Some(String::from("Incremento de flota")),
        },
    )
    .await
    .unwrap();

    assert_eq!(created.full_number(), "E-0042-2025");
    assert!(!created.id.is_manual());
    assert_eq!(store.expediente(&created.id).await.unwrap(), created);
}

#[tokio::test]
async fn test_expediente_numbers_are_unique_per_year() {
    let store: Persistence = create_seeded_store().await;
    let data = |fecha_emision: Date| NewExpediente {
        numero: String::from("1"),
        fecha_emision,
        tipo_tramite: TipoTramite::Otros,
        empresa_id: EmpresaId::new(EMPRESA),
        descripcion: None,
    };

    let same_year = ExpedienteLookup::create(&store, data(date!(2025 - 11 - 20))).await;
    let next_year = ExpedienteLookup::create(&store, data(date!(2026 - 01 - 05))).await;

    assert_eq!(
        same_year,
        Err(CollaboratorError::Conflict(String::from(
            "Number E-0001-2025 is already stored"
        )))
    );
    assert_eq!(next_year.unwrap().full_number(), "E-0001-2026");
}

#[tokio::test]
async fn test_expediente_for_unknown_empresa_is_rejected() {
    let store: Persistence = create_seeded_store().await;
    let mut expediente: Expediente = create_test_expediente("0099", TipoTramite::Otros);
    expediente.empresa_id = EmpresaId::new("emp-404");

    let result = store.insert_expediente(expediente).await;

    assert!(matches!(
        result,
        Err(PersistenceError::ForeignKeyViolation { .. })
    ));
}

#[tokio::test]
async fn test_manual_expediente_is_never_stored() {
    let store: Persistence = create_seeded_store().await;
    let manual: Expediente = Expediente::manual(
        "E-0088-2025",
        date!(2025 - 02 - 01),
        TipoTramite::Otros,
        EmpresaId::new(EMPRESA),
        None,
    );

    let result = store.insert_expediente(manual).await;

    assert!(matches!(result, Err(PersistenceError::InvalidRecord(_))));
}

#[tokio::test]
async fn test_resolution_numbers_are_unique_across_empresas() {
    let store: Persistence = create_seeded_store().await;
    store
        .insert_expediente(Expediente::new(
            ExpedienteId::new("exp-otra"),
            String::from("0001"),
            date!(2025 - 03 - 01),
            TipoTramite::AutorizacionNueva,
            EmpresaId::new(OTRA_EMPRESA),
        ))
        .await
        .unwrap();

    ResolutionRepository::create(&store, &create_test_draft("0007"))
        .await
        .unwrap();
    let mut other = create_test_draft("0007");
    other.empresa_id = EmpresaId::new(OTRA_EMPRESA);
    other.expediente_id = ExpedienteId::new("exp-otra");

    let result = ResolutionRepository::create(&store, &other).await;

    assert_eq!(
        result,
        Err(CollaboratorError::Conflict(String::from(
            "Number R-0007-2025 is already stored"
        )))
    );
}

#[tokio::test]
async fn test_issued_numbers_are_filtered_by_year() {
    let store: Persistence = create_seeded_store().await;
    let mut legacy: Resolution = create_test_padre(
        "res-2020",
        "0012",
        EstadoResolucion::Vencida,
        date!(2020 - 01 - 10),
        date!(2025 - 01 - 10),
    );
    legacy.expediente_id = ExpedienteId::new("exp-0002");
    store.insert_resolution(legacy).await.unwrap();
    ResolutionRepository::create(&store, &create_test_draft("0003"))
        .await
        .unwrap();

    let numbers: NumberingSnapshot = ResolutionRepository::list_full_numbers(&store, 2025)
        .await
        .unwrap();

    assert_eq!(numbers.len(), 1);
    assert!(numbers.contains("R-0003-2025"));
}

#[tokio::test]
async fn test_draft_with_unknown_expediente_is_rejected() {
    let store: Persistence = create_seeded_store().await;
    let mut draft = create_test_draft("0003");
    draft.expediente_id = ExpedienteId::new("exp-404");

    let result = ResolutionRepository::create(&store, &draft).await;

    assert!(matches!(result, Err(CollaboratorError::Rejected(_))));
    assert!(
        ResolutionRepository::list_full_numbers(&store, 2025)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_draft_from_manual_expediente_is_stored() {
    let store: Persistence = create_seeded_store().await;
    let mut draft = create_test_draft("0003");
    draft.expediente_id = ExpedienteId::manual("E-0088-2025");

    let created: Resolution = ResolutionRepository::create(&store, &draft).await.unwrap();

    assert!(created.expediente_id.is_manual());
}

#[tokio::test]
async fn test_system_parent_must_exist_in_same_empresa() {
    let store: Persistence = create_seeded_store().await;
    let mut draft = create_test_draft("0003");
    draft.resolucion_padre_id = Some(ParentReference::System(ResolutionId::new("res-404")));

    let missing = ResolutionRepository::create(&store, &draft).await;

    assert!(matches!(missing, Err(CollaboratorError::Rejected(_))));

    draft.resolucion_padre_id = Some(ParentReference::manual("R-0404-2019").unwrap());
    let manual: Resolution = ResolutionRepository::create(&store, &draft).await.unwrap();
    assert_eq!(
        manual.resolucion_padre_id.map(|parent| parent.as_stored()),
        Some(String::from("MANUAL:R-0404-2019"))
    );
}

#[tokio::test]
async fn test_unpadded_number_is_rejected() {
    let store: Persistence = create_seeded_store().await;
    let padre: Resolution = create_test_padre(
        "res-1",
        "12",
        EstadoResolucion::Vigente,
        date!(2023 - 01 - 10),
        date!(2028 - 01 - 10),
    );

    let result = store.insert_resolution(padre).await;

    assert!(matches!(result, Err(PersistenceError::InvalidRecord(_))));
}

#[tokio::test]
async fn test_update_applies_patch() {
    let store: Persistence = create_seeded_store().await;
    let padre: Resolution = create_test_padre(
        "res-1",
        "0001",
        EstadoResolucion::Vigente,
        date!(2023 - 01 - 10),
        date!(2028 - 01 - 10),
    );
    let hijo: Resolution = create_test_hijo("res-2", "0002", &padre);
    store.insert_resolution(padre).await.unwrap();
    store.insert_resolution(hijo).await.unwrap();

    let updated: Resolution = ResolutionRepository::update(
        &store,
        &ResolutionId::new("res-1"),
        ResolutionPatch::estado(EstadoResolucion::Suspendida),
    )
    .await
    .unwrap();
    let missing = ResolutionRepository::update(
        &store,
        &ResolutionId::new("res-404"),
        ResolutionPatch::deactivate(),
    )
    .await;

    assert_eq!(updated.estado, EstadoResolucion::Suspendida);
    assert_eq!(
        ResolutionRepository::get_by_id(&store, &ResolutionId::new("res-1"))
            .await
            .unwrap(),
        updated
    );
    assert!(matches!(missing, Err(CollaboratorError::NotFound { .. })));
}

#[tokio::test]
async fn test_expediente_originates_a_single_resolution() {
    let store: Persistence = create_seeded_store().await;
    let first: Resolution = ResolutionRepository::create(&store, &create_test_draft("0007"))
        .await
        .unwrap();

    let second = ResolutionRepository::create(&store, &create_test_draft("0008")).await;

    assert_eq!(
        second,
        Err(CollaboratorError::Conflict(format!(
            "Expediente exp-0001 already originated resolution {}",
            first.id
        )))
    );
    assert_eq!(
        ResolutionRepository::list_full_numbers(&store, 2025)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_manual_expediente_is_not_indexed() {
    let store: Persistence = create_seeded_store().await;
    for numero in ["0003", "0004"] {
        let mut draft = create_test_draft(numero);
        draft.expediente_id = ExpedienteId::manual("E-0088-2025");
        ResolutionRepository::create(&store, &draft).await.unwrap();
    }

    assert_eq!(
        ResolutionRepository::list_full_numbers(&store, 2025)
            .await
            .unwrap()
            .len(),
        2
    );
}

#[tokio::test]
async fn test_expediente_moves_along_the_state_graph() {
    let store: Persistence = create_seeded_store().await;
    let id: ExpedienteId = ExpedienteId::new("exp-0002");

    let suspendido: Expediente = ExpedienteLookup::update(
        &store,
        &id,
        ExpedientePatch::estado(EstadoExpediente::Suspendido),
    )
    .await
    .unwrap();
    let archivado: Expediente = ExpedienteLookup::update(
        &store,
        &id,
        ExpedientePatch::estado(EstadoExpediente::Archivado),
    )
    .await
    .unwrap();

    assert_eq!(suspendido.estado, EstadoExpediente::Suspendido);
    assert_eq!(archivado.estado, EstadoExpediente::Archivado);
    assert_eq!(
        store.expediente(&id).await.unwrap().estado,
        EstadoExpediente::Archivado
    );
}

#[tokio::test]
async fn test_expediente_rejects_disallowed_transition() {
    let store: Persistence = create_seeded_store().await;
    let id: ExpedienteId = ExpedienteId::new("exp-0002");

    let result = ExpedienteLookup::update(
        &store,
        &id,
        ExpedientePatch::estado(EstadoExpediente::Archivado),
    )
    .await;

    assert_eq!(
        result,
        Err(CollaboratorError::Rejected(String::from(
            "Rule violation: Cannot transition expediente from EN_PROCESO to ARCHIVADO"
        )))
    );
    assert_eq!(
        store.expediente(&id).await.unwrap().estado,
        EstadoExpediente::EnProceso
    );
}

#[tokio::test]
async fn test_tramite_is_locked_by_a_stored_resolution() {
    let store: Persistence = create_seeded_store().await;
    ResolutionRepository::create(&store, &create_test_draft("0007"))
        .await
        .unwrap();

    let locked = ExpedienteLookup::update(
        &store,
        &ExpedienteId::new("exp-0001"),
        ExpedientePatch::tipo_tramite(TipoTramite::Otros),
    )
    .await;
    let free: Expediente = ExpedienteLookup::update(
        &store,
        &ExpedienteId::new("exp-0002"),
        ExpedientePatch::tipo_tramite(TipoTramite::Otros),
    )
    .await
    .unwrap();

    assert_eq!(
        locked,
        Err(CollaboratorError::Rejected(String::from(
            "Rule violation: Tramite type of expediente exp-0001 is locked by an issued resolution"
        )))
    );
    assert_eq!(free.tipo_tramite, TipoTramite::Otros);
    assert_eq!(
        store
            .expediente(&ExpedienteId::new("exp-0001"))
            .await
            .unwrap()
            .tipo_tramite,
        TipoTramite::AutorizacionNueva
    );
}

#[tokio::test]
async fn test_deactivated_expediente_is_frozen() {
    let store: Persistence = create_seeded_store().await;
    let id: ExpedienteId = ExpedienteId::new("exp-0003");

    let inactive: Expediente =
        ExpedienteLookup::update(&store, &id, ExpedientePatch::deactivate())
            .await
            .unwrap();
    let result = ExpedienteLookup::update(
        &store,
        &id,
        ExpedientePatch::estado(EstadoExpediente::Aprobado),
    )
    .await;

    assert!(!inactive.esta_activo);
    assert_eq!(
        result,
        Err(CollaboratorError::Rejected(String::from(
            "Rule violation: Expediente exp-0003 is inactive"
        )))
    );
    assert_eq!(
        ExpedienteLookup::get_by_id(&store, &id).await.unwrap(),
        inactive
    );
}

#[tokio::test]
async fn test_update_unknown_expediente() {
    let store: Persistence = create_seeded_store().await;

    let result = ExpedienteLookup::update(
        &store,
        &ExpedienteId::new("exp-404"),
        ExpedientePatch::deactivate(),
    )
    .await;

    assert_eq!(
        result,
        Err(CollaboratorError::NotFound {
            resource: "Expediente",
            id: String::from("exp-404"),
        })
    );
}

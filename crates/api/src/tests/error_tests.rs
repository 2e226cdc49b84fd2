// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ApiError, CollaboratorError, translate_collaborator_error, translate_core_error,
    translate_domain_error,
};
use resoluciones::{CoreError, FieldError, FormStep};
use resoluciones_domain::{DomainError, TipoTramite};

#[test]
fn test_duplicate_number_is_a_rule_violation() {
    let err: ApiError = translate_domain_error(DomainError::DuplicateNumber {
        full_number: String::from("R-0003-2025"),
        suggested: String::from("R-0004-2025"),
    });

    assert_eq!(
        err,
        ApiError::DomainRuleViolation {
            rule: String::from("unique_number_per_year"),
            message: String::from(
                "Number R-0003-2025 is already in use; next available is R-0004-2025"
            ),
        }
    );
}

#[test]
fn test_invalid_format_keeps_field_and_reason() {
    let err: ApiError = translate_domain_error(DomainError::InvalidFormat {
        field: "numero",
        reason: String::from("Number is required"),
    });

    assert_eq!(
        err,
        ApiError::InvalidInput {
            field: String::from("numero"),
            message: String::from("Number is required"),
        }
    );
}

#[test]
fn test_missing_parent_names_the_rule() {
    let err: ApiError = translate_domain_error(DomainError::ParentRequiredButMissing {
        tipo_tramite: TipoTramite::Otros,
    });

    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "parent_required"
    ));
}

#[test]
fn test_data_mismatches_are_fatal() {
    let foreign: ApiError = translate_domain_error(DomainError::ParentBelongsToDifferentEmpresa {
        parent_id: String::from("res-9"),
        expected: String::from("emp-001"),
        actual: String::from("emp-999"),
    });
    let legacy: ApiError =
        translate_domain_error(DomainError::LegacyTramiteLabel(String::from("PRIMIGENIA")));

    assert!(matches!(foreign, ApiError::Fatal { .. }));
    assert!(matches!(legacy, ApiError::Fatal { .. }));
}

#[test]
fn test_core_domain_violation_is_unwrapped() {
    let err: ApiError = translate_core_error(CoreError::DomainViolation(
        DomainError::ParentRequiredButMissing {
            tipo_tramite: TipoTramite::Otros,
        },
    ));

    assert!(matches!(err, ApiError::DomainRuleViolation { .. }));
}

#[test]
fn test_out_of_order_command_is_invalid_request() {
    let err: ApiError = translate_core_error(CoreError::InvalidTransition {
        step: FormStep::Submitting,
        command: "Validate",
    });

    assert_eq!(
        err,
        ApiError::InvalidRequest {
            message: String::from("Command 'Validate' is not allowed while submitting"),
        }
    );
}

#[test]
fn test_unknown_expediente_is_not_found() {
    let err: ApiError = translate_core_error(CoreError::UnknownExpediente(String::from("exp-9")));

    assert!(matches!(
        err,
        ApiError::ResourceNotFound { ref resource_type, .. } if resource_type == "Expediente"
    ));
}

#[test]
fn test_collaborator_not_found() {
    let err: ApiError = translate_collaborator_error(CollaboratorError::NotFound {
        resource: "Resolution",
        id: String::from("res-404"),
    });

    assert_eq!(
        err,
        ApiError::ResourceNotFound {
            resource_type: String::from("Resolution"),
            message: String::from("Resolution res-404 does not exist"),
        }
    );
}

#[test]
fn test_collaborator_conflict_is_persistence_failure() {
    let err: ApiError = translate_collaborator_error(CollaboratorError::Conflict(String::from(
        "R-0001-2025 already stored",
    )));

    assert_eq!(
        err.to_string(),
        "Persistence failure: Conflict: R-0001-2025 already stored"
    );
}

#[test]
fn test_field_error_becomes_invalid_input() {
    let err: ApiError = FieldError::new("aniosVigencia", "out of range").into();

    assert_eq!(
        err,
        ApiError::InvalidInput {
            field: String::from("aniosVigencia"),
            message: String::from("out of range"),
        }
    );
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Command, CoreError, FormStep};
use resoluciones_domain::ResolutionId;

#[test]
fn test_command_names_match_variants() {
    assert_eq!(Command::Validate.name(), "Validate");
    assert_eq!(Command::ClearParent.name(), "ClearParent");
    assert_eq!(
        Command::SelectParent(ResolutionId::new("res-1")).name(),
        "SelectParent"
    );
    assert_eq!(
        Command::SubmissionFailed(String::from("boom")).name(),
        "SubmissionFailed"
    );
}

#[test]
fn test_field_edits_are_identified() {
    assert!(Command::ChangeNumero(String::from("1")).is_field_edit());
    assert!(Command::ClearParent.is_field_edit());
    assert!(Command::ChangeAniosVigencia(5).is_field_edit());
    assert!(!Command::Validate.is_field_edit());
    assert!(!Command::Submit.is_field_edit());
    assert!(!Command::ConfirmExpediente.is_field_edit());
}

#[test]
fn test_invalid_transition_message_names_step_and_command() {
    let error: CoreError = CoreError::InvalidTransition {
        step: FormStep::Submitting,
        command: "Validate",
    };

    assert_eq!(
        error.to_string(),
        "Command 'Validate' is not allowed while submitting"
    );
}

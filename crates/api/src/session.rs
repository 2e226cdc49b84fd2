// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Async driver for the creation form.
//!
//! The session feeds commands to the pure reducer and performs the
//! collaborator call each transition asks for, one at a time, feeding the
//! result back as the next command.

use crate::error::{ApiError, translate_collaborator_error, translate_core_error};
use crate::ports::{
    CurrentUser, EmpresaLookup, ExpedienteLookup, NewExpediente, ResolutionRepository,
};
use resoluciones::{
    Command, CreationPolicy, Effect, FormContext, FormState, FormStep, SUBMIT_FIELD,
    TransitionResult, apply,
};
use resoluciones_domain::{Empresa, EmpresaId, Expediente, Resolution};
use time::Date;
use tracing::{debug, error, info, warn};

/// The collaborators a session talks to.
#[derive(Debug)]
pub struct Collaborators<'a, E, X, R> {
    /// Empresa lookup.
    pub empresas: &'a E,
    /// Expediente lookup.
    pub expedientes: &'a X,
    /// Resolution repository.
    pub resoluciones: &'a R,
}

/// One resolution creation flow, from empresa selection to a stored resolution.
#[derive(Debug)]
pub struct CreationSession<'a, E, X, R> {
    collaborators: Collaborators<'a, E, X, R>,
    ctx: FormContext,
    state: FormState,
}

// Collaborator futures carry no `Send` bound; sessions run on one task.
#[allow(clippy::future_not_send)]
impl<'a, E, X, R> CreationSession<'a, E, X, R>
where
    E: EmpresaLookup,
    X: ExpedienteLookup,
    R: ResolutionRepository,
{
    /// Starts a session for `user` on `today`.
    #[must_use]
    pub fn new(
        collaborators: Collaborators<'a, E, X, R>,
        user: &impl CurrentUser,
        today: Date,
        policy: CreationPolicy,
    ) -> Self {
        let ctx: FormContext = FormContext::new(today, user.id()).with_policy(policy);
        Self {
            collaborators,
            state: FormState::new(&ctx.policy),
            ctx,
        }
    }

    /// The current form.
    #[must_use]
    pub const fn state(&self) -> &FormState {
        &self.state
    }

    /// The context transitions are applied with.
    #[must_use]
    pub const fn context(&self) -> &FormContext {
        &self.ctx
    }

    /// Applies a command and runs every effect it triggers.
    ///
    /// # Errors
    ///
    /// Returns an error if the reducer rejects a command.
    pub async fn dispatch(&mut self, command: Command) -> Result<&FormState, ApiError> {
        let mut next: Option<Command> = Some(command);

        while let Some(command) = next.take() {
            let name: &'static str = command.name();
            let TransitionResult { new_state, effect } =
                apply(&self.state, command, &self.ctx).map_err(translate_core_error)?;
            debug!(command = name, step = %new_state.step, "Applied form command");

            if new_state.step == FormStep::Failed && self.state.step != FormStep::Failed {
                error!(
                    command = name,
                    failure = new_state.failure.as_deref().unwrap_or_default(),
                    "Resolution creation aborted"
                );
            }
            self.state = new_state;

            if let Some(effect) = effect {
                next = Some(self.run_effect(effect).await);
            }
        }

        Ok(&self.state)
    }

    /// Looks up an empresa and selects it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The empresa does not exist or is inactive
    /// - The form is past empresa selection
    pub async fn select_empresa(&mut self, id: &EmpresaId) -> Result<&FormState, ApiError> {
        let empresa: Empresa = self
            .collaborators
            .empresas
            .get_by_id(id)
            .await
            .map_err(translate_collaborator_error)?;
        if !empresa.esta_activo {
            return Err(ApiError::InvalidInput {
                field: String::from("empresaId"),
                message: format!("Empresa {id} is inactive"),
            });
        }
        self.dispatch(Command::SelectEmpresa(empresa)).await
    }

    /// Creates an expediente for the selected empresa and selects it.
    ///
    /// Only offered when the empresa has no expedientes.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The empresa already has expedientes
    /// - The collaborator rejects the expediente
    pub async fn create_expediente(&mut self, data: NewExpediente) -> Result<&FormState, ApiError> {
        let has_options: bool = self
            .state
            .expediente_options
            .as_ref()
            .is_none_or(|options| !options.is_empty());
        if self.state.step != FormStep::SelectingExpediente || has_options {
            return Err(ApiError::InvalidRequest {
                message: String::from(
                    "Expedientes can only be created while the empresa has none",
                ),
            });
        }

        let expediente: Expediente = self
            .collaborators
            .expedientes
            .create(data)
            .await
            .map_err(translate_collaborator_error)?;
        info!(
            expediente = %expediente.full_number(),
            empresa = %expediente.empresa_id,
            "Created expediente"
        );
        self.dispatch(Command::ExpedienteCreated(expediente)).await
    }

    /// Validates against fresh numbers and persists the resolution.
    ///
    /// The issued numbers are reloaded first so a number taken since the form
    /// was opened is caught before the write.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The form is not editable
    /// - Validation fails (`ApiError::FormRejected`)
    /// - Persistence rejects the draft (`ApiError::PersistenceFailure`)
    /// - A fatal condition aborts the flow (`ApiError::Fatal`)
    pub async fn submit(&mut self) -> Result<Resolution, ApiError> {
        if let Some(fecha_emision) = self.state.fields.fecha_emision {
            let refresh: Command = self
                .load_existing_numbers(fecha_emision.year())
                .await;
            self.dispatch(refresh).await?;
            if self.state.step == FormStep::Failed {
                return Err(self.fatal());
            }
        }

        self.dispatch(Command::Validate).await?;
        match self.state.step {
            FormStep::Validating => {}
            FormStep::Failed => return Err(self.fatal()),
            _ => {
                return Err(ApiError::FormRejected {
                    errors: self.state.errors.clone(),
                });
            }
        }

        self.dispatch(Command::Submit).await?;
        match (&self.state.step, &self.state.created) {
            (FormStep::Created, Some(resolution)) => Ok(resolution.clone()),
            (FormStep::Failed, _) => Err(self.fatal()),
            _ => Err(ApiError::PersistenceFailure {
                message: self
                    .state
                    .error_for(SUBMIT_FIELD)
                    .map(|e| e.message.clone())
                    .unwrap_or_default(),
            }),
        }
    }

    /// Discards the form.
    ///
    /// # Errors
    ///
    /// Returns an error if the form already reached a terminal step or a
    /// submission is in flight.
    pub async fn abandon(&mut self, reason: &str) -> Result<&FormState, ApiError> {
        self.dispatch(Command::Abort(reason.to_string())).await
    }

    fn fatal(&self) -> ApiError {
        ApiError::Fatal {
            message: self.state.failure.clone().unwrap_or_default(),
        }
    }

    async fn run_effect(&self, effect: Effect) -> Command {
        match effect {
            Effect::LoadExpedientes { empresa_id } => {
                debug!(empresa = %empresa_id, "Loading expedientes");
                match self
                    .collaborators
                    .expedientes
                    .list_by_empresa(&empresa_id)
                    .await
                {
                    Ok(expedientes) => Command::ExpedientesLoaded(expedientes),
                    Err(e) => Command::Abort(format!("Could not load expedientes: {e}")),
                }
            }
            Effect::LoadCandidateParents { empresa_id } => {
                debug!(empresa = %empresa_id, "Loading candidate parents");
                match self
                    .collaborators
                    .resoluciones
                    .list_by_empresa(&empresa_id)
                    .await
                {
                    Ok(resolutions) => Command::CandidateParentsLoaded(resolutions),
                    Err(e) => Command::Abort(format!("Could not load resolutions: {e}")),
                }
            }
            Effect::LoadExistingNumbers { year } => self.load_existing_numbers(year).await,
            Effect::Persist(draft) => {
                debug!(numero = %draft.full_number(), "Persisting resolution");
                match self.collaborators.resoluciones.create(&draft).await {
                    Ok(resolution) => {
                        info!(
                            resolucion = %resolution.full_number(),
                            id = %resolution.id,
                            tipo = %resolution.tipo_resolucion,
                            "Created resolution"
                        );
                        Command::SubmissionSucceeded(resolution)
                    }
                    Err(e) => {
                        warn!(
                            numero = %draft.full_number(),
                            error = %e,
                            "Resolution was not stored"
                        );
                        Command::SubmissionFailed(e.to_string())
                    }
                }
            }
        }
    }

    async fn load_existing_numbers(&self, year: i32) -> Command {
        debug!(year, "Loading issued resolution numbers");
        match self.collaborators.resoluciones.list_full_numbers(year).await {
            Ok(numbers) => Command::ExistingNumbersLoaded { year, numbers },
            Err(e) => Command::Abort(format!("Could not load issued numbers: {e}")),
        }
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Commands that read and write a JSON data file.
//!
//! Each command restores the store from the file, runs against it and writes
//! it back only when something changed.

use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use resoluciones::{Command, CreationPolicy};
use resoluciones_api::{
    ApiError, Collaborators, CreationSession, ExpedienteLookup, NewExpediente,
    ResolutionRepository, StaticUser, change_expediente_tramite, deactivate_resolution,
    expire_overdue,
};
use resoluciones_domain::{
    Empresa, EmpresaId, EstadoExpediente, Expediente, ExpedienteId, Resolution, ResolutionId,
    TipoTramite,
};
use resoluciones_persistence::Persistence;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use time::Date;
use tracing::{debug, error, info};

/// Restores the store kept in `path`; a missing file is an empty store.
///
/// # Errors
///
/// Returns an error if the file cannot be read or holds invalid records.
pub async fn load(path: &Path) -> Result<Persistence> {
    if !tokio::fs::try_exists(path).await? {
        debug!(path = %path.display(), "Data file not found, starting empty");
        return Ok(Persistence::new_in_memory());
    }

    let json: String = tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    Persistence::from_json(&json).wrap_err_with(|| format!("Failed to load {}", path.display()))
}

/// Writes every record of `store` to `path`.
///
/// # Errors
///
/// Returns an error if the store cannot be serialized or the file written.
pub async fn save(store: &Persistence, path: &Path) -> Result<()> {
    let json: String = store.to_json().await?;
    tokio::fs::write(path, json)
        .await
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), store = store.name(), "Saved data file");
    Ok(())
}

/// Registers an empresa.
///
/// # Errors
///
/// Returns an error if the identifier is taken or the file cannot be updated.
pub async fn add_empresa(path: &Path, empresa: Empresa) -> Result<Empresa> {
    let store: Persistence = load(path).await?;
    store.insert_empresa(empresa.clone()).await?;
    save(&store, path).await?;
    info!(empresa = %empresa.id, "Registered empresa");
    Ok(empresa)
}

/// Registers an expediente.
///
/// # Errors
///
/// Returns an error if the store rejects the expediente.
pub async fn add_expediente(path: &Path, data: NewExpediente) -> Result<Expediente> {
    let store: Persistence = load(path).await?;
    let expediente: Expediente = ExpedienteLookup::create(&store, data).await?;
    save(&store, path).await?;
    Ok(expediente)
}

/// Lists an empresa's expedientes, inactive ones included.
///
/// # Errors
///
/// Returns an error if the data file cannot be loaded.
pub async fn list_expedientes(path: &Path, empresa: &EmpresaId) -> Result<Vec<Expediente>> {
    let store: Persistence = load(path).await?;
    Ok(ExpedienteLookup::list_by_empresa(&store, empresa).await?)
}

/// Moves an expediente to a new processing state.
///
/// # Errors
///
/// Returns an error if the transition is not allowed or the file cannot be
/// updated.
pub async fn transition_expediente(
    path: &Path,
    id: &ExpedienteId,
    estado: EstadoExpediente,
) -> Result<Expediente> {
    let store: Persistence = load(path).await?;
    let expediente: Expediente =
        resoluciones_api::transition_expediente(&store, id, estado).await?;
    save(&store, path).await?;
    Ok(expediente)
}

/// Changes the procedure type of an expediente no resolution cites yet.
///
/// # Errors
///
/// Returns an error if a resolution cites the expediente or the file cannot
/// be updated.
pub async fn change_tramite(
    path: &Path,
    id: &ExpedienteId,
    tipo_tramite: TipoTramite,
) -> Result<Expediente> {
    let store: Persistence = load(path).await?;
    let expediente: Expediente =
        change_expediente_tramite(&store, &store, id, tipo_tramite).await?;
    save(&store, path).await?;
    Ok(expediente)
}

/// Deactivates an expediente.
///
/// # Errors
///
/// Returns an error if the expediente does not exist or the file cannot be
/// updated.
pub async fn deactivate_expediente(path: &Path, id: &ExpedienteId) -> Result<Expediente> {
    let store: Persistence = load(path).await?;
    let expediente: Expediente = resoluciones_api::deactivate_expediente(&store, id).await?;
    save(&store, path).await?;
    Ok(expediente)
}

/// How the new resolution picks its expediente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpedienteChoice {
    /// A stored expediente.
    Existing(ExpedienteId),
    /// A typed expediente, for empresas with none stored.
    Manual {
        numero: String,
        fecha_emision: Date,
        tipo_tramite: TipoTramite,
    },
}

/// How the new resolution cites its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentChoice {
    None,
    System(ResolutionId),
    Manual(String),
}

/// Everything the creation form needs from the command line.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub empresa: EmpresaId,
    pub expediente: ExpedienteChoice,
    pub numero: String,
    pub fecha_emision: Option<Date>,
    pub parent: ParentChoice,
    pub fecha_vigencia_inicio: Option<Date>,
    pub anios_vigencia: Option<u8>,
    pub descripcion: Option<String>,
    pub observaciones: Option<String>,
    pub usuario: String,
    pub today: Date,
}

impl CreateRequest {
    fn commands(&self) -> Vec<Command> {
        let mut commands: Vec<Command> = Vec::new();
        match &self.expediente {
            ExpedienteChoice::Existing(id) => {
                commands.push(Command::SelectExpediente(id.clone()));
            }
            ExpedienteChoice::Manual {
                numero,
                fecha_emision,
                tipo_tramite,
            } => {
                commands.push(Command::StartManualExpediente);
                commands.push(Command::EnterManualExpediente {
                    numero: numero.clone(),
                    fecha_emision: *fecha_emision,
                    tipo_tramite: *tipo_tramite,
                    descripcion: self.descripcion.clone(),
                });
            }
        }
        commands.push(Command::ConfirmExpediente);

        if let Some(fecha) = self.fecha_emision {
            commands.push(Command::ChangeFechaEmision(fecha));
        }
        commands.push(Command::ChangeNumero(self.numero.clone()));
        match &self.parent {
            ParentChoice::None => {}
            ParentChoice::System(id) => commands.push(Command::SelectParent(id.clone())),
            ParentChoice::Manual(number) => {
                commands.push(Command::EnterManualParent(number.clone()));
            }
        }
        if let Some(inicio) = self.fecha_vigencia_inicio {
            commands.push(Command::ChangeVigenciaInicio(inicio));
        }
        if let Some(anios) = self.anios_vigencia {
            commands.push(Command::ChangeAniosVigencia(anios));
        }
        if self.descripcion.is_some() {
            commands.push(Command::ChangeDescripcion(self.descripcion.clone()));
        }
        if self.observaciones.is_some() {
            commands.push(Command::ChangeObservaciones(self.observaciones.clone()));
        }
        commands
    }
}

/// Runs the creation form non-interactively and stores the resolution.
///
/// # Errors
///
/// Returns an error if a step is rejected, validation fails (every field
/// message is logged) or the store refuses the write.
pub async fn create_resolution(path: &Path, request: &CreateRequest) -> Result<Resolution> {
    let store: Persistence = load(path).await?;
    let mut session: CreationSession<'_, Persistence, Persistence, Persistence> =
        CreationSession::new(
            Collaborators {
                empresas: &store,
                expedientes: &store,
                resoluciones: &store,
            },
            &StaticUser(request.usuario.clone()),
            request.today,
            CreationPolicy::default(),
        );

    session.select_empresa(&request.empresa).await?;
    for command in request.commands() {
        session.dispatch(command).await?;
    }

    let created: Resolution = match session.submit().await {
        Ok(created) => created,
        Err(ApiError::FormRejected { errors }) => {
            for e in &errors {
                error!(field = e.field, "{}", e.message);
            }
            return Err(eyre!("Resolution rejected with {} error(s)", errors.len()));
        }
        Err(e) => return Err(e.into()),
    };

    save(&store, path).await?;
    Ok(created)
}

/// Lists an empresa's resolutions.
///
/// # Errors
///
/// Returns an error if the data file cannot be loaded.
pub async fn list_resolutions(path: &Path, empresa: &EmpresaId) -> Result<Vec<Resolution>> {
    let store: Persistence = load(path).await?;
    Ok(ResolutionRepository::list_by_empresa(&store, empresa).await?)
}

/// Marks an empresa's overdue resolutions as VENCIDA.
///
/// # Errors
///
/// Returns an error if the sweep fails or the file cannot be updated.
pub async fn expire(path: &Path, empresa: &EmpresaId, today: Date) -> Result<Vec<Resolution>> {
    let store: Persistence = load(path).await?;
    let expired: Vec<Resolution> = expire_overdue(&store, empresa, today).await?;
    if !expired.is_empty() {
        save(&store, path).await?;
    }
    Ok(expired)
}

/// Deactivates a resolution.
///
/// # Errors
///
/// Returns an error if the resolution does not exist or the file cannot be
/// updated.
pub async fn deactivate(path: &Path, id: &ResolutionId) -> Result<Resolution> {
    let store: Persistence = load(path).await?;
    let resolution: Resolution = deactivate_resolution(&store, id).await?;
    save(&store, path).await?;
    Ok(resolution)
}

/// One line per record for text output.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct Listing<T>(pub Vec<T>);

impl fmt::Display for Listing<Resolution> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "No resolutions");
        }
        for (index, resolution) in self.0.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", ResolutionLine(resolution))?;
        }
        Ok(())
    }
}

impl fmt::Display for Listing<Expediente> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "No expedientes");
        }
        for (index, expediente) in self.0.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", ExpedienteLine(expediente))?;
        }
        Ok(())
    }
}

/// A resolution rendered on one line.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ResolutionLine<'a>(pub &'a Resolution);

impl fmt::Display for ResolutionLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resolution: &Resolution = self.0;
        write!(
            f,
            "{} {} {} {}",
            resolution.full_number(),
            resolution.tipo_resolucion,
            resolution.tipo_tramite,
            resolution.estado
        )?;
        if let (Some(inicio), Some(fin)) =
            (resolution.fecha_vigencia_inicio, resolution.fecha_vigencia_fin)
        {
            write!(f, " {inicio} .. {fin}")?;
        }
        if let Some(parent) = &resolution.resolucion_padre_id {
            write!(f, " parent={}", parent.as_stored())?;
        }
        if !resolution.esta_activo {
            write!(f, " (inactive)")?;
        }
        Ok(())
    }
}

/// An empresa rendered on one line.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct EmpresaLine<'a>(pub &'a Empresa);

impl fmt::Display for EmpresaLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.0.id, self.0.ruc, self.0.razon_social)
    }
}

/// An expediente rendered on one line.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ExpedienteLine<'a>(pub &'a Expediente);

impl fmt::Display for ExpedienteLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} id={}",
            self.0.full_number(),
            self.0.tipo_tramite,
            self.0.estado,
            self.0.id
        )?;
        if !self.0.esta_activo {
            write!(f, " (inactive)")?;
        }
        Ok(())
    }
}

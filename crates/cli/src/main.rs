// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # resoluciones
//!
//! Command line for the resolution numbering and vigency rules, and for a
//! JSON data file holding empresas, expedientes and resoluciones.
//!
//! - `number`, `vigency`, `classify` and `date` only evaluate rules
//! - `empresa`, `expediente` and `resolution` read and update `--data`
//!
//! Logging goes to stderr; `RUST_LOG` overrides the `-v`/`-q` level.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod engine;
mod store;

#[cfg(test)]
mod tests;

use std::fmt::Display;
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::eyre};
use engine::PrefixArg;
use resoluciones_api::NewExpediente;
use resoluciones_domain::{
    DomainError, Empresa, EmpresaId, EstadoExpediente, ExpedienteId, LIMA_OFFSET, ResolutionId,
    TipoTramite,
};
use serde::Serialize;
use store::{
    CreateRequest, EmpresaLine, ExpedienteChoice, ExpedienteLine, Listing, ParentChoice,
    ResolutionLine,
};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let filter: EnvFilter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match args.run().await {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    async fn run(self) -> Result<()> {
        self.command.run(self.json).await
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Format, parse and suggest `E-####-YYYY` / `R-####-YYYY` numbers
    #[command(subcommand, visible_alias = "n")]
    Number(NumberCommand),

    /// Compute a vigency window
    #[command(visible_alias = "v")]
    Vigency {
        /// Procedure type (`AUTORIZACION_NUEVA`, `RENOVACION`, ...)
        #[arg(short, long, value_parser = parse_tramite)]
        tramite: TipoTramite,

        /// First day in force (`YYYY-MM-DD`)
        #[arg(short, long, value_parser = parse_date)]
        start: Date,

        /// Duration in years
        #[arg(short, long, default_value_t = resoluciones_domain::DEFAULT_ANIOS_VIGENCIA)]
        years: u8,

        /// Reference day for the status (defaults to today in UTC-5)
        #[arg(long, value_parser = parse_date)]
        today: Option<Date>,
    },

    /// Show how an expediente of a procedure type resolves
    #[command(visible_alias = "c")]
    Classify {
        /// Procedure type label
        tramite: String,
    },

    /// Render a date or RFC 3339 instant for documents
    #[command(visible_alias = "d")]
    Date {
        /// `YYYY-MM-DD` (midnight in UTC-5) or an RFC 3339 instant
        #[arg(value_parser = parse_instant)]
        value: OffsetDateTime,
    },

    /// Manage empresas in the data file
    #[command(subcommand)]
    Empresa(EmpresaCommand),

    /// Manage expedientes in the data file
    #[command(subcommand)]
    Expediente(ExpedienteCommand),

    /// Create and maintain resolutions in the data file
    #[command(subcommand, visible_alias = "r")]
    Resolution(ResolutionCommand),
}

#[derive(Debug, Subcommand)]
enum NumberCommand {
    /// Build the full number for a typed sequence
    Format {
        /// The sequence as typed (`7`, `0007`)
        raw: String,
        /// Emission year
        #[arg(short, long)]
        year: i32,
        /// Entity prefix
        #[arg(short, long, value_enum, default_value_t = PrefixArg::R)]
        prefix: PrefixArg,
    },
    /// Split a full number into its components
    Parse {
        /// The full number (`R-0007-2025`)
        full_number: String,
    },
    /// Suggest the next free number
    Next {
        /// Emission year
        #[arg(short, long)]
        year: i32,
        /// Entity prefix
        #[arg(short, long, value_enum, default_value_t = PrefixArg::R)]
        prefix: PrefixArg,
        /// Numbers already issued
        existing: Vec<String>,
    },
}

#[derive(Debug, ClapArgs)]
struct DataArg {
    /// JSON data file; created on first write
    #[arg(short, long, env = "RESOLUCIONES_DATA", default_value = "resoluciones.json")]
    data: PathBuf,
}

#[derive(Debug, Subcommand)]
enum EmpresaCommand {
    /// Register an empresa
    Add {
        #[command(flatten)]
        data: DataArg,
        /// Identifier
        #[arg(long)]
        id: String,
        /// Tax identification number
        #[arg(long)]
        ruc: String,
        /// Registered company name
        #[arg(long)]
        razon_social: String,
    },
}

#[derive(Debug, Subcommand)]
enum ExpedienteCommand {
    /// Register an expediente
    Add {
        #[command(flatten)]
        data: DataArg,
        /// Owning empresa
        #[arg(long)]
        empresa: String,
        /// Sequence as typed
        #[arg(long)]
        numero: String,
        /// Emission date (`YYYY-MM-DD`)
        #[arg(long, value_parser = parse_date)]
        fecha: Date,
        /// Procedure type
        #[arg(long, value_parser = parse_tramite)]
        tramite: TipoTramite,
        /// Free-text description
        #[arg(long)]
        descripcion: Option<String>,
    },
    /// List an empresa's expedientes
    List {
        #[command(flatten)]
        data: DataArg,
        /// Owning empresa
        #[arg(long)]
        empresa: String,
    },
    /// Move an expediente to a new processing state
    Transition {
        #[command(flatten)]
        data: DataArg,
        /// Expediente identifier
        id: String,
        /// Target state (`APROBADO`, `SUSPENDIDO`, ...)
        #[arg(long, value_parser = parse_estado)]
        to: EstadoExpediente,
    },
    /// Change the procedure type while no resolution cites the expediente
    Tramite {
        #[command(flatten)]
        data: DataArg,
        /// Expediente identifier
        id: String,
        /// New procedure type
        #[arg(long, value_parser = parse_tramite)]
        tramite: TipoTramite,
    },
    /// Deactivate an expediente
    Deactivate {
        #[command(flatten)]
        data: DataArg,
        /// Expediente identifier
        id: String,
    },
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Subcommand)]
enum ResolutionCommand {
    /// Run the creation form and store the resolution
    Create(CreateArgs),
    /// List an empresa's resolutions
    List {
        #[command(flatten)]
        data: DataArg,
        /// Owning empresa
        #[arg(long)]
        empresa: String,
    },
    /// Mark overdue resolutions as VENCIDA
    Expire {
        #[command(flatten)]
        data: DataArg,
        /// Owning empresa
        #[arg(long)]
        empresa: String,
        /// Reference day (defaults to today in UTC-5)
        #[arg(long, value_parser = parse_date)]
        today: Option<Date>,
    },
    /// Deactivate a resolution
    Deactivate {
        #[command(flatten)]
        data: DataArg,
        /// Resolution identifier
        id: String,
    },
}

#[derive(Debug, ClapArgs)]
struct CreateArgs {
    #[command(flatten)]
    data: DataArg,
    /// Owning empresa
    #[arg(long)]
    empresa: String,
    /// Stored expediente identifier
    #[arg(
        long,
        conflicts_with = "manual_expediente",
        required_unless_present = "manual_expediente"
    )]
    expediente: Option<String>,
    /// Sequence of an expediente that is not stored (only when the empresa has none)
    #[arg(long, requires = "tramite")]
    manual_expediente: Option<String>,
    /// Procedure type of the typed expediente
    #[arg(long, value_parser = parse_tramite)]
    tramite: Option<TipoTramite>,
    /// Emission date of the typed expediente (defaults to today)
    #[arg(long, value_parser = parse_date)]
    expediente_fecha: Option<Date>,
    /// Resolution sequence as typed
    #[arg(long)]
    numero: String,
    /// Emission date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    fecha: Option<Date>,
    /// Parent resolution identifier
    #[arg(long, conflicts_with = "padre_manual")]
    padre: Option<String>,
    /// Parent number when it is not in the system (`R-0012-2020`)
    #[arg(long)]
    padre_manual: Option<String>,
    /// First day in force (defaults to the emission date)
    #[arg(long, value_parser = parse_date)]
    inicio: Option<Date>,
    /// Duration in years
    #[arg(long)]
    anios: Option<u8>,
    /// Free-text description
    #[arg(long)]
    descripcion: Option<String>,
    /// Free-text observations
    #[arg(long)]
    observaciones: Option<String>,
    /// Issuing user
    #[arg(long, env = "RESOLUCIONES_USER", default_value = "cli")]
    usuario: String,
    /// Reference day (defaults to today in UTC-5)
    #[arg(long, value_parser = parse_date)]
    today: Option<Date>,
}

impl CreateArgs {
    fn into_request(self) -> Result<CreateRequest> {
        let today: Date = self.today.unwrap_or_else(lima_today);
        let expediente: ExpedienteChoice =
            match (self.expediente, self.manual_expediente, self.tramite) {
                (Some(id), _, _) => ExpedienteChoice::Existing(ExpedienteId::new(id)),
                (None, Some(numero), Some(tipo_tramite)) => ExpedienteChoice::Manual {
                    numero,
                    fecha_emision: self.expediente_fecha.unwrap_or(today),
                    tipo_tramite,
                },
                (None, Some(numero), None) => {
                    return Err(eyre!("Manual expediente {numero} needs --tramite"));
                }
                (None, None, _) => {
                    return Err(eyre!("Either --expediente or --manual-expediente is required"));
                }
            };
        let parent: ParentChoice = match (self.padre, self.padre_manual) {
            (Some(id), _) => ParentChoice::System(ResolutionId::new(id)),
            (None, Some(number)) => ParentChoice::Manual(number),
            (None, None) => ParentChoice::None,
        };

        Ok(CreateRequest {
            empresa: EmpresaId::new(self.empresa),
            expediente,
            numero: self.numero,
            fecha_emision: self.fecha,
            parent,
            fecha_vigencia_inicio: self.inicio,
            anios_vigencia: self.anios,
            descripcion: self.descripcion,
            observaciones: self.observaciones,
            usuario: self.usuario,
            today,
        })
    }
}

impl Command {
    async fn run(self, json: bool) -> Result<()> {
        match self {
            Self::Number(command) => command.run(json),
            Self::Vigency {
                tramite,
                start,
                years,
                today,
            } => emit(
                &engine::vigency(tramite, start, years, today.unwrap_or_else(lima_today))?,
                json,
            ),
            Self::Classify { tramite } => emit(&engine::classify(&tramite)?, json),
            Self::Date { value } => emit(&engine::dates(value), json),
            Self::Empresa(EmpresaCommand::Add {
                data,
                id,
                ruc,
                razon_social,
            }) => {
                let empresa: Empresa = Empresa::new(EmpresaId::new(id), &ruc, &razon_social);
                let empresa: Empresa = store::add_empresa(&data.data, empresa).await?;
                emit(&EmpresaLine(&empresa), json)
            }
            Self::Expediente(command) => command.run(json).await,
            Self::Resolution(command) => command.run(json).await,
        }
    }
}

impl ExpedienteCommand {
    async fn run(self, json: bool) -> Result<()> {
        match self {
            Self::Add {
                data,
                empresa,
                numero,
                fecha,
                tramite,
                descripcion,
            } => {
                let expediente = store::add_expediente(
                    &data.data,
                    NewExpediente {
                        numero,
                        fecha_emision: fecha,
                        tipo_tramite: tramite,
                        empresa_id: EmpresaId::new(empresa),
                        descripcion,
                    },
                )
                .await?;
                emit(&ExpedienteLine(&expediente), json)
            }
            Self::List { data, empresa } => {
                let expedientes =
                    store::list_expedientes(&data.data, &EmpresaId::new(empresa)).await?;
                emit(&Listing(expedientes), json)
            }
            Self::Transition { data, id, to } => {
                let expediente =
                    store::transition_expediente(&data.data, &ExpedienteId::new(id), to).await?;
                emit(&ExpedienteLine(&expediente), json)
            }
            Self::Tramite { data, id, tramite } => {
                let expediente =
                    store::change_tramite(&data.data, &ExpedienteId::new(id), tramite).await?;
                emit(&ExpedienteLine(&expediente), json)
            }
            Self::Deactivate { data, id } => {
                let expediente =
                    store::deactivate_expediente(&data.data, &ExpedienteId::new(id)).await?;
                emit(&ExpedienteLine(&expediente), json)
            }
        }
    }
}

impl NumberCommand {
    fn run(self, json: bool) -> Result<()> {
        let report = match self {
            Self::Format { raw, year, prefix } => engine::format(&raw, year, prefix)?,
            Self::Parse { full_number } => engine::parse(&full_number)?,
            Self::Next {
                year,
                prefix,
                existing,
            } => engine::next(existing, year, prefix)?,
        };
        emit(&report, json)
    }
}

impl ResolutionCommand {
    async fn run(self, json: bool) -> Result<()> {
        match self {
            Self::Create(args) => {
                let data: PathBuf = args.data.data.clone();
                let request: CreateRequest = args.into_request()?;
                let created = store::create_resolution(&data, &request).await?;
                emit(&ResolutionLine(&created), json)
            }
            Self::List { data, empresa } => {
                let resolutions =
                    store::list_resolutions(&data.data, &EmpresaId::new(empresa)).await?;
                emit(&Listing(resolutions), json)
            }
            Self::Expire {
                data,
                empresa,
                today,
            } => {
                let expired = store::expire(
                    &data.data,
                    &EmpresaId::new(empresa),
                    today.unwrap_or_else(lima_today),
                )
                .await?;
                emit(&Listing(expired), json)
            }
            Self::Deactivate { data, id } => {
                let resolution = store::deactivate(&data.data, &ResolutionId::new(id)).await?;
                emit(&ResolutionLine(&resolution), json)
            }
        }
    }
}

#[allow(clippy::print_stdout)]
fn emit<T: Serialize + Display>(report: &T, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn lima_today() -> Date {
    OffsetDateTime::now_utc().to_offset(LIMA_OFFSET).date()
}

fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))
}

fn parse_instant(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    let value: &str = value.trim();
    OffsetDateTime::parse(value, &Rfc3339).or_else(|_| {
        parse_date(value).map(|date| date.with_time(Time::MIDNIGHT).assume_offset(LIMA_OFFSET))
    })
}

fn parse_tramite(value: &str) -> Result<TipoTramite, DomainError> {
    value.trim().parse()
}

fn parse_estado(value: &str) -> Result<EstadoExpediente, DomainError> {
    value.trim().parse()
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Commands over the pure numbering, vigency and classification rules.

use clap::ValueEnum;
use resoluciones_domain::{
    Classification, DomainError, EstadoResolucion, NumberPrefix, NumberingSnapshot, ParsedNumber,
    TipoResolucion, TipoTramite, Vigencia, classify_label, compute_for_tramite,
    format_long_spanish_date, format_number, format_short_lima_date, is_applicable,
    parse_number, status_on, suggest_next_number, tipo_resolucion_for, validate_duration,
    validate_number_input,
};
use serde::Serialize;
use std::fmt;
use time::{Date, OffsetDateTime};

time::serde::format_description!(fecha_iso, Date, "[year]-[month]-[day]");

/// Number prefix as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PrefixArg {
    /// Expediente (`E-####-YYYY`)
    E,
    /// Resolution (`R-####-YYYY`)
    R,
}

impl From<PrefixArg> for NumberPrefix {
    fn from(prefix: PrefixArg) -> Self {
        match prefix {
            PrefixArg::E => Self::Expediente,
            PrefixArg::R => Self::Resolucion,
        }
    }
}

/// A full number and its components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberReport {
    pub full_number: String,
    pub prefix: char,
    pub numero: String,
    pub year: i32,
}

impl From<ParsedNumber> for NumberReport {
    fn from(parsed: ParsedNumber) -> Self {
        Self {
            full_number: parsed.to_full_number(),
            prefix: parsed.prefix.letter(),
            numero: parsed.numero,
            year: parsed.year,
        }
    }
}

impl fmt::Display for NumberReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_number)
    }
}

/// Builds the full number for a typed sequence.
///
/// # Errors
///
/// Returns an error if the sequence is empty, zero or longer than 4 digits.
pub fn format(raw: &str, year: i32, prefix: PrefixArg) -> Result<NumberReport, DomainError> {
    let numero: String = validate_number_input(raw)?;
    let full_number: String = format_number(&numero, year, prefix.into());
    parse_number(&full_number).map(NumberReport::from)
}

/// Splits a full number into its components.
///
/// # Errors
///
/// Returns an error if the number does not match `X-####-YYYY`.
pub fn parse(full_number: &str) -> Result<NumberReport, DomainError> {
    parse_number(full_number.trim()).map(NumberReport::from)
}

/// Suggests the next free number for `year` given the numbers already issued.
///
/// # Errors
///
/// Returns an error if the suggestion cannot be parsed back, which only
/// happens for years outside four digits.
pub fn next(existing: Vec<String>, year: i32, prefix: PrefixArg) -> Result<NumberReport, DomainError> {
    let snapshot: NumberingSnapshot = existing
        .into_iter()
        .map(|number| number.trim().to_string())
        .collect();
    parse(&suggest_next_number(&snapshot, year, prefix.into()))
}

/// A computed vigency window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VigencyReport {
    pub tipo_tramite: TipoTramite,
    pub applicable: bool,
    #[serde(with = "fecha_iso::option")]
    pub fecha_vigencia_inicio: Option<Date>,
    #[serde(with = "fecha_iso::option")]
    pub fecha_vigencia_fin: Option<Date>,
    pub anios_vigencia: Option<u8>,
    pub estado: Option<EstadoResolucion>,
}

impl fmt::Display for VigencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.fecha_vigencia_inicio, self.fecha_vigencia_fin, self.anios_vigencia) {
            (Some(inicio), Some(fin), Some(anios)) => {
                write!(f, "{inicio} .. {fin} ({anios} years)")?;
                if let Some(estado) = self.estado {
                    write!(f, " {estado}")?;
                }
                Ok(())
            }
            _ => write!(
                f,
                "{} inherits its vigency from the parent resolution",
                self.tipo_tramite
            ),
        }
    }
}

/// Computes the vigency window of a procedure type starting on `inicio`.
///
/// # Errors
///
/// Returns an error if the duration is outside 1..=20 years or the end date
/// overflows.
pub fn vigency(
    tipo_tramite: TipoTramite,
    inicio: Date,
    anios: u8,
    today: Date,
) -> Result<VigencyReport, DomainError> {
    validate_duration(anios)?;
    let report: VigencyReport = match compute_for_tramite(tipo_tramite, inicio, anios)? {
        Vigencia::Window { inicio, fin, anios } => VigencyReport {
            tipo_tramite,
            applicable: true,
            fecha_vigencia_inicio: Some(inicio),
            fecha_vigencia_fin: Some(fin),
            anios_vigencia: Some(anios),
            estado: Some(status_on(fin, today)),
        },
        Vigencia::NotApplicable => VigencyReport {
            tipo_tramite,
            applicable: false,
            fecha_vigencia_inicio: None,
            fecha_vigencia_fin: None,
            anios_vigencia: None,
            estado: None,
        },
    };
    Ok(report)
}

/// How an expediente of a procedure type resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationReport {
    pub tipo_tramite: TipoTramite,
    pub tipo_resolucion: TipoResolucion,
    pub vigency_applicable: bool,
    #[serde(flatten)]
    pub classification: Classification,
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} (parent: {:?}, inherits vigency: {})",
            self.tipo_tramite,
            self.tipo_resolucion,
            self.classification.parent_enforcement,
            self.classification.inherits_vigency
        )
    }
}

/// Classifies a procedure type label.
///
/// # Errors
///
/// Returns an error for unknown or legacy labels.
pub fn classify(label: &str) -> Result<ClassificationReport, DomainError> {
    let classification: Classification = classify_label(label.trim())?;
    let tipo_tramite: TipoTramite = label.trim().parse()?;
    Ok(ClassificationReport {
        tipo_tramite,
        tipo_resolucion: tipo_resolucion_for(tipo_tramite),
        vigency_applicable: is_applicable(tipo_tramite),
        classification,
    })
}

/// An instant rendered for documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateReport {
    pub long: String,
    pub short: String,
}

impl fmt::Display for DateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.long, self.short)
    }
}

/// Renders an instant in the long Spanish and short `dd/mm/yyyy` forms.
#[must_use]
pub fn dates(at: OffsetDateTime) -> DateReport {
    DateReport {
        long: format_long_spanish_date(at),
        short: format_short_lima_date(at),
    }
}

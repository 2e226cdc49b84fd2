// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod classifier;
mod error;
mod hierarchy;
mod numbering;
mod types;
mod vigencia;

#[cfg(test)]
mod tests;

pub use classifier::{
    Classification, ExpedienteKind, ParentEnforcement, classify, classify_label,
    tipo_resolucion_for,
};
pub use hierarchy::{
    HierarchyDecision, InheritanceMode, InheritedDates, inherit_dates, resolve, select_parent,
};
pub use numbering::{
    NUMBER_WIDTH, NumberPrefix, NumberingSnapshot, ParsedNumber, ensure_unique, format_number,
    is_unique, parse_number, sanitize_while_typing, suggest_next_number, validate_number_input,
};
pub use vigencia::{
    DEFAULT_ANIOS_VIGENCIA, LIMA_OFFSET, MAX_ANIOS_VIGENCIA, MIN_ANIOS_VIGENCIA, Vigencia,
    compute_end, compute_for_tramite, format_long_spanish_date, format_short_lima_date,
    is_applicable, status_on, validate_duration, years_between,
};

// Re-export public types
pub use error::DomainError;
pub use types::{
    Empresa, EmpresaId, EstadoExpediente, EstadoResolucion, Expediente, ExpedienteId,
    ExternalMetadata, MANUAL_PREFIX, ParentReference, Resolution, ResolutionId, TipoResolucion,
    TipoTramite,
};

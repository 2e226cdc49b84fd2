// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Maps a procedure type to the behavior of the expediente it opens.

use crate::error::DomainError;
use crate::types::{TipoResolucion, TipoTramite};
use serde::Serialize;

/// Whether an expediente originates a parent or a child resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpedienteKind {
    /// Resolves into a PADRE resolution.
    PadreOrigin,
    /// Resolves into a HIJO resolution.
    HijoOrigin,
}

/// How strictly a parent reference is demanded at validation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParentEnforcement {
    /// The procedure type never takes a parent.
    NotRequired,
    /// A parent may be referenced but is never demanded.
    Optional,
    /// Policy requires a parent, but submission is not blocked without one.
    Soft,
    /// Submission is blocked until a parent (system or manual) is supplied.
    Hard,
}

impl ParentEnforcement {
    /// Returns whether a parent reference can be attached at all.
    #[must_use]
    pub const fn accepts_parent(self) -> bool {
        !matches!(self, Self::NotRequired)
    }

    /// Returns whether submission must be blocked without a parent.
    #[must_use]
    pub const fn blocks_submission(self) -> bool {
        matches!(self, Self::Hard)
    }
}

/// The behavioral category of an expediente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Parent or child origin.
    pub kind: ExpedienteKind,
    /// Whether business policy expects a parent resolution.
    pub requires_parent_resolution: bool,
    /// How the parent expectation is enforced.
    pub parent_enforcement: ParentEnforcement,
    /// Whether the resolution copies its vigency window from the parent.
    pub inherits_vigency: bool,
}

impl Classification {
    /// The resolution type an expediente of this classification produces.
    #[must_use]
    pub const fn tipo_resolucion(&self) -> TipoResolucion {
        match self.kind {
            ExpedienteKind::PadreOrigin => TipoResolucion::Padre,
            ExpedienteKind::HijoOrigin => TipoResolucion::Hijo,
        }
    }
}

/// Classifies a procedure type.
///
/// The mapping is exhaustive:
///
/// | tramite            | kind   | requires parent | enforcement | inherits vigency |
/// |--------------------|--------|-----------------|-------------|------------------|
/// | AUTORIZACION_NUEVA | PADRE  | no              | not required| no               |
/// | RENOVACION         | PADRE  | no              | optional    | no               |
/// | INCREMENTO         | HIJO   | yes             | soft        | yes              |
/// | SUSTITUCION        | HIJO   | yes             | soft        | yes              |
/// | OTROS              | HIJO   | yes             | hard        | yes              |
#[must_use]
pub const fn classify(tipo_tramite: TipoTramite) -> Classification {
    match tipo_tramite {
        TipoTramite::AutorizacionNueva => Classification {
            kind: ExpedienteKind::PadreOrigin,
            requires_parent_resolution: false,
            parent_enforcement: ParentEnforcement::NotRequired,
            inherits_vigency: false,
        },
        TipoTramite::Renovacion => Classification {
            kind: ExpedienteKind::PadreOrigin,
            requires_parent_resolution: false,
            parent_enforcement: ParentEnforcement::Optional,
            inherits_vigency: false,
        },
        TipoTramite::Incremento | TipoTramite::Sustitucion => Classification {
            kind: ExpedienteKind::HijoOrigin,
            requires_parent_resolution: true,
            parent_enforcement: ParentEnforcement::Soft,
            inherits_vigency: true,
        },
        TipoTramite::Otros => Classification {
            kind: ExpedienteKind::HijoOrigin,
            requires_parent_resolution: true,
            parent_enforcement: ParentEnforcement::Hard,
            inherits_vigency: true,
        },
    }
}

/// Classifies a procedure type given by its wire label.
///
/// # Errors
///
/// Returns an error if:
/// - The label is unknown (`DomainError::UnknownTramiteType`)
/// - The label is a legacy value without an agreed mapping
///   (`DomainError::LegacyTramiteLabel`)
pub fn classify_label(label: &str) -> Result<Classification, DomainError> {
    let tipo_tramite: TipoTramite = label.parse()?;
    Ok(classify(tipo_tramite))
}

/// The resolution type produced by an expediente with this procedure type.
#[must_use]
pub const fn tipo_resolucion_for(tipo_tramite: TipoTramite) -> TipoResolucion {
    classify(tipo_tramite).tipo_resolucion()
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::numbering::{NumberPrefix, format_number, parse_number};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use time::Date;

time::serde::format_description!(fecha_iso, Date, "[year]-[month]-[day]");

/// Prefix used for references that do not point at a persisted record.
pub const MANUAL_PREFIX: &str = "MANUAL:";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an opaque identifier.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Opaque identifier of an empresa (transport company).
    EmpresaId
);
string_id!(
    /// Opaque identifier of an expediente.
    ExpedienteId
);
string_id!(
    /// Opaque identifier of a resolution.
    ResolutionId
);

impl ExpedienteId {
    /// Builds the identifier of a synthetic expediente that only exists in
    /// the creation form.
    #[must_use]
    pub fn manual(number: &str) -> Self {
        Self(format!("{MANUAL_PREFIX}{number}"))
    }

    /// Returns whether this identifier belongs to a synthetic expediente.
    #[must_use]
    pub fn is_manual(&self) -> bool {
        self.0.starts_with(MANUAL_PREFIX)
    }
}

/// The procedure type of an expediente.
///
/// This is the single closed set of procedure labels; every component
/// classifies against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum TipoTramite {
    /// First-time authorization.
    AutorizacionNueva,
    /// Renewal of an existing authorization.
    Renovacion,
    /// Fleet increment.
    Incremento,
    /// Vehicle substitution.
    Sustitucion,
    /// Any other modification.
    Otros,
}

impl TipoTramite {
    /// Every known procedure type, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::AutorizacionNueva,
        Self::Renovacion,
        Self::Incremento,
        Self::Sustitucion,
        Self::Otros,
    ];

    /// Converts this procedure type to its wire label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AutorizacionNueva => "AUTORIZACION_NUEVA",
            Self::Renovacion => "RENOVACION",
            Self::Incremento => "INCREMENTO",
            Self::Sustitucion => "SUSTITUCION",
            Self::Otros => "OTROS",
        }
    }
}

impl FromStr for TipoTramite {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AUTORIZACION_NUEVA" => Ok(Self::AutorizacionNueva),
            "RENOVACION" => Ok(Self::Renovacion),
            "INCREMENTO" => Ok(Self::Incremento),
            "SUSTITUCION" => Ok(Self::Sustitucion),
            "OTROS" => Ok(Self::Otros),
            // Still present in older records; no mapping has been agreed.
            "PRIMIGENIA" => Err(DomainError::LegacyTramiteLabel(s.to_string())),
            _ => Err(DomainError::UnknownTramiteType(s.to_string())),
        }
    }
}

impl TryFrom<String> for TipoTramite {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for TipoTramite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing state of an expediente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoExpediente {
    /// Under review. Initial state.
    #[default]
    EnProceso,
    /// Approved.
    Aprobado,
    /// Rejected.
    Rechazado,
    /// Temporarily suspended.
    Suspendido,
    /// Archived. Terminal.
    Archivado,
}

impl EstadoExpediente {
    /// Converts this state to its wire label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnProceso => "EN_PROCESO",
            Self::Aprobado => "APROBADO",
            Self::Rechazado => "RECHAZADO",
            Self::Suspendido => "SUSPENDIDO",
            Self::Archivado => "ARCHIVADO",
        }
    }

    /// Checks if a transition from this state to another is valid.
    ///
    /// Valid transitions are:
    /// - `EnProceso` → `Aprobado` | `Rechazado` | `Suspendido`
    /// - `Suspendido` → `EnProceso` | `Archivado`
    /// - `Aprobado` → `Archivado`
    /// - `Rechazado` → `Archivado`
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::EnProceso,
                Self::Aprobado | Self::Rechazado | Self::Suspendido
            ) | (Self::Suspendido, Self::EnProceso | Self::Archivado)
                | (Self::Aprobado | Self::Rechazado, Self::Archivado)
        )
    }
}

impl EstadoExpediente {
    /// Returns whether an expediente in this state may originate a resolution.
    #[must_use]
    pub const fn admits_resolution(&self) -> bool {
        matches!(self, Self::EnProceso | Self::Aprobado)
    }
}

impl FromStr for EstadoExpediente {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EN_PROCESO" => Ok(Self::EnProceso),
            "APROBADO" => Ok(Self::Aprobado),
            "RECHAZADO" => Ok(Self::Rechazado),
            "SUSPENDIDO" => Ok(Self::Suspendido),
            "ARCHIVADO" => Ok(Self::Archivado),
            _ => Err(DomainError::InvalidFormat {
                field: "estado",
                reason: format!("Unknown expediente state: {s}"),
            }),
        }
    }
}

impl std::fmt::Display for EstadoExpediente {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a resolution in the authorization hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoResolucion {
    /// Establishes or renews an authorization and owns its vigency window.
    Padre,
    /// Modifies an existing authorization and inherits its window.
    Hijo,
}

impl std::fmt::Display for TipoResolucion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Padre => f.write_str("PADRE"),
            Self::Hijo => f.write_str("HIJO"),
        }
    }
}

/// Legal status of a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoResolucion {
    /// In force.
    #[default]
    Vigente,
    /// Vigency window has ended.
    Vencida,
    /// Temporarily suspended.
    Suspendida,
    /// Revoked by the authority.
    Revocada,
    /// Annulled.
    Anulada,
}

impl std::fmt::Display for EstadoResolucion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Vigente => "VIGENTE",
            Self::Vencida => "VENCIDA",
            Self::Suspendida => "SUSPENDIDA",
            Self::Revocada => "REVOCADA",
            Self::Anulada => "ANULADA",
        };
        f.write_str(label)
    }
}

/// Metadata received from external systems.
///
/// Free-form keys are accepted; the well-known keys are exposed as constants.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalMetadata(BTreeMap<String, String>);

impl ExternalMetadata {
    /// Name of the system the record was imported from.
    pub const SISTEMA_ORIGEN: &'static str = "sistemaOrigen";
    /// Identifier of the record in the external system.
    pub const CODIGO_EXTERNO: &'static str = "codigoExterno";
    /// Timestamp of the last synchronization, as sent by the external system.
    pub const FECHA_SINCRONIZACION: &'static str = "fechaSincronizacion";

    /// Creates an empty metadata map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns a copy with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Looks up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns whether no metadata is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A transport company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Empresa {
    /// The empresa identifier.
    pub id: EmpresaId,
    /// Tax identification number.
    pub ruc: String,
    /// Registered company name.
    pub razon_social: String,
    /// Whether the empresa is active.
    pub esta_activo: bool,
}

impl Empresa {
    /// Creates a new active `Empresa`.
    #[must_use]
    pub fn new(id: EmpresaId, ruc: &str, razon_social: &str) -> Self {
        Self {
            id,
            ruc: ruc.to_string(),
            razon_social: razon_social.to_string(),
            esta_activo: true,
        }
    }
}

/// An administrative case file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expediente {
    /// The expediente identifier. Immutable.
    pub id: ExpedienteId,
    /// Zero-padded 4-digit sequence.
    pub numero: String,
    /// Issuance date; its year scopes the number.
    #[serde(with = "fecha_iso")]
    pub fecha_emision: Date,
    /// Procedure type driving classification.
    pub tipo_tramite: TipoTramite,
    /// The owning empresa.
    pub empresa_id: EmpresaId,
    /// Processing state.
    pub estado: EstadoExpediente,
    /// Free-text description.
    #[serde(default)]
    pub descripcion: Option<String>,
    /// Expedientes are never deleted, only deactivated.
    pub esta_activo: bool,
    /// Payload received from external systems.
    #[serde(default, skip_serializing_if = "ExternalMetadata::is_empty")]
    pub metadatos_externos: ExternalMetadata,
}

impl Expediente {
    /// Creates a new active expediente in the `EnProceso` state.
    ///
    /// # Arguments
    ///
    /// * `id` - The identifier assigned at creation
    /// * `numero` - The sequence number, already normalized to 4 digits
    /// * `fecha_emision` - The issuance date
    /// * `tipo_tramite` - The procedure type
    /// * `empresa_id` - The owning empresa
    #[must_use]
    pub const fn new(
        id: ExpedienteId,
        numero: String,
        fecha_emision: Date,
        tipo_tramite: TipoTramite,
        empresa_id: EmpresaId,
    ) -> Self {
        Self {
            id,
            numero,
            fecha_emision,
            tipo_tramite,
            empresa_id,
            estado: EstadoExpediente::EnProceso,
            descripcion: None,
            esta_activo: true,
            metadatos_externos: ExternalMetadata::new(),
        }
    }

    /// Builds a synthetic expediente for the manual entry path.
    ///
    /// The record only carries the procedure type and description into the
    /// creation form; it is never persisted.
    #[must_use]
    pub fn manual(
        full_number: &str,
        fecha_emision: Date,
        tipo_tramite: TipoTramite,
        empresa_id: EmpresaId,
        descripcion: Option<String>,
    ) -> Self {
        let numero: String = parse_number(full_number)
            .map_or_else(|_| full_number.to_string(), |parsed| parsed.numero);
        Self {
            id: ExpedienteId::manual(full_number),
            numero,
            fecha_emision,
            tipo_tramite,
            empresa_id,
            estado: EstadoExpediente::EnProceso,
            descripcion,
            esta_activo: true,
            metadatos_externos: ExternalMetadata::new(),
        }
    }

    /// Returns the display number (`E-0001-2025`).
    #[must_use]
    pub fn full_number(&self) -> String {
        format_number(&self.numero, self.fecha_emision.year(), NumberPrefix::Expediente)
    }

    /// Returns whether this is a synthetic, never-persisted expediente.
    #[must_use]
    pub fn is_manual(&self) -> bool {
        self.id.is_manual()
    }

    /// Moves the expediente to a new processing state.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The expediente has been deactivated
    /// - The transition is not allowed from the current state
    pub fn transition_to(&self, target: EstadoExpediente) -> Result<Self, DomainError> {
        if !self.esta_activo {
            return Err(DomainError::ExpedienteInactive(self.id.to_string()));
        }
        if !self.estado.can_transition_to(target) {
            return Err(DomainError::InvalidStateTransition {
                from: self.estado,
                to: target,
            });
        }
        Ok(Self {
            estado: target,
            ..self.clone()
        })
    }

    /// Returns a deactivated copy of this expediente.
    #[must_use]
    pub fn deactivate(&self) -> Self {
        Self {
            esta_activo: false,
            ..self.clone()
        }
    }

    /// Changes the procedure type.
    ///
    /// # Arguments
    ///
    /// * `tipo_tramite` - The new procedure type
    /// * `referenced_by_resolution` - Whether any resolution cites this expediente
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TramiteLocked` once a resolution references the expediente.
    pub fn change_tramite(
        &self,
        tipo_tramite: TipoTramite,
        referenced_by_resolution: bool,
    ) -> Result<Self, DomainError> {
        if referenced_by_resolution && tipo_tramite != self.tipo_tramite {
            return Err(DomainError::TramiteLocked(self.id.to_string()));
        }
        Ok(Self {
            tipo_tramite,
            ..self.clone()
        })
    }
}

/// Reference from a resolution to its parent.
///
/// Stored as the parent's identifier, or as `MANUAL:R-####-####` when the
/// parent is not known to the system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ParentReference {
    /// A resolution persisted in the system.
    System(ResolutionId),
    /// A free-text resolution number typed by the user.
    Manual(String),
}

impl ParentReference {
    /// Builds a manual reference from user input.
    ///
    /// Surrounding whitespace is ignored; the rest must match `R-####-####`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidFormat` if the input does not match the pattern.
    pub fn manual(raw: &str) -> Result<Self, DomainError> {
        let trimmed: &str = raw.trim();
        let parsed = parse_number(trimmed).map_err(|_| DomainError::InvalidFormat {
            field: "resolucionPadreId",
            reason: format!("Manual reference '{trimmed}' must match R-####-####"),
        })?;
        if parsed.prefix != NumberPrefix::Resolucion {
            return Err(DomainError::InvalidFormat {
                field: "resolucionPadreId",
                reason: format!("Manual reference '{trimmed}' must be a resolution number"),
            });
        }
        Ok(Self::Manual(trimmed.to_string()))
    }

    /// Returns the stored representation.
    #[must_use]
    pub fn as_stored(&self) -> String {
        match self {
            Self::System(id) => id.to_string(),
            Self::Manual(number) => format!("{MANUAL_PREFIX}{number}"),
        }
    }

    /// Returns the referenced system resolution, if any.
    #[must_use]
    pub const fn system_id(&self) -> Option<&ResolutionId> {
        match self {
            Self::System(id) => Some(id),
            Self::Manual(_) => None,
        }
    }
}

impl From<ParentReference> for String {
    fn from(value: ParentReference) -> Self {
        value.as_stored()
    }
}

impl TryFrom<String> for ParentReference {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.strip_prefix(MANUAL_PREFIX) {
            Some(number) => Self::manual(number),
            None => Ok(Self::System(ResolutionId::new(value))),
        }
    }
}

/// A legal resolution issued against an expediente.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// The resolution identifier.
    pub id: ResolutionId,
    /// Zero-padded 4-digit sequence.
    pub numero: String,
    /// Issuance date; its year scopes the number.
    #[serde(with = "fecha_iso")]
    pub fecha_emision: Date,
    /// Derived from the originating expediente's procedure type.
    pub tipo_resolucion: TipoResolucion,
    /// Copied from the originating expediente.
    pub tipo_tramite: TipoTramite,
    /// The originating expediente.
    pub expediente_id: ExpedienteId,
    /// The owning empresa.
    pub empresa_id: EmpresaId,
    /// The parent resolution, if any.
    #[serde(default)]
    pub resolucion_padre_id: Option<ParentReference>,
    /// Start of the vigency window. Authoritative for PADRE only.
    #[serde(with = "fecha_iso::option", default)]
    pub fecha_vigencia_inicio: Option<Date>,
    /// End of the vigency window. Authoritative for PADRE only.
    #[serde(with = "fecha_iso::option", default)]
    pub fecha_vigencia_fin: Option<Date>,
    /// Duration of the vigency window in years.
    #[serde(default)]
    pub anios_vigencia: Option<u8>,
    /// Legal status.
    pub estado: EstadoResolucion,
    /// Whether the resolution is active.
    pub esta_activo: bool,
    /// The user who issued the resolution.
    pub usuario_emision_id: String,
    /// Free-text description.
    #[serde(default)]
    pub descripcion: Option<String>,
    /// Free-text observations.
    #[serde(default)]
    pub observaciones: Option<String>,
    /// Payload received from external systems.
    #[serde(default, skip_serializing_if = "ExternalMetadata::is_empty")]
    pub metadatos_externos: ExternalMetadata,
}

impl Resolution {
    /// Returns the display number (`R-0007-2025`).
    #[must_use]
    pub fn full_number(&self) -> String {
        format_number(&self.numero, self.fecha_emision.year(), NumberPrefix::Resolucion)
    }

    /// Returns whether this resolution owns its vigency window.
    #[must_use]
    pub fn is_padre(&self) -> bool {
        self.tipo_resolucion == TipoResolucion::Padre
    }
}

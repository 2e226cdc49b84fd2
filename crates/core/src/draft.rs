// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use resoluciones_domain::{
    EmpresaId, EstadoResolucion, ExpedienteId, ExternalMetadata, NumberPrefix, ParentReference,
    Resolution, ResolutionId, TipoResolucion, TipoTramite, format_number,
};
use serde::Serialize;
use time::Date;

time::serde::format_description!(fecha_iso, Date, "[year]-[month]-[day]");

/// A validated resolution ready to be persisted.
///
/// Produced only by a successful validation; persistence assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionDraft {
    /// Zero-padded 4-digit sequence.
    pub numero: String,
    /// Issuance date.
    #[serde(with = "fecha_iso")]
    pub fecha_emision: Date,
    /// PADRE or HIJO, derived from the procedure type.
    pub tipo_resolucion: TipoResolucion,
    /// Copied from the expediente.
    pub tipo_tramite: TipoTramite,
    /// The originating expediente; `MANUAL:` for synthetic ones.
    pub expediente_id: ExpedienteId,
    /// The owning empresa.
    pub empresa_id: EmpresaId,
    /// The parent reference, if any.
    pub resolucion_padre_id: Option<ParentReference>,
    /// Start of the vigency window.
    #[serde(with = "fecha_iso::option")]
    pub fecha_vigencia_inicio: Option<Date>,
    /// End of the vigency window.
    #[serde(with = "fecha_iso::option")]
    pub fecha_vigencia_fin: Option<Date>,
    /// Duration in years.
    pub anios_vigencia: Option<u8>,
    /// The issuing user.
    pub usuario_emision_id: String,
    /// Free-text description.
    pub descripcion: Option<String>,
    /// Free-text observations.
    pub observaciones: Option<String>,
}

impl ResolutionDraft {
    /// Returns the display number (`R-0007-2025`).
    #[must_use]
    pub fn full_number(&self) -> String {
        format_number(&self.numero, self.fecha_emision.year(), NumberPrefix::Resolucion)
    }

    /// Builds the persisted resolution under `id`.
    ///
    /// New resolutions are active and in force.
    #[must_use]
    pub fn into_resolution(self, id: ResolutionId) -> Resolution {
        Resolution {
            id,
            numero: self.numero,
            fecha_emision: self.fecha_emision,
            tipo_resolucion: self.tipo_resolucion,
            tipo_tramite: self.tipo_tramite,
            expediente_id: self.expediente_id,
            empresa_id: self.empresa_id,
            resolucion_padre_id: self.resolucion_padre_id,
            fecha_vigencia_inicio: self.fecha_vigencia_inicio,
            fecha_vigencia_fin: self.fecha_vigencia_fin,
            anios_vigencia: self.anios_vigencia,
            estado: EstadoResolucion::Vigente,
            esta_activo: true,
            usuario_emision_id: self.usuario_emision_id,
            descripcion: self.descripcion,
            observaciones: self.observaciones,
            metadatos_externos: ExternalMetadata::new(),
        }
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vigency (validity window) arithmetic and date presentation.
//!
//! ## Invariants
//!
//! - Windows are only computed for procedure types that originate a PADRE
//! - `fin = inicio + anios` calendar years, month and day preserved
//! - Feb 29 falls back to Feb 28 when the target year is not a leap year
//! - Display helpers use a fixed UTC-5 offset. This is not DST-aware and
//!   does not consult a timezone database.

use crate::error::DomainError;
use crate::types::{EstadoResolucion, TipoTramite};
use time::macros::offset;
use time::{Date, Month, OffsetDateTime, UtcOffset};

/// Shortest accepted vigency, in years.
pub const MIN_ANIOS_VIGENCIA: u8 = 1;
/// Longest accepted vigency, in years.
pub const MAX_ANIOS_VIGENCIA: u8 = 20;
/// Business default vigency, in years.
pub const DEFAULT_ANIOS_VIGENCIA: u8 = 5;
/// Fixed offset used for display (America/Lima without DST).
pub const LIMA_OFFSET: UtcOffset = offset!(-5);

/// Result of computing a vigency window for a procedure type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vigencia {
    /// The resolution owns a window.
    Window {
        /// First day in force.
        inicio: Date,
        /// Last day in force.
        fin: Date,
        /// Duration in years.
        anios: u8,
    },
    /// The procedure type inherits its window; nothing to compute.
    NotApplicable,
}

/// Returns whether a procedure type owns a vigency window.
#[must_use]
pub const fn is_applicable(tipo_tramite: TipoTramite) -> bool {
    matches!(
        tipo_tramite,
        TipoTramite::AutorizacionNueva | TipoTramite::Renovacion
    )
}

/// Validates a vigency duration.
///
/// # Errors
///
/// Returns `DomainError::InvalidDuration` if `years` is outside 1..=20.
pub const fn validate_duration(years: u8) -> Result<(), DomainError> {
    if years < MIN_ANIOS_VIGENCIA || years > MAX_ANIOS_VIGENCIA {
        return Err(DomainError::InvalidDuration {
            years,
            min: MIN_ANIOS_VIGENCIA,
            max: MAX_ANIOS_VIGENCIA,
        });
    }
    Ok(())
}

/// Computes the end of a vigency window.
///
/// # Arguments
///
/// * `start` - First day in force
/// * `years` - Duration in years (1..=20)
///
/// # Errors
///
/// Returns an error if:
/// - The duration is out of range
/// - The resulting date cannot be represented
pub fn compute_end(start: Date, years: u8) -> Result<Date, DomainError> {
    validate_duration(years)?;
    add_years(start, years)
}

/// Computes the window for a procedure type.
///
/// Procedure types that inherit their window yield `Vigencia::NotApplicable`
/// rather than an error.
///
/// # Errors
///
/// Returns an error if the window applies and `compute_end` fails.
pub fn compute_for_tramite(
    tipo_tramite: TipoTramite,
    start: Date,
    years: u8,
) -> Result<Vigencia, DomainError> {
    if !is_applicable(tipo_tramite) {
        return Ok(Vigencia::NotApplicable);
    }

    let fin: Date = compute_end(start, years)?;
    Ok(Vigencia::Window {
        inicio: start,
        fin,
        anios: years,
    })
}

/// Number of calendar years between the start and the end of a window.
#[must_use]
pub const fn years_between(inicio: Date, fin: Date) -> i32 {
    fin.year() - inicio.year()
}

/// Status a PADRE resolution should have on `today` given its window end.
#[must_use]
pub fn status_on(fin: Date, today: Date) -> EstadoResolucion {
    if fin < today {
        EstadoResolucion::Vencida
    } else {
        EstadoResolucion::Vigente
    }
}

fn add_years(start: Date, years: u8) -> Result<Date, DomainError> {
    let target_year: i32 = start.year() + i32::from(years);

    let day: u8 = if start.month() == Month::February
        && start.day() == 29
        && !time::util::is_leap_year(target_year)
    {
        28
    } else {
        start.day()
    };

    Date::from_calendar_date(target_year, start.month(), day).map_err(|_| {
        DomainError::DateArithmeticOverflow {
            operation: format!("adding {years} years to {start}"),
        }
    })
}

/// Formats an instant as a long Spanish date (`10 de enero de 2025`).
///
/// The instant is first normalized to UTC-5.
#[must_use]
pub fn format_long_spanish_date(at: OffsetDateTime) -> String {
    let local: OffsetDateTime = at.to_offset(LIMA_OFFSET);
    format!(
        "{} de {} de {}",
        local.day(),
        spanish_month_name(local.month()),
        local.year()
    )
}

/// Formats an instant as `dd/mm/yyyy` after normalizing it to UTC-5.
#[must_use]
pub fn format_short_lima_date(at: OffsetDateTime) -> String {
    let local: OffsetDateTime = at.to_offset(LIMA_OFFSET);
    format!(
        "{:02}/{:02}/{}",
        local.day(),
        u8::from(local.month()),
        local.year()
    )
}

const fn spanish_month_name(month: Month) -> &'static str {
    match month {
        Month::January => "enero",
        Month::February => "febrero",
        Month::March => "marzo",
        Month::April => "abril",
        Month::May => "mayo",
        Month::June => "junio",
        Month::July => "julio",
        Month::August => "agosto",
        Month::September => "septiembre",
        Month::October => "octubre",
        Month::November => "noviembre",
        Month::December => "diciembre",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_leap_day_falls_back_to_february_28() {
        assert_eq!(compute_end(date!(2024 - 02 - 29), 1), Ok(date!(2025 - 02 - 28)));
        assert_eq!(compute_end(date!(2024 - 02 - 29), 4), Ok(date!(2028 - 02 - 29)));
    }

    #[test]
    fn test_normalization_to_lima_can_move_the_day_back() {
        // 03:00 UTC is 22:00 of the previous day in Lima.
        let at: OffsetDateTime = datetime!(2025-01-10 3:00 UTC);
        assert_eq!(format_short_lima_date(at), "09/01/2025");
        assert_eq!(format_long_spanish_date(at), "9 de enero de 2025");
    }

    #[test]
    fn test_status_on_expiry_day_is_still_vigente() {
        let fin: Date = date!(2030 - 01 - 10);
        assert_eq!(status_on(fin, date!(2030 - 01 - 10)), EstadoResolucion::Vigente);
        assert_eq!(status_on(fin, date!(2030 - 01 - 11)), EstadoResolucion::Vencida);
    }
}

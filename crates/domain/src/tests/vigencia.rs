// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DomainError, MAX_ANIOS_VIGENCIA, MIN_ANIOS_VIGENCIA, TipoTramite, Vigencia, compute_end,
    compute_for_tramite, format_long_spanish_date, format_short_lima_date, is_applicable,
    years_between,
};
use time::macros::{date, datetime};
use time::{Date, Month};

#[test]
fn test_compute_end_adds_calendar_years() {
    let start: Date = date!(2025 - 01 - 10);
    assert_eq!(compute_end(start, 5).unwrap(), date!(2030 - 01 - 10));
}

#[test]
fn test_compute_end_preserves_month_and_day_for_every_duration() {
    let starts: [Date; 4] = [
        date!(2025 - 01 - 10),
        date!(2023 - 12 - 31),
        date!(2024 - 02 - 28),
        date!(2026 - 07 - 15),
    ];

    for start in starts {
        for years in MIN_ANIOS_VIGENCIA..=MAX_ANIOS_VIGENCIA {
            let end: Date = compute_end(start, years).unwrap();
            assert_eq!(end.year(), start.year() + i32::from(years));
            assert_eq!(end.month(), start.month());
            assert_eq!(end.day(), start.day());
        }
    }
}

#[test]
fn test_compute_end_rejects_out_of_range_durations() {
    let start: Date = date!(2025 - 01 - 10);

    assert_eq!(
        compute_end(start, 0),
        Err(DomainError::InvalidDuration {
            years: 0,
            min: 1,
            max: 20
        })
    );
    assert!(matches!(
        compute_end(start, 21),
        Err(DomainError::InvalidDuration { years: 21, .. })
    ));
}

#[test]
fn test_compute_end_leap_day_to_non_leap_year() {
    let end: Date = compute_end(date!(2024 - 02 - 29), 3).unwrap();
    assert_eq!(end.month(), Month::February);
    assert_eq!(end.day(), 28);
    assert_eq!(end.year(), 2027);
}

#[test]
fn test_is_applicable_only_for_padre_tramites() {
    assert!(is_applicable(TipoTramite::AutorizacionNueva));
    assert!(is_applicable(TipoTramite::Renovacion));
    assert!(!is_applicable(TipoTramite::Incremento));
    assert!(!is_applicable(TipoTramite::Sustitucion));
    assert!(!is_applicable(TipoTramite::Otros));
}

#[test]
fn test_compute_for_tramite_returns_not_applicable_for_hijo() {
    let result: Vigencia =
        compute_for_tramite(TipoTramite::Incremento, date!(2025 - 01 - 10), 5).unwrap();
    assert_eq!(result, Vigencia::NotApplicable);
}

#[test]
fn test_compute_for_tramite_does_not_validate_duration_for_hijo() {
    let result: Result<Vigencia, DomainError> =
        compute_for_tramite(TipoTramite::Otros, date!(2025 - 01 - 10), 0);
    assert_eq!(result, Ok(Vigencia::NotApplicable));
}

#[test]
fn test_compute_for_tramite_builds_window_for_padre() {
    let result: Vigencia =
        compute_for_tramite(TipoTramite::AutorizacionNueva, date!(2025 - 01 - 10), 5).unwrap();
    assert_eq!(
        result,
        Vigencia::Window {
            inicio: date!(2025 - 01 - 10),
            fin: date!(2030 - 01 - 10),
            anios: 5,
        }
    );
}

#[test]
fn test_years_between() {
    assert_eq!(years_between(date!(2025 - 01 - 10), date!(2030 - 01 - 10)), 5);
}

#[test]
fn test_format_long_spanish_date() {
    let at = datetime!(2025-01-10 15:30 UTC);
    assert_eq!(format_long_spanish_date(at), "10 de enero de 2025");

    let at = datetime!(2024-09-05 12:00 -5);
    assert_eq!(format_long_spanish_date(at), "5 de septiembre de 2024");
}

#[test]
fn test_format_short_lima_date() {
    let at = datetime!(2025-12-31 12:00 UTC);
    assert_eq!(format_short_lima_date(at), "31/12/2025");

    // Midnight UTC on New Year is still the previous year in Lima.
    let at = datetime!(2026-01-01 0:00 UTC);
    assert_eq!(format_short_lima_date(at), "31/12/2025");
}

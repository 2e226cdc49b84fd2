// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::engine::{self, PrefixArg};
use crate::{parse_date, parse_instant};
use resoluciones_domain::{DomainError, EstadoResolucion, TipoResolucion, TipoTramite};
use time::macros::{date, datetime};

#[test]
fn test_format_pads_sequence() {
    let report = engine::format("7", 2025, PrefixArg::R).unwrap();

    assert_eq!(report.full_number, "R-0007-2025");
    assert_eq!(report.numero, "0007");
    assert_eq!(report.to_string(), "R-0007-2025");
}

#[test]
fn test_format_rejects_zero() {
    assert!(matches!(
        engine::format("0000", 2025, PrefixArg::E),
        Err(DomainError::InvalidFormat { .. })
    ));
}

#[test]
fn test_parse_reports_components() {
    let report = engine::parse(" E-0042-2024 ").unwrap();

    assert_eq!(report.prefix, 'E');
    assert_eq!(report.numero, "0042");
    assert_eq!(report.year, 2024);
}

#[test]
fn test_next_skips_issued_numbers_of_same_year() {
    let existing: Vec<String> = vec![
        String::from("R-0001-2025"),
        String::from("R-0002-2025"),
        String::from("R-0009-2024"),
        String::from("E-0005-2025"),
    ];

    let report = engine::next(existing, 2025, PrefixArg::R).unwrap();

    assert_eq!(report.full_number, "R-0003-2025");
}

#[test]
fn test_vigency_for_padre() {
    let report =
        engine::vigency(TipoTramite::AutorizacionNueva, date!(2025 - 01 - 10), 5, date!(2025 - 06 - 01))
            .unwrap();

    assert!(report.applicable);
    assert_eq!(report.fecha_vigencia_fin, Some(date!(2030 - 01 - 10)));
    assert_eq!(report.estado, Some(EstadoResolucion::Vigente));
    assert_eq!(report.to_string(), "2025-01-10 .. 2030-01-10 (5 years) VIGENTE");
}

#[test]
fn test_vigency_for_hijo_is_not_applicable() {
    let report =
        engine::vigency(TipoTramite::Incremento, date!(2025 - 01 - 10), 5, date!(2025 - 06 - 01))
            .unwrap();

    assert!(!report.applicable);
    assert_eq!(report.fecha_vigencia_fin, None);
    assert_eq!(
        serde_json::to_value(&report).unwrap()["fechaVigenciaFin"],
        serde_json::Value::Null
    );
}

#[test]
fn test_vigency_rejects_out_of_range_duration() {
    assert!(matches!(
        engine::vigency(TipoTramite::Renovacion, date!(2025 - 01 - 10), 21, date!(2025 - 06 - 01)),
        Err(DomainError::InvalidDuration { .. })
    ));
}

#[test]
fn test_classify_otros() {
    let report = engine::classify("OTROS").unwrap();

    assert_eq!(report.tipo_resolucion, TipoResolucion::Hijo);
    assert!(!report.vigency_applicable);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["parentEnforcement"], "HARD");
    assert_eq!(json["tipoTramite"], "OTROS");
}

#[test]
fn test_classify_legacy_label_fails() {
    assert!(matches!(
        engine::classify("PRIMIGENIA"),
        Err(DomainError::LegacyTramiteLabel(_))
    ));
}

#[test]
fn test_dates_are_rendered_in_utc_minus_five() {
    let report = engine::dates(datetime!(2025-01-10 03:00 UTC));

    assert_eq!(report.long, "9 de enero de 2025");
    assert_eq!(report.short, "09/01/2025");
}

#[test]
fn test_plain_date_argument_is_lima_midnight() {
    let instant = parse_instant("2025-01-10").unwrap();

    assert_eq!(engine::dates(instant).short, "10/01/2025");
    assert_eq!(parse_date("2025-01-10").unwrap(), date!(2025 - 01 - 10));
    assert!(parse_date("10/01/2025").is_err());
}

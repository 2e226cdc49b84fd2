// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Human-readable numbering for expedientes and resolutions.
//!
//! Numbers have the shape `{prefix}-{####}-{year}` where the year is always
//! taken from the record's emission date.
//!
//! ## Invariants
//!
//! - Sequences are rendered zero-padded to exactly 4 digits
//! - A full number is unique per prefix per calendar year
//! - Everything here is pure; callers supply the snapshot of existing numbers

use crate::error::DomainError;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

/// Width of the sequence part of a number.
pub const NUMBER_WIDTH: usize = 4;

const MAX_SEQUENCE: u16 = 9999;

#[allow(clippy::expect_used)]
static FULL_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([ER])-(\d{4})-(\d{4})$").expect("full number pattern is valid")
});

/// Entity type encoded in the first letter of a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberPrefix {
    /// `E-####-YYYY`
    Expediente,
    /// `R-####-YYYY`
    Resolucion,
}

impl NumberPrefix {
    /// Returns the prefix letter.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Expediente => 'E',
            Self::Resolucion => 'R',
        }
    }
}

impl std::fmt::Display for NumberPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// The components of a full number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNumber {
    /// The entity prefix.
    pub prefix: NumberPrefix,
    /// The 4-digit sequence.
    pub numero: String,
    /// The emission year.
    pub year: i32,
}

impl ParsedNumber {
    /// Renders the components back into a full number.
    #[must_use]
    pub fn to_full_number(&self) -> String {
        format_number(&self.numero, self.year, self.prefix)
    }
}

/// Reduces raw input to at most 4 digits, the way the number field behaves
/// while the user is typing.
#[must_use]
pub fn sanitize_while_typing(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(NUMBER_WIDTH)
        .collect()
}

/// Formats a full number from raw digits.
///
/// Non-digits are stripped, the rest is truncated to 4 digits and left-padded
/// with zeros.
///
/// # Example
///
/// ```text
/// format_number("7", 2025, NumberPrefix::Resolucion)     == "R-0007-2025"
/// format_number("12-345", 2024, NumberPrefix::Expediente) == "E-1234-2024"
/// ```
#[must_use]
pub fn format_number(raw: &str, year: i32, prefix: NumberPrefix) -> String {
    let digits: String = sanitize_while_typing(raw);
    format!("{prefix}-{digits:0>NUMBER_WIDTH$}-{year}")
}

/// Parses a full number into its components.
///
/// # Errors
///
/// Returns `DomainError::InvalidFormat` if the input is not `E|R-####-####`.
pub fn parse_number(full_number: &str) -> Result<ParsedNumber, DomainError> {
    let invalid = || DomainError::InvalidFormat {
        field: "numero",
        reason: format!("'{full_number}' is not a valid number (expected X-####-YYYY)"),
    };

    let captures = FULL_NUMBER.captures(full_number).ok_or_else(invalid)?;
    let prefix: NumberPrefix = match &captures[1] {
        "E" => NumberPrefix::Expediente,
        _ => NumberPrefix::Resolucion,
    };
    let year: i32 = captures[3].parse().map_err(|_| invalid())?;

    Ok(ParsedNumber {
        prefix,
        numero: captures[2].to_string(),
        year,
    })
}

/// Validates the number field on submit.
///
/// Returns the normalized 4-digit sequence.
///
/// # Errors
///
/// Returns `DomainError::InvalidFormat` if:
/// - No digits were supplied
/// - More than 4 digits were supplied
/// - The sequence is zero
pub fn validate_number_input(raw: &str) -> Result<String, DomainError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    if digits.is_empty() {
        return Err(DomainError::InvalidFormat {
            field: "numero",
            reason: String::from("Number is required"),
        });
    }

    if digits.len() > NUMBER_WIDTH {
        return Err(DomainError::InvalidFormat {
            field: "numero",
            reason: format!("Number must have at most {NUMBER_WIDTH} digits, got {}", digits.len()),
        });
    }

    if digits.bytes().all(|b| b == b'0') {
        return Err(DomainError::InvalidFormat {
            field: "numero",
            reason: String::from("Number must be greater than zero"),
        });
    }

    Ok(format!("{digits:0>NUMBER_WIDTH$}"))
}

/// The set of full numbers already issued, as fetched by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberingSnapshot {
    numbers: HashSet<String>,
}

impl NumberingSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `full_number` has been issued.
    #[must_use]
    pub fn contains(&self, full_number: &str) -> bool {
        self.numbers.contains(full_number)
    }

    /// Records a newly issued number.
    pub fn insert(&mut self, full_number: String) {
        self.numbers.insert(full_number);
    }

    /// Returns the number of issued numbers in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    /// Returns whether the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// Iterates over the issued numbers in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.numbers.iter().map(String::as_str)
    }
}

impl FromIterator<String> for NumberingSnapshot {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            numbers: iter.into_iter().collect(),
        }
    }
}

/// Returns whether `full_number` has not been issued yet.
#[must_use]
pub fn is_unique(full_number: &str, existing: &NumberingSnapshot) -> bool {
    !existing.contains(full_number)
}

/// Suggests the next free number for a prefix and year.
///
/// The suggestion is one past the highest issued sequence. When that would
/// overflow 4 digits the lowest unused sequence is offered instead.
#[must_use]
pub fn suggest_next_number(existing: &NumberingSnapshot, year: i32, prefix: NumberPrefix) -> String {
    let used: BTreeSet<u16> = existing
        .iter()
        .filter_map(|number| parse_number(number).ok())
        .filter(|parsed| parsed.prefix == prefix && parsed.year == year)
        .filter_map(|parsed| parsed.numero.parse::<u16>().ok())
        .collect();

    let next: u16 = match used.last() {
        None => 1,
        Some(&highest) if highest < MAX_SEQUENCE => highest + 1,
        Some(_) => (1..=MAX_SEQUENCE)
            .find(|candidate| !used.contains(candidate))
            .unwrap_or(MAX_SEQUENCE),
    };

    format_number(&next.to_string(), year, prefix)
}

/// Checks that `full_number` is free within its year.
///
/// This is an optimistic pre-check; the persistence layer owns the
/// authoritative constraint.
///
/// # Errors
///
/// Returns `DomainError::DuplicateNumber` with the suggested next number if
/// the number has already been issued.
pub fn ensure_unique(full_number: &str, existing: &NumberingSnapshot) -> Result<(), DomainError> {
    if is_unique(full_number, existing) {
        return Ok(());
    }

    let parsed: ParsedNumber = parse_number(full_number)?;
    Err(DomainError::DuplicateNumber {
        full_number: full_number.to_string(),
        suggested: suggest_next_number(existing, parsed.year, parsed.prefix),
    })
}

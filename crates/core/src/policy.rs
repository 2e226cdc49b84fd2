// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use resoluciones_domain::{DEFAULT_ANIOS_VIGENCIA, DomainError, validate_duration};
use time::Date;

/// Tunable defaults for the creation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreationPolicy {
    /// Vigency duration pre-filled for PADRE resolutions.
    pub default_anios_vigencia: u8,
}

impl CreationPolicy {
    /// Creates a policy with a custom default duration.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDuration` if the duration is outside 1..=20.
    pub fn new(default_anios_vigencia: u8) -> Result<Self, DomainError> {
        match validate_duration(default_anios_vigencia) {
            Ok(()) => Ok(Self {
                default_anios_vigencia,
            }),
            Err(e) => Err(e),
        }
    }
}

impl Default for CreationPolicy {
    fn default() -> Self {
        Self {
            default_anios_vigencia: DEFAULT_ANIOS_VIGENCIA,
        }
    }
}

/// Inputs from outside the form that transitions depend on.
///
/// Carrying these explicitly keeps `apply` free of clocks and sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormContext {
    /// The reference date for vigency checks and defaults.
    pub today: Date,
    /// The user issuing the resolution.
    pub usuario_emision_id: String,
    /// Form defaults.
    pub policy: CreationPolicy,
}

impl FormContext {
    /// Creates a context with the default policy.
    #[must_use]
    pub fn new(today: Date, usuario_emision_id: impl Into<String>) -> Self {
        Self {
            today,
            usuario_emision_id: usuario_emision_id.into(),
            policy: CreationPolicy::default(),
        }
    }

    /// Replaces the policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: CreationPolicy) -> Self {
        self.policy = policy;
        self
    }
}

//! Task budget held as an exact amount of currency minor units.

use super::MarketplaceDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Task budget in minor currency units (cents).
///
/// Always at least [`Budget::MINIMUM`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Budget(i64);

impl Budget {
    /// Smallest budget a task may carry (20.00).
    pub const MINIMUM: Self = Self(20 * MINOR_UNITS_PER_MAJOR);

    /// Creates a budget from minor units.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceDomainError::BudgetBelowMinimum`] when the amount
    /// is below [`Budget::MINIMUM`].
    pub fn from_minor_units(minor_units: i64) -> Result<Self, MarketplaceDomainError> {
        if minor_units < Self::MINIMUM.0 {
            return Err(MarketplaceDomainError::BudgetBelowMinimum(
                format_minor_units(minor_units),
            ));
        }
        Ok(Self(minor_units))
    }

    /// Parses a decimal amount such as `"50"`, `"50.5"` or `"50.00"`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceDomainError::MalformedBudget`] for anything other
    /// than digits with an optional one- or two-digit fraction, or
    /// [`MarketplaceDomainError::BudgetBelowMinimum`] for small amounts.
    pub fn parse(text: &str) -> Result<Self, MarketplaceDomainError> {
        let trimmed = text.trim();
        let malformed = || MarketplaceDomainError::MalformedBudget(trimmed.to_owned());
        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());

        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
            return Err(malformed());
        }
        if trimmed.ends_with('.') {
            return Err(malformed());
        }
        let fraction_units = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| malformed())? * 10,
            2 => fraction.parse::<i64>().map_err(|_| malformed())?,
            _ => return Err(malformed()),
        };

        let minor_units = whole
            .parse::<i64>()
            .ok()
            .and_then(|major| major.checked_mul(MINOR_UNITS_PER_MAJOR))
            .and_then(|units| units.checked_add(fraction_units))
            .ok_or_else(malformed)?;
        Self::from_minor_units(minor_units)
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Budget {
    type Error = MarketplaceDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_minor_units(value)
    }
}

impl From<Budget> for i64 {
    fn from(value: Budget) -> Self {
        value.0
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_minor_units(self.0))
    }
}

fn format_minor_units(minor_units: i64) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let magnitude = minor_units.unsigned_abs();
    let per_major = MINOR_UNITS_PER_MAJOR.unsigned_abs();
    format!(
        "{sign}{}.{:02}",
        magnitude.div_euclid(per_major),
        magnitude.rem_euclid(per_major)
    )
}

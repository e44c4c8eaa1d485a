//! # Amount Module
//!
//! Provides the `Amount` type for transaction amounts carried in tag `54`.
//!
//! ## Why Decimal?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE WIRE FORMAT PROBLEM                                                │
//! │                                                                         │
//! │  Tag 54 is a plain decimal string:                                      │
//! │    "5000"      ✅                                                       │
//! │    "1500.50"   ✅  (scale is preserved as written)                      │
//! │    "5E+3"      ❌  no scientific notation                               │
//! │    "5 000"     ❌  no thousands separators                              │
//! │    "5000 XOF"  ❌  no currency symbol                                   │
//! │                                                                         │
//! │  f64 cannot promise any of this. rust_decimal can.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use uemoa_qr_core::amount::Amount;
//!
//! let amount: Amount = "1500.50".parse().unwrap();
//! assert_eq!(amount.to_plain_string(), "1500.50");
//! assert!(amount.is_positive());
//!
//! // Non-numeric input is rejected
//! assert!("12,5".parse::<Amount>().is_err());
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Amount Type
// =============================================================================

/// A transaction amount in the scheme currency.
///
/// ## Design Decisions
/// - **Decimal**: exact, and renders without exponent
/// - **Scale kept**: `1500.50` stays `1500.50` on the wire
/// - **Serialized as string**: no precision loss through JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Amount(#[ts(as = "String")] Decimal);

impl Amount {
    /// Wraps a decimal value.
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Amount(value)
    }

    /// Creates an amount from a whole number of currency units.
    ///
    /// ## Example
    /// ```rust
    /// use uemoa_qr_core::amount::Amount;
    ///
    /// assert_eq!(Amount::from_units(5000).to_plain_string(), "5000");
    /// ```
    pub fn from_units(units: i64) -> Self {
        Amount(Decimal::from(units))
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is strictly greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Renders the amount as it appears in tag `54`.
    ///
    /// No exponent, no grouping, no symbol. The scale written by the caller
    /// is kept (`100.00` stays `100.00`).
    pub fn to_plain_string(&self) -> String {
        self.0.to_string()
    }

    /// Parses a tag `54` value, returning `None` for anything non-numeric.
    ///
    /// This is the lenient path used by the parser: a bad amount degrades to
    /// "no amount" instead of failing the whole code.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Required {
                field: "amount".to_string(),
            });
        }

        Decimal::from_str(trimmed)
            .map(Amount)
            .map_err(|e| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: e.to_string(),
            })
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl From<i64> for Amount {
    fn from(units: i64) -> Self {
        Amount::from_units(units)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

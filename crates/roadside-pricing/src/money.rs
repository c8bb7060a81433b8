//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, and the
//! `RoundingMode` used whenever an exact amount is brought back to minor units.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The apps priced jobs with JS numbers:                                  │
//! │    374 * 0.18 = 67.32000000000001  ❌ drifts on every recalculation     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paise for INR)                      │
//! │    37400 * 1800 / 10000 = 6732 paise = ₹67.32 exactly                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Money crosses the API boundary as a decimal string with two fractional
//! digits (`"349.00"`). Bare integers are read as major units so that config
//! files can say `base = 249`.
//!
//! ## Usage
//! ```rust
//! use roadside_pricing::money::{Money, RoundingMode};
//!
//! let base = Money::from_major_minor(249, 0);
//! assert_eq!(base.to_string(), "249.00");
//!
//! let parsed: Money = "441.32".parse().unwrap();
//! let quarter = parsed.apply_rate_bps(2500, RoundingMode::HalfUp).unwrap();
//! assert_eq!(quarter.minor(), 11033);
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::validation::validate_rate_bps;
use crate::BPS_SCALE;

/// Minor units per major unit (2 decimal places).
pub const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Rounding Mode
// =============================================================================

/// How a value that falls between two minor units is resolved.
///
/// ```text
/// value      HalfUp   HalfEven
/// 0.125  →   0.13     0.12
/// 0.135  →   0.14     0.14
/// 0.124  →   0.12     0.12
/// ```
///
/// `HalfUp` rounds ties away from zero. `HalfEven` (bankers rounding) rounds
/// ties to the even neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    #[default]
    HalfUp,
    HalfEven,
}

impl RoundingMode {
    /// Divides `numer` by a positive `denom`, resolving the remainder with
    /// this mode.
    pub fn divide(self, numer: i128, denom: i128) -> i128 {
        debug_assert!(denom > 0, "denominator must be positive");

        let negative = numer < 0;
        let n = numer.abs();
        let quotient = n / denom;
        let twice_remainder = (n % denom) * 2;

        let round_up = match self {
            RoundingMode::HalfUp => twice_remainder >= denom,
            RoundingMode::HalfEven => {
                twice_remainder > denom || (twice_remainder == denom && quotient % 2 == 1)
            }
        };

        let rounded = if round_up { quotient + 1 } else { quotient };
        if negative {
            -rounded
        } else {
            rounded
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingMode::HalfUp => write!(f, "half_up"),
            RoundingMode::HalfEven => write!(f, "half_even"),
        }
    }
}

impl FromStr for RoundingMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "half_up" | "commercial" => Ok(RoundingMode::HalfUp),
            "half_even" | "bankers" => Ok(RoundingMode::HalfEven),
            other => Err(ValidationError::NotAllowed {
                field: "rounding".to_string(),
                value: other.to_string(),
                allowed: vec!["half_up".to_string(), "half_even".to_string()],
            }),
        }
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (paise for INR).
///
/// ## Design Decisions
/// - **i64 (signed)**: subtraction never wraps silently into nonsense
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **No float constructor**: amounts enter as minor units or strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use roadside_pricing::money::Money;
    ///
    /// let price = Money::from_minor(29382); // ₹293.82
    /// assert_eq!(price.minor(), 29382);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_PER_MAJOR - minor)
        } else {
            Money(major * MINOR_PER_MAJOR + minor)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the value, or zero if it is negative.
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Returns `self × bps / 10000`, rounded to minor units.
    ///
    /// `bps` is capped at 100%, so the result is never larger than `self`.
    ///
    /// ## Example
    /// ```rust
    /// use roadside_pricing::money::{Money, RoundingMode};
    ///
    /// let gross = Money::from_minor(82482); // ₹824.82
    /// let half = gross.apply_rate_bps(5000, RoundingMode::HalfUp).unwrap();
    /// assert_eq!(half.minor(), 41241);
    /// ```
    pub fn apply_rate_bps(&self, bps: u32, rounding: RoundingMode) -> Result<Money, ValidationError> {
        validate_rate_bps("rate_bps", bps)?;

        let scaled = self.0 as i128 * bps as i128;
        Money::try_from_minor(rounding.divide(scaled, BPS_SCALE))
    }

    /// Converts an `i128` minor-unit amount, failing if it does not fit.
    pub fn try_from_minor(minor: i128) -> Result<Money, ValidationError> {
        i64::try_from(minor)
            .map(Money)
            .map_err(|_| ValidationError::OutOfRange {
                field: "amount".to_string(),
                min: i64::MIN,
                max: i64::MAX,
            })
    }

    /// Formats with a currency symbol for receipts and logs.
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            self.major().abs(),
            self.minor_part()
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal with two fractional digits, e.g. `349.00`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol(""))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    /// Parses `"249"`, `"249.5"`, `"249.50"` or `"-5.50"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "amount".to_string(),
            });
        }

        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (major_str, minor_str) = digits.split_once('.').unwrap_or((digits, ""));

        if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected digits before the decimal point"));
        }
        if minor_str.len() > 2 || !minor_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("at most two decimal places are allowed"));
        }
        if digits.ends_with('.') {
            return Err(invalid("missing digits after the decimal point"));
        }

        let major: i64 = major_str
            .parse()
            .map_err(|_| invalid("amount is too large"))?;
        let minor: i64 = match minor_str.len() {
            0 => 0,
            1 => minor_str.parse::<i64>().map_err(|_| invalid("bad fraction"))? * 10,
            _ => minor_str.parse().map_err(|_| invalid("bad fraction"))?,
        };

        let total = major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(minor))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -total } else { total }))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MoneyVisitor;

        impl<'de> Visitor<'de> for MoneyVisitor {
            type Value = Money;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal string like \"349.00\" or a whole number of major units")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
                v.checked_mul(MINOR_PER_MAJOR)
                    .map(Money::from_minor)
                    .ok_or_else(|| E::custom("amount is too large"))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
                let v = i64::try_from(v).map_err(|_| E::custom("amount is too large"))?;
                self.visit_i64(v)
            }

            fn visit_f64<E: de::Error>(self, _v: f64) -> Result<Money, E> {
                Err(E::custom(
                    "fractional amounts must be written as strings, e.g. \"249.50\"",
                ))
            }
        }

        deserializer.deserialize_any(MoneyVisitor)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

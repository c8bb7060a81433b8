//! # Validation Module
//!
//! Input validation for the pricing engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Booking screens (TypeScript)                                 │
//! │  └── Distance slider, tier from profile                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Request handler (Rust)                                       │
//! │  ├── Tag parsing (VehicleType::from_str, ...)                          │
//! │  └── THIS MODULE: numeric domain checks                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Pricing engine                                               │
//! │  └── Only ever sees validated Distance / rates                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here clamps or substitutes a default: a bad value is an error.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Distance;
use crate::{MAX_BPS, MAX_RULE_AMOUNT_MINOR, MICROMETRES_PER_KM};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest distance accepted for a single job, in kilometres.
///
/// 10^6 km is 10^15 µm, below 2^53, so the conversion from `f64` keeps
/// sub-micrometre precision, and the largest fare stays inside `Money`
/// (see `MAX_RULE_AMOUNT_MINOR`).
pub const MAX_DISTANCE_KM: f64 = 1_000_000.0;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a distance in kilometres and converts it to micrometres.
///
/// ## Rules
/// - Must be finite (no NaN, no infinity)
/// - Must be non-negative
/// - Must not exceed `MAX_DISTANCE_KM`
///
/// ## Example
/// ```rust
/// use roadside_pricing::validation::validate_distance_km;
///
/// let d = validate_distance_km("distance_km", 5.0004).unwrap();
/// assert_eq!(d.micrometres(), 5_000_400_000);
/// assert!(validate_distance_km("distance_km", -1.0).is_err());
/// assert!(validate_distance_km("distance_km", f64::NAN).is_err());
/// ```
pub fn validate_distance_km(field: &str, km: f64) -> ValidationResult<Distance> {
    if !km.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if km < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    if km > MAX_DISTANCE_KM {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_DISTANCE_KM as i64,
        });
    }

    let micrometres = (km * MICROMETRES_PER_KM as f64).round() as u64;
    Ok(Distance::from_micrometres(micrometres))
}

/// Validates that a configured amount is not negative.
///
/// Zero is allowed (free add-on services).
pub fn validate_non_negative_money(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates an amount for a price rule: non-negative and at most
/// `MAX_RULE_AMOUNT_MINOR`.
pub fn validate_rule_amount(field: &str, amount: Money) -> ValidationResult<()> {
    validate_non_negative_money(field, amount)?;

    if amount.minor() > MAX_RULE_AMOUNT_MINOR {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_RULE_AMOUNT_MINOR,
        });
    }

    Ok(())
}

/// Validates a rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_rate_bps(field: &str, bps: u32) -> ValidationResult<()> {
    if bps > MAX_BPS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_BPS as i64,
        });
    }

    Ok(())
}

/// Validates an hour-of-day window `[start, end)`.
pub fn validate_hour_window(field: &str, start_hour: u32, end_hour: u32) -> ValidationResult<()> {
    if start_hour > 23 || end_hour > 24 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 24,
        });
    }

    if start_hour >= end_hour {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("start hour {start_hour} must be before end hour {end_hour}"),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

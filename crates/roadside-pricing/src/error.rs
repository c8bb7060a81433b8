//! # Error Types
//!
//! Domain-specific error types for roadside-pricing.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  roadside-pricing errors (this file)                                   │
//! │  ├── PricingError     - Everything the engine can fail with            │
//! │  │   ├── Configuration kind  (deployment defect, fail at startup)      │
//! │  │   └── InvalidArgument kind (caller defect, maps to a 4xx)           │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  roadside-config errors (separate crate)                               │
//! │  └── ConfigError      - File / env / parse failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → PricingError → ConfigError / API handler      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine either returns a complete quote or one of these errors. It never
//! hands back a zero quote in place of a failure, and a failed call is not
//! worth retrying: the same inputs fail the same way.

use thiserror::Error;

use crate::types::{ServiceType, SubscriptionTier, VehicleType};

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification used by request handlers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The pricing tables are incomplete or out of range.
    Configuration,
    /// The caller passed an out-of-domain value.
    InvalidArgument,
}

// =============================================================================
// Pricing Error
// =============================================================================

/// Errors raised by the pricing engine.
#[derive(Debug, Error)]
pub enum PricingError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// The matrix has no rule for a valid vehicle/service pair.
    ///
    /// ## When This Occurs
    /// - A custom `[[rates]]` table in the config file skipped a pair
    /// - Never with the built-in table (covered by a completeness test)
    #[error("No price rule configured for {vehicle}/{service}")]
    MissingRule {
        vehicle: VehicleType,
        service: ServiceType,
    },

    /// The same vehicle/service pair was configured twice.
    #[error("Duplicate price rule for {vehicle}/{service}")]
    DuplicateRule {
        vehicle: VehicleType,
        service: ServiceType,
    },

    /// A subscription tier has no discount configured.
    #[error("No discount configured for tier {0}")]
    MissingTier(SubscriptionTier),

    /// A configured value is outside its allowed range.
    #[error("Invalid pricing configuration: {0}")]
    InvalidConfig(String),

    /// The fare does not fit in `Money`.
    ///
    /// Rule amounts and distances are bounded so the built-in and any
    /// validated table cannot reach this; a wrapped amount is never returned.
    #[error("Fare for {vehicle}/{service} is too large to represent")]
    FareOutOfRange {
        vehicle: VehicleType,
        service: ServiceType,
    },

    // =========================================================================
    // Argument Errors
    // =========================================================================
    /// Caller input failed validation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),
}

impl PricingError {
    /// Returns which side of the boundary is at fault.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PricingError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            PricingError::MissingRule { .. }
            | PricingError::DuplicateRule { .. }
            | PricingError::MissingTier(_)
            | PricingError::InvalidConfig(_)
            | PricingError::FareOutOfRange { .. } => ErrorKind::Configuration,
        }
    }

    /// True for errors the caller can fix by changing its inputs.
    #[inline]
    pub fn is_client_error(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    /// True for deployment defects in the pricing tables.
    #[inline]
    pub fn is_configuration_error(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a caller's input doesn't meet requirements.
/// Used for early validation before any arithmetic runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Numeric value is below zero.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Numeric value is out of range.
    ///
    /// Distances above `MAX_DISTANCE_KM` and rule amounts above
    /// `MAX_RULE_AMOUNT_MINOR` land here: beyond them a fare could overflow.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., malformed money string).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} '{value}' must be one of: {allowed:?}")]
    NotAllowed {
        field: String,
        value: String,
        allowed: Vec<String>,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with PricingError.
pub type PricingResult<T> = Result<T, PricingError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PricingError::MissingRule {
            vehicle: VehicleType::Truck,
            service: ServiceType::FlatbedTowing,
        };
        assert_eq!(
            err.to_string(),
            "No price rule configured for TRUCK/FLATBED_TOWING"
        );

        let err = ValidationError::Negative {
            field: "distance_km".to_string(),
        };
        assert_eq!(err.to_string(), "distance_km must not be negative");
    }

    #[test]
    fn test_validation_converts_to_invalid_argument() {
        let validation_err = ValidationError::NotFinite {
            field: "distance_km".to_string(),
        };
        let err: PricingError = validation_err.into();
        assert!(matches!(err, PricingError::InvalidArgument(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.is_client_error());
    }

    #[test]
    fn test_configuration_kind() {
        assert!(PricingError::MissingTier(SubscriptionTier::Elite).is_configuration_error());
        assert!(PricingError::InvalidConfig("tax".into()).is_configuration_error());
        assert!(!PricingError::DuplicateRule {
            vehicle: VehicleType::Van,
            service: ServiceType::Lockout,
        }
        .is_client_error());
        assert!(PricingError::FareOutOfRange {
            vehicle: VehicleType::Truck,
            service: ServiceType::Towing,
        }
        .is_configuration_error());
    }
}

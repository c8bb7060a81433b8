//! # roadside-pricing: Fare Logic for Roadside Assistance
//!
//! This crate prices roadside jobs (towing, fuel delivery, battery jump...)
//! as pure functions with zero I/O dependencies. Every client (booking app,
//! dispatcher console, backend) quotes through it, so a given job costs the
//! same wherever it is priced.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Roadside Pricing Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Booking / Dispatch front-ends (TypeScript)         │   │
//! │  │    Vehicle picker ──► Service picker ──► Fare breakdown        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON (FareQuote)                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        roadside-config (file + env → PricingEngine)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ roadside-pricing (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐      │   │
//! │  │   │  matrix  │  │   fare   │  │ discount │  │  surge   │      │   │
//! │  │   │ PriceRule│  │FareQuote │  │  tiers   │  │ schedule │      │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────┘      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK READS • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Vehicle, service and tier enums; rates and distances
//! - [`money`] - Money type with integer arithmetic (paise, never floats)
//! - [`matrix`] - The vehicle × service rate table
//! - [`fare`] - Fare calculator
//! - [`discount`] - Subscription tier discounts
//! - [`surge`] - Peak-hour multipliers
//! - [`engine`] - Everything above bundled for request handlers
//! - [`error`] - Domain error types
//! - [`validation`] - Numeric input checks
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same quote, on any thread
//! 2. **No I/O**: config files and the clock belong to the caller
//! 3. **Integer Money**: amounts are paise (i64), rates are basis points
//! 4. **Explicit Errors**: a bad input or table is an error, never a zero fare
//!
//! ## Example Usage
//!
//! ```rust
//! use roadside_pricing::{PricingEngine, ServiceType, SubscriptionTier, VehicleType};
//!
//! let engine = PricingEngine::standard();
//!
//! let quote = engine
//!     .quote(VehicleType::FourWheeler, ServiceType::Towing, 5.0, SubscriptionTier::Free)
//!     .unwrap();
//!
//! // ₹249 base, 5 km included, 18% tax
//! assert_eq!(quote.tax.to_string(), "44.82");
//! assert_eq!(quote.total.to_string(), "293.82");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod discount;
pub mod engine;
pub mod error;
pub mod fare;
pub mod matrix;
pub mod money;
pub mod surge;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use discount::{apply_discount, TierDiscounts};
pub use engine::PricingEngine;
pub use error::{ErrorKind, PricingError, PricingResult, ValidationError};
pub use fare::{compute_fare, compute_fare_with_surge, FareQuote, FareSettings};
pub use matrix::{PriceRule, PricingMatrix};
pub use money::{Money, RoundingMode};
pub use surge::{PeakWindow, SurgeMultiplier, SurgeSchedule};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Basis points in 100%.
pub const BPS_SCALE: i128 = 10_000;

/// Highest rate accepted for tax and discounts (100%).
pub const MAX_BPS: u32 = 10_000;

/// Distances are held in micrometres so any kilometre value a caller sends
/// is priced without an intermediate rounding step.
pub const MICROMETRES_PER_KM: u64 = 1_000_000_000;

/// Largest base fare or per-km rate a price rule may carry (₹10,000,000,000).
///
/// Together with `validation::MAX_DISTANCE_KM`, ×3.0 surge and 100% tax this
/// keeps the largest possible fare inside `Money`.
pub const MAX_RULE_AMOUNT_MINOR: i64 = 1_000_000_000_000;

/// Distance bundled into every base fare of the shipped table.
pub const STANDARD_INCLUDED_KM: u64 = 5;

/// GST on roadside services (18%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 1_800;

/// ISO 4217 code of the shipped rate table.
pub const DEFAULT_CURRENCY: &str = "INR";

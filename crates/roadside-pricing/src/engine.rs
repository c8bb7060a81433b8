//! # Pricing Engine
//!
//! Bundles the matrix, tier table, surge schedule and fare settings into one
//! immutable value that request handlers share.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         PricingEngine                                   │
//! │                                                                         │
//! │   quote(vehicle, service, km, tier)                                    │
//! │        │                                                                │
//! │        ├──► matrix.lookup ──► compute_fare ──► apply_discount ──► quote │
//! │        │                          ▲                 ▲                   │
//! │        │                      settings            tiers                 │
//! │        │                  (tax, rounding)                               │
//! │                                                                         │
//! │   Built once at startup, wrapped in Arc, read concurrently.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDateTime;

use crate::discount::{apply_discount, TierDiscounts};
use crate::error::PricingResult;
use crate::fare::{compute_fare, compute_fare_with_surge, FareQuote, FareSettings};
use crate::matrix::{PriceRule, PricingMatrix};
use crate::surge::{SurgeMultiplier, SurgeSchedule};
use crate::types::{ServiceType, SubscriptionTier, VehicleType};

/// Immutable pricing state.
///
/// ## Thread Safety
/// Holds no interior mutability. Share it with `Arc<PricingEngine>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingEngine {
    matrix: PricingMatrix,
    tiers: TierDiscounts,
    surge: SurgeSchedule,
    settings: FareSettings,
}

impl PricingEngine {
    /// Assembles an engine, re-checking that every table is complete.
    ///
    /// ## Errors
    /// Any `Configuration` kind error from the matrix, tier table or surge
    /// schedule.
    pub fn new(
        matrix: PricingMatrix,
        tiers: TierDiscounts,
        surge: SurgeSchedule,
        settings: FareSettings,
    ) -> PricingResult<Self> {
        matrix.validate_complete()?;
        tiers.validate_complete()?;
        surge.validate()?;

        Ok(PricingEngine {
            matrix,
            tiers,
            surge,
            settings,
        })
    }

    /// Built-in tables, 18% tax, half-up rounding, standard surge windows.
    pub fn standard() -> Self {
        PricingEngine {
            matrix: PricingMatrix::standard(),
            tiers: TierDiscounts::standard(),
            surge: SurgeSchedule::standard(),
            settings: FareSettings::default(),
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    pub fn lookup(&self, vehicle: VehicleType, service: ServiceType) -> PricingResult<PriceRule> {
        self.matrix.lookup(vehicle, service)
    }

    /// Undiscounted fare with no surge.
    pub fn compute_fare(
        &self,
        vehicle: VehicleType,
        service: ServiceType,
        travelled_km: f64,
    ) -> PricingResult<FareQuote> {
        compute_fare(&self.matrix, &self.settings, vehicle, service, travelled_km)
    }

    /// Undiscounted fare with an explicit surge multiplier.
    pub fn compute_fare_with_surge(
        &self,
        vehicle: VehicleType,
        service: ServiceType,
        travelled_km: f64,
        surge: SurgeMultiplier,
    ) -> PricingResult<FareQuote> {
        compute_fare_with_surge(
            &self.matrix,
            &self.settings,
            vehicle,
            service,
            travelled_km,
            surge,
        )
    }

    /// Undiscounted fare with the surge the schedule gives for `at`
    /// (local time of the booking).
    pub fn compute_fare_at(
        &self,
        vehicle: VehicleType,
        service: ServiceType,
        travelled_km: f64,
        at: NaiveDateTime,
    ) -> PricingResult<FareQuote> {
        self.compute_fare_with_surge(vehicle, service, travelled_km, self.surge.multiplier_at(at))
    }

    pub fn apply_discount(
        &self,
        quote: &FareQuote,
        tier: SubscriptionTier,
    ) -> PricingResult<FareQuote> {
        apply_discount(quote, tier, &self.tiers, self.settings.rounding)
    }

    /// Computes the fare and applies the tier discount in one call.
    ///
    /// ## Example
    /// ```rust
    /// use roadside_pricing::engine::PricingEngine;
    /// use roadside_pricing::types::{ServiceType, SubscriptionTier, VehicleType};
    ///
    /// let engine = PricingEngine::standard();
    /// let quote = engine
    ///     .quote(VehicleType::Truck, ServiceType::FlatbedTowing, 0.0, SubscriptionTier::Elite)
    ///     .unwrap();
    ///
    /// assert_eq!(quote.tax.to_string(), "125.82");
    /// assert_eq!(quote.discount.to_string(), "412.41");
    /// assert_eq!(quote.total.to_string(), "412.41");
    /// ```
    pub fn quote(
        &self,
        vehicle: VehicleType,
        service: ServiceType,
        travelled_km: f64,
        tier: SubscriptionTier,
    ) -> PricingResult<FareQuote> {
        let fare = self.compute_fare(vehicle, service, travelled_km)?;
        self.apply_discount(&fare, tier)
    }

    /// Same as [`quote`](Self::quote) with the scheduled surge for `at`.
    pub fn quote_at(
        &self,
        vehicle: VehicleType,
        service: ServiceType,
        travelled_km: f64,
        tier: SubscriptionTier,
        at: NaiveDateTime,
    ) -> PricingResult<FareQuote> {
        let fare = self.compute_fare_at(vehicle, service, travelled_km, at)?;
        self.apply_discount(&fare, tier)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn matrix(&self) -> &PricingMatrix {
        &self.matrix
    }

    pub fn tiers(&self) -> &TierDiscounts {
        &self.tiers
    }

    pub fn surge(&self) -> &SurgeSchedule {
        &self.surge
    }

    pub fn settings(&self) -> &FareSettings {
        &self.settings
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        PricingEngine::standard()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

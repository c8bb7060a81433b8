//! # Fare Calculator
//!
//! Turns (vehicle, service, distance) into a taxed, undiscounted quote.
//!
//! ## Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  rule            = matrix[vehicle][service]                             │
//! │  overage         = max(0, distance - rule.included)                     │
//! │  distance_charge = overage × rule.per_km                                │
//! │  surcharge       = (base + distance_charge) × (surge - 1)   [0 default] │
//! │  subtotal        = base + distance_charge + surcharge                   │
//! │  tax             = subtotal × tax_rate                                  │
//! │  total           = subtotal + tax                (discount = 0)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Exact Arithmetic
//! Every step runs in `i128` at 10^-17 of a minor unit, which is fine enough
//! that micrometres × per-km rates × surge bps × tax bps never leave a
//! remainder. Nothing is rounded until the quote is produced.
//!
//! ## Rounding
//! Only the running totals are rounded, each once from its exact value:
//! ```text
//! base                         (already whole minor units)
//! base + distance              → distance_charge = rounded − base
//! subtotal                     → surcharge       = rounded − previous
//! subtotal + tax  = total      → tax             = total − subtotal
//! ```
//! The lines are differences of rounded totals, so they always add up:
//! `subtotal = base + distance_charge + surcharge` and
//! `total = subtotal + tax`, with each line within one minor unit of its
//! exact value.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{PricingError, PricingResult};
use crate::matrix::{PriceRule, PricingMatrix};
use crate::money::{Money, RoundingMode};
use crate::surge::SurgeMultiplier;
use crate::types::{Distance, ServiceType, SubscriptionTier, TaxRate, VehicleType};
use crate::validation::validate_distance_km;
use crate::{BPS_SCALE, MICROMETRES_PER_KM};

/// Exact units per minor unit: µm/km × surge bps × tax bps.
const EXACT_SCALE: i128 = MICROMETRES_PER_KM as i128 * BPS_SCALE * BPS_SCALE;

/// Exact units per (micrometre × minor unit of per-km rate).
const PER_MICROMETRE_SCALE: i128 = BPS_SCALE * BPS_SCALE;

// =============================================================================
// Fare Settings
// =============================================================================

/// Process-wide constants the calculator applies to every fare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FareSettings {
    pub tax_rate: TaxRate,
    pub rounding: RoundingMode,
}

// =============================================================================
// Fare Quote
// =============================================================================

/// Money breakdown for one service request.
///
/// Carries no identity and is never stored by this crate. A fresh quote from
/// the calculator has `discount = 0` and `tier = None`; the discount applier
/// returns a new quote with both filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FareQuote {
    pub vehicle_type: VehicleType,
    pub service_type: ServiceType,
    pub tier: Option<SubscriptionTier>,
    #[ts(type = "string")]
    pub base_fare: Money,
    #[ts(type = "string")]
    pub distance_charge: Money,
    #[ts(type = "string")]
    pub surcharge: Money,
    #[ts(type = "string")]
    pub subtotal: Money,
    #[ts(type = "string")]
    pub tax: Money,
    #[ts(type = "string")]
    pub discount: Money,
    #[ts(type = "string")]
    pub total: Money,
    /// Distance the fare was priced for, in kilometres.
    #[ts(type = "number")]
    pub distance_km: Distance,
    #[ts(type = "string")]
    pub per_km_rate: Money,
    /// 10000 when no surge applied.
    #[ts(type = "number")]
    pub surge_multiplier_bps: SurgeMultiplier,
}

impl FareQuote {
    /// Amount before any discount (`subtotal + tax`, as billed).
    #[inline]
    pub fn gross(&self) -> Money {
        self.total + self.discount
    }

    #[inline]
    pub fn is_discounted(&self) -> bool {
        self.tier.is_some()
    }
}

// =============================================================================
// Exact Fare
// =============================================================================

/// Unrounded running totals of one fare, in `EXACT_SCALE` units.
struct ExactFare {
    base: i128,
    before_surge: i128,
    subtotal: i128,
    total: i128,
}

impl ExactFare {
    /// `None` if an amount leaves `i128`.
    ///
    /// Each scale factor divides the amount it is taken out of, so dividing
    /// by `BPS_SCALE` before multiplying by the rate drops nothing.
    fn compute(
        rule: &PriceRule,
        travelled: Distance,
        surge: SurgeMultiplier,
        tax_rate: TaxRate,
    ) -> Option<Self> {
        let overage = travelled.overage(rule.included);

        let base = (rule.base.minor() as i128).checked_mul(EXACT_SCALE)?;
        let distance_charge = (overage.micrometres() as i128)
            .checked_mul(rule.per_km.minor() as i128)?
            .checked_mul(PER_MICROMETRE_SCALE)?;

        let before_surge = base.checked_add(distance_charge)?;
        let surcharge = (before_surge / BPS_SCALE).checked_mul(surge.extra_bps() as i128)?;

        let subtotal = before_surge.checked_add(surcharge)?;
        let tax = (subtotal / BPS_SCALE).checked_mul(tax_rate.bps() as i128)?;
        let total = subtotal.checked_add(tax)?;

        Some(ExactFare {
            base,
            before_surge,
            subtotal,
            total,
        })
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Computes the undiscounted fare.
///
/// ## Errors
/// - `InvalidArgument` if `travelled_km` is negative, NaN, infinite or
///   above `MAX_DISTANCE_KM`
/// - `MissingRule` if the matrix has no entry (configuration defect)
/// - `FareOutOfRange` if the fare does not fit in `Money`
///
/// ## Example
/// ```rust
/// use roadside_pricing::fare::{compute_fare, FareSettings};
/// use roadside_pricing::matrix::PricingMatrix;
/// use roadside_pricing::types::{ServiceType, VehicleType};
///
/// let quote = compute_fare(
///     &PricingMatrix::standard(),
///     &FareSettings::default(),
///     VehicleType::FourWheeler,
///     ServiceType::Towing,
///     10.0,
/// )
/// .unwrap();
///
/// assert_eq!(quote.distance_charge.to_string(), "125.00");
/// assert_eq!(quote.tax.to_string(), "67.32");
/// assert_eq!(quote.total.to_string(), "441.32");
/// ```
pub fn compute_fare(
    matrix: &PricingMatrix,
    settings: &FareSettings,
    vehicle: VehicleType,
    service: ServiceType,
    travelled_km: f64,
) -> PricingResult<FareQuote> {
    compute_fare_with_surge(
        matrix,
        settings,
        vehicle,
        service,
        travelled_km,
        SurgeMultiplier::NONE,
    )
}

/// Same as [`compute_fare`] with a surge multiplier on the pre-tax fare.
///
/// `SurgeMultiplier::NONE` yields exactly the [`compute_fare`] quote.
pub fn compute_fare_with_surge(
    matrix: &PricingMatrix,
    settings: &FareSettings,
    vehicle: VehicleType,
    service: ServiceType,
    travelled_km: f64,
    surge: SurgeMultiplier,
) -> PricingResult<FareQuote> {
    let travelled = validate_distance_km("distance_km", travelled_km)?;
    let rule = matrix.lookup(vehicle, service)?;

    let out_of_range = || PricingError::FareOutOfRange { vehicle, service };
    let exact = ExactFare::compute(&rule, travelled, surge, settings.tax_rate)
        .ok_or_else(out_of_range)?;
    let round = |amount: i128| {
        Money::try_from_minor(settings.rounding.divide(amount, EXACT_SCALE))
            .map_err(|_| out_of_range())
    };

    let base_fare = round(exact.base)?;
    let before_surge = round(exact.before_surge)?;
    let subtotal = round(exact.subtotal)?;
    let total = round(exact.total)?;

    Ok(FareQuote {
        vehicle_type: vehicle,
        service_type: service,
        tier: None,
        base_fare,
        distance_charge: before_surge - base_fare,
        surcharge: subtotal - before_surge,
        subtotal,
        tax: total - subtotal,
        discount: Money::zero(),
        total,
        distance_km: travelled,
        per_km_rate: rule.per_km,
        surge_multiplier_bps: surge,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PricingError;

    fn quote(vehicle: VehicleType, service: ServiceType, km: f64) -> FareQuote {
        compute_fare(
            &PricingMatrix::standard(),
            &FareSettings::default(),
            vehicle,
            service,
            km,
        )
        .unwrap()
    }

    #[test]
    fn test_within_included_distance() {
        let q = quote(VehicleType::FourWheeler, ServiceType::Towing, 5.0);
        assert_eq!(q.base_fare.minor(), 24_900);
        assert_eq!(q.distance_charge, Money::zero());
        assert_eq!(q.subtotal.minor(), 24_900);
        assert_eq!(q.tax.minor(), 4_482);
        assert_eq!(q.discount, Money::zero());
        assert_eq!(q.total.minor(), 29_382);
        assert_eq!(q.tier, None);
    }

    #[test]
    fn test_overage_charged_per_km() {
        let q = quote(VehicleType::FourWheeler, ServiceType::Towing, 10.0);
        assert_eq!(q.distance_charge.minor(), 12_500);
        assert_eq!(q.subtotal.minor(), 37_400);
        assert_eq!(q.tax.minor(), 6_732);
        assert_eq!(q.total.minor(), 44_132);
    }

    #[test]
    fn test_fractional_overage() {
        // 7.3 km on a 5 km allowance at ₹25/km: 2.3 × 25 = 57.50
        let q = quote(VehicleType::FourWheeler, ServiceType::Towing, 7.3);
        assert_eq!(q.distance_charge.minor(), 5_750);
        assert_eq!(q.subtotal.minor(), 30_650);
        // 306.50 × 18% = 55.17
        assert_eq!(q.tax.minor(), 5_517);
        assert_eq!(q.total.minor(), 36_167);
    }

    #[test]
    fn test_total_rounded_from_exact_sum() {
        // 5.001 km: overage 1 m × ₹25/km = 0.025, subtotal 249.025 → 249.03
        // exact total 293.8495 → 293.85, tax is what remains
        let q = quote(VehicleType::FourWheeler, ServiceType::Towing, 5.001);
        assert_eq!(q.distance_charge.minor(), 3);
        assert_eq!(q.subtotal.minor(), 24_903);
        assert_eq!(q.tax.minor(), 4_482);
        assert_eq!(q.total.minor(), 29_385);
    }

    #[test]
    fn test_lines_add_up_to_total() {
        // 5.011 km: subtotal 249.275 → 249.28, exact total 294.1445 → 294.14
        let q = quote(VehicleType::FourWheeler, ServiceType::Towing, 5.011);
        assert_eq!(q.subtotal.minor(), 24_928);
        assert_eq!(q.total.minor(), 29_414);
        assert_eq!(q.tax.minor(), 4_486);
        assert_eq!(q.total, q.subtotal + q.tax);
        assert_eq!(q.subtotal, q.base_fare + q.distance_charge + q.surcharge);
    }

    #[test]
    fn test_sub_metre_distance_is_priced() {
        // 0.4 m past the allowance at ₹25/km is exactly ₹0.01
        // exact total 249.01 × 1.18 = 293.8318 → 293.83
        let q = quote(VehicleType::FourWheeler, ServiceType::Towing, 5.0004);
        assert_eq!(q.distance_charge.minor(), 1);
        assert_eq!(q.subtotal.minor(), 24_901);
        assert_eq!(q.tax.minor(), 4_482);
        assert_eq!(q.total.minor(), 29_383);
    }

    #[test]
    fn test_fare_too_large_is_an_error() {
        let huge = PriceRule::new(
            Money::from_minor(i64::MAX - 1),
            Money::zero(),
            Distance::default(),
        );
        let matrix =
            PricingMatrix::unchecked([(VehicleType::FourWheeler, ServiceType::Towing, huge)]);

        let err = compute_fare(
            &matrix,
            &FareSettings::default(),
            VehicleType::FourWheeler,
            ServiceType::Towing,
            0.0,
        )
        .unwrap_err();
        assert!(matches!(err, PricingError::FareOutOfRange { .. }));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_largest_bounded_fare_fits() {
        let ceiling = Money::from_minor(crate::MAX_RULE_AMOUNT_MINOR);
        let matrix = PricingMatrix::from_rules(VehicleType::ALL.into_iter().flat_map(|v| {
            ServiceType::ALL
                .into_iter()
                .map(move |s| (v, s, PriceRule::new(ceiling, ceiling, Distance::default())))
        }))
        .unwrap();
        let settings = FareSettings {
            tax_rate: TaxRate::from_bps(crate::MAX_BPS).unwrap(),
            ..FareSettings::default()
        };

        let q = compute_fare_with_surge(
            &matrix,
            &settings,
            VehicleType::Truck,
            ServiceType::FlatbedTowing,
            crate::validation::MAX_DISTANCE_KM,
            SurgeMultiplier::from_bps(crate::surge::MAX_SURGE_BPS).unwrap(),
        )
        .unwrap();

        // (10^12 + 10^6 km × 10^12) × 3 × 2
        assert_eq!(q.total.minor(), 6_000_006_000_000_000_000);
        assert_eq!(q.total, q.subtotal + q.tax);
    }

    #[test]
    fn test_half_even_rounding_setting() {
        let settings = FareSettings {
            rounding: RoundingMode::HalfEven,
            ..FareSettings::default()
        };
        // 5.001 km: distance line is exactly 0.025 → 0.02 under bankers rounding
        let q = compute_fare(
            &PricingMatrix::standard(),
            &settings,
            VehicleType::FourWheeler,
            ServiceType::Towing,
            5.001,
        )
        .unwrap();
        assert_eq!(q.distance_charge.minor(), 2);
    }

    #[test]
    fn test_zero_tax_setting() {
        let settings = FareSettings {
            tax_rate: TaxRate::zero(),
            ..FareSettings::default()
        };
        let q = compute_fare(
            &PricingMatrix::standard(),
            &settings,
            VehicleType::Truck,
            ServiceType::FlatbedTowing,
            0.0,
        )
        .unwrap();
        assert_eq!(q.tax, Money::zero());
        assert_eq!(q.total.minor(), 69_900);
    }

    #[test]
    fn test_surge_adds_surcharge_line() {
        let surge = SurgeMultiplier::from_bps(12_000).unwrap();
        let q = compute_fare_with_surge(
            &PricingMatrix::standard(),
            &FareSettings::default(),
            VehicleType::FourWheeler,
            ServiceType::Towing,
            10.0,
            surge,
        )
        .unwrap();

        // (249 + 125) × 0.2 = 74.80
        assert_eq!(q.surcharge.minor(), 7_480);
        assert_eq!(q.subtotal.minor(), 44_880);
        // 448.80 × 18% = 80.784 → 80.78
        assert_eq!(q.tax.minor(), 8_078);
        // 529.584 → 529.58
        assert_eq!(q.total.minor(), 52_958);
        assert_eq!(q.surge_multiplier_bps, surge);
        assert_eq!(q.per_km_rate.minor(), 2_500);
    }

    #[test]
    fn test_no_surge_matches_plain_fare() {
        let plain = quote(VehicleType::Van, ServiceType::Mechanic, 12.5);
        let with_none = compute_fare_with_surge(
            &PricingMatrix::standard(),
            &FareSettings::default(),
            VehicleType::Van,
            ServiceType::Mechanic,
            12.5,
            SurgeMultiplier::NONE,
        )
        .unwrap();
        assert_eq!(plain, with_none);
        assert_eq!(plain.surcharge, Money::zero());
    }

    #[test]
    fn test_invalid_distance_rejected() {
        for km in [-1.0, -0.001, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = compute_fare(
                &PricingMatrix::standard(),
                &FareSettings::default(),
                VehicleType::Suv,
                ServiceType::Lockout,
                km,
            )
            .unwrap_err();
            assert!(matches!(err, PricingError::InvalidArgument(_)), "{km}");
        }
    }

    #[test]
    fn test_gross_of_fresh_quote() {
        let q = quote(VehicleType::FourWheeler, ServiceType::Towing, 10.0);
        assert_eq!(q.gross(), q.subtotal + q.tax);
        assert!(!q.is_discounted());
    }

    #[test]
    fn test_quote_json_shape() {
        let q = quote(VehicleType::FourWheeler, ServiceType::Towing, 10.0);
        let json = serde_json::to_value(q).unwrap();

        assert_eq!(json["vehicleType"], "FOUR_WHEELER");
        assert_eq!(json["serviceType"], "TOWING");
        assert_eq!(json["tier"], serde_json::Value::Null);
        assert_eq!(json["baseFare"], "249.00");
        assert_eq!(json["distanceCharge"], "125.00");
        assert_eq!(json["total"], "441.32");
        assert_eq!(json["distanceKm"], 10.0);
        assert_eq!(json["perKmRate"], "25.00");
        assert_eq!(json["surgeMultiplierBps"], 10_000);

        let back: FareQuote = serde_json::from_value(json).unwrap();
        assert_eq!(back, q);
    }
}

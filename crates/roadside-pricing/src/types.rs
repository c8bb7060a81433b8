//! # Domain Types
//!
//! Core domain types used throughout the pricing engine.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  VehicleType    │   │  ServiceType    │   │SubscriptionTier │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  TWO_WHEELER    │   │  TOWING         │   │  FREE     0%    │       │
//! │  │  THREE_WHEELER  │   │  FLATBED_TOWING │   │  BASIC   10%    │       │
//! │  │  FOUR_WHEELER   │   │  MECHANIC       │   │  PREMIUM 25%    │       │
//! │  │  SUV            │   │  FUEL_DELIVERY  │   │  ELITE   50%    │       │
//! │  │  VAN            │   │  BATTERY_JUMP   │   └─────────────────┘       │
//! │  │  TRUCK          │   │  LOCKOUT        │                              │
//! │  └─────────────────┘   │  FLAT_TIRE      │   ┌─────────────────┐       │
//! │                        └─────────────────┘   │ TaxRate  (bps)  │       │
//! │  ┌─────────────────┐                         │ DiscountRate    │       │
//! │  │ Distance (µm)   │                         │ 1800 = 18%      │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tags travel as SCREAMING_SNAKE strings (`"FOUR_WHEELER"`). Parsing from
//! free text is case-insensitive and also accepts the legacy service names
//! older app builds still send (`basic_tow`, `JUMPSTART`, `FLAT_TYRE`, ...).
//! Anything else is rejected; there is no fallback tag. The serde form is
//! strict: only canonical tags deserialize.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::{validate_distance_km, validate_rate_bps};
use crate::MICROMETRES_PER_KM;

/// Upper-cases and maps `-`/space to `_` so `"four-wheeler"` parses.
fn normalize_tag(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

fn unknown_tag<T: fmt::Display>(field: &str, value: &str, all: &[T]) -> ValidationError {
    ValidationError::NotAllowed {
        field: field.to_string(),
        value: value.to_string(),
        allowed: all.iter().map(|t| t.to_string()).collect(),
    }
}

// =============================================================================
// Vehicle Type
// =============================================================================

/// The class of vehicle being assisted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    TwoWheeler,
    ThreeWheeler,
    FourWheeler,
    Suv,
    Van,
    Truck,
}

impl VehicleType {
    /// Every vehicle type, in matrix order.
    pub const ALL: [VehicleType; 6] = [
        VehicleType::TwoWheeler,
        VehicleType::ThreeWheeler,
        VehicleType::FourWheeler,
        VehicleType::Suv,
        VehicleType::Van,
        VehicleType::Truck,
    ];

    /// Returns the wire tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            VehicleType::TwoWheeler => "TWO_WHEELER",
            VehicleType::ThreeWheeler => "THREE_WHEELER",
            VehicleType::FourWheeler => "FOUR_WHEELER",
            VehicleType::Suv => "SUV",
            VehicleType::Van => "VAN",
            VehicleType::Truck => "TRUCK",
        }
    }

    /// Display name used by the booking screens.
    pub const fn label(&self) -> &'static str {
        match self {
            VehicleType::TwoWheeler => "Two Wheeler",
            VehicleType::ThreeWheeler => "Three Wheeler",
            VehicleType::FourWheeler => "Four Wheeler",
            VehicleType::Suv => "SUV",
            VehicleType::Van => "Van",
            VehicleType::Truck => "Truck",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            VehicleType::TwoWheeler => "Bike/Scooter",
            VehicleType::ThreeWheeler => "Auto Rickshaw",
            VehicleType::FourWheeler => "Car/Sedan",
            VehicleType::Suv => "Sport Utility Vehicle",
            VehicleType::Van => "Minivan/Cargo",
            VehicleType::Truck => "Light/Medium Commercial",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = normalize_tag(s);
        VehicleType::ALL
            .into_iter()
            .find(|v| v.as_str() == tag)
            .ok_or_else(|| unknown_tag("vehicle_type", s, &VehicleType::ALL))
    }
}

// =============================================================================
// Service Type
// =============================================================================

/// Grouping shown on the service picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceCategory {
    Recovery,
    Repair,
    Fuel,
    Electrical,
    Access,
    Tire,
}

/// The assistance job being requested.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    Towing,
    FlatbedTowing,
    Mechanic,
    FuelDelivery,
    BatteryJump,
    Lockout,
    FlatTire,
}

impl ServiceType {
    /// Every service type, in matrix order.
    pub const ALL: [ServiceType; 7] = [
        ServiceType::Towing,
        ServiceType::FlatbedTowing,
        ServiceType::Mechanic,
        ServiceType::FuelDelivery,
        ServiceType::BatteryJump,
        ServiceType::Lockout,
        ServiceType::FlatTire,
    ];

    /// Returns the wire tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Towing => "TOWING",
            ServiceType::FlatbedTowing => "FLATBED_TOWING",
            ServiceType::Mechanic => "MECHANIC",
            ServiceType::FuelDelivery => "FUEL_DELIVERY",
            ServiceType::BatteryJump => "BATTERY_JUMP",
            ServiceType::Lockout => "LOCKOUT",
            ServiceType::FlatTire => "FLAT_TIRE",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            ServiceType::Towing => "Towing",
            ServiceType::FlatbedTowing => "Flatbed Towing",
            ServiceType::Mechanic => "Mechanic",
            ServiceType::FuelDelivery => "Fuel Delivery",
            ServiceType::BatteryJump => "Battery Jump",
            ServiceType::Lockout => "Lockout",
            ServiceType::FlatTire => "Flat Tire",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            ServiceType::Towing => "Basic towing service",
            ServiceType::FlatbedTowing => "For damaged vehicles",
            ServiceType::Mechanic => "On-site mechanical repair",
            ServiceType::FuelDelivery => "Emergency fuel delivery",
            ServiceType::BatteryJump => "Jumpstart service",
            ServiceType::Lockout => "Vehicle lockout assistance",
            ServiceType::FlatTire => "Tire repair/replacement",
        }
    }

    pub const fn category(&self) -> ServiceCategory {
        match self {
            ServiceType::Towing | ServiceType::FlatbedTowing => ServiceCategory::Recovery,
            ServiceType::Mechanic => ServiceCategory::Repair,
            ServiceType::FuelDelivery => ServiceCategory::Fuel,
            ServiceType::BatteryJump => ServiceCategory::Electrical,
            ServiceType::Lockout => ServiceCategory::Access,
            ServiceType::FlatTire => ServiceCategory::Tire,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_tag(s).as_str() {
            "TOWING" | "BASIC_TOW" => Ok(ServiceType::Towing),
            "FLATBED_TOWING" | "FLATBED_TOW" => Ok(ServiceType::FlatbedTowing),
            "MECHANIC" => Ok(ServiceType::Mechanic),
            "FUEL_DELIVERY" | "FUEL" => Ok(ServiceType::FuelDelivery),
            "BATTERY_JUMP" | "JUMPSTART" => Ok(ServiceType::BatteryJump),
            "LOCKOUT" => Ok(ServiceType::Lockout),
            "FLAT_TIRE" | "FLAT_TYRE" | "TIRE_CHANGE" => Ok(ServiceType::FlatTire),
            _ => Err(unknown_tag("service_type", s, &ServiceType::ALL)),
        }
    }
}

// =============================================================================
// Subscription Tier
// =============================================================================

/// The customer's subscription plan, which decides the fare discount.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionTier {
    Free,
    Basic,
    Premium,
    Elite,
}

impl SubscriptionTier {
    pub const ALL: [SubscriptionTier; 4] = [
        SubscriptionTier::Free,
        SubscriptionTier::Basic,
        SubscriptionTier::Premium,
        SubscriptionTier::Elite,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "FREE",
            SubscriptionTier::Basic => "BASIC",
            SubscriptionTier::Premium => "PREMIUM",
            SubscriptionTier::Elite => "ELITE",
        }
    }

    /// Discount percentage of the shipped tier table.
    pub const fn standard_discount_percent(&self) -> u8 {
        match self {
            SubscriptionTier::Free => 0,
            SubscriptionTier::Basic => 10,
            SubscriptionTier::Premium => 25,
            SubscriptionTier::Elite => 50,
        }
    }

    /// Discount of the shipped tier table.
    pub const fn standard_discount(&self) -> DiscountRate {
        DiscountRate(self.standard_discount_percent() as u32 * 100)
    }

    /// Returns true if this tier is a paid plan.
    pub fn is_paid(&self) -> bool {
        !matches!(self, SubscriptionTier::Free)
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionTier {
    type Err = ValidationError;

    /// Unknown plans are an error. They are never treated as FREE.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = normalize_tag(s);
        SubscriptionTier::ALL
            .into_iter()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| unknown_tag("tier", s, &SubscriptionTier::ALL))
    }
}

// =============================================================================
// Rates
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (GST on roadside services)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    ///
    /// Rates above 100% are rejected.
    pub fn from_bps(bps: u32) -> Result<Self, ValidationError> {
        validate_rate_bps("tax_rate_bps", bps)?;
        Ok(TaxRate(bps))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    /// The 18% rate the booking apps quote with.
    fn default() -> Self {
        TaxRate(crate::DEFAULT_TAX_RATE_BPS)
    }
}

/// A percentage discount in basis points (2500 = 25%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscountRate(u32);

impl DiscountRate {
    pub fn from_bps(bps: u32) -> Result<Self, ValidationError> {
        validate_rate_bps("discount_bps", bps)?;
        Ok(DiscountRate(bps))
    }

    pub fn from_percent(percent: u8) -> Result<Self, ValidationError> {
        if percent > 100 {
            return Err(ValidationError::OutOfRange {
                field: "discount_percent".to_string(),
                min: 0,
                max: 100,
            });
        }
        Ok(DiscountRate(percent as u32 * 100))
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Distance
// =============================================================================

/// A road distance, stored in micrometres.
///
/// Callers hand over kilometres as `f64` (that is what the mapping APIs
/// return). Micrometres are fine enough that any distance a caller can
/// express is priced exactly, and all later arithmetic is integer.
///
/// On the wire a distance is a number of kilometres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Distance(u64);

impl Distance {
    #[inline]
    pub const fn from_micrometres(micrometres: u64) -> Self {
        Distance(micrometres)
    }

    /// Whole kilometres, as used by the built-in tables.
    #[inline]
    pub const fn from_whole_km(km: u64) -> Self {
        Distance(km * MICROMETRES_PER_KM)
    }

    /// Converts kilometres, rejecting negative, NaN, infinite and
    /// out-of-range values.
    pub fn from_km(km: f64) -> Result<Self, ValidationError> {
        validate_distance_km("distance_km", km)
    }

    #[inline]
    pub const fn micrometres(&self) -> u64 {
        self.0
    }

    /// Kilometres, for display and the wire format.
    #[inline]
    pub fn km(&self) -> f64 {
        self.0 as f64 / MICROMETRES_PER_KM as f64
    }

    /// Distance beyond `allowance`, or zero when within it.
    #[inline]
    pub const fn overage(&self, allowance: Distance) -> Distance {
        Distance(self.0.saturating_sub(allowance.0))
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} km", self.km())
    }
}

impl Serialize for Distance {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.km())
    }
}

impl<'de> Deserialize<'de> for Distance {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let km = f64::deserialize(deserializer)?;
        Distance::from_km(km).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_type_parsing() {
        assert_eq!("FOUR_WHEELER".parse::<VehicleType>().unwrap(), VehicleType::FourWheeler);
        assert_eq!("four-wheeler".parse::<VehicleType>().unwrap(), VehicleType::FourWheeler);
        assert_eq!(" suv ".parse::<VehicleType>().unwrap(), VehicleType::Suv);
        assert!("HEAVY_VEHICLE".parse::<VehicleType>().is_err());
        assert!("".parse::<VehicleType>().is_err());
    }

    #[test]
    fn test_service_type_aliases() {
        assert_eq!("basic_tow".parse::<ServiceType>().unwrap(), ServiceType::Towing);
        assert_eq!("flatbed_tow".parse::<ServiceType>().unwrap(), ServiceType::FlatbedTowing);
        assert_eq!("JUMPSTART".parse::<ServiceType>().unwrap(), ServiceType::BatteryJump);
        assert_eq!("FUEL".parse::<ServiceType>().unwrap(), ServiceType::FuelDelivery);
        assert_eq!("FLAT_TYRE".parse::<ServiceType>().unwrap(), ServiceType::FlatTire);
        assert_eq!("tire_change".parse::<ServiceType>().unwrap(), ServiceType::FlatTire);
        assert!("valet".parse::<ServiceType>().is_err());
    }

    #[test]
    fn test_unknown_tier_is_rejected_not_defaulted() {
        let err = "STANDARD".parse::<SubscriptionTier>().unwrap_err();
        match err {
            ValidationError::NotAllowed { field, value, allowed } => {
                assert_eq!(field, "tier");
                assert_eq!(value, "STANDARD");
                assert_eq!(allowed, vec!["FREE", "BASIC", "PREMIUM", "ELITE"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!("premium".parse::<SubscriptionTier>().unwrap(), SubscriptionTier::Premium);
    }

    #[test]
    fn test_serde_tags() {
        let json = serde_json::to_string(&VehicleType::TwoWheeler).unwrap();
        assert_eq!(json, "\"TWO_WHEELER\"");

        let service: ServiceType = serde_json::from_str("\"FLATBED_TOWING\"").unwrap();
        assert_eq!(service, ServiceType::FlatbedTowing);

        // Legacy names go through FromStr, not the strict wire format.
        assert!(serde_json::from_str::<ServiceType>("\"flatbed_tow\"").is_err());

        assert!(serde_json::from_str::<SubscriptionTier>("\"GOLD\"").is_err());
    }

    #[test]
    fn test_display_matches_tag() {
        for vehicle in VehicleType::ALL {
            assert_eq!(vehicle.to_string().parse::<VehicleType>().unwrap(), vehicle);
        }
        for service in ServiceType::ALL {
            assert_eq!(service.to_string().parse::<ServiceType>().unwrap(), service);
        }
    }

    #[test]
    fn test_service_categories() {
        assert_eq!(ServiceType::FlatbedTowing.category(), ServiceCategory::Recovery);
        assert_eq!(ServiceType::BatteryJump.category(), ServiceCategory::Electrical);
        assert_eq!(ServiceType::FlatTire.label(), "Flat Tire");
    }

    #[test]
    fn test_tax_rate() {
        let rate = TaxRate::from_bps(1800).unwrap();
        assert_eq!(rate.bps(), 1800);
        assert!((rate.percentage() - 18.0).abs() < 0.001);
        assert_eq!(TaxRate::default(), rate);
        assert!(TaxRate::from_bps(10_001).is_err());
    }

    #[test]
    fn test_discount_rate() {
        assert_eq!(DiscountRate::from_percent(25).unwrap().bps(), 2500);
        assert!(DiscountRate::from_percent(101).is_err());
        assert!(DiscountRate::from_bps(10_000).is_ok());
    }

    #[test]
    fn test_distance() {
        assert_eq!(Distance::from_km(10.0).unwrap().micrometres(), 10_000_000_000);
        assert_eq!(Distance::from_km(2.5004).unwrap().micrometres(), 2_500_400_000);
        assert_eq!(Distance::from_whole_km(5), Distance::from_km(5.0).unwrap());

        let travelled = Distance::from_whole_km(3);
        assert_eq!(travelled.overage(Distance::from_whole_km(5)), Distance::default());
        assert_eq!(
            Distance::from_whole_km(8).overage(Distance::from_whole_km(5)),
            Distance::from_whole_km(3)
        );
    }

    #[test]
    fn test_distance_wire_format_is_km() {
        let d = Distance::from_km(7.25).unwrap();
        assert_eq!(serde_json::to_string(&d).unwrap(), "7.25");
        assert_eq!(serde_json::from_str::<Distance>("7.25").unwrap(), d);
        assert!(serde_json::from_str::<Distance>("-1").is_err());
    }

    #[test]
    fn test_standard_discount() {
        for tier in SubscriptionTier::ALL {
            assert_eq!(
                tier.standard_discount().bps(),
                tier.standard_discount_percent() as u32 * 100
            );
        }
        assert_eq!(SubscriptionTier::Elite.standard_discount().bps(), 5_000);
    }
}

//! # Pricing Matrix
//!
//! The vehicle × service rate table every fare starts from.
//!
//! ## Table Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  (VehicleType, ServiceType) → PriceRule                 │
//! │                                                                         │
//! │               TOWING  FLATBED  MECHANIC  FUEL  BATTERY  LOCKOUT  TIRE   │
//! │  TWO_WHEELER    ●       ●        ●        ●      ●        ●       ●     │
//! │  THREE_WHEELER  ●       ●        ●        ●      ●        ●       ●     │
//! │  ...            every cell MUST be filled (6 × 7 = 42 rules)            │
//! │                                                                         │
//! │  PriceRule { base: ₹249, per_km: ₹25, included: 5 km }                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A hole in the table is a deployment defect. `from_rules` refuses to build
//! an incomplete matrix, so the gap surfaces at startup instead of on the
//! first booking that happens to hit it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{PricingError, PricingResult};
use crate::money::Money;
use crate::types::{Distance, ServiceType, VehicleType};
use crate::validation::validate_rule_amount;
use crate::STANDARD_INCLUDED_KM;

// =============================================================================
// Price Rule
// =============================================================================

/// Rates for one vehicle/service pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRule {
    /// Flat call-out charge, covers `included` distance.
    pub base: Money,
    /// Charge per kilometre beyond `included`.
    pub per_km: Money,
    /// Distance bundled into the base fare.
    pub included: Distance,
}

impl PriceRule {
    pub const fn new(base: Money, per_km: Money, included: Distance) -> Self {
        PriceRule {
            base,
            per_km,
            included,
        }
    }

    /// Rule in whole rupees with the standard 5 km allowance.
    const fn standard(base: i64, per_km: i64) -> Self {
        PriceRule::new(
            Money::from_major_minor(base, 0),
            Money::from_major_minor(per_km, 0),
            Distance::from_whole_km(STANDARD_INCLUDED_KM),
        )
    }

    fn validate(&self) -> PricingResult<()> {
        validate_rule_amount("base", self.base)
            .and_then(|_| validate_rule_amount("per_km", self.per_km))
            .map_err(|e| PricingError::InvalidConfig(e.to_string()))
    }
}

// =============================================================================
// Standard Table
// =============================================================================

/// Shipped rates (INR). Columns follow `ServiceType::ALL`:
/// towing, flatbed, mechanic, fuel, battery, lockout, flat tire.
const STANDARD_RATES: [(VehicleType, [PriceRule; 7]); 6] = [
    (
        VehicleType::TwoWheeler,
        [
            PriceRule::standard(199, 20),
            PriceRule::standard(349, 25),
            PriceRule::standard(99, 15),
            PriceRule::standard(49, 15),
            PriceRule::standard(149, 15),
            PriceRule::standard(149, 15),
            PriceRule::standard(99, 15),
        ],
    ),
    (
        VehicleType::ThreeWheeler,
        [
            PriceRule::standard(249, 25),
            PriceRule::standard(449, 30),
            PriceRule::standard(149, 20),
            PriceRule::standard(49, 20),
            PriceRule::standard(199, 20),
            PriceRule::standard(199, 20),
            PriceRule::standard(199, 20),
        ],
    ),
    (
        VehicleType::FourWheeler,
        [
            PriceRule::standard(249, 25),
            PriceRule::standard(449, 35),
            PriceRule::standard(349, 25),
            PriceRule::standard(49, 20),
            PriceRule::standard(249, 25),
            PriceRule::standard(299, 25),
            PriceRule::standard(249, 25),
        ],
    ),
    (
        VehicleType::Suv,
        [
            PriceRule::standard(299, 25),
            PriceRule::standard(499, 40),
            PriceRule::standard(349, 30),
            PriceRule::standard(49, 20),
            PriceRule::standard(249, 30),
            PriceRule::standard(299, 30),
            PriceRule::standard(249, 30),
        ],
    ),
    (
        VehicleType::Van,
        [
            PriceRule::standard(349, 30),
            PriceRule::standard(499, 45),
            PriceRule::standard(399, 40),
            PriceRule::standard(49, 20),
            PriceRule::standard(299, 35),
            PriceRule::standard(299, 35),
            PriceRule::standard(249, 35),
        ],
    ),
    (
        VehicleType::Truck,
        [
            PriceRule::standard(499, 40),
            PriceRule::standard(699, 50),
            PriceRule::standard(399, 40),
            PriceRule::standard(69, 20),
            PriceRule::standard(349, 40),
            PriceRule::standard(299, 40),
            PriceRule::standard(299, 40),
        ],
    ),
];

// =============================================================================
// Pricing Matrix
// =============================================================================

/// Complete, immutable rate table.
///
/// ## Thread Safety
/// Read-only after construction, so it is shared by reference across
/// request handlers with no lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingMatrix {
    rules: BTreeMap<(VehicleType, ServiceType), PriceRule>,
}

impl PricingMatrix {
    /// The shipped INR table (5 km included everywhere).
    pub fn standard() -> Self {
        let rules = STANDARD_RATES
            .iter()
            .flat_map(|(vehicle, row)| {
                ServiceType::ALL
                    .iter()
                    .zip(row.iter())
                    .map(move |(service, rule)| ((*vehicle, *service), *rule))
            })
            .collect();

        PricingMatrix { rules }
    }

    /// Builds a matrix from explicit rules and checks it is complete.
    ///
    /// ## Errors
    /// - `DuplicateRule` if a pair appears twice
    /// - `InvalidConfig` if a rule carries a negative amount or one above
    ///   `MAX_RULE_AMOUNT_MINOR`
    /// - `MissingRule` for the first pair with no rule
    pub fn from_rules<I>(rules: I) -> PricingResult<Self>
    where
        I: IntoIterator<Item = (VehicleType, ServiceType, PriceRule)>,
    {
        let mut table = BTreeMap::new();

        for (vehicle, service, rule) in rules {
            rule.validate()?;
            if table.insert((vehicle, service), rule).is_some() {
                return Err(PricingError::DuplicateRule { vehicle, service });
            }
        }

        let matrix = PricingMatrix { rules: table };
        matrix.validate_complete()?;
        Ok(matrix)
    }

    /// Builds a matrix without any checks.
    #[cfg(test)]
    pub(crate) fn unchecked<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = (VehicleType, ServiceType, PriceRule)>,
    {
        PricingMatrix {
            rules: rules
                .into_iter()
                .map(|(vehicle, service, rule)| ((vehicle, service), rule))
                .collect(),
        }
    }

    /// Checks every enum combination has a rule.
    pub fn validate_complete(&self) -> PricingResult<()> {
        for vehicle in VehicleType::ALL {
            for service in ServiceType::ALL {
                if !self.rules.contains_key(&(vehicle, service)) {
                    return Err(PricingError::MissingRule { vehicle, service });
                }
            }
        }
        Ok(())
    }

    /// Returns the rule for a vehicle/service pair.
    ///
    /// ## Example
    /// ```rust
    /// use roadside_pricing::matrix::PricingMatrix;
    /// use roadside_pricing::types::{ServiceType, VehicleType};
    ///
    /// let matrix = PricingMatrix::standard();
    /// let rule = matrix.lookup(VehicleType::FourWheeler, ServiceType::Towing).unwrap();
    /// assert_eq!(rule.base.to_string(), "249.00");
    /// assert_eq!(rule.per_km.to_string(), "25.00");
    /// assert_eq!(rule.included.km(), 5.0);
    /// ```
    pub fn lookup(&self, vehicle: VehicleType, service: ServiceType) -> PricingResult<PriceRule> {
        self.rules
            .get(&(vehicle, service))
            .copied()
            .ok_or(PricingError::MissingRule { vehicle, service })
    }

    /// Iterates rules in (vehicle, service) order.
    pub fn rules(&self) -> impl Iterator<Item = (VehicleType, ServiceType, &PriceRule)> {
        self.rules.iter().map(|((v, s), rule)| (*v, *s, rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for PricingMatrix {
    fn default() -> Self {
        PricingMatrix::standard()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Discount Applier
//!
//! Applies the subscription-tier discount to a computed fare.
//!
//! ```text
//! FareQuote (discount = 0)          FareQuote (discounted)
//! ┌──────────────────────┐          ┌──────────────────────┐
//! │ subtotal   374.00    │          │ subtotal   374.00    │
//! │ tax         67.32    │  PREMIUM │ tax         67.32    │
//! │ discount     0.00    │ ───────► │ discount   110.33    │  round(441.32 × 25%)
//! │ total      441.32    │   25%    │ total      330.99    │
//! └──────────────────────┘          └──────────────────────┘
//! ```
//!
//! The discount is taken from the post-tax amount. Applying a discount to
//! an already discounted quote replaces the earlier discount instead of
//! stacking, so the applier can be called again when the tier changes.

use std::collections::BTreeMap;

use crate::error::{PricingError, PricingResult};
use crate::fare::FareQuote;
use crate::money::RoundingMode;
use crate::types::{DiscountRate, SubscriptionTier};

// =============================================================================
// Tier Discounts
// =============================================================================

/// Discount per subscription tier. Covers every tier once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierDiscounts {
    rates: BTreeMap<SubscriptionTier, DiscountRate>,
}

impl TierDiscounts {
    /// FREE 0%, BASIC 10%, PREMIUM 25%, ELITE 50%.
    pub fn standard() -> Self {
        let rates = SubscriptionTier::ALL
            .into_iter()
            .map(|tier| (tier, tier.standard_discount()))
            .collect();

        TierDiscounts { rates }
    }

    /// Builds a table from percentages, e.g. read from config.
    ///
    /// ## Errors
    /// - `InvalidConfig` for a percentage above 100
    /// - `MissingTier` if any tier is left out
    pub fn from_percentages<I>(percentages: I) -> PricingResult<Self>
    where
        I: IntoIterator<Item = (SubscriptionTier, u8)>,
    {
        let mut rates = BTreeMap::new();
        for (tier, percent) in percentages {
            let rate = DiscountRate::from_percent(percent)
                .map_err(|e| PricingError::InvalidConfig(format!("tier {tier}: {e}")))?;
            rates.insert(tier, rate);
        }

        let table = TierDiscounts { rates };
        table.validate_complete()?;
        Ok(table)
    }

    /// Checks every tier has a rate.
    pub fn validate_complete(&self) -> PricingResult<()> {
        match SubscriptionTier::ALL
            .into_iter()
            .find(|tier| !self.rates.contains_key(tier))
        {
            Some(missing) => Err(PricingError::MissingTier(missing)),
            None => Ok(()),
        }
    }

    /// Discount rate for a tier.
    pub fn rate_for(&self, tier: SubscriptionTier) -> PricingResult<DiscountRate> {
        self.rates
            .get(&tier)
            .copied()
            .ok_or(PricingError::MissingTier(tier))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SubscriptionTier, DiscountRate)> + '_ {
        self.rates.iter().map(|(t, r)| (*t, *r))
    }
}

impl Default for TierDiscounts {
    fn default() -> Self {
        TierDiscounts::standard()
    }
}

// =============================================================================
// Applier
// =============================================================================

/// Returns a copy of `quote` with the tier discount applied.
///
/// `discount = round(gross × rate)` and `total = max(0, gross − discount)`,
/// where `gross` is the pre-discount amount of the input. All other lines
/// are carried over unchanged. The input quote is not modified.
///
/// ## Example
/// ```rust
/// use roadside_pricing::discount::{apply_discount, TierDiscounts};
/// use roadside_pricing::fare::{compute_fare, FareSettings};
/// use roadside_pricing::matrix::PricingMatrix;
/// use roadside_pricing::money::RoundingMode;
/// use roadside_pricing::types::{ServiceType, SubscriptionTier, VehicleType};
///
/// let full = compute_fare(
///     &PricingMatrix::standard(),
///     &FareSettings::default(),
///     VehicleType::FourWheeler,
///     ServiceType::Towing,
///     10.0,
/// )
/// .unwrap();
///
/// let premium = apply_discount(
///     &full,
///     SubscriptionTier::Premium,
///     &TierDiscounts::standard(),
///     RoundingMode::HalfUp,
/// )
/// .unwrap();
///
/// assert_eq!(premium.discount.to_string(), "110.33");
/// assert_eq!(premium.total.to_string(), "330.99");
/// assert_eq!(full.total.to_string(), "441.32");
/// ```
pub fn apply_discount(
    quote: &FareQuote,
    tier: SubscriptionTier,
    tiers: &TierDiscounts,
    rounding: RoundingMode,
) -> PricingResult<FareQuote> {
    let rate = tiers.rate_for(tier)?;
    let gross = quote.gross();

    let discount = gross.apply_rate_bps(rate.bps(), rounding)?;
    let total = (gross - discount).clamp_non_negative();

    Ok(FareQuote {
        tier: Some(tier),
        discount,
        total,
        ..*quote
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

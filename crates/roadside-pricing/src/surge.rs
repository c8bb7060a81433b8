//! # Surge Pricing
//!
//! Peak-hour multiplier on the pre-tax fare.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Standard schedule (local time, Mon-Fri only)                           │
//! │                                                                         │
//! │  00      08   10            18      21           24                     │
//! │  ├───────┼████┼─────────────┼███████┼────────────┤                      │
//! │   ×1.0    ×1.2     ×1.0        ×1.2      ×1.0                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The schedule never reads the clock. Callers pass the local time of the
//! booking, which keeps quotes reproducible.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, PricingResult, ValidationError};
use crate::validation::validate_hour_window;
use crate::BPS_SCALE;

/// Highest multiplier accepted (×3.0).
pub const MAX_SURGE_BPS: u32 = 30_000;

// =============================================================================
// Surge Multiplier
// =============================================================================

/// Fare multiplier in basis points (10000 = ×1.0, 12000 = ×1.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurgeMultiplier(u32);

impl SurgeMultiplier {
    /// No surge.
    pub const NONE: SurgeMultiplier = SurgeMultiplier(BPS_SCALE as u32);

    /// Creates a multiplier. Values below ×1.0 would discount the fare
    /// and are rejected, as is anything above ×3.0.
    pub fn from_bps(bps: u32) -> Result<Self, ValidationError> {
        if !(Self::NONE.0..=MAX_SURGE_BPS).contains(&bps) {
            return Err(ValidationError::OutOfRange {
                field: "surge_multiplier_bps".to_string(),
                min: Self::NONE.0 as i64,
                max: MAX_SURGE_BPS as i64,
            });
        }
        Ok(SurgeMultiplier(bps))
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Extra basis points on top of ×1.0.
    #[inline]
    pub const fn extra_bps(&self) -> u32 {
        self.0 - Self::NONE.0
    }

    #[inline]
    pub const fn is_none(&self) -> bool {
        self.0 == Self::NONE.0
    }

    /// The multiplier as a float, for display only.
    pub fn factor(&self) -> f64 {
        self.0 as f64 / BPS_SCALE as f64
    }
}

impl Default for SurgeMultiplier {
    fn default() -> Self {
        SurgeMultiplier::NONE
    }
}

// =============================================================================
// Peak Windows
// =============================================================================

/// Hours `[start_hour, end_hour)` during which surge applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl PeakWindow {
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self, ValidationError> {
        validate_hour_window("peak_window", start_hour, end_hour)?;
        Ok(PeakWindow {
            start_hour,
            end_hour,
        })
    }

    #[inline]
    pub fn contains(&self, hour: u32) -> bool {
        (self.start_hour..self.end_hour).contains(&hour)
    }
}

// =============================================================================
// Surge Schedule
// =============================================================================

/// When surge applies and how strong it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurgeSchedule {
    pub enabled: bool,
    pub multiplier: SurgeMultiplier,
    pub windows: Vec<PeakWindow>,
    /// Saturday and Sunday are never peak when set.
    pub weekdays_only: bool,
}

impl SurgeSchedule {
    /// ×1.2 on weekdays 08:00-10:00 and 18:00-21:00.
    pub fn standard() -> Self {
        SurgeSchedule {
            enabled: true,
            multiplier: SurgeMultiplier(12_000),
            windows: vec![
                PeakWindow {
                    start_hour: 8,
                    end_hour: 10,
                },
                PeakWindow {
                    start_hour: 18,
                    end_hour: 21,
                },
            ],
            weekdays_only: true,
        }
    }

    /// A schedule that never surges.
    pub fn disabled() -> Self {
        SurgeSchedule {
            enabled: false,
            multiplier: SurgeMultiplier::NONE,
            windows: Vec::new(),
            weekdays_only: true,
        }
    }

    /// Re-checks every window (fields are public, so they may have been
    /// edited after construction).
    pub fn validate(&self) -> PricingResult<()> {
        for window in &self.windows {
            validate_hour_window("peak_window", window.start_hour, window.end_hour)
                .map_err(|e| PricingError::InvalidConfig(e.to_string()))?;
        }
        SurgeMultiplier::from_bps(self.multiplier.bps())
            .map_err(|e| PricingError::InvalidConfig(e.to_string()))?;
        Ok(())
    }

    /// Multiplier in force at the given local time.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use roadside_pricing::surge::{SurgeMultiplier, SurgeSchedule};
    ///
    /// let schedule = SurgeSchedule::standard();
    /// // Wednesday 2024-05-15
    /// let rush = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap().and_hms_opt(8, 30, 0).unwrap();
    /// let noon = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap().and_hms_opt(12, 0, 0).unwrap();
    ///
    /// assert_eq!(schedule.multiplier_at(rush).bps(), 12_000);
    /// assert_eq!(schedule.multiplier_at(noon), SurgeMultiplier::NONE);
    /// ```
    pub fn multiplier_at(&self, at: NaiveDateTime) -> SurgeMultiplier {
        if !self.enabled {
            return SurgeMultiplier::NONE;
        }

        if self.weekdays_only && matches!(at.weekday(), Weekday::Sat | Weekday::Sun) {
            return SurgeMultiplier::NONE;
        }

        let hour = at.hour();
        if self.windows.iter().any(|w| w.contains(hour)) {
            self.multiplier
        } else {
            SurgeMultiplier::NONE
        }
    }
}

impl Default for SurgeSchedule {
    fn default() -> Self {
        SurgeSchedule::standard()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Pricing Configuration
//!
//! Loads the pricing tables and fare settings and turns them into a
//! `PricingEngine`.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ROADSIDE_TAX_RATE_BPS=1800                                         │
//! │     ROADSIDE_ROUNDING=half_even                                        │
//! │     ROADSIDE_CURRENCY=INR                                              │
//! │     ROADSIDE_SURGE_ENABLED=false                                       │
//! │                                                                         │
//! │  2. Config File (.toml or .json, picked by extension)                  │
//! │     $ROADSIDE_PRICING_CONFIG, or                                       │
//! │     ~/.config/pricing/pricing.toml (Linux)                             │
//! │     ~/Library/Application Support/com.roadside.pricing/pricing.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Built-in INR matrix, 18% tax, half-up rounding                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # pricing.toml
//! [pricing]
//! currency = "INR"
//! currency_symbol = "₹"
//! distance_unit = "km"
//! tax_rate_bps = 1800      # 18% GST
//! rounding = "half_up"     # half_up | half_even
//!
//! [tiers]
//! free = 0
//! basic = 10
//! premium = 25
//! elite = 50
//!
//! [surge]
//! enabled = true
//! multiplier_bps = 12000   # x1.2
//! weekdays_only = true
//! windows = [{ start_hour = 8, end_hour = 10 }, { start_hour = 18, end_hour = 21 }]
//!
//! # Optional. When present it replaces the built-in table and must list
//! # every vehicle/service pair.
//! [[rates]]
//! vehicle = "FOUR_WHEELER"
//! service = "TOWING"
//! base = "249.00"
//! per_km = "25.00"
//! included_km = 5.0
//! ```
//!
//! Validation is fail-fast: a config that cannot produce a complete engine
//! is rejected at load time, never patched up with defaults.

use std::path::{Path, PathBuf};

use roadside_pricing::{
    Distance, FareSettings, Money, PeakWindow, PriceRule, PricingEngine, PricingMatrix,
    RoundingMode, ServiceType, SubscriptionTier, SurgeMultiplier, SurgeSchedule, TaxRate,
    TierDiscounts, VehicleType, DEFAULT_CURRENCY, DEFAULT_TAX_RATE_BPS, STANDARD_INCLUDED_KM,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};

/// Points at a config file, taking precedence over the platform default.
pub const CONFIG_PATH_ENV: &str = "ROADSIDE_PRICING_CONFIG";

pub const TAX_RATE_ENV: &str = "ROADSIDE_TAX_RATE_BPS";
pub const ROUNDING_ENV: &str = "ROADSIDE_ROUNDING";
pub const CURRENCY_ENV: &str = "ROADSIDE_CURRENCY";
pub const SURGE_ENABLED_ENV: &str = "ROADSIDE_SURGE_ENABLED";

/// The only distance unit the tables are written in.
const SUPPORTED_DISTANCE_UNIT: &str = "km";

// =============================================================================
// File Format
// =============================================================================

/// On-disk format of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            other => Err(ConfigError::Invalid(format!(
                "config file must end in .toml or .json, got {:?}",
                other.unwrap_or("")
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// `[pricing]`: currency and the fare settings applied to every quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSection {
    /// ISO 4217 code.
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Must be "km".
    #[serde(default = "default_distance_unit")]
    pub distance_unit: String,

    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,

    #[serde(default)]
    pub rounding: RoundingMode,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_distance_unit() -> String {
    SUPPORTED_DISTANCE_UNIT.to_string()
}

fn default_tax_rate_bps() -> u32 {
    DEFAULT_TAX_RATE_BPS
}

impl Default for PricingSection {
    fn default() -> Self {
        PricingSection {
            currency: default_currency(),
            currency_symbol: default_currency_symbol(),
            distance_unit: default_distance_unit(),
            tax_rate_bps: default_tax_rate_bps(),
            rounding: RoundingMode::default(),
        }
    }
}

/// `[tiers]`: discount percent per subscription tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSection {
    #[serde(default = "default_free_percent")]
    pub free: u8,
    #[serde(default = "default_basic_percent")]
    pub basic: u8,
    #[serde(default = "default_premium_percent")]
    pub premium: u8,
    #[serde(default = "default_elite_percent")]
    pub elite: u8,
}

fn default_free_percent() -> u8 {
    SubscriptionTier::Free.standard_discount_percent()
}

fn default_basic_percent() -> u8 {
    SubscriptionTier::Basic.standard_discount_percent()
}

fn default_premium_percent() -> u8 {
    SubscriptionTier::Premium.standard_discount_percent()
}

fn default_elite_percent() -> u8 {
    SubscriptionTier::Elite.standard_discount_percent()
}

impl Default for TierSection {
    fn default() -> Self {
        TierSection {
            free: default_free_percent(),
            basic: default_basic_percent(),
            premium: default_premium_percent(),
            elite: default_elite_percent(),
        }
    }
}

impl TierSection {
    fn percentages(&self) -> [(SubscriptionTier, u8); 4] {
        [
            (SubscriptionTier::Free, self.free),
            (SubscriptionTier::Basic, self.basic),
            (SubscriptionTier::Premium, self.premium),
            (SubscriptionTier::Elite, self.elite),
        ]
    }
}

/// `[surge]`: peak-hour multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurgeSection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// 12000 = x1.2.
    #[serde(default = "default_surge_bps")]
    pub multiplier_bps: u32,

    #[serde(default = "default_true")]
    pub weekdays_only: bool,

    #[serde(default = "default_peak_windows")]
    pub windows: Vec<PeakWindow>,
}

fn default_true() -> bool {
    true
}

fn default_surge_bps() -> u32 {
    SurgeSchedule::standard().multiplier.bps()
}

fn default_peak_windows() -> Vec<PeakWindow> {
    SurgeSchedule::standard().windows
}

impl Default for SurgeSection {
    fn default() -> Self {
        SurgeSection {
            enabled: true,
            multiplier_bps: default_surge_bps(),
            weekdays_only: true,
            windows: default_peak_windows(),
        }
    }
}

impl SurgeSection {
    fn to_schedule(&self) -> ConfigResult<SurgeSchedule> {
        let schedule = SurgeSchedule {
            enabled: self.enabled,
            multiplier: SurgeMultiplier::from_bps(self.multiplier_bps)?,
            windows: self.windows.clone(),
            weekdays_only: self.weekdays_only,
        };
        schedule.validate()?;
        Ok(schedule)
    }
}

/// One `[[rates]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub vehicle: VehicleType,
    pub service: ServiceType,
    /// `"249.00"` or a whole number of rupees.
    pub base: Money,
    pub per_km: Money,
    #[serde(default = "default_included_km")]
    pub included_km: f64,
}

fn default_included_km() -> f64 {
    STANDARD_INCLUDED_KM as f64
}

impl RateEntry {
    fn to_rule(&self) -> ConfigResult<(VehicleType, ServiceType, PriceRule)> {
        let included = Distance::from_km(self.included_km).map_err(|e| {
            ConfigError::Invalid(format!("{}/{}: {e}", self.vehicle, self.service))
        })?;
        Ok((
            self.vehicle,
            self.service,
            PriceRule::new(self.base, self.per_km, included),
        ))
    }
}

// =============================================================================
// Pricing Config
// =============================================================================

/// Complete pricing configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub pricing: PricingSection,

    #[serde(default)]
    pub tiers: TierSection,

    #[serde(default)]
    pub surge: SurgeSection,

    /// Empty means "use the built-in matrix".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rates: Vec<RateEntry>,
}

impl PricingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else `$ROADSIDE_PRICING_CONFIG`,
    ///    else the platform default path)
    /// 3. Environment variables
    /// 4. Validation
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    /// Same as [`load`](Self::load) with an explicit environment lookup.
    pub fn load_with_env<F>(config_path: Option<PathBuf>, env: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // An explicitly named file must exist; the platform default may not.
        let explicit = config_path.or_else(|| env(CONFIG_PATH_ENV).map(PathBuf::from));
        match (explicit, Self::default_config_path()) {
            (Some(path), _) => {
                info!(?path, "Loading pricing config from file");
                config = Self::from_file(&path)?;
            }
            (None, Some(path)) if path.exists() => {
                info!(?path, "Loading pricing config from file");
                config = Self::from_file(&path)?;
            }
            (None, path) => {
                debug!(?path, "Pricing config file not found, using defaults");
            }
        }

        config.apply_env_overrides(&env)?;
        config.validate()?;

        Ok(config)
    }

    /// Reads and parses one file, without env overrides or validation.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, format)
    }

    pub fn parse(contents: &str, format: ConfigFormat) -> ConfigResult<Self> {
        match format {
            ConfigFormat::Toml => Ok(toml::from_str(contents)?),
            ConfigFormat::Json => Ok(serde_json::from_str(contents)?),
        }
    }

    /// Saves configuration to file (pretty TOML, or JSON for `.json`).
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        let contents = match ConfigFormat::from_path(&path)? {
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
            ConfigFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| ConfigError::SaveFailed(e.to_string()))?,
        };

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }
        std::fs::write(&path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Pricing config saved");
        Ok(())
    }

    /// Checks every value and that the tables build into a complete engine.
    pub fn validate(&self) -> ConfigResult<()> {
        self.check_pricing_section()?;
        self.assemble().map(|_| ())
    }

    /// Validates and builds the engine request handlers share.
    ///
    /// ## Example
    /// ```rust
    /// use roadside_config::PricingConfig;
    /// use roadside_pricing::{ServiceType, SubscriptionTier, VehicleType};
    ///
    /// let engine = PricingConfig::default().build_engine().unwrap();
    /// let quote = engine
    ///     .quote(VehicleType::FourWheeler, ServiceType::Towing, 10.0, SubscriptionTier::Premium)
    ///     .unwrap();
    /// assert_eq!(quote.total.to_string(), "330.99");
    /// ```
    pub fn build_engine(&self) -> ConfigResult<PricingEngine> {
        self.check_pricing_section()?;
        let engine = self.assemble()?;

        info!(
            rules = engine.matrix().len(),
            tax_rate_bps = engine.settings().tax_rate.bps(),
            rounding = %engine.settings().rounding,
            surge_enabled = engine.surge().enabled,
            "Pricing engine ready"
        );
        Ok(engine)
    }

    fn check_pricing_section(&self) -> ConfigResult<()> {
        let currency = &self.pricing.currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::Invalid(format!(
                "currency must be a three-letter ISO 4217 code, got {currency:?}"
            )));
        }

        if self.pricing.distance_unit != SUPPORTED_DISTANCE_UNIT {
            return Err(ConfigError::Invalid(format!(
                "distance_unit must be \"{SUPPORTED_DISTANCE_UNIT}\", got {:?}",
                self.pricing.distance_unit
            )));
        }

        Ok(())
    }

    fn assemble(&self) -> ConfigResult<PricingEngine> {
        let matrix = if self.rates.is_empty() {
            PricingMatrix::standard()
        } else {
            let rules = self
                .rates
                .iter()
                .map(RateEntry::to_rule)
                .collect::<ConfigResult<Vec<_>>>()?;
            PricingMatrix::from_rules(rules)?
        };

        let tiers = TierDiscounts::from_percentages(self.tiers.percentages())?;
        let surge = self.surge.to_schedule()?;
        let settings = FareSettings {
            tax_rate: TaxRate::from_bps(self.pricing.tax_rate_bps)?,
            rounding: self.pricing.rounding,
        };

        Ok(PricingEngine::new(matrix, tiers, surge, settings)?)
    }

    /// Applies `ROADSIDE_*` overrides. A set but unparseable value is an
    /// error rather than silently ignored.
    fn apply_env_overrides<F>(&mut self, env: &F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Tax rate
        if let Some(raw) = env(TAX_RATE_ENV) {
            let bps = raw.trim().parse::<u32>().map_err(|_| {
                ConfigError::Invalid(format!("{TAX_RATE_ENV} must be an integer, got {raw:?}"))
            })?;
            debug!(tax_rate_bps = bps, "Overriding tax rate from environment");
            self.pricing.tax_rate_bps = bps;
        }

        // Rounding mode
        if let Some(raw) = env(ROUNDING_ENV) {
            let mode: RoundingMode = raw.parse()?;
            debug!(rounding = %mode, "Overriding rounding mode from environment");
            self.pricing.rounding = mode;
        }

        // Currency
        if let Some(raw) = env(CURRENCY_ENV) {
            let code = raw.trim().to_ascii_uppercase();
            debug!(currency = %code, "Overriding currency from environment");
            self.pricing.currency = code;
        }

        // Surge switch
        if let Some(raw) = env(SURGE_ENABLED_ENV) {
            let enabled = parse_flag(&raw).ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "{SURGE_ENABLED_ENV} must be true or false, got {raw:?}"
                ))
            })?;
            debug!(enabled, "Overriding surge switch from environment");
            self.surge.enabled = enabled;
        }

        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "roadside", "pricing")
            .map(|dirs| dirs.config_dir().join("pricing.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn currency(&self) -> &str {
        &self.pricing.currency
    }

    /// Formats an amount with the configured symbol, e.g. `₹441.32`.
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.pricing.currency_symbol)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadside_pricing::PricingError;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn full_rates(base: &str) -> String {
        let mut out = String::new();
        for vehicle in VehicleType::ALL {
            for service in ServiceType::ALL {
                out.push_str(&format!(
                    "[[rates]]\nvehicle = \"{vehicle}\"\nservice = \"{service}\"\nbase = \"{base}\"\nper_km = 10\n\n"
                ));
            }
        }
        out
    }

    #[test]
    fn test_default_config_builds_standard_engine() {
        let config = PricingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.build_engine().unwrap(), PricingEngine::standard());
        assert_eq!(config.currency(), "INR");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PricingConfig::parse(
            "[pricing]\ntax_rate_bps = 500\n\n[tiers]\nelite = 40\n",
            ConfigFormat::Toml,
        )
        .unwrap();

        assert_eq!(config.pricing.tax_rate_bps, 500);
        assert_eq!(config.pricing.rounding, RoundingMode::HalfUp);
        assert_eq!(config.tiers.elite, 40);
        assert_eq!(config.tiers.premium, 25);
        assert!(config.surge.enabled);
        assert!(config.rates.is_empty());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = PricingConfig::default();
        let env = env_of(&[
            (TAX_RATE_ENV, "1200"),
            (ROUNDING_ENV, "bankers"),
            (CURRENCY_ENV, " usd "),
            (SURGE_ENABLED_ENV, "off"),
        ]);
        config.apply_env_overrides(&env).unwrap();

        assert_eq!(config.pricing.tax_rate_bps, 1_200);
        assert_eq!(config.pricing.rounding, RoundingMode::HalfEven);
        assert_eq!(config.pricing.currency, "USD");
        assert!(!config.surge.enabled);
    }

    #[test]
    fn test_bad_env_values_are_errors() {
        let mut config = PricingConfig::default();
        assert!(matches!(
            config.apply_env_overrides(&env_of(&[(TAX_RATE_ENV, "18%")])),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            config.apply_env_overrides(&env_of(&[(ROUNDING_ENV, "down")])),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            config.apply_env_overrides(&env_of(&[(SURGE_ENABLED_ENV, "maybe")])),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_validation_rejects_out_of_range_values() {
        let mut config = PricingConfig::default();
        config.pricing.tax_rate_bps = 10_001;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = PricingConfig::default();
        config.tiers.basic = 101;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Pricing(PricingError::InvalidConfig(_)))
        ));

        let mut config = PricingConfig::default();
        config.surge.multiplier_bps = 9_000;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = PricingConfig::default();
        config.surge.windows = vec![PeakWindow {
            start_hour: 22,
            end_hour: 6,
        }];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Pricing(PricingError::InvalidConfig(_)))
        ));

        let mut config = PricingConfig::default();
        config.pricing.distance_unit = "mi".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = PricingConfig::default();
        config.pricing.currency = "rupees".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_custom_rates_replace_matrix() {
        let config = PricingConfig::parse(&full_rates("100.50"), ConfigFormat::Toml).unwrap();
        assert_eq!(config.rates.len(), 42);

        let engine = config.build_engine().unwrap();
        let rule = engine.lookup(VehicleType::Van, ServiceType::Lockout).unwrap();
        assert_eq!(rule.base.minor(), 10_050);
        assert_eq!(rule.per_km.minor(), 1_000);
        assert_eq!(rule.included, Distance::from_whole_km(5));
    }

    #[test]
    fn test_incomplete_rates_fail_fast() {
        let toml = "[[rates]]\nvehicle = \"SUV\"\nservice = \"TOWING\"\nbase = 299\nper_km = 25\n";
        let config = PricingConfig::parse(toml, ConfigFormat::Toml).unwrap();

        let err = config.build_engine().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Pricing(PricingError::MissingRule { .. })
        ));
    }

    #[test]
    fn test_oversized_rate_rejected_at_load() {
        let config =
            PricingConfig::parse(&full_rates("92233720368547758.06"), ConfigFormat::Toml).unwrap();

        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::Pricing(PricingError::InvalidConfig(_))
        ));
        assert!(config.build_engine().is_err());
    }

    #[test]
    fn test_unknown_tag_is_parse_error() {
        let toml = "[[rates]]\nvehicle = \"HOVERCRAFT\"\nservice = \"TOWING\"\nbase = 1\nper_km = 1\n";
        assert!(matches!(
            PricingConfig::parse(toml, ConfigFormat::Toml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("pricing.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("/etc/roadside/PRICING.JSON")).unwrap(),
            ConfigFormat::Json
        );
        assert!(ConfigFormat::from_path(Path::new("pricing.yaml")).is_err());
        assert!(ConfigFormat::from_path(Path::new("pricing")).is_err());
    }

    #[test]
    fn test_toml_serialization() {
        let config = PricingConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[pricing]"));
        assert!(toml_str.contains("[tiers]"));
        assert!(toml_str.contains("rounding = \"half_up\""));
        assert!(!toml_str.contains("rates"));

        let back = PricingConfig::parse(&toml_str, ConfigFormat::Toml).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_format_money() {
        let config = PricingConfig::default();
        assert_eq!(config.format_money(Money::from_minor(44_132)), "₹441.32");
    }
}

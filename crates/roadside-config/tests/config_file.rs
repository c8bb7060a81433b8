//! Config files on disk: load, override, save.

use std::path::PathBuf;

use roadside_config::{ConfigError, PricingConfig, CONFIG_PATH_ENV};
use roadside_pricing::{
    PricingEngine, RoundingMode, ServiceType, SubscriptionTier, VehicleType,
};

/// Unique path in the OS temp dir. Removed on drop.
struct ScratchFile(PathBuf);

impl ScratchFile {
    fn new(extension: &str) -> Self {
        ScratchFile(std::env::temp_dir().join(format!(
            "roadside-pricing-{}.{extension}",
            uuid::Uuid::new_v4()
        )))
    }

    fn with_contents(extension: &str, contents: &str) -> Self {
        let file = ScratchFile::new(extension);
        std::fs::write(&file.0, contents).unwrap();
        file
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn example_file_matches_defaults() {
    let file = ScratchFile::with_contents("toml", include_str!("../pricing.example.toml"));
    let config = PricingConfig::load_with_env(Some(file.0.clone()), no_env).unwrap();

    assert_eq!(config, PricingConfig::default());
    assert_eq!(config.build_engine().unwrap(), PricingEngine::standard());
}

#[test]
fn toml_file_then_env_overrides() {
    let file = ScratchFile::with_contents(
        "toml",
        "[pricing]\ntax_rate_bps = 500\nrounding = \"half_even\"\n",
    );
    let env = |key: &str| (key == "ROADSIDE_TAX_RATE_BPS").then(|| "0".to_string());

    let config = PricingConfig::load_with_env(Some(file.0.clone()), env).unwrap();
    assert_eq!(config.pricing.tax_rate_bps, 0);
    assert_eq!(config.pricing.rounding, RoundingMode::HalfEven);

    let quote = config
        .build_engine()
        .unwrap()
        .quote(VehicleType::FourWheeler, ServiceType::Towing, 5.0, SubscriptionTier::Free)
        .unwrap();
    assert_eq!(quote.total.to_string(), "249.00");
}

#[test]
fn json_file_is_read_by_extension() {
    let file = ScratchFile::with_contents(
        "json",
        r#"{ "tiers": { "premium": 30 }, "surge": { "enabled": false } }"#,
    );
    let config = PricingConfig::load_with_env(Some(file.0.clone()), no_env).unwrap();
    assert_eq!(config.tiers.premium, 30);
    assert!(!config.surge.enabled);

    let quote = config
        .build_engine()
        .unwrap()
        .quote(VehicleType::FourWheeler, ServiceType::Towing, 10.0, SubscriptionTier::Premium)
        .unwrap();
    // 441.32 x 30% = 132.396
    assert_eq!(quote.discount.to_string(), "132.40");
    assert_eq!(quote.total.to_string(), "308.92");
}

#[test]
fn path_from_env_variable() {
    let file = ScratchFile::with_contents("toml", "[pricing]\ncurrency = \"USD\"\n");
    let path = file.0.to_string_lossy().into_owned();
    let env = move |key: &str| (key == CONFIG_PATH_ENV).then(|| path.clone());

    let config = PricingConfig::load_with_env(None, env).unwrap();
    assert_eq!(config.currency(), "USD");
}

#[test]
fn explicit_missing_file_is_an_error() {
    let missing = ScratchFile::new("toml");
    let err = PricingConfig::load_with_env(Some(missing.0.clone()), no_env).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn malformed_file_is_parse_error() {
    let file = ScratchFile::with_contents("toml", "[pricing\ntax_rate_bps = ");
    let err = PricingConfig::load_with_env(Some(file.0.clone()), no_env).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn invalid_values_fail_at_load() {
    let file = ScratchFile::with_contents("toml", "[surge]\nmultiplier_bps = 5000\n");
    let err = PricingConfig::load_with_env(Some(file.0.clone()), no_env).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn save_then_load_round_trip() {
    for extension in ["toml", "json"] {
        let file = ScratchFile::new(extension);

        let mut config = PricingConfig::default();
        config.pricing.tax_rate_bps = 1_200;
        config.tiers.basic = 15;
        config.surge.weekdays_only = false;
        config.save(Some(file.0.clone())).unwrap();

        let loaded = PricingConfig::load_with_env(Some(file.0.clone()), no_env).unwrap();
        assert_eq!(loaded, config, "{extension}");
    }
}

//! # roadside-config: Configuration for the Roadside Pricing Engine
//!
//! Owns every file and environment read the pricing engine needs, so that
//! `roadside-pricing` itself stays pure.
//!
//! ## Startup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  init_tracing()                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PricingConfig::load(path)   defaults → file → ROADSIDE_* → validate   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  config.build_engine()       completeness check, fail fast             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Arc<PricingEngine>          shared by every request handler           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use roadside_config::{init_tracing, PricingConfig};
//!
//! init_tracing();
//! let config = PricingConfig::load(None).expect("pricing config");
//! let engine = Arc::new(config.build_engine().expect("pricing tables"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod logging;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::{
    ConfigFormat, PricingConfig, PricingSection, RateEntry, SurgeSection, TierSection,
    CONFIG_PATH_ENV,
};
pub use error::{ConfigError, ConfigResult};
pub use logging::{init_tracing, DEFAULT_LOG_FILTER};

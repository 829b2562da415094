//! Configuration module for the options engine.
//!
//! YAML configuration with `${VAR}` / `${VAR:-default}` environment
//! interpolation and validation. Every field has a default, so an empty
//! document is a valid configuration.
//!
//! # Usage
//!
//! ```rust,ignore
//! use options_engine::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Access configuration values
//! println!("scanner top_n: {}", config.scanner.top_n);
//! ```

mod gateway;
mod observability;
mod pricing;
mod provider;
mod scanner;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use gateway::GatewayCacheConfig;
pub use observability::{LoggingConfig, ObservabilityConfig};
pub use pricing::PricingConfig;
pub use provider::{ProviderConfig, QuoteFallbackConfig};
pub use scanner::ScannerConfig;

use crate::domain::condor::MAX_TOP_N;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Gateway cache configuration.
    #[serde(default)]
    pub gateway: GatewayCacheConfig,
    /// Pricing model configuration.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Condor scanner defaults.
    #[serde(default)]
    pub scanner: ScannerConfig,
    /// Market data provider configuration.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Live-then-daily quote fallback.
    #[serde(default)]
    pub quote_fallback: QuoteFallbackConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax. Unset or empty
/// variables without a default become empty strings.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
pub fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |caps: &regex::Captures<'_>| {
        let default_value = caps.get(2).map(|m| m.as_str());
        match caps.get(1).map(|m| std::env::var(m.as_str())) {
            Some(Ok(v)) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

/// Validate configuration values.
///
/// # Errors
///
/// Returns the first violated constraint.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&config.pricing.risk_free_rate) {
        return Err(invalid("risk_free_rate must be between 0.0 and 1.0"));
    }

    let scanner = &config.scanner;
    if !(1..=MAX_TOP_N).contains(&scanner.top_n) {
        return Err(invalid(format!(
            "scanner.top_n must be between 1 and {MAX_TOP_N}"
        )));
    }
    if !(scanner.max_spread_pct.is_finite() && scanner.max_spread_pct > 0.0) {
        return Err(invalid("scanner.max_spread_pct must be positive"));
    }
    if !(scanner.max_width_pct > 0.0 && scanner.max_width_pct <= 1.0) {
        return Err(invalid("scanner.max_width_pct must be in (0.0, 1.0]"));
    }

    if config.gateway.max_entries == Some(0) {
        return Err(invalid("gateway.max_entries must be positive when set"));
    }

    let provider = &config.provider;
    if !(provider.base_url.starts_with("http://") || provider.base_url.starts_with("https://")) {
        return Err(invalid("provider.base_url must be an http(s) URL"));
    }
    if provider.timeout_ms == 0 {
        return Err(invalid("provider.timeout_ms must be positive"));
    }
    if provider.max_pages == 0 {
        return Err(invalid("provider.max_pages must be at least 1"));
    }
    if provider.initial_backoff_ms > provider.max_backoff_ms {
        return Err(invalid(
            "provider.initial_backoff_ms must not exceed provider.max_backoff_ms",
        ));
    }

    if config.quote_fallback.timeout_ms == 0 {
        return Err(invalid("quote_fallback.timeout_ms must be positive"));
    }

    let valid_formats = ["json", "pretty"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(invalid(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    Ok(())
}

//! Configuration types.

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ConfigError;
use crate::onboarding::catalog::{CatalogVariant, OnboardingSettings};

/// Where profiles are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreBackend {
    /// Single flat JSON record on this device.
    #[default]
    Local,
    /// One libSQL row per signed-in user.
    Remote,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" | "libsql" => Ok(Self::Remote),
            other => Err(format!("unknown store '{other}' (expected local or remote)")),
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub store: StoreBackend,
    /// JSON file for the local store.
    pub local_path: PathBuf,
    /// Database file for the remote store.
    pub db_path: PathBuf,
    /// Optional directory for daily-rotated log files.
    pub log_dir: Option<PathBuf>,
    pub onboarding: OnboardingSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            store: StoreBackend::default(),
            local_path: PathBuf::from("./data/coin-critters.json"),
            db_path: PathBuf::from("./data/coin-critters.db"),
            log_dir: None,
            onboarding: OnboardingSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load from `COIN_CRITTERS_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup. Unset variables keep their
    /// defaults; set but invalid ones are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("COIN_CRITTERS_PORT") {
            Some(v) => v.trim().parse::<u16>().map_err(|e| invalid("COIN_CRITTERS_PORT", e))?,
            None => defaults.port,
        };

        let store = match get("COIN_CRITTERS_STORE") {
            Some(v) => v.parse().map_err(|e| invalid("COIN_CRITTERS_STORE", e))?,
            None => defaults.store,
        };

        let variant = match get("COIN_CRITTERS_VARIANT") {
            Some(v) => v
                .parse::<CatalogVariant>()
                .map_err(|e| invalid("COIN_CRITTERS_VARIANT", e))?,
            None => CatalogVariant::default(),
        };

        let mut onboarding = OnboardingSettings::for_variant(variant);
        if let Some(symbol) = get("COIN_CRITTERS_CURRENCY") {
            onboarding = onboarding.with_currency_symbol(symbol.trim());
        }
        if let Some(raw) = get("COIN_CRITTERS_GOAL_PRESETS") {
            onboarding = onboarding.with_goal_presets(parse_presets(&raw)?);
        }

        Ok(Self {
            port,
            store,
            local_path: get("COIN_CRITTERS_LOCAL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.local_path),
            db_path: get("COIN_CRITTERS_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_dir: get("COIN_CRITTERS_LOG_DIR").map(PathBuf::from),
            onboarding,
        })
    }
}

fn invalid(key: &str, message: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

/// Parse a comma-separated list of positive amounts.
fn parse_presets(raw: &str) -> Result<Vec<Decimal>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let amount = Decimal::from_str(s)
                .map_err(|e| ConfigError::ParseError(format!("goal preset '{s}': {e}")))?;
            if amount <= Decimal::ZERO {
                return Err(invalid("COIN_CRITTERS_GOAL_PRESETS", format!("{s} is not positive")));
            }
            Ok(amount)
        })
        .collect()
}

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    domain::target::DEFAULT_PROJECTED_INCOME,
    errors::BudgetError,
};

const DEFAULT_TOP_N: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Length of the top expenses / income / transactions lists.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Projected income used until the user saves one of their own.
    #[serde(default = "default_projected_income")]
    pub default_projected_income: f64,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_projected_income() -> f64 {
    DEFAULT_PROJECTED_INCOME
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            top_n: DEFAULT_TOP_N,
            default_projected_income: DEFAULT_PROJECTED_INCOME,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), BudgetError> {
        if self.top_n == 0 {
            return Err(BudgetError::ConfigError("top_n must be at least 1".into()));
        }
        if !self.default_projected_income.is_finite() || self.default_projected_income < 0.0 {
            return Err(BudgetError::ConfigError(
                "default_projected_income must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, BudgetError> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, BudgetError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, BudgetError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, BudgetError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data).map_err(|err| {
            BudgetError::ConfigError(format!("{}: {}", self.path.display(), err))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), BudgetError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
        let config = manager.load().expect("load");
        assert_eq!(config, Config::default());
        assert_eq!(config.top_n, 3);
        assert_eq!(config.default_projected_income, 5000.0);
    }

    #[test]
    fn save_then_load_roundtrips() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
        let config = Config {
            locale: "pt-PT".into(),
            currency: "EUR".into(),
            top_n: 5,
            default_projected_income: 2400.0,
        };
        manager.save(&config).expect("save");
        assert_eq!(manager.load().expect("load"), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
        fs::write(manager.path(), r#"{"locale":"en-GB","currency":"GBP"}"#).expect("write");
        let config = manager.load().expect("load");
        assert_eq!(config.currency, "GBP");
        assert_eq!(config.top_n, 3);
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
        let config = Config {
            top_n: 0,
            ..Config::default()
        };
        assert!(matches!(manager.save(&config), Err(BudgetError::ConfigError(_))));
    }
}

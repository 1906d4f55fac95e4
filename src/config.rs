//! Engine configuration.
//!
//! Values come from built-in defaults, then an optional config file, then
//! environment variables prefixed with `NEORM_` (e.g. `NEORM_DSN`).

use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::dialect::SQLITE3;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Driver name, also used to look up the dialect.
    pub driver: String,
    /// Data source, a file path or `:memory:` for SQLite.
    pub dsn: String,
    /// Filter handed to the tracing subscriber.
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            driver: SQLITE3.to_string(),
            dsn: ":memory:".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix("NEORM"))
    }

    pub(crate) fn load_with_env(path: Option<&str>, env: Environment) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("driver", defaults.driver)?
            .set_default("dsn", defaults.dsn)?
            .set_default("log_filter", defaults.log_filter)?;
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(false));
        }
        let settings = builder.add_source(env).build()?;
        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("NEORM").source(Some(source))
    }

    #[test]
    fn defaults_without_sources() {
        let cfg = EngineConfig::load_with_env(None, env(&[])).unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.driver, "sqlite3");
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let cfg = EngineConfig::load_with_env(Some("does_not_exist_neorm"), env(&[])).unwrap();
        assert_eq!(cfg.dsn, ":memory:");
    }

    #[test]
    fn environment_overrides_defaults() {
        let cfg = EngineConfig::load_with_env(
            None,
            env(&[("NEORM_DSN", "app.db"), ("NEORM_LOG_FILTER", "neorm=debug")]),
        )
        .unwrap();
        assert_eq!(cfg.dsn, "app.db");
        assert_eq!(cfg.log_filter, "neorm=debug");
        assert_eq!(cfg.driver, "sqlite3");
    }

    #[test]
    fn file_overrides_defaults() {
        let path = std::env::temp_dir().join("neorm_config_test.toml");
        std::fs::write(&path, "dsn = \"from_file.db\"\n").unwrap();
        let cfg = EngineConfig::load_with_env(path.to_str(), env(&[])).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(cfg.dsn, "from_file.db");
    }
}

use crate::paths::config_file;
use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Where the server listens unless configured otherwise.
pub const DEFAULT_API_ENDPOINT: &str = "http://localhost:4500";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// server address
    pub api_endpoint: Url,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_endpoint: Url::parse(DEFAULT_API_ENDPOINT).expect("Valid hardcoded server URL"),
        }
    }
}

impl Settings {
    /// Load from the config file in the OS config dir, then `OTP_*` env vars.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("OTP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(s.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testresult::TestResult;

    #[test]
    fn test_defaults_without_config_file() -> TestResult {
        let path = std::env::temp_dir().join("otp-cli-missing-config.toml");

        let settings = Settings::load_from(&path)?;

        assert_eq!(settings.api_endpoint.as_str(), "http://localhost:4500/");
        Ok(())
    }

    #[test]
    fn test_config_file_overrides_default() -> TestResult {
        let path = std::env::temp_dir().join(format!("otp-cli-{}.toml", std::process::id()));
        std::fs::write(&path, "api_endpoint = \"https://otp.example.com\"\n")?;

        let settings = Settings::load_from(&path);
        std::fs::remove_file(&path)?;

        assert_eq!(settings?.api_endpoint.as_str(), "https://otp.example.com/");
        Ok(())
    }
}

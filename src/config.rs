use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, OptionExt, Result, bail, eyre};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::tidal_rs::TidalSession;

pub const DEFAULT_TIDAL_API_BASE_URL: &str = "https://api.tidal.com/v1/";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tidal: TidalConfig,
    #[serde(default)]
    pub merge: MergeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TidalConfig {
    pub api_base_url: String,
    pub access_token: Option<String>,
    pub user_id: Option<String>,
    pub country_code: String,
}

impl Default for TidalConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_TIDAL_API_BASE_URL.to_string(),
            access_token: None,
            user_id: None,
            country_code: "US".to_string(),
        }
    }
}

/// Limits for the merge engine and the merge endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub batch_size: usize,
    pub track_limit: usize,
    pub max_duplicates_returned: usize,
    pub max_playlists: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            track_limit: 10_000,
            max_duplicates_returned: 200,
            max_playlists: 200,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("playlist-merger").join("config.toml"))
    }

    /// Loads the given file, or the default location when it exists, then applies
    /// environment overrides and validates the result.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::config_path() {
                Some(default_path) if default_path.exists() => Self::from_file(&default_path)?,
                _ => {
                    log::debug!("No config file found, using defaults");
                    Config::default()
                }
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Writes a default config file, if none exists yet.
    pub fn create_default() -> Result<PathBuf> {
        let path = Self::config_path().ok_or_eyre("Could not determine config directory")?;
        Self::write_default(&path)?;
        Ok(path)
    }

    fn write_default(path: &Path) -> Result<()> {
        if path.exists() {
            log::info!("Config already exists at {}", path.display());
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).wrap_err_with(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let contents =
            toml::to_string_pretty(&Config::default()).wrap_err("Failed to serialize config")?;
        std::fs::write(path, contents)
            .wrap_err_with(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("TIDAL_ACCESS_TOKEN") {
            self.tidal.access_token = Some(token);
        }
        if let Some(user_id) = lookup("TIDAL_USER_ID") {
            self.tidal.user_id = Some(user_id);
        }
        if let Some(country_code) = lookup("TIDAL_COUNTRY_CODE") {
            self.tidal.country_code = country_code;
        }

        let numeric = [
            ("BATCH_SIZE", &mut self.merge.batch_size),
            ("TRACK_LIMIT", &mut self.merge.track_limit),
            ("MAX_DUPLICATES_RETURNED", &mut self.merge.max_duplicates_returned),
            ("MAX_PLAYLISTS", &mut self.merge.max_playlists),
        ];
        for (key, slot) in numeric {
            if let Some(value) = lookup(key) {
                *slot = value
                    .trim()
                    .parse()
                    .wrap_err_with(|| format!("{} must be a positive integer, got '{}'", key, value))?;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.merge.batch_size == 0 {
            bail!("batch_size must be at least 1");
        }
        if self.merge.track_limit == 0 {
            bail!("track_limit must be at least 1");
        }
        if self.merge.max_playlists < 2 {
            bail!("max_playlists must be at least 2");
        }
        Ok(())
    }

    /// Credentials for talking to Tidal. Fails when the token or user id is missing.
    pub fn tidal_session(&self) -> Result<TidalSession> {
        let mut base = self.tidal.api_base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| eyre!("Invalid Tidal API base url '{}': {}", base, e))?;
        let access_token = self
            .tidal
            .access_token
            .clone()
            .ok_or_eyre("Tidal access token missing. Set TIDAL_ACCESS_TOKEN or [tidal].access_token")?;
        let user_id = self
            .tidal
            .user_id
            .clone()
            .ok_or_eyre("Tidal user id missing. Set TIDAL_USER_ID or [tidal].user_id")?;

        Ok(TidalSession {
            base_url,
            access_token,
            user_id,
            country_code: self.tidal.country_code.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("[merge]\nbatch_size = 25\n").unwrap();

        assert_eq!(config.merge.batch_size, 25);
        assert_eq!(config.merge.track_limit, 10_000);
        assert_eq!(config.merge.max_duplicates_returned, 200);
        assert_eq!(config.merge.max_playlists, 200);
        assert_eq!(config.tidal.country_code, "US");
        assert_eq!(config.tidal.api_base_url, DEFAULT_TIDAL_API_BASE_URL);
    }

    #[test]
    fn test_from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[tidal]\naccess_token = \"abc\"\nuser_id = \"42\"\ncountry_code = \"DE\"\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.tidal.access_token.as_deref(), Some("abc"));
        assert_eq!(config.tidal.country_code, "DE");
        assert_eq!(config.merge, MergeConfig::default());
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[merge]\nbatch_size = \"lots\"\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_env_overrides_replace_file_values() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[
                ("TIDAL_ACCESS_TOKEN", "token"),
                ("TIDAL_USER_ID", "7"),
                ("BATCH_SIZE", "10"),
                ("TRACK_LIMIT", " 500 "),
            ]))
            .unwrap();

        assert_eq!(config.tidal.access_token.as_deref(), Some("token"));
        assert_eq!(config.tidal.user_id.as_deref(), Some("7"));
        assert_eq!(config.merge.batch_size, 10);
        assert_eq!(config.merge.track_limit, 500);
        assert_eq!(config.merge.max_playlists, 200);
    }

    #[test]
    fn test_env_override_rejects_non_numeric_limits() {
        let mut config = Config::default();
        let err = config
            .apply_env_overrides(env(&[("MAX_PLAYLISTS", "many")]))
            .unwrap_err();
        assert!(err.to_string().contains("MAX_PLAYLISTS"));
    }

    #[test]
    fn test_validate_rejects_zero_batch_size() {
        let mut config = Config::default();
        config.merge.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_write_default_round_trips_and_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Config::write_default(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), Config::default());

        std::fs::write(&path, "[merge]\ntrack_limit = 5\n").unwrap();
        Config::write_default(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap().merge.track_limit, 5);
    }

    #[test]
    fn test_tidal_session_requires_credentials() {
        let mut config = Config::default();
        assert!(config.tidal_session().is_err());

        config.tidal.access_token = Some("token".into());
        config.tidal.user_id = Some("42".into());
        config.tidal.api_base_url = "http://localhost:9000/v1".into();

        let session = config.tidal_session().unwrap();
        assert_eq!(session.base_url.as_str(), "http://localhost:9000/v1/");
        assert_eq!(session.user_id, "42");
        assert_eq!(session.country_code, "US");
    }
}

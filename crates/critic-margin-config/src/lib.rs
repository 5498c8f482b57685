use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Name written into new comments. `$VARS` and `~` are expanded on load.
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default)]
    pub layout: LayoutSettings,
}

/// Margin layout tuning, in host units (lines for the terminal viewer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub gap: f64,
    pub padding: f64,
    pub default_card_height: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            gap: 1.0,
            padding: 2.0,
            default_card_height: 3.0,
        }
    }
}

fn default_author() -> String {
    "$USER".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            author: default_author(),
            layout: LayoutSettings::default(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.author = Self::expand(&config.author).unwrap_or(config.author);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Loaded config, or defaults (with the author expanded) when there is no file.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_else(|| {
            let mut config = Self::default();
            config.author = Self::expand(&config.author).unwrap_or(config.author);
            config
        }))
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/critic-margin");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand(value: &str) -> Option<String> {
        match shellexpand::full(value) {
            Ok(expanded) => Some(expanded.into_owned()),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/critic-margin/config.toml"));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            author: "alice".into(),
            layout: LayoutSettings {
                gap: 4.0,
                padding: 10.0,
                default_card_height: 5.0,
            },
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = toml::from_str("author = \"bob\"\n").unwrap();
        assert_eq!(config.author, "bob");
        assert_eq!(config.layout, LayoutSettings::default());

        let config: Config = toml::from_str("[layout]\ngap = 2.5\n").unwrap();
        assert_eq!(config.author, "$USER");
        assert_eq!(config.layout.gap, 2.5);
        assert_eq!(config.layout.padding, LayoutSettings::default().padding);
    }

    #[test]
    fn test_expand_with_env_var() {
        unsafe {
            env::set_var("CRITIC_TEST_REVIEWER", "carol");
        }

        assert_eq!(
            Config::expand("$CRITIC_TEST_REVIEWER (review)"),
            Some("carol (review)".to_string())
        );

        unsafe {
            env::remove_var("CRITIC_TEST_REVIEWER");
        }
    }

    #[test]
    fn test_expand_unknown_var_fails() {
        assert_eq!(Config::expand("$CRITIC_TEST_SURELY_UNSET_VAR"), None);
    }

    #[test]
    fn test_expand_plain_name() {
        assert_eq!(Config::expand("dave"), Some("dave".to_string()));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_toml_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "author = [").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/dir/config.toml");
        let test_config = Config {
            author: "erin".into(),
            layout: LayoutSettings::default(),
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_author_env_var_expanded_on_load() {
        unsafe {
            env::set_var("CRITIC_TEST_AUTHOR", "frank");
        }

        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "author = \"$CRITIC_TEST_AUTHOR\"\n").unwrap();

        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(loaded.author, "frank");

        unsafe {
            env::remove_var("CRITIC_TEST_AUTHOR");
        }
    }
}

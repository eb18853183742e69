use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "crs-advisor.toml";

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the config was read from; `None` when defaults are in effect.
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub advice: AdviceConfig,
    pub tables: TablesConfig,
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralConfig {
    pub json: bool,
    pub target_score: u32,
    pub fail_below_target: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            json: false,
            target_score: 500,
            fail_below_target: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AdviceConfig {
    pub enabled: bool,
    pub show_action_steps: bool,
    /// 0 means no limit.
    pub max_suggestions: usize,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            show_action_steps: true,
            max_suggestions: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TablesConfig {
    /// Point tables to use instead of the built-in set. Empty keeps the built-in set.
    pub path: String,
}

impl TablesConfig {
    /// Override path, resolved against the directory the config was loaded from.
    pub fn override_path(&self, base: &Path) -> Option<PathBuf> {
        let trimmed = self.path.trim();
        if trimmed.is_empty() {
            return None;
        }
        let path = Path::new(trimmed);
        Some(if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScanConfig {
    pub exclude: Vec<String>,
    pub extensions: Vec<String>,
    pub max_file_size_kb: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude: vec![
                "target".to_string(),
                ".git".to_string(),
                "node_modules".to_string(),
            ],
            extensions: vec!["toml".to_string(), "json".to_string()],
            max_file_size_kb: 256,
        }
    }
}

impl LoadedConfig {
    /// Directory that relative paths inside the config resolve against.
    pub fn base_dir(&self, cwd: &Path) -> PathBuf {
        self.source
            .as_deref()
            .and_then(Path::parent)
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| cwd.to_path_buf(), Path::to_path_buf)
    }
}

pub fn load_config(cli_config_path: Option<&Path>, cwd: &Path) -> Result<LoadedConfig> {
    if let Some(path) = cli_config_path {
        if !path.exists() {
            bail!(
                "config file not found at {} (passed with --config)",
                path.display()
            );
        }

        return Ok(LoadedConfig {
            config: read_config(path)?,
            source: Some(path.to_path_buf()),
        });
    }

    let local_path = cwd.join(CONFIG_FILE_NAME);
    if local_path.exists() {
        return Ok(LoadedConfig {
            config: read_config(&local_path)?,
            source: Some(local_path),
        });
    }

    Ok(LoadedConfig {
        config: Config::default(),
        source: None,
    })
}

pub fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!(
            "refusing to overwrite existing config file: {}",
            path.display()
        );
    }

    let content = default_config_toml()?;
    fs::write(path, content).with_context(|| format!("failed writing {}", path.display()))?;
    Ok(())
}

pub fn default_config_toml() -> Result<String> {
    toml::to_string_pretty(&Config::default()).context("failed to serialize default config")
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed reading config file {}", path.display()))?;
    let config = toml::from_str::<Config>(&content)
        .with_context(|| format!("failed parsing config file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
[general]
target_score = 470
"#,
        )
        .expect("partial config");
        assert_eq!(config.general.target_score, 470);
        assert!(!config.general.fail_below_target);
        assert_eq!(config.advice, AdviceConfig::default());
        assert_eq!(config.scan.extensions, vec!["toml", "json"]);
    }

    #[test]
    fn default_config_round_trips() {
        let rendered = default_config_toml().expect("serializable");
        let parsed: Config = toml::from_str(&rendered).expect("parsable");
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn loads_local_config_from_cwd() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[advice]\nmax_suggestions = 3\n",
        )
        .expect("write config");

        let loaded = load_config(None, dir.path()).expect("config loads");
        assert_eq!(loaded.config.advice.max_suggestions, 3);
        assert_eq!(loaded.base_dir(dir.path()), dir.path());
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.toml");
        let err = load_config(Some(&missing), dir.path()).expect_err("missing config");
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        write_default_config(&path).expect("first write");
        assert!(write_default_config(&path).is_err());
    }

    #[test]
    fn table_override_resolves_relative_paths() {
        let tables = TablesConfig {
            path: "tables/2025.toml".to_string(),
        };
        assert_eq!(
            tables.override_path(Path::new("/etc/crs")),
            Some(PathBuf::from("/etc/crs/tables/2025.toml"))
        );
        assert_eq!(TablesConfig::default().override_path(Path::new("/etc")), None);
    }
}

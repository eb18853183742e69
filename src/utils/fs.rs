use crate::core::input::ProfileInput;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFormat {
    Toml,
    Json,
}

impl ProfileFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_string_lossy().to_ascii_lowercase();
        match extension.as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

pub fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(extension) = path.extension() else {
        return false;
    };
    let extension = extension.to_string_lossy();
    extensions
        .iter()
        .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&extension))
}

pub fn parse_profile(content: &str, format: ProfileFormat) -> Result<ProfileInput> {
    match format {
        ProfileFormat::Toml => toml::from_str(content).context("failed parsing TOML profile"),
        ProfileFormat::Json => serde_json::from_str(content).context("failed parsing JSON profile"),
    }
}

pub fn read_profile(path: &Path) -> Result<ProfileInput> {
    let Some(format) = ProfileFormat::from_path(path) else {
        bail!(
            "unsupported profile format: {} (expected .toml or .json)",
            path.display()
        );
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed reading profile {}", path.display()))?;
    parse_profile(&content, format).with_context(|| format!("in {}", path.display()))
}

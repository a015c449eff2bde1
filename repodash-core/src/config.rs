//! Configuration file support for repodash
//!
//! Loads dashboard settings from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.repodashrc.json` in the working directory
//! 3. `repodash.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::loader::DataSource;
use crate::surface::DEFAULT_CHART_JS_URL;
use crate::table::EscapeMode;
use crate::view::RenderOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA: &str = "./data";
pub const DEFAULT_OUTPUT: &str = "dashboard.html";
pub const DEFAULT_TITLE: &str = "Repository Dashboard";

const CONFIG_FILES: &[&str] = &[".repodashrc.json", "repodash.config.json"];

/// repodash configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Directory or base URL holding latest.json and history.json (default: ./data)
    #[serde(default)]
    pub data: Option<String>,

    /// Where the rendered HTML is written (default: dashboard.html)
    #[serde(default)]
    pub output: Option<String>,

    /// Page title
    #[serde(default)]
    pub title: Option<String>,

    /// Chart.js script location; absolute http(s) URL or a relative path
    #[serde(default)]
    pub chart_js_url: Option<String>,

    /// Escape every table field instead of only file paths
    #[serde(default)]
    pub strict_escaping: Option<bool>,
}

/// Resolved configuration with defaults applied
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub data: DataSource,
    pub output: PathBuf,
    pub title: String,
    pub chart_js_url: String,
    pub escape_mode: EscapeMode,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl DashboardConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("data", &self.data),
            ("output", &self.output),
            ("title", &self.title),
            ("chart_js_url", &self.chart_js_url),
        ] {
            if let Some(v) = value {
                if v.trim().is_empty() {
                    anyhow::bail!("{} must not be empty", name);
                }
            }
        }

        if let Some(ref data) = self.data {
            DataSource::parse(data).with_context(|| format!("invalid data source: {}", data))?;
        }

        if let Some(ref url) = self.chart_js_url {
            if url.contains("://") && !is_http_url(url) {
                anyhow::bail!(
                    "chart_js_url must be an http(s) URL or a relative path (got {})",
                    url
                );
            }
        }

        Ok(())
    }

    /// Resolve config into the form used for rendering
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let data = DataSource::parse(self.data.as_deref().unwrap_or(DEFAULT_DATA))?;
        let escape_mode = if self.strict_escaping.unwrap_or(false) {
            EscapeMode::Strict
        } else {
            EscapeMode::Legacy
        };

        Ok(ResolvedConfig {
            data,
            output: PathBuf::from(self.output.as_deref().unwrap_or(DEFAULT_OUTPUT)),
            title: self.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            chart_js_url: self
                .chart_js_url
                .clone()
                .unwrap_or_else(|| DEFAULT_CHART_JS_URL.to_string()),
            escape_mode,
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            escape_mode: self.escape_mode,
        }
    }
}

fn is_http_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Discover and load a config file from the project root
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(project_root: &Path) -> Result<Option<(DashboardConfig, PathBuf)>> {
    for name in CONFIG_FILES {
        let path = project_root.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }
    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<DashboardConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: DashboardConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config for a project
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config from the project root.
/// Returns default config if nothing is found.
pub fn load_and_resolve(project_root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(project_root)? {
            Some((config, path)) => (config, Some(path)),
            None => (DashboardConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}

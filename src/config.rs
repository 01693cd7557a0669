// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use xdg::BaseDirectories;

use crate::catalog::brands::ThemeColor;
use crate::catalog::Dimension;

pub const APP_NAME: &str = "showroom";
pub const DEFAULT_CONFIG_FILENAME: &str = "config.toml";
pub const DEFAULT_CATALOG_FILENAME: &str = "catalog.json";

// Main configuration structure, mapping to config.toml
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub interface: InterfaceConfig,
    #[serde(default)]
    pub sliders: SliderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub keybindings: KeyBindingsConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DefaultView {
    #[default]
    Catalog,
    Used,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    // Path to the CMS export, can use ~. When unset, catalog.json next to config.toml is tried.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub default_view: DefaultView,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct InterfaceConfig {
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    #[serde(default)]
    pub theme_color: ThemeColor,
    #[serde(default = "default_max_log_entries")]
    pub max_log_entries: usize,
}

fn default_refresh_interval_ms() -> u64 {
    500
}
fn default_max_log_entries() -> usize {
    1000
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        InterfaceConfig {
            refresh_interval_ms: default_refresh_interval_ms(),
            theme_color: ThemeColor::default(),
            max_log_entries: default_max_log_entries(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct SliderConfig {
    #[serde(default = "default_year_step")]
    pub year_step: i64,
    #[serde(default = "default_price_step")]
    pub price_step: i64,
    #[serde(default = "default_displacement_step")]
    pub displacement_step: i64,
}

fn default_year_step() -> i64 { 1 }
fn default_price_step() -> i64 { 100 }
fn default_displacement_step() -> i64 { 50 }

impl Default for SliderConfig {
    fn default() -> Self {
        SliderConfig {
            year_step: default_year_step(),
            price_step: default_price_step(),
            displacement_step: default_displacement_step(),
        }
    }
}

impl SliderConfig {
    pub fn step(&self, dimension: Dimension) -> i64 {
        match dimension {
            Dimension::Year => self.year_step,
            Dimension::Price => self.price_step,
            Dimension::Displacement => self.displacement_step,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String, // "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_dir")]
    pub log_dir: String, // Path, can use ~
    #[serde(default)]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_dir() -> String {
    "~/.local/state/showroom/logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            log_dir: default_log_dir(),
            to_file: false,
        }
    }
}

impl LoggingConfig {
    pub fn resolved_log_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.log_dir).into_owned())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct KeyBindingsConfig {
    #[serde(default = "default_quit")] pub quit: String,
    #[serde(default = "default_help")] pub help: String,
    #[serde(default = "default_next_focus")] pub next_focus: String,
    #[serde(default = "default_prev_focus")] pub prev_focus: String,
    #[serde(default = "default_search")] pub search: String,
    #[serde(default = "default_clear")] pub clear: String,
    #[serde(default = "default_reload")] pub reload: String,
    #[serde(default = "default_toggle")] pub toggle: String,
    #[serde(default = "default_switch_handle")] pub switch_handle: String,
    #[serde(default = "default_logs")] pub logs: String,
    #[serde(default = "default_up")] pub up: String,
    #[serde(default = "default_down")] pub down: String,
    #[serde(default = "default_left")] pub left: String,
    #[serde(default = "default_right")] pub right: String,
}

fn default_quit() -> String { "q".to_string() }
fn default_help() -> String { "?".to_string() }
fn default_next_focus() -> String { "Tab".to_string() }
fn default_prev_focus() -> String { "BackTab".to_string() }
fn default_search() -> String { "/".to_string() }
fn default_clear() -> String { "r".to_string() }
fn default_reload() -> String { "Ctrl+r".to_string() }
fn default_toggle() -> String { "Space".to_string() }
fn default_switch_handle() -> String { "h".to_string() }
fn default_logs() -> String { "l".to_string() }
fn default_up() -> String { "Up".to_string() }
fn default_down() -> String { "Down".to_string() }
fn default_left() -> String { "Left".to_string() }
fn default_right() -> String { "Right".to_string() }

impl Default for KeyBindingsConfig {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            help: default_help(),
            next_focus: default_next_focus(),
            prev_focus: default_prev_focus(),
            search: default_search(),
            clear: default_clear(),
            reload: default_reload(),
            toggle: default_toggle(),
            switch_handle: default_switch_handle(),
            logs: default_logs(),
            up: default_up(),
            down: default_down(),
            left: default_left(),
            right: default_right(),
        }
    }
}

impl Config {
    /// An explicit path must exist and parse; without one, a missing XDG config yields defaults.
    pub fn load(config_path_override: Option<&Path>) -> Result<Self> {
        let config_path = match config_path_override {
            Some(path) => {
                debug!("Using provided config path override: {}", path.display());
                path.to_path_buf()
            }
            None => {
                let xdg_dirs = BaseDirectories::with_prefix(APP_NAME)?;
                match xdg_dirs.find_config_file(DEFAULT_CONFIG_FILENAME) {
                    Some(path) => path,
                    None => {
                        warn!(
                            "No '{}' found in XDG config dirs, using defaults",
                            DEFAULT_CONFIG_FILENAME
                        );
                        return Ok(Config::default());
                    }
                }
            }
        };

        info!("Loading configuration from {}", config_path.display());
        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

        let mut config = Self::from_toml_str(&config_str)?;

        // A relative catalog path is taken relative to the config file's directory.
        if let Some(catalog) = config.catalog.path.as_mut() {
            let expanded = PathBuf::from(shellexpand::tilde(catalog.as_str()).into_owned());
            if expanded.is_relative() {
                let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
                *catalog = config_dir.join(expanded).to_string_lossy().into_owned();
            }
        }

        Ok(config)
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        toml::from_str(config_str).with_context(|| "Failed to parse TOML configuration")
    }

    /// CLI flag first, then `[catalog].path`, then `catalog.json` in the XDG config dirs.
    pub fn resolve_catalog_path(&self, cli_override: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = cli_override {
            return Some(path.to_path_buf());
        }
        if let Some(path) = &self.catalog.path {
            return Some(PathBuf::from(shellexpand::tilde(path).into_owned()));
        }
        BaseDirectories::with_prefix(APP_NAME)
            .ok()
            .and_then(|dirs| dirs.find_config_file(DEFAULT_CATALOG_FILENAME))
    }
}

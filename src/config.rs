//! Configuration management for the preschool directory
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::DirectoryError;
use crate::models::Coordinates;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Highest zoom level offered by the tile service
const MAX_ZOOM: u8 = 19;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Web server settings
    pub server: ServerConfig,
    /// Map defaults and tile layer
    pub map: MapConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Certificate and key for HTTPS; plain HTTP when absent
    pub tls: Option<TlsConfig>,
}

/// PEM files for HTTPS
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Map defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Latitude of the initial map centre
    pub default_latitude: f64,
    /// Longitude of the initial map centre
    pub default_longitude: f64,
    /// Initial zoom level
    pub default_zoom: u8,
    /// Zoom used when the result list holds a single preschool
    pub single_result_zoom: u8,
    /// Padding in pixels when fitting several results
    pub fit_padding_px: u32,
    /// Tile URL template with `{z}`, `{x}` and `{y}` placeholders
    pub tile_url: String,
    /// Attribution shown on the map
    pub tile_attribution: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_latitude() -> f64 {
    59.3293
}

fn default_longitude() -> f64 {
    18.0686
}

fn default_zoom() -> u8 {
    6
}

fn default_single_result_zoom() -> u8 {
    13
}

fn default_fit_padding() -> u32 {
    20
}

fn default_tile_url() -> String {
    "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string()
}

fn default_tile_attribution() -> String {
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            tls: None,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_latitude: default_latitude(),
            default_longitude: default_longitude(),
            default_zoom: default_zoom(),
            single_result_zoom: default_single_result_zoom(),
            fit_padding_px: default_fit_padding(),
            tile_url: default_tile_url(),
            tile_attribution: default_tile_attribution(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl MapConfig {
    /// Initial map centre
    #[must_use]
    pub fn default_center(&self) -> Coordinates {
        Coordinates::new(self.default_latitude, self.default_longitude)
    }
}

impl DirectoryConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. FORSKOLA_SERVER__PORT=8080
        builder = builder.add_source(
            Environment::with_prefix("FORSKOLA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: DirectoryConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("forskola").join("config.toml"))
    }

    /// Apply default values to zeroed or empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.map.single_result_zoom == 0 {
            self.map.single_result_zoom = default_single_result_zoom();
        }
        if self.map.tile_url.is_empty() {
            self.map.tile_url = default_tile_url();
        }
        if self.map.tile_attribution.is_empty() {
            self.map.tile_attribution = default_tile_attribution();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_server()?;
        self.validate_map()?;
        self.validate_logging()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(DirectoryError::config("Server port cannot be 0").into());
        }
        if let Some(tls) = &self.server.tls {
            if tls.cert_path.as_os_str().is_empty() || tls.key_path.as_os_str().is_empty() {
                return Err(DirectoryError::config(
                    "TLS requires both cert_path and key_path",
                )
                .into());
            }
        }
        Ok(())
    }

    fn validate_map(&self) -> Result<()> {
        if !self.map.default_center().is_valid() {
            return Err(DirectoryError::config(format!(
                "Default map centre {} is not a valid coordinate",
                self.map.default_center().format_coordinates()
            ))
            .into());
        }

        for (name, zoom) in [
            ("default_zoom", self.map.default_zoom),
            ("single_result_zoom", self.map.single_result_zoom),
        ] {
            if zoom > MAX_ZOOM {
                return Err(DirectoryError::config(format!(
                    "Map {name} cannot exceed {MAX_ZOOM}"
                ))
                .into());
            }
        }

        if self.map.fit_padding_px > 500 {
            return Err(DirectoryError::config("Map fit padding cannot exceed 500 px").into());
        }

        let url = &self.map.tile_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(DirectoryError::config(
                "Tile URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }
        if !["{z}", "{x}", "{y}"].iter().all(|p| url.contains(p)) {
            return Err(DirectoryError::config(
                "Tile URL must contain {z}, {x} and {y} placeholders",
            )
            .into());
        }

        Ok(())
    }

    fn validate_logging(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(DirectoryError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(DirectoryError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = DirectoryConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.map.default_zoom, 6);
        assert_eq!(config.map.single_result_zoom, 13);
        assert_eq!(config.map.fit_padding_px, 20);
        assert_eq!(config.logging.level, "info");
        assert!(config.server.tls.is_none());
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case::zoom(|c: &mut DirectoryConfig| c.map.single_result_zoom = 25, "cannot exceed")]
    #[case::port(|c: &mut DirectoryConfig| c.server.port = 0, "port")]
    #[case::padding(|c: &mut DirectoryConfig| c.map.fit_padding_px = 1000, "padding")]
    #[case::centre(|c: &mut DirectoryConfig| c.map.default_latitude = 120.0, "centre")]
    #[case::tile_scheme(|c: &mut DirectoryConfig| c.map.tile_url = "ftp://tiles/{z}/{x}/{y}".into(), "HTTP")]
    #[case::tile_placeholders(|c: &mut DirectoryConfig| c.map.tile_url = "https://tiles.example/map.png".into(), "placeholders")]
    #[case::log_level(|c: &mut DirectoryConfig| c.logging.level = "loud".into(), "Invalid log level")]
    #[case::log_format(|c: &mut DirectoryConfig| c.logging.format = "xml".into(), "Invalid log format")]
    fn test_validation_rejects(#[case] mutate: fn(&mut DirectoryConfig), #[case] message: &str) {
        let mut config = DirectoryConfig::default();
        mutate(&mut config);
        let err = config.validate().unwrap_err();
        assert!(
            err.to_string().contains(message),
            "'{err}' does not mention '{message}'"
        );
    }

    #[test]
    fn test_apply_defaults_refills_empty_values() {
        let mut config = DirectoryConfig::default();
        config.logging.level.clear();
        config.map.tile_url.clear();
        config.map.single_result_zoom = 0;
        config.apply_defaults();
        assert_eq!(config.logging.level, "info");
        assert!(config.map.tile_url.contains("openstreetmap"));
        assert_eq!(config.map.single_result_zoom, 13);
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("forskola-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[server]\nport = 8088\n\n[map]\nsingle_result_zoom = 14").unwrap();

        let config = DirectoryConfig::load_from_path(Some(path)).unwrap();
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.map.single_result_zoom, 14);
        assert_eq!(config.map.default_zoom, 6);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = DirectoryConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("forskola"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}

//! Application configuration.
//!
//! Uses `heapless::String` for the few text settings so the whole config is
//! plain fixed-size data. Every section has sensible defaults and `with_*`
//! builders; a JSON file only needs to name the fields it changes.
//!
//! # Example
//!
//! ```rust
//! use oled_panel::config::{Config, PanelConfig, WebConfig};
//!
//! // Use defaults
//! let config = Config::default();
//!
//! // Or customize
//! let config = Config::default()
//!     .with_panel(PanelConfig::default().with_size(128, 32))
//!     .with_web(WebConfig::default().with_port(3000));
//!
//! // Or load from JSON
//! let config = Config::from_json_str(r#"{ "panel": { "height": 32 } }"#).unwrap();
//! assert_eq!(config.panel.width, 128);
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use heapless::String as HString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::panel::VccProfile;

/// Maximum length for short config strings (titles)
pub const MAX_SHORT_STRING: usize = 24;

/// Maximum length for longer config strings (paths)
pub const MAX_LONG_STRING: usize = 128;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Type alias for longer config strings
pub type LongString = HString<MAX_LONG_STRING>;

// ============================================================================
// Helper for creating heapless strings
// ============================================================================

fn truncated<const N: usize>(s: &str) -> HString<N> {
    let mut hs = HString::new();
    for c in s.chars() {
        if hs.push(c).is_err() {
            break;
        }
    }
    hs
}

/// Create a ShortString from a &str, truncating at a char boundary if too long
pub fn short_string(s: &str) -> ShortString {
    truncated(s)
}

/// Create a LongString from a &str, truncating at a char boundary if too long
pub fn long_string(s: &str) -> LongString {
    truncated(s)
}

// ============================================================================
// Errors
// ============================================================================

/// Configuration loading or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The JSON was malformed or had wrong field types.
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Panel geometry and bus location
    pub panel: PanelConfig,
    /// Temperature sensor
    pub sensor: SensorConfig,
    /// Event and render timing
    pub scheduler: SchedulerConfig,
    /// Monitoring web server
    pub web: WebConfig,
    /// Screen content
    pub screens: ScreensConfig,
}

impl Config {
    /// Set panel configuration
    pub fn with_panel(mut self, panel: PanelConfig) -> Self {
        self.panel = panel;
        self
    }

    /// Set sensor configuration
    pub fn with_sensor(mut self, sensor: SensorConfig) -> Self {
        self.sensor = sensor;
        self
    }

    /// Set scheduler configuration
    pub fn with_scheduler(mut self, scheduler: SchedulerConfig) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Set web configuration
    pub fn with_web(mut self, web: WebConfig) -> Self {
        self.web = web;
        self
    }

    /// Set screen configuration
    pub fn with_screens(mut self, screens: ScreensConfig) -> Self {
        self.screens = screens;
        self
    }

    /// Parses and validates a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks geometry, addresses and timing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.panel;
        if p.width == 0 || p.height == 0 {
            return Err(ConfigError::Invalid("panel size must be non-zero"));
        }
        if p.height % 8 != 0 {
            return Err(ConfigError::Invalid("panel height must be a multiple of 8"));
        }
        if p.width > 256 || p.height > 256 {
            return Err(ConfigError::Invalid("panel dimensions are limited to 256"));
        }
        if p.address > 0x7F || self.sensor.address > 0x7F {
            return Err(ConfigError::Invalid("I2C addresses are 7-bit"));
        }
        let s = &self.scheduler;
        if s.update_period_ms == 0 || s.switch_period_ms == 0 {
            return Err(ConfigError::Invalid("timer periods must be non-zero"));
        }
        Ok(())
    }
}

// ============================================================================
// Panel Config
// ============================================================================

/// Panel geometry and bus location
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels (multiple of 8)
    pub height: u32,
    /// I2C bus number (`/dev/i2c-N`)
    pub bus: u8,
    /// 7-bit I2C address
    pub address: u8,
    /// Supply profile selecting charge pump, contrast and precharge
    pub vcc: VccProfile,
    /// Contrast applied after initialization, overriding the profile's
    pub contrast: Option<u8>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 64,
            bus: 1,
            address: 0x3C,
            vcc: VccProfile::Internal,
            contrast: None,
        }
    }
}

impl PanelConfig {
    /// Set the panel size
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the bus location
    pub fn with_bus(mut self, bus: u8, address: u8) -> Self {
        self.bus = bus;
        self.address = address;
        self
    }

    /// Set the supply profile
    pub fn with_vcc(mut self, vcc: VccProfile) -> Self {
        self.vcc = vcc;
        self
    }

    /// Override the contrast
    pub fn with_contrast(mut self, contrast: u8) -> Self {
        self.contrast = Some(contrast);
        self
    }
}

// ============================================================================
// Sensor Config
// ============================================================================

/// Temperature sensor configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Whether a sensor is attached
    pub enabled: bool,
    /// I2C bus number
    pub bus: u8,
    /// 7-bit I2C address
    pub address: u8,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bus: 1,
            address: 0x44,
        }
    }
}

impl SensorConfig {
    /// Enable or disable the sensor
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the bus location
    pub fn with_bus(mut self, bus: u8, address: u8) -> Self {
        self.bus = bus;
        self.address = address;
        self
    }
}

// ============================================================================
// Scheduler Config
// ============================================================================

/// Event and render timing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Period of the update timer in milliseconds
    pub update_period_ms: u32,
    /// Period of the screen switch timer in milliseconds
    pub switch_period_ms: u32,
    /// Sleep after each render in milliseconds
    pub frame_interval_ms: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            update_period_ms: 1000,
            switch_period_ms: 10_000,
            frame_interval_ms: 16,
        }
    }
}

impl SchedulerConfig {
    /// Set the update period
    pub fn with_update_period_ms(mut self, ms: u32) -> Self {
        self.update_period_ms = ms;
        self
    }

    /// Set the switch period
    pub fn with_switch_period_ms(mut self, ms: u32) -> Self {
        self.switch_period_ms = ms;
        self
    }

    /// Set the frame interval
    pub fn with_frame_interval_ms(mut self, ms: u32) -> Self {
        self.frame_interval_ms = ms;
        self
    }

    /// Update period as a `Duration`
    pub fn update_period(&self) -> Duration {
        Duration::from_millis(u64::from(self.update_period_ms))
    }

    /// Switch period as a `Duration`
    pub fn switch_period(&self) -> Duration {
        Duration::from_millis(u64::from(self.switch_period_ms))
    }

    /// Frame interval as a `Duration`
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.frame_interval_ms))
    }
}

// ============================================================================
// Web Config
// ============================================================================

/// Web server configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Port to listen on
    pub port: u16,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
    /// Whether web server is enabled
    pub enabled: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: 8088,
            cors_permissive: true,
            enabled: true,
        }
    }
}

impl WebConfig {
    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set CORS mode
    pub fn with_cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Enable or disable web server
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

// ============================================================================
// Screens Config
// ============================================================================

/// Screen content configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreensConfig {
    /// Title drawn on the status screen
    pub status_title: ShortString,
    /// PBM file for the logo screen (empty = built-in logo)
    pub logo_path: LongString,
}

impl Default for ScreensConfig {
    fn default() -> Self {
        Self {
            status_title: short_string("Sensor"),
            logo_path: LongString::new(),
        }
    }
}

impl ScreensConfig {
    /// Set the status screen title
    pub fn with_status_title(mut self, title: &str) -> Self {
        self.status_title = short_string(title);
        self
    }

    /// Set the logo file
    pub fn with_logo_path(mut self, path: &str) -> Self {
        self.logo_path = long_string(path);
        self
    }

    /// Logo file, if one is configured
    pub fn logo_path(&self) -> Option<&str> {
        (!self.logo_path.is_empty()).then_some(self.logo_path.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!((config.panel.width, config.panel.height), (128, 64));
        assert_eq!(config.panel.address, 0x3C);
        assert_eq!(config.sensor.address, 0x44);
        assert_eq!(config.web.port, 8088);
        assert_eq!(config.scheduler.frame_interval(), Duration::from_millis(16));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_pattern() {
        let config = Config::default()
            .with_panel(
                PanelConfig::default()
                    .with_size(128, 32)
                    .with_vcc(VccProfile::External)
                    .with_contrast(0x40),
            )
            .with_sensor(SensorConfig::default().with_enabled(false))
            .with_scheduler(SchedulerConfig::default().with_switch_period_ms(5000))
            .with_screens(ScreensConfig::default().with_status_title("Attic"));

        assert_eq!(config.panel.height, 32);
        assert_eq!(config.panel.vcc, VccProfile::External);
        assert_eq!(config.panel.contrast, Some(0x40));
        assert!(!config.sensor.enabled);
        assert_eq!(config.scheduler.switch_period(), Duration::from_secs(5));
        assert_eq!(config.screens.status_title.as_str(), "Attic");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = Config::from_json_str(
            r#"{
                "panel": { "vcc": "external", "contrast": 200 },
                "web": { "port": 9000 },
                "screens": { "logo_path": "/etc/oled/logo.pbm" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.panel.vcc, VccProfile::External);
        assert_eq!(config.panel.contrast, Some(200));
        assert_eq!(config.panel.width, 128);
        assert_eq!(config.web.port, 9000);
        assert!(config.web.enabled);
        assert_eq!(config.screens.logo_path(), Some("/etc/oled/logo.pbm"));
        assert_eq!(config.screens.status_title.as_str(), "Sensor");
    }

    #[test]
    fn json_round_trip() {
        let config = Config::default().with_web(WebConfig::default().with_cors(false));
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(Config::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            Config::from_json_str("{ panel: }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn height_must_be_whole_pages() {
        let config = Config::default().with_panel(PanelConfig::default().with_size(128, 60));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_size_rejected() {
        let config = Config::default().with_panel(PanelConfig::default().with_size(0, 64));
        assert!(config.validate().is_err());
    }

    #[test]
    fn eight_bit_address_rejected() {
        let config = Config::default().with_sensor(SensorConfig::default().with_bus(1, 0x88));
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_period_rejected() {
        let config =
            Config::default().with_scheduler(SchedulerConfig::default().with_update_period_ms(0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            Config::load("/nonexistent/oled-panel.json"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn empty_logo_path_means_builtin() {
        assert_eq!(ScreensConfig::default().logo_path(), None);
    }

    #[test]
    fn short_string_truncation() {
        let s = short_string(&"a".repeat(100));
        assert_eq!(s.len(), MAX_SHORT_STRING);
    }

    #[test]
    fn string_helpers_utf8_boundary() {
        // 23 ASCII bytes then a 2-byte char that does not fit
        let input = format!("{}°", "a".repeat(23));
        let s = short_string(&input);
        assert_eq!(s.as_str(), "a".repeat(23));
    }
}

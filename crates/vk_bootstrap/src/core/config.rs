//! # Bootstrap Configuration
//!
//! All settings that drive window creation, instance negotiation and device
//! selection live here. Every section has defaults matching the plain demo
//! (512x512 window, Vulkan 1.0, no layers, interactive GPU choice), and can be
//! loaded from TOML or RON through [`Config`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use crate::config::{Config, ConfigError};
use crate::vulkan::capabilities::{ApiVersion, LayerPolicy};
use crate::vulkan::debug::DebugSeverity;
use crate::vulkan::selection::DeviceSelection;

/// Default application name
pub const DEFAULT_APP_NAME: &str = "VulkanDemo";
/// Default engine name
pub const DEFAULT_ENGINE_NAME: &str = "VulkanDemoEngine";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

/// # Window Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Width in screen coordinates
    pub width: u32,
    /// Height in screen coordinates
    pub height: u32,
    /// Center on the primary monitor
    pub centered: bool,
    /// Treat Escape as a quit signal in addition to the close button
    pub escape_quits: bool,
    /// Seconds to block waiting for events each loop iteration (0 polls)
    pub event_wait_timeout: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_APP_NAME.to_string(),
            width: 512,
            height: 512,
            centered: true,
            escape_quits: true,
            event_wait_timeout: 0.1,
        }
    }
}

/// # Instance Configuration
///
/// Application metadata plus the extension and layer requests used when
/// creating the Vulkan instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
    /// Application name reported to the driver
    pub application_name: String,
    /// Engine name reported to the driver
    pub engine_name: String,
    /// Application version (raw integer passed through as-is)
    pub application_version: u32,
    /// Engine version (raw integer passed through as-is)
    pub engine_version: u32,
    /// Requested Vulkan API version
    pub api_version: ApiVersion,
    /// Which instance layers to enable
    pub layers: LayerPolicy,
    /// Extensions required on top of the window-system ones
    pub extra_extensions: Vec<String>,
    /// Register a debug messenger (needs `VK_EXT_debug_utils`)
    pub enable_debug_messenger: bool,
    /// Lowest severity forwarded by the debug messenger
    pub debug_severity: DebugSeverity,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            application_name: DEFAULT_APP_NAME.to_string(),
            engine_name: DEFAULT_ENGINE_NAME.to_string(),
            application_version: 1,
            engine_version: 1,
            api_version: ApiVersion::V1_0,
            layers: LayerPolicy::None,
            extra_extensions: Vec::new(),
            enable_debug_messenger: false,
            debug_severity: DebugSeverity::Warning,
        }
    }
}

/// # Device Configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// How to pick a GPU when more than one is present
    pub selection: DeviceSelection,
    /// Create a logical device on the selected GPU
    pub create_logical_device: bool,
}

/// # Complete Bootstrap Configuration
///
/// Top-level configuration consumed by [`crate::application::run`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Logging setup
    pub logging: LoggingConfig,
    /// Window setup
    pub window: WindowConfig,
    /// Instance setup
    pub instance: InstanceConfig,
    /// Device setup
    pub device: DeviceConfig,
}

impl BootstrapConfig {
    /// Defaults with the given application name used for the window title too
    pub fn new(app_name: impl Into<String>) -> Self {
        let app_name = app_name.into();
        let mut config = Self::default();
        config.window.title.clone_from(&app_name);
        config.instance.application_name = app_name;
        config
    }

    /// Set window size
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    /// Set layer policy
    pub fn with_layers(mut self, layers: LayerPolicy) -> Self {
        self.instance.layers = layers;
        self
    }

    /// Enable or disable the debug messenger
    pub fn with_debug_messenger(mut self, enabled: bool) -> Self {
        self.instance.enable_debug_messenger = enabled;
        self
    }

    /// Set GPU selection strategy
    pub fn with_selection(mut self, selection: DeviceSelection) -> Self {
        self.device.selection = selection;
        self
    }

    /// Enable or disable logical device creation
    pub fn with_logical_device(mut self, enabled: bool) -> Self {
        self.device.create_logical_device = enabled;
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if log::LevelFilter::from_str(&self.logging.level).is_err() {
            return Err(format!("Unknown log level: {}", self.logging.level));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(format!(
                "Window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            ));
        }

        let max_extent = i32::MAX.unsigned_abs();
        if self.window.width > max_extent || self.window.height > max_extent {
            return Err(format!(
                "Window size must not exceed {max_extent}, got {}x{}",
                self.window.width, self.window.height
            ));
        }

        if !self.window.event_wait_timeout.is_finite() || self.window.event_wait_timeout < 0.0 {
            return Err("Event wait timeout must be a non-negative number of seconds".to_string());
        }

        if self.instance.application_name.is_empty() {
            return Err("Application name cannot be empty".to_string());
        }

        if self.instance.api_version.major == 0 {
            return Err(format!("Unsupported API version {}", self.instance.api_version));
        }

        Ok(())
    }
}

impl Config for BootstrapConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    #[test]
    fn test_defaults_match_demo() {
        let config = BootstrapConfig::default();
        assert_eq!(config.window.width, 512);
        assert_eq!(config.window.height, 512);
        assert_eq!(config.instance.application_name, "VulkanDemo");
        assert_eq!(config.instance.engine_name, "VulkanDemoEngine");
        assert_eq!(config.instance.api_version, ApiVersion::V1_0);
        assert_eq!(config.instance.layers, LayerPolicy::None);
        assert_eq!(config.device.selection, DeviceSelection::Interactive);
        assert!(!config.device.create_logical_device);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_new_sets_title_and_app_name() {
        let config = BootstrapConfig::new("Probe");
        assert_eq!(config.window.title, "Probe");
        assert_eq!(config.instance.application_name, "Probe");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(BootstrapConfig::new("").validate().is_err());
        assert!(BootstrapConfig::default().with_window_size(0, 512).validate().is_err());
        assert!(BootstrapConfig::default().with_log_level("loud").validate().is_err());
        assert!(BootstrapConfig::default().with_window_size(u32::MAX, 512).validate().is_err());
        assert!(BootstrapConfig::default().with_window_size(512, 1 << 31).validate().is_err());
        assert!(BootstrapConfig::default()
            .with_window_size(i32::MAX.unsigned_abs(), 512)
            .validate()
            .is_ok());

        let mut config = BootstrapConfig::default();
        config.window.event_wait_timeout = -1.0;
        assert!(config.validate().is_err());

        let mut config = BootstrapConfig::default();
        config.instance.api_version = ApiVersion::new(0, 9, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let text = r#"
            [instance]
            application_name = "Partial"
            enable_debug_messenger = true
            layers = { require = ["VK_LAYER_KHRONOS_validation"] }

            [device]
            selection = { index = 1 }
        "#;
        let config = BootstrapConfig::from_str_with(text, ConfigFormat::Toml).unwrap();
        assert_eq!(config.instance.application_name, "Partial");
        assert!(config.instance.enable_debug_messenger);
        assert_eq!(
            config.instance.layers,
            LayerPolicy::Require(vec!["VK_LAYER_KHRONOS_validation".to_string()])
        );
        assert_eq!(config.device.selection, DeviceSelection::Index(1));
        assert_eq!(config.window.width, 512);
        assert_eq!(config.instance.engine_name, "VulkanDemoEngine");
    }

    #[test]
    fn test_ron_text_parses() {
        let text = r#"(
            window: (width: 800, height: 600),
            instance: (layers: all, debug_severity: info),
            device: (selection: prefer_discrete, create_logical_device: true),
        )"#;
        let config = BootstrapConfig::from_str_with(text, ConfigFormat::Ron).unwrap();
        assert_eq!((config.window.width, config.window.height), (800, 600));
        assert_eq!(config.instance.layers, LayerPolicy::All);
        assert_eq!(config.instance.debug_severity, DebugSeverity::Info);
        assert_eq!(config.device.selection, DeviceSelection::PreferDiscrete);
        assert!(config.device.create_logical_device);
    }

    #[test]
    fn test_save_and_load_through_files() {
        let dir = std::env::temp_dir().join(format!("vk_bootstrap_cfg_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let config = BootstrapConfig::new("Saved")
            .with_layers(LayerPolicy::Request(vec!["VK_LAYER_KHRONOS_validation".to_string()]))
            .with_selection(DeviceSelection::First)
            .with_logical_device(true);

        for file in ["bootstrap.toml", "bootstrap.ron"] {
            let path = dir.join(file);
            config.save_to_file(&path).unwrap();
            let loaded = BootstrapConfig::load_from_file(&path).unwrap();
            assert_eq!(loaded, config, "mismatch for {file}");
        }

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_shipped_sample_config_parses() {
        let text = include_str!("../../../../config/bootstrap.toml");
        let config = BootstrapConfig::from_str_with(text, ConfigFormat::Toml).unwrap();
        assert_eq!(config, BootstrapConfig::default());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = BootstrapConfig::load_from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

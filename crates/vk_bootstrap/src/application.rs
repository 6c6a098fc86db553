//! Application flow
//!
//! Window → Vulkan context → event loop → teardown. The three demo binaries
//! differ only in the [`Revision`] they apply on top of the configuration.

use std::io;
use std::path::Path;
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::core::config::BootstrapConfig;
use crate::foundation::logging;
use crate::vulkan::capabilities::LayerPolicy;
use crate::vulkan::{VulkanContext, VulkanError, Window, WindowError};

/// Layer enabled by the validation revisions
pub const VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Configuration loaded but is not usable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Window setup failed
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// Vulkan setup failed
    #[error("Vulkan error: {0}")]
    Vulkan(#[from] VulkanError),
}

/// Setup stages each demo binary adds on top of the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revision {
    /// List capabilities, create the instance with every installed layer, pick a GPU
    InstanceInfo,
    /// Enable the Khronos validation layer and a debug messenger
    Validation,
    /// Everything above plus a logical device
    LogicalDevice,
}

impl Revision {
    /// Apply this revision's stage settings to `config`
    pub fn apply(self, config: BootstrapConfig) -> BootstrapConfig {
        match self {
            Self::InstanceInfo => config
                .with_layers(LayerPolicy::All)
                .with_debug_messenger(false)
                .with_logical_device(false),
            Self::Validation => config
                .with_layers(LayerPolicy::Request(vec![VALIDATION_LAYER.to_string()]))
                .with_debug_messenger(true)
                .with_logical_device(false),
            Self::LogicalDevice => config
                .with_layers(LayerPolicy::Request(vec![VALIDATION_LAYER.to_string()]))
                .with_debug_messenger(true)
                .with_logical_device(true),
        }
    }
}

/// Load configuration from `path`, or defaults when no path is given
pub fn load_config(path: Option<&Path>) -> Result<BootstrapConfig, AppError> {
    match path {
        Some(path) => Ok(BootstrapConfig::load_from_file(path)?),
        None => Ok(BootstrapConfig::default()),
    }
}

/// Entry point shared by the demo binaries
pub fn launch(revision: Revision, config_path: Option<&Path>) -> Result<(), AppError> {
    let config = match load_config(config_path) {
        Ok(config) => revision.apply(config),
        Err(e) => {
            logging::init("info");
            return Err(e);
        }
    };

    logging::init(&config.logging.level);
    log::info!("Starting {:?} demo", revision);
    run(&config)
}

/// Bring up the window and Vulkan, then wait for the user to quit
pub fn run(config: &BootstrapConfig) -> Result<(), AppError> {
    config.validate().map_err(AppError::InvalidConfig)?;

    log::info!("Creating window...");
    let mut window = Window::new(&config.window)?;
    log::info!("Window created successfully");

    let context = {
        let mut input = io::stdin().lock();
        let mut out = io::stdout().lock();
        VulkanContext::new(&window, config, &mut input, &mut out)?
    };
    log::info!(
        "Vulkan ready on {} (graphics family {}): {} extension(s), {} layer(s), debug messenger {}, logical device {}",
        context.physical_device().name(),
        context.graphics_queue_family(),
        context.enabled_extensions().len(),
        context.enabled_layers().len(),
        if context.has_debug_messenger() { "on" } else { "off" },
        if context.device().is_some() { "created" } else { "skipped" }
    );

    log::info!("Entering event loop, close the window to quit");
    while !window.poll_quit() {}

    drop(context);
    drop(window);
    log::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vulkan::selection::DeviceSelection;

    #[test]
    fn test_instance_info_revision() {
        let config = Revision::InstanceInfo.apply(BootstrapConfig::default().with_debug_messenger(true));
        assert_eq!(config.instance.layers, LayerPolicy::All);
        assert!(!config.instance.enable_debug_messenger);
        assert!(!config.device.create_logical_device);
    }

    #[test]
    fn test_validation_revisions() {
        let validation = Revision::Validation.apply(BootstrapConfig::default());
        assert_eq!(
            validation.instance.layers,
            LayerPolicy::Request(vec![VALIDATION_LAYER.to_string()])
        );
        assert!(validation.instance.enable_debug_messenger);
        assert!(!validation.device.create_logical_device);

        let device = Revision::LogicalDevice.apply(BootstrapConfig::default());
        assert!(device.instance.enable_debug_messenger);
        assert!(device.device.create_logical_device);
    }

    #[test]
    fn test_revision_keeps_unrelated_settings() {
        let base = BootstrapConfig::new("Keep")
            .with_window_size(640, 480)
            .with_selection(DeviceSelection::First);
        let config = Revision::LogicalDevice.apply(base);
        assert_eq!(config.instance.application_name, "Keep");
        assert_eq!((config.window.width, config.window.height), (640, 480));
        assert_eq!(config.device.selection, DeviceSelection::First);
    }

    #[test]
    fn test_load_config_defaults_without_path() {
        assert_eq!(load_config(None).unwrap(), BootstrapConfig::default());
    }

    #[test]
    fn test_load_config_reports_bad_format() {
        let err = load_config(Some(Path::new("bootstrap.yaml"))).unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_run_rejects_invalid_config_before_windowing() {
        let err = run(&BootstrapConfig::new("")).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }

    #[test]
    fn test_error_messages_name_the_failed_stage() {
        let err = run(&BootstrapConfig::default().with_window_size(0, 512)).unwrap_err();
        assert!(err.to_string().starts_with("Invalid configuration: "));

        let err = AppError::from(WindowError::InitializationFailed);
        assert_eq!(err.to_string(), "Window error: GLFW initialization failed");
    }
}

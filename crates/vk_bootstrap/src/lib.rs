//! # vk_bootstrap
//!
//! Window and Vulkan bring-up with capability negotiation.
//!
//! ## Features
//!
//! - **Windowing**: GLFW window configured for Vulkan (no client API)
//! - **Capability Discovery**: instance extensions, layers and API version
//! - **Validation**: optional layers plus a debug messenger routed to `log`
//! - **Device Selection**: first, indexed, discrete-preferred or interactive
//! - **Logical Device**: single graphics queue on the selected GPU
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vk_bootstrap::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     let config = BootstrapConfig::new("VulkanDemo")
//!         .with_layers(LayerPolicy::Request(vec!["VK_LAYER_KHRONOS_validation".into()]))
//!         .with_debug_messenger(true);
//!     vk_bootstrap::application::run(&config)
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod core;
pub mod config;
pub mod foundation;
pub mod vulkan;
pub mod application;

pub use application::{AppError, Revision};
pub use crate::core::config::BootstrapConfig;

/// Common imports for bootstrap users
pub mod prelude {
    pub use crate::{
        AppError, Revision,
        config::{Config, ConfigError},
        core::config::{BootstrapConfig, DeviceConfig, InstanceConfig, LoggingConfig, WindowConfig},
        vulkan::{
            capabilities::{ApiVersion, ExtensionDescriptor, LayerDescriptor, LayerPolicy},
            debug::DebugSeverity,
            device::{GpuDescriptor, LogicalDevice, PhysicalDeviceInfo, QueueFamilyDescriptor},
            selection::DeviceSelection,
            VulkanContext, VulkanError, VulkanResult, Window, WindowError,
        },
    };
}

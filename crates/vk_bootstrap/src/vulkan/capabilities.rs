//! Instance capability discovery
//!
//! Reads the extension and layer lists the loader exposes, prints them, and
//! reconciles them with what the configuration asks for. Everything past the
//! raw enumeration works on plain descriptors so it can be exercised without
//! a driver.

use ash::{vk, Entry};
use serde::{Deserialize, Serialize};
use std::ffi::c_char;
use std::fmt;
use std::io::Write;

use crate::vulkan::error::{VulkanError, VulkanResult};

/// Convert a fixed-size, NUL-terminated driver string into a `String`
pub(crate) fn fixed_c_string(raw: &[c_char]) -> String {
    // `c_char` is i8 or u8 depending on target; reinterpret the byte either way
    #[allow(clippy::cast_sign_loss)]
    let bytes: Vec<u8> = raw.iter().take_while(|&&c| c != 0).map(|&c| c as u8).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// A Vulkan API version split into its components
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApiVersion {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch version
    pub patch: u32,
}

impl ApiVersion {
    /// Vulkan 1.0
    pub const V1_0: Self = Self::new(1, 0, 0);

    /// Build from components
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Decode a packed `VK_MAKE_API_VERSION` value (variant bits are ignored)
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            major: vk::api_version_major(raw),
            minor: vk::api_version_minor(raw),
            patch: vk::api_version_patch(raw),
        }
    }

    /// Encode as a packed value with variant 0
    pub const fn to_raw(self) -> u32 {
        vk::make_api_version(0, self.major, self.minor, self.patch)
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::V1_0
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// An instance extension offered by the loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDescriptor {
    /// Extension name, e.g. `VK_KHR_surface`
    pub name: String,
    /// Extension spec revision
    pub spec_version: u32,
}

impl ExtensionDescriptor {
    /// Build a descriptor with the given name
    pub fn new(name: impl Into<String>, spec_version: u32) -> Self {
        Self { name: name.into(), spec_version }
    }
}

impl From<&vk::ExtensionProperties> for ExtensionDescriptor {
    fn from(props: &vk::ExtensionProperties) -> Self {
        Self {
            name: fixed_c_string(&props.extension_name),
            spec_version: props.spec_version,
        }
    }
}

/// An instance layer installed on the system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerDescriptor {
    /// Layer name, e.g. `VK_LAYER_KHRONOS_validation`
    pub name: String,
    /// Human readable description
    pub description: String,
    /// Vulkan version the layer was written against
    pub spec_version: ApiVersion,
    /// Layer's own version number
    pub implementation_version: u32,
}

impl LayerDescriptor {
    /// Build a descriptor with the given name and description
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            spec_version: ApiVersion::V1_0,
            implementation_version: 1,
        }
    }
}

impl From<&vk::LayerProperties> for LayerDescriptor {
    fn from(props: &vk::LayerProperties) -> Self {
        Self {
            name: fixed_c_string(&props.layer_name),
            description: fixed_c_string(&props.description),
            spec_version: ApiVersion::from_raw(props.spec_version),
            implementation_version: props.implementation_version,
        }
    }
}

/// Which instance layers to enable
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerPolicy {
    /// Enable no layers
    #[default]
    None,
    /// Enable every installed layer
    All,
    /// Enable the listed layers that are installed, skip the rest
    Request(Vec<String>),
    /// Enable the listed layers, fail if any is missing
    Require(Vec<String>),
}

/// All extensions offered by the loader and implicit layers
pub fn available_extensions(entry: &Entry) -> VulkanResult<Vec<ExtensionDescriptor>> {
    #[allow(unused_unsafe)]
    let props = unsafe { entry.enumerate_instance_extension_properties(None) }
        .map_err(VulkanError::Api)?;
    Ok(props.iter().map(ExtensionDescriptor::from).collect())
}

/// All layers installed on the system
pub fn available_layers(entry: &Entry) -> VulkanResult<Vec<LayerDescriptor>> {
    #[allow(unused_unsafe)]
    let props = unsafe { entry.enumerate_instance_layer_properties() }.map_err(VulkanError::Api)?;
    Ok(props.iter().map(LayerDescriptor::from).collect())
}

/// Highest instance-level API version the loader supports
///
/// Loaders that predate `vkEnumerateInstanceVersion` only support 1.0.
pub fn instance_version(entry: &Entry) -> VulkanResult<ApiVersion> {
    #[allow(unused_unsafe)]
    let version = unsafe { entry.try_enumerate_instance_version() }.map_err(VulkanError::Api)?;
    Ok(version.map_or(ApiVersion::V1_0, ApiVersion::from_raw))
}

/// Resolve the final extension list
///
/// Every `required` name must be available; `optional` names are dropped with
/// a warning when missing. The result keeps request order with duplicates
/// removed.
pub fn negotiate_extensions(
    required: &[String],
    optional: &[String],
    available: &[ExtensionDescriptor],
) -> VulkanResult<Vec<String>> {
    let is_available = |name: &str| available.iter().any(|ext| ext.name == name);
    let mut enabled: Vec<String> = Vec::with_capacity(required.len() + optional.len());

    for name in required {
        if !is_available(name) {
            return Err(VulkanError::MissingExtension(name.clone()));
        }
        if !enabled.contains(name) {
            enabled.push(name.clone());
        }
    }

    for name in optional {
        if enabled.contains(name) {
            continue;
        }
        if is_available(name) {
            enabled.push(name.clone());
        } else {
            log::warn!("Optional instance extension {} not available, skipping", name);
        }
    }

    Ok(enabled)
}

/// Resolve the final layer list from a policy
pub fn negotiate_layers(policy: &LayerPolicy, available: &[LayerDescriptor]) -> VulkanResult<Vec<String>> {
    let is_available = |name: &str| available.iter().any(|layer| layer.name == name);

    let mut enabled = Vec::new();
    match policy {
        LayerPolicy::None => {}
        LayerPolicy::All => {
            for layer in available {
                if !enabled.contains(&layer.name) {
                    enabled.push(layer.name.clone());
                }
            }
        }
        LayerPolicy::Request(names) => {
            for name in names {
                if enabled.contains(name) {
                    continue;
                }
                if is_available(name) {
                    enabled.push(name.clone());
                } else {
                    log::warn!("Requested layer {} is not installed, skipping", name);
                }
            }
        }
        LayerPolicy::Require(names) => {
            for name in names {
                if !is_available(name) {
                    return Err(VulkanError::MissingLayer(name.clone()));
                }
                if !enabled.contains(name) {
                    enabled.push(name.clone());
                }
            }
        }
    }
    Ok(enabled)
}

/// Print `found N Vulkan instance extensions:` followed by one line per name
pub fn write_extension_listing<W: Write + ?Sized>(out: &mut W, names: &[String]) -> std::io::Result<()> {
    writeln!(out, "found {} Vulkan instance extensions:", names.len())?;
    for (index, name) in names.iter().enumerate() {
        writeln!(out, "{index}: {name}")?;
    }
    writeln!(out)
}

/// Print `found N Vulkan instance layers:` followed by `i: name: description`
pub fn write_layer_listing<W: Write + ?Sized>(out: &mut W, layers: &[LayerDescriptor]) -> std::io::Result<()> {
    writeln!(out, "found {} Vulkan instance layers:", layers.len())?;
    for (index, layer) in layers.iter().enumerate() {
        writeln!(out, "{}: {}: {}", index, layer.name, layer.description)?;
    }
    writeln!(out)
}

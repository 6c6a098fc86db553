//! Full bring-up: validation, debug messenger and a logical device with one
//! graphics queue on the selected GPU.
//!
//! Usage: `logical_device [config.toml|config.ron]`

use std::path::PathBuf;
use vk_bootstrap::{application, Revision};

fn main() {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    if let Err(e) = application::launch(Revision::LogicalDevice, config_path.as_deref()) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

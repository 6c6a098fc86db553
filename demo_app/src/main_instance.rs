//! Lists instance extensions and layers, creates an instance with every
//! installed layer enabled and picks a GPU.
//!
//! Usage: `instance_info [config.toml|config.ron]`

use std::path::PathBuf;
use vk_bootstrap::{application, Revision};

fn main() {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    if let Err(e) = application::launch(Revision::InstanceInfo, config_path.as_deref()) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

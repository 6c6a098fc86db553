//! Same as the instance demo, with the Khronos validation layer and a
//! debug messenger that forwards driver messages to the log.
//!
//! Usage: `validation [config.toml|config.ron]`

use std::path::PathBuf;
use vk_bootstrap::{application, Revision};

fn main() {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    if let Err(e) = application::launch(Revision::Validation, config_path.as_deref()) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

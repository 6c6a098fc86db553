//! Foundation module - logging setup shared by every binary

pub mod logging;

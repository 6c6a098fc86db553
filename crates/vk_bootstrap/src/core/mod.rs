//! Core bootstrap types

/// Configuration structures for every bootstrap stage
pub mod config;

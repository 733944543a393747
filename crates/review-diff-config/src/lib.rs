//! Configuration and file management for review-diff
//!
//! This crate provides:
//! - Platform directories for config and cache files
//! - Configuration file loading (TOML)
//! - Application configuration (AppConfig)
//! - Persisted per-task viewed state

pub mod app_config;
pub mod config_file;
pub mod paths;
pub mod viewed;

pub use app_config::AppConfig;
pub use config_file::load_config_file;
pub use viewed::{ViewedState, ViewedStore};

//! Application configuration module.
//!
//! Manages the TOML config file holding Cinematerial credentials
//! and search defaults.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{API_KEY_ENV, API_SECRET_ENV, AppConfig};
pub use paths::resolve_config_path;

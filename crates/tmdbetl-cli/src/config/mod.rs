//! Application configuration module.
//!
//! Combines the optional TOML config file with environment-sourced
//! settings (`.env`, `TMDB_API_KEY`).

#[allow(clippy::module_inception)]
mod config;
mod env;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use env::{load_env_file, resolve_api_key, resolve_config_path};

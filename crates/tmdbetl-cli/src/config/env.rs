//! Environment-sourced settings: `.env` loading, API key and config path.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Environment variable holding the TMDB v3 API key.
pub const API_KEY_VAR: &str = "TMDB_API_KEY";

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_VAR: &str = "TMDBETL_CONFIG";

/// Loads `KEY=value` pairs from a `.env` file into the process environment.
///
/// Uses `path` when given, otherwise searches the working directory and its
/// parents. Variables already set in the environment win. Returns whether a
/// file was loaded; a missing file is not an error.
///
/// # Errors
///
/// Returns an error if a `.env` file exists but cannot be parsed.
pub fn load_env_file(path: Option<&Path>) -> Result<bool> {
    let result = match path {
        Some(p) => dotenvy::from_path(p).map(|()| true),
        None => dotenvy::dotenv().map(|_| true),
    };
    match result {
        Ok(loaded) => Ok(loaded),
        Err(dotenvy::Error::Io(_)) => Ok(false),
        Err(err) => Err(err).context("failed to parse .env file"),
    }
}

/// Reads the API key from the process environment.
///
/// # Errors
///
/// Returns an error if `TMDB_API_KEY` is unset or blank.
pub fn resolve_api_key() -> Result<String> {
    api_key_from(|name| std::env::var(name).ok())
}

/// Reads the API key through an environment lookup.
fn api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    let key = lookup(API_KEY_VAR)
        .with_context(|| format!("{API_KEY_VAR} environment variable is required"))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("{API_KEY_VAR} environment variable is empty");
    }
    Ok(String::from(key))
}

/// Resolves the config file path.
///
/// Precedence: `{dir}/config.toml`, then `$TMDBETL_CONFIG`, then
/// `$XDG_CONFIG_HOME/tmdbetl/config.toml`, then `~/.config/tmdbetl/config.toml`.
/// Returns `None` when none of these can be determined.
#[must_use]
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Option<PathBuf> {
    config_path_from(dir, |name| std::env::var(name).ok())
}

/// Resolves the config file path through an environment lookup.
fn config_path_from(
    dir: Option<&PathBuf>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<PathBuf> {
    if let Some(d) = dir {
        return Some(d.join("config.toml"));
    }

    let non_empty = |name: &str| lookup(name).filter(|value| !value.is_empty());

    if let Some(explicit) = non_empty(CONFIG_PATH_VAR) {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = non_empty("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg).join("tmdbetl").join("config.toml"));
    }

    non_empty("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("tmdbetl")
            .join("config.toml")
    })
}

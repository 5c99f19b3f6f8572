//! `AppConfig` struct and TOML loading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tmdbetl_api::MediaType;
use tmdbetl_export::OutputLayout;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB request settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Output location settings.
    #[serde(default)]
    pub output: OutputConfig,
    /// Pipeline runs, executed in order.
    #[serde(default)]
    pub runs: RunsConfig,
}

/// TMDB request configuration.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TmdbConfig {
    /// Locale sent with popular, details and genre requests.
    pub language: String,
    /// Minimum interval between requests in milliseconds (0 = no pacing).
    pub min_interval_ms: u64,
    /// API base URL override.
    pub base_url: Option<String>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            language: String::from("en-US"),
            min_interval_ms: 0,
            base_url: None,
        }
    }
}

impl TmdbConfig {
    /// Minimum request interval, `None` when pacing is off.
    #[must_use]
    pub const fn min_interval(&self) -> Option<Duration> {
        if self.min_interval_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.min_interval_ms))
        }
    }
}

/// Output configuration.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory (relative paths resolve against the working directory).
    pub dir: PathBuf,
    /// Items table file name pattern.
    pub items_file: String,
    /// Reviews table file name pattern.
    pub reviews_file: String,
    /// Details table file name pattern.
    pub details_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let layout = OutputLayout::default();
        Self {
            dir: layout.dir,
            items_file: layout.items_file,
            reviews_file: layout.reviews_file,
            details_file: layout.details_file,
        }
    }
}

impl OutputConfig {
    /// Converts to a validated [`OutputLayout`].
    ///
    /// # Errors
    ///
    /// Returns an error if a file name pattern is invalid.
    pub fn to_layout(&self) -> Result<OutputLayout> {
        let layout = OutputLayout {
            dir: self.dir.clone(),
            items_file: self.items_file.clone(),
            reviews_file: self.reviews_file.clone(),
            details_file: self.details_file.clone(),
        };
        layout.validate().context("invalid [output] configuration")?;
        Ok(layout)
    }
}

/// A single pipeline run.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct RunConfig {
    /// Media type to extract.
    pub media_type: MediaType,
    /// Number of popular pages to fetch.
    pub pages: u32,
}

/// Ordered list of runs. Defaults to movies then TV, 4 pages each.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct RunsConfig(pub Vec<RunConfig>);

impl Default for RunsConfig {
    fn default() -> Self {
        Self(vec![
            RunConfig {
                media_type: MediaType::Movie,
                pages: 4,
            },
            RunConfig {
                media_type: MediaType::Tv,
                pages: 4,
            },
        ])
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// contains a run with zero pages.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values serde cannot.
    fn validate(&self) -> Result<()> {
        if let Some(run) = self.runs.0.iter().find(|run| run.pages == 0) {
            bail!("run for {} must fetch at least 1 page", run.media_type);
        }
        Ok(())
    }

    /// Selects the runs to execute, applying CLI overrides.
    ///
    /// `media_type` keeps only runs of that type (or adds one with the
    /// default page count if none is configured); `pages` replaces every
    /// selected run's page count.
    #[must_use]
    pub fn select_runs(
        &self,
        media_type: Option<MediaType>,
        pages: Option<u32>,
    ) -> Vec<RunConfig> {
        let mut runs: Vec<RunConfig> = match media_type {
            None => self.runs.0.clone(),
            Some(wanted) => {
                let matching: Vec<RunConfig> = self
                    .runs
                    .0
                    .iter()
                    .filter(|run| run.media_type == wanted)
                    .copied()
                    .collect();
                if matching.is_empty() {
                    RunsConfig::default()
                        .0
                        .into_iter()
                        .filter(|run| run.media_type == wanted)
                        .collect()
                } else {
                    matching
                }
            }
        };

        if let Some(pages) = pages {
            for run in &mut runs {
                run.pages = pages;
            }
        }

        runs
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert_eq!(config.tmdb.language, "en-US");
        assert_eq!(config.tmdb.min_interval(), None);
        assert_eq!(config.output.dir, PathBuf::from("data").join("raw"));
        assert_eq!(config.runs.0.len(), 2);
        assert_eq!(config.runs.0[0].media_type, MediaType::Movie);
        assert_eq!(config.runs.0[0].pages, 4);
        assert_eq!(config.runs.0[1].media_type, MediaType::Tv);
        assert_eq!(config.runs.0[1].pages, 4);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_full_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[tmdb]
language = "pt-BR"
min_interval_ms = 250

[output]
dir = "out/tables"
items_file = "popular_{media}.csv"

[[runs]]
media_type = "tv"
pages = 2
"#,
        )
        .unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.tmdb.language, "pt-BR");
        assert_eq!(config.tmdb.min_interval(), Some(Duration::from_millis(250)));
        assert_eq!(config.output.dir, PathBuf::from("out/tables"));
        assert_eq!(config.output.items_file, "popular_{media}.csv");
        assert_eq!(config.output.reviews_file, "reviews_{media}s.csv");
        assert_eq!(
            config.runs.0,
            vec![RunConfig {
                media_type: MediaType::Tv,
                pages: 2
            }]
        );
    }

    #[test]
    fn test_load_rejects_zero_pages() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[[runs]]\nmedia_type = \"movie\"\npages = 0\n").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        assert!(result.unwrap_err().to_string().contains("at least 1 page"));
    }

    #[test]
    fn test_load_rejects_unknown_media_type() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[[runs]]\nmedia_type = \"anime\"\npages = 1\n").unwrap();

        // Act & Assert
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn test_output_to_layout_rejects_bad_pattern() {
        // Arrange
        let output = OutputConfig {
            details_file: String::from("details.csv"),
            ..OutputConfig::default()
        };

        // Act & Assert
        assert!(output.to_layout().is_err());
        assert!(OutputConfig::default().to_layout().is_ok());
    }

    #[test]
    fn test_select_runs_without_overrides() {
        // Arrange
        let config = AppConfig::default();

        // Act
        let runs = config.select_runs(None, None);

        // Assert
        assert_eq!(runs, config.runs.0);
    }

    #[test]
    fn test_select_runs_filters_media_type_and_overrides_pages() {
        // Arrange
        let config = AppConfig::default();

        // Act
        let runs = config.select_runs(Some(MediaType::Tv), Some(1));

        // Assert
        assert_eq!(
            runs,
            vec![RunConfig {
                media_type: MediaType::Tv,
                pages: 1
            }]
        );
    }

    #[test]
    fn test_select_runs_adds_unconfigured_media_type() {
        // Arrange
        let config = AppConfig {
            runs: RunsConfig(vec![RunConfig {
                media_type: MediaType::Movie,
                pages: 2,
            }]),
            ..AppConfig::default()
        };

        // Act
        let runs = config.select_runs(Some(MediaType::Tv), None);

        // Assert
        assert_eq!(
            runs,
            vec![RunConfig {
                media_type: MediaType::Tv,
                pages: 4
            }]
        );
    }
}

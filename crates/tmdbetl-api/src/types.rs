//! TMDB API response types and the media type discriminator.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::Deserialize;

// --- Media Type ---

/// TMDB media category. Selects endpoint paths and field fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Feature films (`/movie/...`).
    Movie,
    /// TV series (`/tv/...`).
    Tv,
}

impl MediaType {
    /// Path segment used by the TMDB API (`movie` or `tv`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(Self::Movie),
            "tv" => Ok(Self::Tv),
            other => bail!("unknown media type: {other} (expected \"movie\" or \"tv\")"),
        }
    }
}

// --- Fetch Outcome ---

/// Outcome of a lookup whose non-200 responses are not fatal.
///
/// Keeps "the API had nothing for us" apart from "the API returned this data",
/// so callers decide whether a failed lookup degrades to empty data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    /// HTTP 200 with a decoded body.
    Found(T),
    /// Any other HTTP status. The body is discarded.
    Unavailable {
        /// HTTP status code returned by the API.
        status: u16,
    },
}

impl<T> Fetched<T> {
    /// Returns `true` if the lookup returned data.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// HTTP status of an unavailable lookup.
    #[must_use]
    pub const fn unavailable_status(&self) -> Option<u16> {
        match self {
            Self::Found(_) => None,
            Self::Unavailable { status } => Some(*status),
        }
    }
}

impl<T: Default> Fetched<T> {
    /// Returns the found value, or `T::default()` for an unavailable lookup.
    #[must_use]
    pub fn or_default(self) -> T {
        match self {
            Self::Found(value) => value,
            Self::Unavailable { .. } => T::default(),
        }
    }
}

// --- Popular ---

/// Response from `{media_type}/popular` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbPopularPage {
    /// Current page number.
    pub page: Option<u32>,
    /// Ranked results. Empty when the key is missing.
    pub results: Vec<TmdbPopularResult>,
    /// Total number of pages.
    pub total_pages: Option<u32>,
    /// Total number of results.
    pub total_results: Option<u32>,
}

/// A single entry in a popular listing.
///
/// Movies carry `title`; TV series carry `name`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TmdbPopularResult {
    /// TMDB ID.
    pub id: Option<u64>,
    /// Localized movie title.
    pub title: Option<String>,
    /// Localized series name.
    pub name: Option<String>,
    /// Popularity score.
    pub popularity: Option<f64>,
    /// Vote average.
    pub vote_average: Option<f64>,
    /// Vote count.
    pub vote_count: Option<u64>,
}

// --- Reviews ---

/// Response from `{media_type}/{id}/reviews` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbReviewPage {
    /// Current page number.
    pub page: Option<u32>,
    /// Reviews on this page.
    pub results: Vec<TmdbReview>,
    /// Total number of pages.
    pub total_pages: Option<u32>,
}

/// A single user review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TmdbReview {
    /// Review ID.
    pub id: Option<String>,
    /// Author display name.
    pub author: Option<String>,
    /// Review body.
    pub content: Option<String>,
    /// Creation timestamp (ISO 8601).
    pub created_at: Option<String>,
}

// --- Details ---

/// Response from `{media_type}/{id}` endpoint.
///
/// Covers both movie and TV payloads. `Default` is the empty detail used
/// when the lookup is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TmdbMediaDetails {
    /// TMDB ID.
    pub id: Option<u64>,
    /// Movie title.
    pub title: Option<String>,
    /// Series name.
    pub name: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Movie release date (YYYY-MM-DD).
    pub release_date: Option<String>,
    /// Series first air date (YYYY-MM-DD).
    pub first_air_date: Option<String>,
    /// Genres. `None` when the key is absent.
    pub genres: Option<Vec<TmdbGenre>>,
    /// Original language (ISO 639-1).
    pub original_language: Option<String>,
    /// Movie runtime in minutes.
    pub runtime: Option<u32>,
    /// Series episode lengths in minutes.
    pub episode_run_time: Option<Vec<u32>>,
}

// --- Genres ---

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbGenre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    #[serde(default)]
    pub name: String,
}

/// Response from `genre/{media_type}/list` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbGenreList {
    /// All genres for the media type. Empty when the key is missing.
    pub genres: Vec<TmdbGenre>,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[allow(dead_code)]
    #[serde(default)]
    pub success: bool,
}

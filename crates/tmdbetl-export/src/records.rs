//! Flat output records, one per CSV row.

use serde::Serialize;

/// A record type that maps to one CSV table.
pub trait TableRecord: Serialize {
    /// Column names in serialization order.
    const HEADERS: &'static [&'static str];
}

/// One entry of a popular listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularItem {
    /// TMDB ID.
    pub id: Option<u64>,
    /// Movie title or series name.
    pub title: Option<String>,
    /// Popularity score.
    pub popularity: Option<f64>,
    /// Vote average.
    pub vote_average: Option<f64>,
    /// Vote count.
    pub vote_count: Option<u64>,
    /// `movie` or `tv`.
    pub media_type: String,
}

impl TableRecord for PopularItem {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "title",
        "popularity",
        "vote_average",
        "vote_count",
        "media_type",
    ];
}

/// One user review, keyed by the owning item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    /// Owning item's TMDB ID.
    pub media_id: Option<u64>,
    /// Owning item's title (copied for joins).
    pub title: Option<String>,
    /// Author display name.
    pub author: Option<String>,
    /// Review body.
    pub content: Option<String>,
    /// Creation timestamp.
    pub created_at: Option<String>,
}

impl TableRecord for Review {
    const HEADERS: &'static [&'static str] =
        &["media_id", "title", "author", "content", "created_at"];
}

/// Enriched details of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detail {
    /// Item's TMDB ID.
    pub media_id: Option<u64>,
    /// Item's title (copied for joins).
    pub title: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Release date, or first air date for series.
    pub release_date: Option<String>,
    /// Genre names joined with `", "`.
    pub genres: Option<String>,
    /// Original language (ISO 639-1).
    pub original_language: Option<String>,
    /// Runtime in minutes, or first episode length for series.
    pub runtime: Option<u32>,
}

impl TableRecord for Detail {
    const HEADERS: &'static [&'static str] = &[
        "media_id",
        "title",
        "overview",
        "release_date",
        "genres",
        "original_language",
        "runtime",
    ];
}

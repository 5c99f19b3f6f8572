//! TMDB API client library for tmdbetl.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints used by the
//! extraction pipeline: popular listings, reviews, item details and
//! genre lists.

mod api;
mod client;
mod rate_limiter;
mod types;
mod util;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    Fetched, MediaType, TmdbGenre, TmdbGenreList, TmdbMediaDetails, TmdbPopularPage,
    TmdbPopularResult, TmdbReview, TmdbReviewPage,
};
pub use util::{fetch_genre_map, fetch_popular};

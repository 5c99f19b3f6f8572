//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{
    Fetched, MediaType, TmdbGenreList, TmdbMediaDetails, TmdbPopularPage, TmdbReviewPage,
};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches one page of the popular listing for a media type.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the API responds with a
    /// non-success status, or JSON parsing fails.
    async fn popular(
        &self,
        media_type: MediaType,
        page: u32,
        language: &str,
    ) -> Result<TmdbPopularPage>;

    /// Fetches the first page of reviews for an item.
    ///
    /// Any non-200 response is reported as [`Fetched::Unavailable`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or a 200 body cannot be parsed.
    async fn reviews(&self, media_type: MediaType, id: u64) -> Result<Fetched<TmdbReviewPage>>;

    /// Fetches item details.
    ///
    /// Any non-200 response is reported as [`Fetched::Unavailable`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or a 200 body cannot be parsed.
    async fn details(
        &self,
        media_type: MediaType,
        id: u64,
        language: &str,
    ) -> Result<Fetched<TmdbMediaDetails>>;

    /// Fetches the genre list for a media type.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the API responds with a
    /// non-success status, or JSON parsing fails.
    async fn genres(&self, media_type: MediaType, language: &str) -> Result<TmdbGenreList>;
}

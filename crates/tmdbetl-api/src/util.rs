//! Multi-request helpers built on [`LocalTmdbApi`].

use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::instrument;

use super::api::LocalTmdbApi;
use super::types::{MediaType, TmdbPopularResult};

/// Fetches pages `1..=pages` of the popular listing and concatenates the
/// results in page order.
///
/// Items that appear on several pages are kept every time they appear.
///
/// # Errors
///
/// Returns an error if any page request fails.
#[instrument(skip_all, fields(media_type = %media_type))]
pub async fn fetch_popular(
    api: &(impl LocalTmdbApi + Sync),
    media_type: MediaType,
    pages: u32,
    language: &str,
) -> Result<Vec<TmdbPopularResult>> {
    let mut all_results: Vec<TmdbPopularResult> = Vec::new();

    for page in 1..=pages {
        let response = api
            .popular(media_type, page, language)
            .await
            .with_context(|| format!("{media_type}/popular failed on page {page}"))?;

        tracing::info!(
            page = page,
            fetched = response.results.len(),
            total_pages = ?response.total_pages,
            "popular page completed"
        );

        all_results.extend(response.results);
    }

    tracing::info!(total = all_results.len(), pages = pages, "popular listing completed");

    Ok(all_results)
}

/// Fetches the genre list for a media type as an id → name map.
///
/// # Errors
///
/// Returns an error if the genre request fails.
#[instrument(skip_all, fields(media_type = %media_type))]
pub async fn fetch_genre_map(
    api: &(impl LocalTmdbApi + Sync),
    media_type: MediaType,
    language: &str,
) -> Result<HashMap<u32, String>> {
    let list = api
        .genres(media_type, language)
        .await
        .with_context(|| format!("genre/{media_type}/list failed"))?;

    let map: HashMap<u32, String> = list
        .genres
        .into_iter()
        .map(|genre| (genre.id, genre.name))
        .collect();

    tracing::debug!(genres = map.len(), "genre map loaded");

    Ok(map)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::atomic::{AtomicU32, Ordering};

    use anyhow::{Result, bail};

    use super::*;
    use crate::types::{
        Fetched, TmdbGenre, TmdbGenreList, TmdbMediaDetails, TmdbPopularPage, TmdbReviewPage,
    };

    /// Mock API that returns pre-configured popular pages in order.
    struct MockTmdbApi {
        pages: Vec<Vec<TmdbPopularResult>>,
        genres: Vec<TmdbGenre>,
        popular_calls: AtomicU32,
        fail_on_page: Option<u32>,
    }

    impl MockTmdbApi {
        fn new(pages: Vec<Vec<TmdbPopularResult>>) -> Self {
            Self {
                pages,
                genres: Vec::new(),
                popular_calls: AtomicU32::new(0),
                fail_on_page: None,
            }
        }
    }

    impl LocalTmdbApi for MockTmdbApi {
        async fn popular(
            &self,
            _media_type: MediaType,
            page: u32,
            _language: &str,
        ) -> Result<TmdbPopularPage> {
            self.popular_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on_page == Some(page) {
                bail!("connection reset");
            }
            let results = usize::try_from(page)
                .ok()
                .and_then(|p| self.pages.get(p.saturating_sub(1)))
                .cloned()
                .unwrap_or_default();
            Ok(TmdbPopularPage {
                page: Some(page),
                results,
                ..TmdbPopularPage::default()
            })
        }

        async fn reviews(
            &self,
            _media_type: MediaType,
            _id: u64,
        ) -> Result<Fetched<TmdbReviewPage>> {
            Ok(Fetched::Unavailable { status: 404 })
        }

        async fn details(
            &self,
            _media_type: MediaType,
            _id: u64,
            _language: &str,
        ) -> Result<Fetched<TmdbMediaDetails>> {
            Ok(Fetched::Unavailable { status: 404 })
        }

        async fn genres(&self, _media_type: MediaType, _language: &str) -> Result<TmdbGenreList> {
            Ok(TmdbGenreList {
                genres: self.genres.clone(),
            })
        }
    }

    fn make_result(id: u64) -> TmdbPopularResult {
        TmdbPopularResult {
            id: Some(id),
            title: Some(format!("Movie {id}")),
            ..TmdbPopularResult::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_popular_concatenates_pages_in_order() {
        // Arrange
        let mock = MockTmdbApi::new(vec![
            vec![make_result(1), make_result(2)],
            vec![make_result(3)],
            vec![make_result(4), make_result(5), make_result(6)],
        ]);

        // Act
        let results = fetch_popular(&mock, MediaType::Movie, 3, "en-US").await.unwrap();

        // Assert
        let ids: Vec<Option<u64>> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3), Some(4), Some(5), Some(6)]);
        assert_eq!(mock.popular_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fetch_popular_keeps_duplicates_across_pages() {
        // Arrange: item 2 slides from page 1 to page 2 between requests
        let mock = MockTmdbApi::new(vec![
            vec![make_result(1), make_result(2)],
            vec![make_result(2), make_result(3)],
        ]);

        // Act
        let results = fetch_popular(&mock, MediaType::Movie, 2, "en-US").await.unwrap();

        // Assert
        assert_eq!(results.len(), 4);
        assert_eq!(results.iter().filter(|r| r.id == Some(2)).count(), 2);
    }

    #[tokio::test]
    async fn test_fetch_popular_empty_listing() {
        // Arrange
        let mock = MockTmdbApi::new(vec![]);

        // Act
        let results = fetch_popular(&mock, MediaType::Tv, 2, "en-US").await.unwrap();

        // Assert
        assert!(results.is_empty());
        assert_eq!(mock.popular_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_popular_propagates_page_error() {
        // Arrange
        let mut mock = MockTmdbApi::new(vec![vec![make_result(1)], vec![make_result(2)]]);
        mock.fail_on_page = Some(2);

        // Act
        let result = fetch_popular(&mock, MediaType::Movie, 3, "en-US").await;

        // Assert
        let err = format!("{:#}", result.unwrap_err());
        assert!(err.contains("movie/popular failed on page 2"));
        assert!(err.contains("connection reset"));
        assert_eq!(mock.popular_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_genre_map() {
        // Arrange
        let mut mock = MockTmdbApi::new(vec![]);
        mock.genres = vec![
            TmdbGenre {
                id: 18,
                name: String::from("Drama"),
            },
            TmdbGenre {
                id: 35,
                name: String::from("Comedy"),
            },
        ];

        // Act
        let map = fetch_genre_map(&mock, MediaType::Movie, "en-US").await.unwrap();

        // Assert
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&18).map(String::as_str), Some("Drama"));
        assert_eq!(map.get(&35).map(String::as_str), Some("Comedy"));
    }
}

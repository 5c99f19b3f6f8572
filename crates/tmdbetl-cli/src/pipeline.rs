//! Extraction pipeline: popular listing → genres → per-item enrichment → CSV.

use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::instrument;

use tmdbetl_api::{
    Fetched, LocalTmdbApi, MediaType, TmdbGenre, TmdbMediaDetails, TmdbPopularResult, TmdbReview,
    TmdbReviewPage, fetch_genre_map, fetch_popular,
};
use tmdbetl_export::{Detail, OutputLayout, PopularItem, Review, WrittenTables, write_tables};

/// Parameters of one pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineParams<'a> {
    /// Media type to extract.
    pub media_type: MediaType,
    /// Number of popular pages to fetch.
    pub pages: u32,
    /// Locale for popular, details and genre requests.
    pub language: &'a str,
}

/// Counts reported after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Written tables.
    pub written: WrittenTables,
    /// Items whose review lookup was unavailable.
    pub reviews_unavailable: usize,
    /// Items whose detail lookup was unavailable.
    pub details_unavailable: usize,
}

/// Runs the pipeline for one media type and writes its three tables.
///
/// Review and detail lookups that come back unavailable degrade to empty
/// data; the loop always finishes and all tables are always written.
///
/// # Errors
///
/// Returns an error if the popular listing or genre list cannot be fetched,
/// any request fails at the transport level, or a table cannot be written.
#[instrument(skip_all, fields(media_type = %params.media_type))]
pub async fn run_pipeline(
    api: &(impl LocalTmdbApi + Sync),
    params: &PipelineParams<'_>,
    layout: &OutputLayout,
) -> Result<PipelineSummary> {
    let media_type = params.media_type;

    tracing::info!(pages = params.pages, "collecting popular {media_type}s");
    let results = fetch_popular(api, media_type, params.pages, params.language).await?;
    let items: Vec<PopularItem> = results
        .iter()
        .map(|result| to_popular_item(result, media_type))
        .collect();
    tracing::info!("{} {media_type}s collected", items.len());

    let genre_map = fetch_genre_map(api, media_type, params.language).await?;

    let mut reviews: Vec<Review> = Vec::new();
    let mut details: Vec<Detail> = Vec::with_capacity(items.len());
    let mut reviews_unavailable: usize = 0;
    let mut details_unavailable: usize = 0;
    let total = items.len();

    for (index, item) in items.iter().enumerate() {
        tracing::info!(
            "[{}/{total}] {}",
            index.saturating_add(1),
            item.title.as_deref().unwrap_or("-")
        );

        let (fetched_reviews, fetched_details) = match item.id {
            Some(id) => {
                let fetched_reviews = api
                    .reviews(media_type, id)
                    .await
                    .with_context(|| format!("{media_type}/{id}/reviews request failed"))?;
                let fetched_details = api
                    .details(media_type, id, params.language)
                    .await
                    .with_context(|| format!("{media_type}/{id} request failed"))?;
                (fetched_reviews, fetched_details)
            }
            None => {
                tracing::warn!("popular item without id, skipping enrichment");
                (
                    Fetched::Found(TmdbReviewPage::default()),
                    Fetched::Found(TmdbMediaDetails::default()),
                )
            }
        };

        if let Some(status) = fetched_reviews.unavailable_status() {
            tracing::warn!(id = ?item.id, status = status, "reviews unavailable");
            reviews_unavailable = reviews_unavailable.saturating_add(1);
        }
        if let Some(status) = fetched_details.unavailable_status() {
            tracing::warn!(id = ?item.id, status = status, "details unavailable");
            details_unavailable = details_unavailable.saturating_add(1);
        }

        reviews.extend(
            fetched_reviews
                .or_default()
                .results
                .iter()
                .map(|review| to_review(item, review)),
        );
        details.push(to_detail(item, &fetched_details.or_default(), &genre_map));
    }

    let written = write_tables(layout, media_type.as_str(), &items, &reviews, &details)
        .with_context(|| format!("failed to write {media_type} tables"))?;

    tracing::info!(
        items = written.items,
        reviews = written.reviews,
        details = written.details,
        reviews_unavailable = reviews_unavailable,
        details_unavailable = details_unavailable,
        "data saved to {} for {media_type}s",
        layout.dir.display()
    );

    Ok(PipelineSummary {
        written,
        reviews_unavailable,
        details_unavailable,
    })
}

/// Returns the value unless it is null or an empty string.
fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.is_empty()).cloned()
}

/// Flattens a popular listing entry. Title falls back to the series name.
fn to_popular_item(result: &TmdbPopularResult, media_type: MediaType) -> PopularItem {
    PopularItem {
        id: result.id,
        title: non_empty(result.title.as_ref()).or_else(|| non_empty(result.name.as_ref())),
        popularity: result.popularity,
        vote_average: result.vote_average,
        vote_count: result.vote_count,
        media_type: String::from(media_type.as_str()),
    }
}

/// Flattens a review, copying the owning item's id and title.
fn to_review(item: &PopularItem, review: &TmdbReview) -> Review {
    Review {
        media_id: item.id,
        title: item.title.clone(),
        author: review.author.clone(),
        content: review.content.clone(),
        created_at: review.created_at.clone(),
    }
}

/// Flattens item details.
///
/// Release date falls back to the first air date and runtime to the first
/// episode length. Zero runtimes count as missing.
fn to_detail(
    item: &PopularItem,
    details: &TmdbMediaDetails,
    genre_map: &HashMap<u32, String>,
) -> Detail {
    let runtime = details.runtime.filter(|&minutes| minutes > 0).or_else(|| {
        details
            .episode_run_time
            .as_deref()
            .and_then(<[u32]>::first)
            .copied()
    });

    Detail {
        media_id: item.id,
        title: item.title.clone(),
        overview: details.overview.clone(),
        release_date: non_empty(details.release_date.as_ref())
            .or_else(|| non_empty(details.first_air_date.as_ref())),
        genres: details
            .genres
            .as_deref()
            .map(|genres| resolve_genres(genres, genre_map)),
        original_language: details.original_language.clone(),
        runtime,
    }
}

/// Maps genre ids to names through the run's genre map, keeping order.
///
/// Ids missing from the map, and empty names, are dropped.
fn resolve_genres(genres: &[TmdbGenre], genre_map: &HashMap<u32, String>) -> String {
    genres
        .iter()
        .filter_map(|genre| genre_map.get(&genre.id))
        .filter(|name| !name.is_empty())
        .map(String::as_str)
        .collect::<Vec<&str>>()
        .join(", ")
}

use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, Redirect},
};
use futures::{StreamExt, stream};
use serde::Deserialize;
use tracing::warn;

use crate::{
    AppState,
    error::{AppError, AppResult},
    log_store::{LogEdit, LogTile},
    models::{SearchCriteria, SearchParams, SearchType, StatusIndex, WatchStatus},
    search::ResultAccumulator,
    templates,
    tmdb::{MovieListResponse, TmdbClient},
};

// The catalog caps paginated endpoints at 500 pages.
const MAX_PAGE: u32 = 500;
const PAGE_FETCH_CONCURRENCY: usize = 4;

pub async fn home(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let (popular, genres, tiles) =
        tokio::join!(state.tmdb.popular(), state.tmdb.genres(), state.store.list_tiles());

    let popular = match popular {
        Ok(resp) => Some(resp.results),
        Err(err) => {
            warn!(error = %err, "failed to fetch popular titles");
            None
        },
    };
    let genres = genres.unwrap_or_else(|err| {
        warn!(error = %err, "failed to fetch genre list");
        Vec::new()
    });
    let tiles = tiles?;
    let index = status_index(&tiles);

    Ok(Html(templates::home_page(
        &genres,
        &tiles,
        &index,
        popular.as_deref(),
        &state.config.tmdb_image_base_url,
    )))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> AppResult<Html<String>> {
    let criteria = SearchCriteria::from_params(&params);
    let image_base = &state.config.tmdb_image_base_url;

    let genres = state.tmdb.genres().await.unwrap_or_else(|err| {
        warn!(error = %err, "failed to fetch genre list");
        Vec::new()
    });

    if criteria.is_empty() {
        return Ok(Html(templates::search_page(
            &criteria,
            &genres,
            None,
            &StatusIndex::default(),
            image_base,
            false,
        )));
    }

    let page = if criteria.search_type == SearchType::Person && !criteria.query.is_empty() {
        // Person credits come back as a single page.
        1
    } else {
        params.page.unwrap_or(1).clamp(1, MAX_PAGE)
    };

    // Re-fetch pages 1..=page so the accumulated view survives a reload and
    // the "load more" link stays a plain URL. The stream fetches pages
    // concurrently but yields them in request order.
    let responses: Vec<AppResult<MovieListResponse>> = stream::iter(1..=page)
        .map(|p| fetch_page(&state.tmdb, &criteria, p))
        .buffered(PAGE_FETCH_CONCURRENCY)
        .collect()
        .await;

    let mut results = ResultAccumulator::new();
    let mut catalog_failed = false;
    for response in responses {
        match response {
            Ok(resp) => results.absorb(&criteria, resp),
            Err(err) => {
                warn!(error = %err, "catalog search failed");
                catalog_failed = true;
                break;
            },
        }
    }

    let tiles = state.store.list_tiles().await?;
    let index = status_index(&tiles);

    Ok(Html(templates::search_page(
        &criteria,
        &genres,
        Some(&results),
        &index,
        image_base,
        catalog_failed,
    )))
}

async fn fetch_page(
    tmdb: &TmdbClient,
    criteria: &SearchCriteria,
    page: u32,
) -> AppResult<MovieListResponse> {
    if !criteria.query.is_empty() {
        match criteria.search_type {
            SearchType::Movie => tmdb.search_movies(&criteria.query, page).await,
            SearchType::Person => {
                let Some(person) = tmdb.search_person(&criteria.query).await? else {
                    return Ok(MovieListResponse::empty());
                };
                let cast = tmdb.person_movie_credits(person.id).await?;
                Ok(MovieListResponse::single_page(cast))
            },
        }
    } else {
        tmdb.discover(&criteria.genres, criteria.sort, page).await
    }
}

pub async fn movie_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let (movie, log) = tokio::join!(state.tmdb.movie_details(id), state.store.get(id));

    let log = log?;
    let movie = match movie {
        Ok(Some(movie)) => movie,
        Ok(None) => return Err(AppError::NotFound(format!("title {id} is not in the catalog"))),
        Err(err) => {
            warn!(error = %err, movie_id = id, "catalog lookup failed");
            return Err(AppError::NotFound(format!("title {id} could not be fetched")));
        },
    };

    Ok(Html(templates::detail_page(&movie, log.as_ref(), &state.config.tmdb_image_base_url)))
}

pub async fn my_list(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let (want, watched) = tokio::join!(
        state.store.list_by_status(WatchStatus::WantToWatch),
        state.store.list_by_status(WatchStatus::Watched),
    );
    Ok(Html(templates::my_list_page(&want?, &watched?, &state.config.tmdb_image_base_url)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WantForm {
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub back: Option<String>,
}

pub async fn add_want(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<WantForm>,
) -> AppResult<Redirect> {
    let title = form.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("title is required".to_string()));
    }

    let poster = form.poster_path.as_deref().map(str::trim).filter(|p| !p.is_empty());
    state.store.add_want(id, title, poster).await?;

    Ok(redirect_back(form.back.as_deref(), id))
}

#[derive(Debug, Deserialize)]
pub struct ActionForm {
    #[serde(default)]
    pub back: Option<String>,
}

pub async fn mark_watched(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<ActionForm>,
) -> AppResult<Redirect> {
    let today: jiff::civil::Date = jiff::Zoned::now().into();
    state.store.mark_watched(id, today).await?;
    Ok(redirect_back(form.back.as_deref(), id))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogForm {
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub watched_date: Option<String>,
    #[serde(default)]
    pub back: Option<String>,
}

pub async fn save_log(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<LogForm>,
) -> AppResult<Redirect> {
    let title = form.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("title is required".to_string()));
    }

    let poster = form.poster_path.as_deref().map(str::trim).filter(|p| !p.is_empty());
    let edit = LogEdit {
        rating: form.rating,
        comment: form.comment.clone(),
        watched_date: form.watched_date.clone(),
    };
    state.store.save_log(id, title, poster, edit).await?;

    Ok(redirect_back(form.back.as_deref(), id))
}

pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<ActionForm>,
) -> AppResult<Redirect> {
    state.store.remove(id).await?;
    Ok(redirect_back(form.back.as_deref(), id))
}

/// Sends the browser back to the page the form was issued from. Only local
/// paths are honored; anything else falls back to the detail page.
fn redirect_back(back: Option<&str>, id: i32) -> Redirect {
    match back {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => Redirect::to(path),
        _ => Redirect::to(&format!("/movies/{id}")),
    }
}

fn status_index(tiles: &[LogTile]) -> StatusIndex {
    StatusIndex::from_entries(
        tiles.iter().filter_map(|t| WatchStatus::parse(&t.status).map(|s| (t.tmdb_id, s))),
    )
}

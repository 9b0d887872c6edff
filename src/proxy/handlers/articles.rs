// Article Handler
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Json, Path, Query, State,
    },
    http::StatusCode,
};
use serde::Deserialize;

use crate::models::{Article, ArticleUpdate, PageResult};
use crate::proxy::error::FacadeError;
use crate::proxy::server::AppState;

const DEFAULT_PAGE_SIZE: u32 = 50;
const DEFAULT_SORT: &str = "title,ASC";

/// List query parameters
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
    #[serde(default = "default_sort")]
    pub sort: String,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_sort() -> String {
    DEFAULT_SORT.to_string()
}

/// POST /api/v1/articles
pub async fn handle_create(
    State(state): State<AppState>,
    payload: Result<Json<Article>, JsonRejection>,
) -> Result<(StatusCode, Json<Article>), FacadeError> {
    let Json(article) = payload?;
    let created = state.articles.create(article).await?;
    tracing::info!("Article created: id={:?}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/articles/:id
pub async fn handle_read(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Article>, FacadeError> {
    let Path(id) = id?;
    Ok(Json(state.articles.read(id).await?))
}

/// PATCH /api/v1/articles/:id
pub async fn handle_update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ArticleUpdate>, JsonRejection>,
) -> Result<StatusCode, FacadeError> {
    let Path(id) = id?;
    let Json(update) = payload?;
    state.articles.update(id, update).await?;
    Ok(StatusCode::OK)
}

/// DELETE /api/v1/articles/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, FacadeError> {
    let Path(id) = id?;
    state.articles.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/articles?page=&size=&sort=
pub async fn handle_list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<PageResult>, FacadeError> {
    let Query(params) = params?;
    let page = state
        .articles
        .list(params.page, params.size, Some(params.sort.as_str()))
        .await?;
    Ok(Json(page))
}

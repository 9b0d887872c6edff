//! Validating forwarding facade over the article storage service.
//!
//! Every operation issues at most one downstream call. Nothing is retried or
//! cached; the storage service stays the single source of truth.

use tracing::{debug, info_span, Instrument};

use crate::error::AppResult;
use crate::models::{Article, ArticleUpdate, PageResult};
use crate::proxy::common::{pagination, validation};
use crate::proxy::config::ProxyConfig;
use crate::proxy::error::{FacadeError, FacadeResult};
use crate::proxy::upstream::client::UpstreamClient;

pub struct ArticleService {
    upstream: UpstreamClient,
    forward_sort: bool,
}

impl ArticleService {
    pub fn new(config: &ProxyConfig) -> AppResult<Self> {
        Ok(Self {
            upstream: UpstreamClient::new(config)?,
            forward_sort: config.forward_sort,
        })
    }

    /// Validate and forward a new article; returns it as stored downstream
    pub async fn create(&self, article: Article) -> FacadeResult<Article> {
        validation::validate_new_article(&article).map_err(FacadeError::Validation)?;

        self.upstream
            .create(&article)
            .instrument(info_span!("article", operation = "create"))
            .await
    }

    pub async fn read(&self, id: i64) -> FacadeResult<Article> {
        self.upstream
            .read(id)
            .instrument(info_span!("article", operation = "read", id))
            .await
    }

    pub async fn update(&self, id: i64, update: ArticleUpdate) -> FacadeResult<()> {
        validation::validate_update(&update).map_err(FacadeError::Validation)?;

        self.upstream
            .update(id, &update)
            .instrument(info_span!("article", operation = "update", id))
            .await
    }

    pub async fn delete(&self, id: i64) -> FacadeResult<()> {
        self.upstream
            .delete(id)
            .instrument(info_span!("article", operation = "delete", id))
            .await
    }

    /// Read one page of articles
    ///
    /// `sort_by` only reaches downstream when `forward_sort` is enabled.
    pub async fn list(
        &self,
        page_number: u32,
        page_size: u32,
        sort_by: Option<&str>,
    ) -> FacadeResult<PageResult> {
        let query = page_query(page_number, page_size, sort_by, self.forward_sort);
        if !self.forward_sort {
            if let Some(sort_by) = sort_by {
                debug!("Sort specification '{}' not forwarded downstream", sort_by);
            }
        }

        let envelope = self
            .upstream
            .fetch_page(&query)
            .instrument(info_span!(
                "article",
                operation = "list",
                page = page_number,
                size = page_size
            ))
            .await?;

        pagination::normalize_page(envelope)
    }
}

fn page_query(page_number: u32, page_size: u32, sort_by: Option<&str>, forward_sort: bool) -> String {
    let mut query = format!("page={}&size={}", page_number, page_size);
    if forward_sort {
        if let Some(sort_by) = sort_by.filter(|s| !s.is_empty()) {
            query.push_str("&sort=");
            query.extend(url::form_urlencoded::byte_serialize(sort_by.as_bytes()));
        }
    }
    query
}

// Upstream client implementation
// Article storage service calls over the shared HTTPS client

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use url::Url;

use super::tls;
use crate::error::{AppError, AppResult};
use crate::models::{Article, ArticleUpdate};
use crate::proxy::config::ProxyConfig;
use crate::proxy::error::{FacadeError, FacadeResult};

pub struct UpstreamClient {
    http_client: Client,
    articles_url: String,
}

impl UpstreamClient {
    pub fn new(config: &ProxyConfig) -> AppResult<Self> {
        config.validate()?;
        let articles_url = parse_articles_url(&config.articles_url)?;
        let http_client = tls::build_http_client(&config.transport, config.request_timeout)?;

        tracing::info!("UpstreamClient targeting {}", articles_url);

        Ok(Self {
            http_client,
            articles_url,
        })
    }

    /// Build articles URL
    ///
    /// `{base}`, `{base}/{id}` or `{base}?{query}`
    fn build_url(base: &str, id: Option<i64>, query_string: Option<&str>) -> String {
        let mut url = match id {
            Some(id) => format!("{}/{}", base, id),
            None => base.to_string(),
        };
        if let Some(qs) = query_string {
            url.push('?');
            url.push_str(qs);
        }
        url
    }

    pub async fn create(&self, article: &Article) -> FacadeResult<Article> {
        let url = Self::build_url(&self.articles_url, None, None);
        let response = self.send(self.http_client.post(&url).json(article)).await?;
        response.json().await.map_err(FacadeError::from_transport)
    }

    pub async fn read(&self, id: i64) -> FacadeResult<Article> {
        let url = Self::build_url(&self.articles_url, Some(id), None);
        let response = self.send(self.http_client.get(&url)).await?;
        response.json().await.map_err(FacadeError::from_transport)
    }

    pub async fn update(&self, id: i64, update: &ArticleUpdate) -> FacadeResult<()> {
        let url = Self::build_url(&self.articles_url, Some(id), None);
        self.send(self.http_client.patch(&url).json(update)).await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> FacadeResult<()> {
        let url = Self::build_url(&self.articles_url, Some(id), None);
        self.send(self.http_client.delete(&url)).await?;
        Ok(())
    }

    /// Fetch a page envelope as untyped JSON
    pub async fn fetch_page(&self, query_string: &str) -> FacadeResult<Value> {
        let url = Self::build_url(&self.articles_url, None, Some(query_string));
        let response = self.send(self.http_client.get(&url)).await?;
        response.json().await.map_err(FacadeError::from_transport)
    }

    /// Send a request and translate downstream failures
    async fn send(&self, request: RequestBuilder) -> FacadeResult<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("Upstream request failed: {}", e);
            FacadeError::from_transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let message = response.text().await.unwrap_or_default();
        tracing::warn!("Upstream returned {} for {}", status, url);

        if status == StatusCode::NOT_FOUND {
            return Err(FacadeError::NotFound(if message.is_empty() {
                url
            } else {
                message
            }));
        }

        Err(FacadeError::Upstream {
            status: status.as_u16(),
            message,
        })
    }
}

/// Validate the configured base URL and drop a trailing slash
fn parse_articles_url(raw: &str) -> AppResult<String> {
    let parsed = Url::parse(raw)
        .map_err(|e| AppError::Config(format!("Invalid articles_url '{}': {}", raw, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::Config(format!(
            "articles_url must use http or https, got '{}'",
            parsed.scheme()
        )));
    }
    if parsed.query().is_some() {
        return Err(AppError::Config(format!(
            "articles_url must not carry a query string: {}",
            raw
        )));
    }

    Ok(raw.strip_suffix('/').unwrap_or(raw).to_string())
}

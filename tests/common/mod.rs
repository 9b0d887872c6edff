#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use article_facade_lib::proxy::{ArticleService, AxumServer, ProxyConfig, TransportTrustPolicy};
use wiremock::MockServer;

pub const ARTICLES_PATH: &str = "/api/v1/articles";

/// Facade config pointing at a wiremock downstream
pub fn config_for(mock: &MockServer) -> ProxyConfig {
    ProxyConfig {
        articles_url: format!("{}{}", mock.uri(), ARTICLES_PATH),
        request_timeout: 5,
        transport: TransportTrustPolicy::TrustAll,
        ..Default::default()
    }
}

pub fn service_for(mock: &MockServer) -> ArticleService {
    ArticleService::new(&config_for(mock)).expect("build article service")
}

/// A facade listening on an ephemeral local port
pub struct RunningFacade {
    server: Option<AxumServer>,
    handle: tokio::task::JoinHandle<()>,
    pub addr: SocketAddr,
    pub client: reqwest::Client,
}

impl RunningFacade {
    pub async fn start(mock: &MockServer) -> Self {
        let service = Arc::new(service_for(mock));
        let (server, handle) = AxumServer::start("127.0.0.1".to_string(), 0, service)
            .await
            .expect("start facade");
        let addr = server.local_addr();

        Self {
            server: Some(server),
            handle,
            addr,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }

    pub async fn stop(mut self) {
        if let Some(server) = self.server.take() {
            server.stop();
        }
        let _ = (&mut self.handle).await;
    }
}

pub fn string_of_len(len: usize) -> String {
    "a".repeat(len)
}

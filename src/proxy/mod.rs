// proxy module - article facade service

pub mod config;
pub mod error;
pub mod server;
pub mod service;

pub mod common; // Validation and page normalization
pub mod handlers; // API endpoint handlers
pub mod middleware; // Axum middleware
pub mod upstream; // Upstream client and TLS policy

pub use config::ProxyConfig;
pub use error::{FacadeError, FacadeResult};
pub use server::AxumServer;
pub use service::ArticleService;
pub use upstream::tls::TransportTrustPolicy;

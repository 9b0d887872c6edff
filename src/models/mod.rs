pub mod article;
pub mod config;

pub use article::{Article, ArticleUpdate, PageResult};
pub use config::AppConfig;

pub mod base;
pub mod config;
pub mod data;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;
pub mod validation;

// Re-export the repository contract
pub use base::repository_traits::ArticleRepository;

// Re-export models
pub use models::{
    article::{Article, ArticleId, NewArticle},
    tag::{TagDate, TagSummary},
};

pub use config::{Config, ConfigError};
pub use error::{Error, ErrorKind, StoreError};
pub use handlers::AppState;
pub use services::{ArticleService, TagService};

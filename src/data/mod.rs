pub mod database;
pub mod migration;
pub mod repositories;

pub use crate::data::database::Database;
pub use crate::data::repositories::{InMemoryArticleRepository, SqliteArticleRepository};

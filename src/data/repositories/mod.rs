mod article_repository;
mod memory_repository;

pub use article_repository::SqliteArticleRepository;
pub use memory_repository::InMemoryArticleRepository;

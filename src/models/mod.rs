pub mod article;
pub mod tag;

pub use article::{Article, ArticleId, NewArticle, ARTICLE_DATE_FORMAT};
pub use tag::{TagDate, TagSummary};

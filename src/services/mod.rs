pub mod article;
pub mod tag;

pub use article::ArticleService;
pub use tag::{collect_related_tags, TagService};

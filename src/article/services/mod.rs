//! Application services for article publication.

mod publication;

pub use publication::{
    ArticlePublicationService, LoadedArticle, PublicationError, PublicationResult,
};

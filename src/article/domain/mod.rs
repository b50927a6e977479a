//! Domain model for structured article content.
//!
//! The domain holds the closed block model, the allow-list rich-text model,
//! the revisioned block document and the article aggregate. Infrastructure
//! concerns stay outside this boundary.

mod article;
mod block;
mod document;
mod error;
mod ids;
pub(crate) mod markup;
mod notification;
mod rich_text;

pub use article::{Article, ArticleBody, ArticleStatus, PersistedArticleData};
pub use block::{
    Block, BlockEdit, BlockKind, HeadingBlock, HeadingLevel, ImageBlock, NormalizedBlock,
    ParagraphBlock, QuoteBlock, ValidationAdvisory,
};
pub use document::{BlockDocument, DocumentOrigin};
pub use error::{
    ArticleDomainError, DocumentError, InvalidHeadingLevel, MarkupError, ParseArticleStatusError,
    ParseBlockKindError,
};
pub use ids::{ArticleId, Revision};
pub use notification::{NotificationKind, PublicationNotification, Topic};
pub use rich_text::{Inline, Mark, RichText};
pub(crate) use rich_text::{is_safe_image_source, is_safe_link};

//! Structured article bodies for Gazette.
//!
//! This module implements the block content model: typed content blocks
//! with per-block validation, the revisioned block document editors mutate,
//! lossless storage encoding and sanitised display rendering, best-effort
//! migration of legacy flat bodies, and the publish lifecycle that commits
//! an article together with its reader notification.
//!
//! # Architecture
//!
//! The module follows hexagonal architecture principles:
//!
//! - **Domain**: Pure content types ([`domain::Block`], [`domain::BlockDocument`], [`domain::Article`], etc.)
//! - **Ports**: Abstract trait interfaces ([`ports::BlockValidator`], [`ports::ArticleStore`], [`ports::PublicationEventEmitter`])
//! - **Adapters**: Concrete implementations ([`adapters::InMemoryArticleStore`], [`adapters::BroadcastFanout`])
//! - **Validation**: Block rules applied on every edit and at publication
//! - **Codec**: Storage records and sanitised display markup
//! - **Migration**: Decomposition of legacy flat bodies into blocks
//!
//! # Example
//!
//! ```
//! use gazette::article::domain::{Block, BlockDocument, HeadingLevel};
//! use gazette::article::ports::validator::{BlockValidator, ValidationMode};
//! use gazette::article::validation::DefaultBlockValidator;
//!
//! let validator = DefaultBlockValidator::new();
//! let mut document = BlockDocument::new();
//!
//! let heading = validator
//!     .validate(Block::heading("Election night", HeadingLevel::H2), ValidationMode::Authoring)
//!     .expect("valid heading");
//! document.insert(0, heading).expect("position in range");
//!
//! let paragraph = validator
//!     .validate(Block::paragraph("Polls <b>closed</b> at ten."), ValidationMode::Authoring)
//!     .expect("valid paragraph");
//! document.insert(1, paragraph).expect("position in range");
//!
//! validator.validate_for_publish(&document).expect("publishable");
//! ```

pub mod adapters;
pub mod codec;
pub mod domain;
pub mod error;
pub mod migration;
pub mod ports;
pub mod services;
pub mod validation;

#[cfg(test)]
mod tests;

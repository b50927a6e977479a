//! Gazette: structured article content for a news publishing platform.
//!
//! An article body is an ordered sequence of typed content blocks rather
//! than a single rich-text blob. This crate owns that content model: block
//! validation, the revisioned block document, the storage and display
//! codecs, migration of legacy flat bodies, and the publish lifecycle that
//! hands notifications to the reader fan-out.
//!
//! # Architecture
//!
//! Gazette follows hexagonal architecture principles:
//!
//! - **Domain**: Pure content model with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for validation, storage and events
//! - **Adapters**: Concrete implementations of ports (in-memory, broadcast)
//!
//! # Modules
//!
//! - [`article`]: Block content model, codecs, migration and publication

pub mod article;

//! Port contracts for article content and publication.
//!
//! Ports define infrastructure-agnostic interfaces used by the publication
//! service.

pub mod events;
pub mod store;
pub mod validator;

pub use events::{EmitError, EmitResult, PublicationEventEmitter};
pub use store::{ArticleStore, StoreError, StoreResult};
pub use validator::{BlockValidator, ValidationConfig, ValidationMode, ValidationResult};

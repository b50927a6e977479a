//! Unit tests for the article module.
//!
//! Tests are organised by component, covering happy paths, error cases,
//! and edge cases for the public APIs.

mod validation_tests;

//! Step definitions for article publication scenarios.

mod given;
mod then;
mod when;
pub mod world;

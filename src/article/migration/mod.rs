//! Migration of articles written before the block model existed.

pub mod legacy;

pub use legacy::LegacyMigrator;

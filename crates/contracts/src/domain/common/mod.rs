//! Common types shared by all domain records

pub mod entity_metadata;

pub use entity_metadata::EntityMetadata;

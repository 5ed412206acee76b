//! Core data models for citation records and the link registry.

mod citation;
mod link;

pub use citation::{CitationRecord, Dataset, SourceType};
pub use link::LinkRegistryEntry;

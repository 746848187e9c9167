//! Static reference data: test catalogs and the explanation dictionary.
//!
//! Compiled into the binary and never mutated. Stages borrow it through
//! `'static` references.

pub mod catalog;
pub mod explanations;

pub use catalog::{definition, SecondaryPattern, PRIMARY_CATALOG, SECONDARY_CATALOG};
pub use explanations::{KnowledgeEntry, KNOWLEDGE_TABLE};

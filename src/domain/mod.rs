//! Domain layer types and invariants.

pub mod bilingual;
pub mod content;
pub mod entities;
pub mod slug;
pub mod types;

//! Translation index: discovery, parsing, freshness.

pub mod debounce;
pub mod scanner;
pub mod types;
pub mod workspace;

pub use types::{
    IndexerError,
    KeyCompleteness,
    TableEdit,
    TranslationIndex,
};
pub use workspace::TranslationIndexer;

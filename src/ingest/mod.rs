//! Benchmark log ingestion: reading, identity extraction and record parsing.

pub mod identity;
pub mod reader;
pub mod record;

pub use identity::IdentityStrategy;
pub use reader::{load_sources, SourceFile};

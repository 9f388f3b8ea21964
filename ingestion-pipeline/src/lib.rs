pub mod draft;
pub mod pipeline;

pub use pipeline::{IngestionPipeline, IngestionReport};

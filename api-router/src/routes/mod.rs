pub mod files;
pub mod ingestion;
pub mod liveness;
pub mod posts;
pub mod readiness;

use std::sync::Arc;

use chrono::NaiveDate;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use common::{
    error::AppError,
    storage::{db::SurrealDbClient, store::StorageManager, types::blog_post::BlogPost},
    utils::config::AppConfig,
};

use crate::draft::{post_from_file, slug_from_file_name};

/// Aggregate outcome of one reconciliation run.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct IngestionReport {
    /// Files converted into posts this run.
    pub ingested: usize,
    /// Files whose slug already had a post; left in place.
    pub skipped: usize,
    /// Files that hit a download/lookup/insert error; left in place for retry.
    pub failed: usize,
}

enum FileOutcome {
    Ingested(String),
    Skipped(String),
}

/// Reconciles uploaded blog source files against the blog_post table.
///
/// One run lists the configured bucket prefix, converts every file whose slug
/// has no post yet, and deletes each file only after its post has been
/// stored. Runs are mutually exclusive: the slug existence check is the only
/// duplicate guard, so a second concurrent run is refused rather than risking
/// double inserts.
pub struct IngestionPipeline {
    db: Arc<SurrealDbClient>,
    storage: StorageManager,
    config: AppConfig,
    run_guard: Mutex<()>,
}

impl IngestionPipeline {
    pub fn new(db: Arc<SurrealDbClient>, storage: StorageManager, config: AppConfig) -> Self {
        Self {
            db,
            storage,
            config,
            run_guard: Mutex::new(()),
        }
    }

    /// Run one reconciliation pass over the blog files bucket.
    ///
    /// Fatal errors (content store not set up, bucket listing failure) abort
    /// the whole run. Per-file errors are logged and counted; the file stays
    /// in the bucket and remains eligible for the next run.
    pub async fn reconcile(&self) -> Result<IngestionReport, AppError> {
        let Ok(_lease) = self.run_guard.try_lock() else {
            return Err(AppError::Busy(
                "an ingestion run is already in flight".to_string(),
            ));
        };

        self.db.verify_provisioned().await?;

        let prefix = self.config.blog_files_prefix.as_str();
        let files = self.storage.list(Some(prefix)).await?;
        info!(file_count = files.len(), prefix, "listed blog source files");

        let mut report = IngestionReport::default();
        let published = Utc::now().date_naive();

        for meta in files {
            let location = meta.location.as_ref();
            let Some(file_name) = meta.location.filename() else {
                warn!(file = %location, "listing entry has no file name; skipping");
                report.failed += 1;
                continue;
            };

            match self.ingest_file(location, file_name, published).await {
                Ok(FileOutcome::Ingested(slug)) => {
                    info!(file = %location, %slug, "created blog post from file");
                    report.ingested += 1;
                }
                Ok(FileOutcome::Skipped(slug)) => {
                    debug!(file = %location, %slug, "file already ingested; skipping");
                    report.skipped += 1;
                }
                Err(err) => {
                    warn!(
                        file = %location,
                        error = %err,
                        "failed to ingest file; leaving it for a later run"
                    );
                    report.failed += 1;
                }
            }
        }

        info!(
            ingested = report.ingested,
            skipped = report.skipped,
            failed = report.failed,
            "storage reconciliation completed"
        );
        Ok(report)
    }

    /// Process a single file: slug lookup, then download-convert-insert,
    /// then delete. The file is deleted only after a successful insert; a
    /// failed delete leaves a post/file pair the next run resolves by slug.
    async fn ingest_file(
        &self,
        location: &str,
        file_name: &str,
        published: NaiveDate,
    ) -> Result<FileOutcome, AppError> {
        let slug = slug_from_file_name(file_name);

        if BlogPost::find_by_slug(&slug, &self.db).await?.is_some() {
            return Ok(FileOutcome::Skipped(slug));
        }

        let bytes = self.storage.get(location).await?;
        let content = String::from_utf8_lossy(&bytes);

        let post = post_from_file(file_name, &content, &self.config.blog_author, published);
        self.db.store_item(post).await?;

        if let Err(err) = self.storage.delete(location).await {
            // The post exists; the next run skips this file via its slug.
            warn!(file = %location, %slug, error = %err, "failed to delete ingested file");
        }

        Ok(FileOutcome::Ingested(slug))
    }
}

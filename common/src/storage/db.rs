use super::types::StoredObject;
use crate::error::AppError;
use std::ops::Deref;
use surrealdb::{
    engine::any::{connect, Any},
    opt::auth::Root,
    Error, Surreal,
};
use tracing::debug;

#[derive(Clone)]
pub struct SurrealDbClient {
    pub client: Surreal<Any>,
}

impl SurrealDbClient {
    /// Connect to SurrealDB, sign in, and select the namespace/database.
    pub async fn new(
        address: &str,
        username: &str,
        password: &str,
        namespace: &str,
        database: &str,
    ) -> Result<Self, Error> {
        let db = connect(address).await?;

        db.signin(Root { username, password }).await?;

        db.use_ns(namespace).use_db(database).await?;

        Ok(SurrealDbClient { client: db })
    }

    /// Define the blog_post table and its indexes.
    ///
    /// The slug index is intentionally non-unique: ingestion enforces
    /// at-most-one-post-per-slug with a check-then-insert under a
    /// single-flight guard.
    pub async fn ensure_initialized(&self) -> Result<(), AppError> {
        self.client
            .query(
                "DEFINE TABLE IF NOT EXISTS blog_post SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS idx_blog_post_slug ON TABLE blog_post FIELDS slug;
                DEFINE INDEX IF NOT EXISTS idx_blog_post_status ON TABLE blog_post FIELDS status;",
            )
            .await?
            .check()?;

        debug!("blog_post table and indexes defined");
        Ok(())
    }

    /// Check that the blog_post table has been defined.
    ///
    /// A schemaless SELECT succeeds against an empty database, so this asks
    /// for the table definition instead. Used by the ingestion pipeline
    /// before any file work and by the readiness probe.
    pub async fn verify_provisioned(&self) -> Result<(), AppError> {
        self.client
            .query("INFO FOR TABLE blog_post")
            .await
            .and_then(surrealdb::Response::check)
            .map_err(|e| AppError::Setup(format!("blog_post table is not set up: {e}")))?;

        Ok(())
    }

    /// Store an object in its table, requires the struct to implement `StoredObject`.
    pub async fn store_item<T>(&self, item: T) -> Result<Option<T>, Error>
    where
        T: StoredObject + Send + Sync + 'static,
    {
        self.client
            .create((T::table_name(), item.get_id()))
            .content(item)
            .await
    }

    /// Retrieve all objects from a table.
    pub async fn get_all_stored_items<T>(&self) -> Result<Vec<T>, Error>
    where
        T: for<'de> StoredObject,
    {
        self.client.select(T::table_name()).await
    }

    /// Retrieve a single object by its ID.
    pub async fn get_item<T>(&self, id: &str) -> Result<Option<T>, Error>
    where
        T: for<'de> StoredObject,
    {
        self.client.select((T::table_name(), id)).await
    }

    /// Delete a single object by its ID, returning the deleted record if it existed.
    pub async fn delete_item<T>(&self, id: &str) -> Result<Option<T>, Error>
    where
        T: for<'de> StoredObject,
    {
        self.client.delete((T::table_name(), id)).await
    }
}

impl Deref for SurrealDbClient {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl SurrealDbClient {
    /// Create an in-memory SurrealDB client for testing.
    pub async fn memory(namespace: &str, database: &str) -> Result<Self, Error> {
        let db = connect("mem://").await?;

        db.use_ns(namespace).use_db(database).await?;

        Ok(SurrealDbClient { client: db })
    }
}

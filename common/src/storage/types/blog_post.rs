use uuid::Uuid;

use crate::{error::AppError, storage::db::SurrealDbClient, stored_object};

/// Publication state of a post. Stored lowercase, matching the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

stored_object!(BlogPost, "blog_post", {
    title: String,
    content: String,
    excerpt: String,
    author: String,
    slug: String,
    /// ISO calendar date (YYYY-MM-DD), no time component.
    published_date: String,
    read_time: String,
    tags: Vec<String>,
    featured: bool,
    status: PostStatus,
    #[serde(default)]
    thumbnail_url: Option<String>
});

/// Partial update applied through the manual CRUD surface. Fields left as
/// `None` are not touched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogPostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl BlogPost {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: String,
        content: String,
        excerpt: String,
        author: String,
        slug: String,
        published_date: String,
        read_time: String,
        tags: Vec<String>,
        featured: bool,
        status: PostStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            title,
            content,
            excerpt,
            author,
            slug,
            published_date,
            read_time,
            tags,
            featured,
            status,
            thumbnail_url: None,
        }
    }

    /// Look up a post by its slug. Slugs are the ingestion idempotency key;
    /// the table carries no unique constraint, so this returns the first match.
    pub async fn find_by_slug(
        slug: &str,
        db: &SurrealDbClient,
    ) -> Result<Option<Self>, AppError> {
        let posts: Vec<Self> = db
            .client
            .query("SELECT * FROM type::table($table) WHERE slug = $slug")
            .bind(("table", Self::table_name()))
            .bind(("slug", slug.to_string()))
            .await?
            .take(0)?;

        Ok(posts.into_iter().next())
    }

    /// Published posts, newest publication date first.
    pub async fn get_published(db: &SurrealDbClient) -> Result<Vec<Self>, AppError> {
        let posts: Vec<Self> = db
            .client
            .query(
                "SELECT * FROM type::table($table) WHERE status = 'published' \
                 ORDER BY published_date DESC",
            )
            .bind(("table", Self::table_name()))
            .await?
            .take(0)?;

        Ok(posts)
    }

    /// Every post regardless of status, newest record first.
    pub async fn get_all(db: &SurrealDbClient) -> Result<Vec<Self>, AppError> {
        let posts: Vec<Self> = db
            .client
            .query("SELECT * FROM type::table($table) ORDER BY created_at DESC")
            .bind(("table", Self::table_name()))
            .await?
            .take(0)?;

        Ok(posts)
    }

    /// Merge a partial update into an existing post by primary key.
    ///
    /// Returns `None` when no post with that id exists.
    pub async fn apply_patch(
        id: &str,
        patch: BlogPostPatch,
        db: &SurrealDbClient,
    ) -> Result<Option<Self>, AppError> {
        #[derive(Serialize)]
        struct Merge {
            #[serde(flatten)]
            patch: BlogPostPatch,
            updated_at: surrealdb::sql::Datetime,
        }

        let updated: Option<Self> = db
            .client
            .update((Self::table_name(), id))
            .merge(Merge {
                patch,
                updated_at: Utc::now().into(),
            })
            .await?;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post(slug: &str, status: PostStatus, published_date: &str) -> BlogPost {
        BlogPost::new(
            format!("Title for {slug}"),
            "Some body text".to_string(),
            "Some body text".to_string(),
            "Catherine Mwangi".to_string(),
            slug.to_string(),
            published_date.to_string(),
            "1 min read".to_string(),
            vec![],
            false,
            status,
        )
    }

    async fn memory_db() -> SurrealDbClient {
        let db = SurrealDbClient::memory("test_ns", &Uuid::new_v4().to_string())
            .await
            .expect("Failed to start in-memory surrealdb");
        db.ensure_initialized().await.expect("initialize schema");
        db
    }

    #[test]
    fn test_post_status_serializes_lowercase() {
        let json = serde_json::to_string(&PostStatus::Published).expect("serialize");
        assert_eq!(json, "\"published\"");
        let parsed: PostStatus = serde_json::from_str("\"draft\"").expect("deserialize");
        assert_eq!(parsed, PostStatus::Draft);
    }

    #[tokio::test]
    async fn test_find_by_slug() {
        let db = memory_db().await;
        let post = sample_post("hello-world", PostStatus::Published, "2025-06-01");
        db.store_item(post.clone()).await.expect("store");

        let found = BlogPost::find_by_slug("hello-world", &db)
            .await
            .expect("query");
        assert_eq!(found.as_ref().map(|p| p.id.as_str()), Some(post.id.as_str()));

        let missing = BlogPost::find_by_slug("no-such-slug", &db)
            .await
            .expect("query");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_get_published_filters_and_orders() {
        let db = memory_db().await;
        db.store_item(sample_post("older", PostStatus::Published, "2025-01-10"))
            .await
            .expect("store");
        db.store_item(sample_post("newer", PostStatus::Published, "2025-03-02"))
            .await
            .expect("store");
        db.store_item(sample_post("hidden", PostStatus::Draft, "2025-02-01"))
            .await
            .expect("store");

        let published = BlogPost::get_published(&db).await.expect("query");
        let slugs: Vec<_> = published.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newer", "older"]);

        let all = BlogPost::get_all(&db).await.expect("query");
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_apply_patch_updates_fields() {
        let db = memory_db().await;
        let post = sample_post("patch-me", PostStatus::Draft, "2025-05-05");
        db.store_item(post.clone()).await.expect("store");

        let patch = BlogPostPatch {
            title: Some("New title".to_string()),
            status: Some(PostStatus::Published),
            featured: Some(true),
            ..Default::default()
        };
        let updated = BlogPost::apply_patch(&post.id, patch, &db)
            .await
            .expect("patch")
            .expect("post should exist");

        assert_eq!(updated.title, "New title");
        assert_eq!(updated.status, PostStatus::Published);
        assert!(updated.featured);
        // Untouched fields survive the merge
        assert_eq!(updated.slug, "patch-me");
        assert_eq!(updated.content, post.content);
        assert!(updated.updated_at >= post.updated_at);
    }

    #[tokio::test]
    async fn test_apply_patch_missing_post() {
        let db = memory_db().await;
        let patch = BlogPostPatch {
            title: Some("whatever".to_string()),
            ..Default::default()
        };
        let updated = BlogPost::apply_patch("missing-id", patch, &db)
            .await
            .expect("patch");
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let db = memory_db().await;
        let post = sample_post("to-delete", PostStatus::Published, "2025-04-04");
        db.store_item(post.clone()).await.expect("store");

        let deleted = db.delete_item::<BlogPost>(&post.id).await.expect("delete");
        assert_eq!(deleted.map(|p| p.id), Some(post.id.clone()));

        let gone = db.get_item::<BlogPost>(&post.id).await.expect("get");
        assert!(gone.is_none());
    }
}

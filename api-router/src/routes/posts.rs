use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use common::{
    error::AppError,
    storage::types::blog_post::{BlogPost, BlogPostPatch, PostStatus},
};
use ingestion_pipeline::draft::read_time;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{api_state::ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub read_time: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub status: Option<PostStatus>,
}

/// Published posts, newest first. The public blog listing.
pub async fn list_published_posts(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let posts = BlogPost::get_published(&state.db).await?;
    Ok(Json(posts))
}

/// Every post regardless of status. Backs the management view.
pub async fn list_all_posts(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let posts = BlogPost::get_all(&state.db).await?;
    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .db
        .get_item::<BlogPost>(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| ApiError::NotFound(format!("no post with id {id}")))?;

    Ok(Json(post))
}

pub async fn create_post(
    State(state): State<ApiState>,
    Json(input): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if input.title.trim().is_empty() {
        return Err(ApiError::ValidationError("title must not be empty".to_string()));
    }
    if input.content.trim().is_empty() {
        return Err(ApiError::ValidationError("content must not be empty".to_string()));
    }
    if input.slug.trim().is_empty() {
        return Err(ApiError::ValidationError("slug must not be empty".to_string()));
    }

    let post = BlogPost::new(
        input.title,
        input.content.clone(),
        input.excerpt.unwrap_or_default(),
        input
            .author
            .unwrap_or_else(|| state.config.blog_author.clone()),
        input.slug,
        input
            .published_date
            .unwrap_or_else(|| Utc::now().date_naive().to_string()),
        input.read_time.unwrap_or_else(|| read_time(&input.content)),
        input.tags,
        input.featured,
        input.status.unwrap_or(PostStatus::Draft),
    );

    state
        .db
        .store_item(post.clone())
        .await
        .map_err(AppError::from)?;
    info!(post_id = %post.id, slug = %post.slug, "created blog post");

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(patch): Json<BlogPostPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = BlogPost::apply_patch(&id, patch, &state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no post with id {id}")))?;

    info!(post_id = %id, "updated blog post");
    Ok(Json(updated))
}

pub async fn delete_post(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .db
        .delete_item::<BlogPost>(&id)
        .await
        .map_err(AppError::from)?;

    if deleted.is_none() {
        return Err(ApiError::NotFound(format!("no post with id {id}")));
    }

    info!(post_id = %id, "deleted blog post");
    Ok((StatusCode::OK, Json(json!({ "status": "success" }))))
}

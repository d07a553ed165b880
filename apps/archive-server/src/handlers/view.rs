//! Viewer for a single archived post.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use pokshin_core::domain::Post;
use pokshin_shared::dto::PostDetail;

use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;
use crate::state::AppState;

pub const NOT_FOUND_MESSAGE: &str = "Entry not found";

pub(crate) fn detail(post: &Post) -> AppResult<PostDetail> {
    let content =
        serde_json::to_value(&post.content).map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(PostDetail {
        id: post.id,
        group_id: post.group_id.to_string(),
        title: post.title.clone(),
        cp: post.cp.clone(),
        pen_name: post.display_pen_name().to_string(),
        writing_date: post.writing_date,
        genre: post.genre.iter().map(|g| g.label().to_string()).collect(),
        is_adult: post.is_adult,
        collab_name: post.collaboration().map(str::to_string),
        content,
        content_html: post.content.to_html(),
        image_url: post.image_url.clone(),
        created_at: post.created_at,
    })
}

/// Route ids are opaque; anything that is not a known post is "not found".
fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(NOT_FOUND_MESSAGE.to_string()))
}

/// GET /api/view/{post_id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let post = state
        .posts
        .find_by_id(id)
        .await
        .ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

    Ok(HttpResponse::Ok().json(detail(&post)?))
}

/// DELETE /api/view/{post_id}
///
/// Idempotent: deleting a post that is already gone still succeeds.
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    request_id: RequestId,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    state.posts.delete(id).await?;
    tracing::info!(request_id = %request_id.as_str(), post_id = %id, "Entry deleted");
    Ok(HttpResponse::NoContent().finish())
}

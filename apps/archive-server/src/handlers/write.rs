//! Composer: form state, drafts, submission, attachments and the writing assistant.

use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use pokshin_core::domain::{ComposerForm, EditCommand, GroupId, RichText, Selection};
use pokshin_infra::to_data_url;
use pokshin_shared::dto::{ImageResponse, PolishResponse, PromptResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;
use crate::state::AppState;

use super::view::detail;

fn parse_group(raw: &str) -> AppResult<GroupId> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("Unknown group {raw}")))
}

/// GET /api/write/{group_id}
pub async fn open(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let group = parse_group(&path)?;
    let view = state.composer.open(group, Utc::now().date_naive()).await;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/write/{group_id}
pub async fn submit(
    state: web::Data<AppState>,
    path: web::Path<String>,
    request_id: RequestId,
    body: web::Json<ComposerForm>,
) -> AppResult<HttpResponse> {
    let group = parse_group(&path)?;
    let post = state.composer.submit(group, body.into_inner()).await?;
    tracing::info!(request_id = %request_id.as_str(), post_id = %post.id, "Entry submitted");
    Ok(HttpResponse::Created().json(detail(&post)?))
}

/// PUT /api/write/{group_id}/draft
pub async fn save_draft(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ComposerForm>,
) -> AppResult<HttpResponse> {
    let group = parse_group(&path)?;
    state.composer.save_draft(group, &body).await?;
    tracing::debug!(group = %group, "Draft saved");
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/write/{group_id}/draft
pub async fn discard_draft(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let group = parse_group(&path)?;
    state.composer.discard_draft(group).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/write/{group_id}/image
///
/// The raw image is the request body; the reply carries the data URL to put in
/// the form's `imageUrl`.
pub async fn upload_image(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: HttpRequest,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    parse_group(&path)?;
    let declared = req
        .mime_type()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let image_url = to_data_url(&body, declared.as_ref(), state.max_image_bytes)?;

    tracing::debug!(bytes = body.len(), "Image attached");
    Ok(HttpResponse::Ok().json(ImageResponse { image_url }))
}

/// POST /api/write/{group_id}/prompt
pub async fn prompt(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let group = parse_group(&path)?;
    let prompt = state.composer.writing_prompt(group).await;
    Ok(HttpResponse::Ok().json(PromptResponse { prompt }))
}

#[derive(Debug, Deserialize)]
pub struct PolishRequest {
    #[serde(default)]
    pub title: String,
    pub content: RichText,
}

/// POST /api/write/{group_id}/polish
pub async fn polish(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PolishRequest>,
) -> AppResult<HttpResponse> {
    parse_group(&path)?;
    let polished = state.composer.polish(&body.title, &body.content).await;
    Ok(HttpResponse::Ok().json(PolishResponse { polished }))
}

#[derive(Debug, Deserialize)]
pub struct FormatRequest {
    pub content: RichText,
    pub selection: Selection,
    pub edit: EditCommand,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatResponse {
    pub content: RichText,
    pub content_html: String,
}

/// POST /api/write/{group_id}/format
///
/// Applies one toolbar command to the editor content and returns the result.
pub async fn format(
    path: web::Path<String>,
    body: web::Json<FormatRequest>,
) -> AppResult<HttpResponse> {
    parse_group(&path)?;
    let FormatRequest {
        mut content,
        selection,
        edit,
    } = body.into_inner();
    content.apply(edit, selection)?;

    Ok(HttpResponse::Ok().json(FormatResponse {
        content_html: content.to_html(),
        content,
    }))
}

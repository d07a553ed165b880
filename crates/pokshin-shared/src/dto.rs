//! Data Transfer Objects - response types of the archive views.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Landing view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeResponse {
    pub title: String,
    pub image: String,
}

/// One tile of the group picker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: String,
    pub image: String,
    pub color: String,
    pub description: String,
}

/// One row of a group's post list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub cp: String,
    pub genre: Vec<String>,
    pub pen_name: String,
    pub writing_date: NaiveDate,
    pub is_adult: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Post list view for one group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListResponse {
    pub group_id: String,
    pub title: String,
    pub posts: Vec<PostSummary>,
}

/// Viewer. `content` is the stored document, `content_html` its rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    pub id: Uuid,
    pub group_id: String,
    pub title: String,
    pub cp: String,
    pub pen_name: String,
    pub writing_date: NaiveDate,
    pub genre: Vec<String>,
    pub is_adult: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collab_name: Option<String>,
    pub content: serde_json::Value,
    pub content_html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptResponse {
    pub prompt: String,
}

/// `polished` is absent when the assistant could not help.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolishResponse {
    pub polished: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub image_url: String,
}

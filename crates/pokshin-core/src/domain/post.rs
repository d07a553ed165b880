use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GroupId, RichText};

/// Pen name shown when a post carries none.
pub const ANONYMOUS: &str = "Anonymous";

/// Genre tags. The vocabulary is fixed; the serialized form is the Korean label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    #[serde(rename = "일상")]
    Daily,
    #[serde(rename = "판타지")]
    Fantasy,
    #[serde(rename = "신화")]
    Myth,
    #[serde(rename = "재난")]
    Disaster,
    #[serde(rename = "시대물")]
    Period,
}

impl Genre {
    pub fn label(self) -> &'static str {
        match self {
            Genre::Daily => "일상",
            Genre::Fantasy => "판타지",
            Genre::Myth => "신화",
            Genre::Disaster => "재난",
            Genre::Period => "시대물",
        }
    }
}

/// Post entity - one archived piece of fan fiction with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub group_id: GroupId,
    pub title: String,
    #[serde(default)]
    pub cp: String,
    #[serde(default)]
    pub pen_name: String,
    pub writing_date: NaiveDate,
    #[serde(default)]
    pub genre: Vec<Genre>,
    #[serde(default)]
    pub is_adult: bool,
    #[serde(default)]
    pub is_collab: bool,
    #[serde(default)]
    pub collab_name: String,
    pub content: RichText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Build a post from composer fields, assigning a fresh id.
    pub fn new(fields: NewPost, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id: fields.group_id,
            title: fields.title,
            cp: fields.cp,
            pen_name: fields.pen_name,
            writing_date: fields.writing_date,
            genre: fields.genre,
            is_adult: fields.is_adult,
            is_collab: fields.is_collab,
            collab_name: fields.collab_name,
            content: fields.content,
            image_url: fields.image_url.filter(|url| !url.is_empty()),
            created_at,
        }
    }

    pub fn display_pen_name(&self) -> &str {
        if self.pen_name.is_empty() {
            ANONYMOUS
        } else {
            &self.pen_name
        }
    }

    /// Collaboration name, only when the post is flagged as a collaboration.
    pub fn collaboration(&self) -> Option<&str> {
        (self.is_collab && !self.collab_name.is_empty()).then_some(self.collab_name.as_str())
    }
}

/// Fields supplied by the composer when creating a post.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub group_id: GroupId,
    pub title: String,
    pub cp: String,
    pub pen_name: String,
    pub writing_date: NaiveDate,
    pub genre: Vec<Genre>,
    pub is_adult: bool,
    pub is_collab: bool,
    pub collab_name: String,
    pub content: RichText,
    pub image_url: Option<String>,
}

impl NewPost {
    /// Minimal fields; everything else takes its empty value.
    pub fn new(group_id: GroupId, title: impl Into<String>, content: RichText) -> Self {
        Self {
            group_id,
            title: title.into(),
            cp: String::new(),
            pen_name: String::new(),
            writing_date: Utc::now().date_naive(),
            genre: Vec::new(),
            is_adult: false,
            is_collab: false,
            collab_name: String::new(),
            content,
            image_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_is_camel_case() {
        let mut fields = NewPost::new(GroupId::Oneus, "첫 만남", RichText::from_plain_text("본문"));
        fields.genre = vec![Genre::Daily, Genre::Myth];
        fields.writing_date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let post = Post::new(fields, Utc::now());

        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["groupId"], "ONEUS");
        assert_eq!(value["writingDate"], "2024-03-01");
        assert_eq!(value["genre"], serde_json::json!(["일상", "신화"]));
        assert!(value["createdAt"].is_i64());
        assert!(value.get("imageUrl").is_none());
    }

    #[test]
    fn test_display_pen_name_defaults_to_anonymous() {
        let mut post = Post::new(
            NewPost::new(GroupId::Onf, "t", RichText::from_plain_text("c")),
            Utc::now(),
        );
        assert_eq!(post.display_pen_name(), ANONYMOUS);
        post.pen_name = "이겨울".to_string();
        assert_eq!(post.display_pen_name(), "이겨울");
    }

    #[test]
    fn test_empty_image_url_is_dropped() {
        let mut fields = NewPost::new(GroupId::Onf, "t", RichText::from_plain_text("c"));
        fields.image_url = Some(String::new());
        assert_eq!(Post::new(fields, Utc::now()).image_url, None);
    }

    #[test]
    fn test_collaboration_requires_flag() {
        let mut fields = NewPost::new(GroupId::Onf, "t", RichText::from_plain_text("c"));
        fields.collab_name = "합작".to_string();
        let post = Post::new(fields.clone(), Utc::now());
        assert_eq!(post.collaboration(), None);

        fields.is_collab = true;
        let post = Post::new(fields, Utc::now());
        assert_eq!(post.collaboration(), Some("합작"));
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Genre, GroupId, NewPost, RichText};
use crate::error::DomainError;
use crate::metadata;

/// Shown when a submission lacks a title or body.
pub const MISSING_FIELDS_MESSAGE: &str = "제목과 내용을 모두 입력해주세요.";

/// The composer's form state for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposerForm {
    pub title: String,
    pub cp: String,
    pub pen_name: String,
    pub writing_date: NaiveDate,
    pub genre: Vec<Genre>,
    pub is_adult: bool,
    pub is_collab: bool,
    pub collab_name: String,
    pub content: RichText,
    pub image_url: String,
}

impl ComposerForm {
    /// Empty form preselecting the group's first pairing and pen name.
    pub fn defaults(group: GroupId, today: NaiveDate) -> Self {
        let first = |options: &[&str]| options.first().map(|s| s.to_string()).unwrap_or_default();
        Self {
            title: String::new(),
            cp: first(metadata::pairing_options(group.as_str())),
            pen_name: first(metadata::pen_name_options(group.as_str())),
            writing_date: today,
            genre: Vec::new(),
            is_adult: false,
            is_collab: false,
            collab_name: String::new(),
            content: RichText::new(),
            image_url: String::new(),
        }
    }

    /// Overlay the fields present in a saved draft; absent fields keep their current value.
    pub fn apply_draft(&mut self, draft: DraftRecord) {
        let DraftRecord {
            title,
            cp,
            pen_name,
            writing_date,
            genre,
            is_adult,
            is_collab,
            collab_name,
            content,
            image_url,
        } = draft;

        if let Some(v) = title {
            self.title = v;
        }
        if let Some(v) = cp {
            self.cp = v;
        }
        if let Some(v) = pen_name {
            self.pen_name = v;
        }
        if let Some(v) = writing_date {
            self.writing_date = v;
        }
        if let Some(v) = genre {
            self.genre = v;
        }
        if let Some(v) = is_adult {
            self.is_adult = v;
        }
        if let Some(v) = is_collab {
            self.is_collab = v;
        }
        if let Some(v) = collab_name {
            self.collab_name = v;
        }
        if let Some(v) = content {
            self.content = v;
        }
        if let Some(v) = image_url {
            self.image_url = v;
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.is_empty() || self.content.is_blank() {
            return Err(DomainError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        }
        Ok(())
    }

    pub fn into_new_post(self, group: GroupId) -> NewPost {
        NewPost {
            group_id: group,
            title: self.title,
            cp: self.cp,
            pen_name: self.pen_name,
            writing_date: self.writing_date,
            genre: self.genre,
            is_adult: self.is_adult,
            is_collab: self.is_collab,
            collab_name: self.collab_name,
            content: self.content,
            image_url: Some(self.image_url).filter(|url| !url.is_empty()),
        }
    }
}

/// Stored shape of a draft. Every field is optional so records written by an
/// older form still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pen_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writing_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<Genre>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_adult: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_collab: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collab_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<RichText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<&ComposerForm> for DraftRecord {
    fn from(form: &ComposerForm) -> Self {
        Self {
            title: Some(form.title.clone()),
            cp: Some(form.cp.clone()),
            pen_name: Some(form.pen_name.clone()),
            writing_date: Some(form.writing_date),
            genre: Some(form.genre.clone()),
            is_adult: Some(form.is_adult),
            is_collab: Some(form.is_collab),
            collab_name: Some(form.collab_name.clone()),
            content: Some(form.content.clone()),
            image_url: Some(form.image_url.clone()),
        }
    }
}

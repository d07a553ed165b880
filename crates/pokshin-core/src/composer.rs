//! Composer workflow - drafts, submission, and optional writing assistance.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{ComposerForm, DraftRecord, Genre, GroupId, Post, RichText};
use crate::error::{DomainError, StoreError};
use crate::metadata;
use crate::ports::{AssistError, WritingAssistant};
use crate::store::{DraftStore, PostRepository};

/// Prompt used when no assistant is configured.
pub const DEFAULT_PROMPT: &str = "Write about your favorite memory.";

/// Prompt used when the assistant is configured but the call failed.
pub const FALLBACK_PROMPT: &str =
    "Tell us about a moment that made you fall in love with their music.";

/// Everything the composer view needs for one group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposerView {
    pub group: GroupId,
    pub pairing_options: &'static [&'static str],
    pub pen_name_options: &'static [&'static str],
    /// A single pen name is shown as fixed text rather than a choice.
    pub pen_name_fixed: bool,
    pub genres: &'static [Genre],
    pub text_colors: &'static [&'static str],
    pub has_draft: bool,
    pub form: ComposerForm,
}

#[derive(Clone)]
pub struct Composer {
    posts: Arc<PostRepository>,
    drafts: DraftStore,
    assistant: Arc<dyn WritingAssistant>,
}

impl Composer {
    pub fn new(
        posts: Arc<PostRepository>,
        drafts: DraftStore,
        assistant: Arc<dyn WritingAssistant>,
    ) -> Self {
        Self {
            posts,
            drafts,
            assistant,
        }
    }

    /// Form defaults for the group with any saved draft merged on top.
    pub async fn open(&self, group: GroupId, today: NaiveDate) -> ComposerView {
        let pen_name_options = metadata::pen_name_options(group.as_str());
        let mut form = ComposerForm::defaults(group, today);

        let draft = self.drafts.load(group).await;
        let has_draft = draft.is_some();
        if let Some(draft) = draft {
            form.apply_draft(draft);
        }

        ComposerView {
            group,
            pairing_options: metadata::pairing_options(group.as_str()),
            pen_name_options,
            pen_name_fixed: pen_name_options.len() == 1,
            genres: &metadata::GENRES,
            text_colors: &metadata::TEXT_COLORS,
            has_draft,
            form,
        }
    }

    pub async fn save_draft(&self, group: GroupId, form: &ComposerForm) -> Result<(), StoreError> {
        self.drafts.save(group, &DraftRecord::from(form)).await
    }

    pub async fn discard_draft(&self, group: GroupId) -> Result<(), StoreError> {
        self.drafts.clear(group).await
    }

    /// Validate and archive the form, then drop the group's draft.
    ///
    /// A validation failure leaves the archive and the draft untouched.
    pub async fn submit(&self, group: GroupId, form: ComposerForm) -> Result<Post, DomainError> {
        form.validate()?;
        let post = self.posts.create(form.into_new_post(group)).await?;

        if let Err(e) = self.drafts.clear(group).await {
            tracing::warn!(group = %group, error = %e, "Post archived but draft could not be cleared");
        }
        Ok(post)
    }

    /// A writing prompt for the group. Never fails.
    pub async fn writing_prompt(&self, group: GroupId) -> String {
        match self.assistant.writing_prompt(group.as_str()).await {
            Ok(prompt) if !prompt.trim().is_empty() => prompt,
            Ok(_) => DEFAULT_PROMPT.to_string(),
            Err(AssistError::Unavailable) => DEFAULT_PROMPT.to_string(),
            Err(e) => {
                tracing::warn!(group = %group, error = %e, "Writing prompt failed");
                FALLBACK_PROMPT.to_string()
            }
        }
    }

    /// A polished version of the draft, or `None` when the assistant cannot help.
    pub async fn polish(&self, title: &str, content: &RichText) -> Option<String> {
        match self.assistant.polish_draft(title, &content.plain_text()).await {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            Err(AssistError::Unavailable) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Draft polishing failed");
                None
            }
        }
    }
}

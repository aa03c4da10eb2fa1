//! The unsaved news post being composed in the editor.
//!
//! A draft moves through `Empty -> Editing -> Submitting` and returns to
//! `Empty` after a successful publish or a confirmed cancel, or to `Editing`
//! when publishing fails.

use serde::{Deserialize, Serialize};

use crate::markup::{MarkupTag, Selection, apply_tag};
use crate::types::{Category, CategoryId, ImageUpload};

/// Question asked before discarding a non-empty draft.
pub const DISCARD_PROMPT: &str = "¿Descartar los cambios actuales?";

/// Lifecycle phase of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftPhase {
    #[default]
    Empty,
    Editing,
    Submitting,
}

/// A required field is missing.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftError {
    #[error("El título es obligatorio.")]
    MissingTitle,
    #[error("El contenido es obligatorio.")]
    MissingContent,
    #[error("Seleccione una categoría.")]
    MissingCategory,
}

/// Outcome of asking to cancel a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The draft was reset to its initial state.
    Discarded,
    /// The admin declined to discard; the draft is untouched.
    Kept,
}

/// Validated payload ready to send to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub title: String,
    pub content: String,
    pub category: CategoryId,
    pub image: Option<ImageUpload>,
}

/// Form state for a new post.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Draft {
    title: String,
    content: String,
    category: Option<CategoryId>,
    /// Set once the admin picks a category; stops the default from tracking.
    category_chosen: bool,
    /// First category loaded from the backend.
    default_category: Option<CategoryId>,
    image: Option<ImageUpload>,
    phase: DraftPhase,
}

impl Draft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub const fn category(&self) -> Option<CategoryId> {
        self.category
    }

    #[must_use]
    pub const fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    #[must_use]
    pub const fn phase(&self) -> DraftPhase {
        self.phase
    }

    /// True when title, content and image are all empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.title.is_empty() && self.content.is_empty() && self.image.is_none()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.touch();
    }

    /// Record an explicit category choice by the admin.
    pub fn choose_category(&mut self, category: CategoryId) {
        self.category = Some(category);
        self.category_chosen = true;
        self.touch();
    }

    pub fn attach_image(&mut self, image: ImageUpload) {
        self.image = Some(image);
        self.touch();
    }

    pub fn remove_image(&mut self) {
        self.image = None;
        self.touch();
    }

    /// Follow the first loaded category unless the admin already chose one.
    pub fn track_categories(&mut self, categories: &[Category]) {
        self.default_category = categories.first().map(|category| category.id);
        if !self.category_chosen {
            self.category = self.default_category;
        }
    }

    /// Wrap `selection` of the content in `tag`; returns the new caret position.
    pub fn apply_markup(&mut self, selection: Selection, tag: MarkupTag) -> usize {
        let edit = apply_tag(&self.content, selection, tag);
        self.content = edit.text;
        self.touch();
        edit.cursor
    }

    /// Check required fields and build the payload to send.
    ///
    /// # Errors
    ///
    /// Returns the first missing required field.
    pub fn submission(&self) -> Result<Submission, DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::MissingTitle);
        }
        if self.content.trim().is_empty() {
            return Err(DraftError::MissingContent);
        }
        let category = self.category.ok_or(DraftError::MissingCategory)?;

        Ok(Submission {
            title: self.title.clone(),
            content: self.content.clone(),
            category,
            image: self.image.clone(),
        })
    }

    /// Validate and enter the `Submitting` phase.
    ///
    /// # Errors
    ///
    /// Returns the first missing required field; the phase is left unchanged.
    pub fn begin_submit(&mut self) -> Result<Submission, DraftError> {
        let submission = self.submission()?;
        self.phase = DraftPhase::Submitting;
        Ok(submission)
    }

    /// Leave the `Submitting` phase: reset on success, back to editing otherwise.
    pub fn finish_submit(&mut self, published: bool) {
        if published {
            self.reset();
        } else {
            self.phase = DraftPhase::Editing;
        }
    }

    /// Discard the draft, asking `confirm` first when there is anything to lose.
    pub fn cancel(&mut self, confirm: impl FnOnce(&str) -> bool) -> CancelOutcome {
        if !self.is_blank() && !confirm(DISCARD_PROMPT) {
            return CancelOutcome::Kept;
        }
        self.reset();
        CancelOutcome::Discarded
    }

    /// Back to the initial state: empty fields, first category, no image.
    pub fn reset(&mut self) {
        self.title.clear();
        self.content.clear();
        self.image = None;
        self.category = self.default_category;
        self.category_chosen = false;
        self.phase = DraftPhase::Empty;
    }

    fn touch(&mut self) {
        if self.phase == DraftPhase::Submitting {
            return;
        }
        self.phase = if self.is_blank() && !self.category_chosen {
            DraftPhase::Empty
        } else {
            DraftPhase::Editing
        };
    }
}

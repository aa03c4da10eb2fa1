//! The news editor: lists, the draft, and the create/delete calls.

use alamo_core::markup::insert_markup;
use alamo_core::{
    CancelOutcome, Category, Draft, DraftError, MarkupTag, Notification, Post, PostId, Selection,
};
use thiserror::Error;

use super::scope::{Cancelled, RequestScope};
use crate::backend::{BackendClient, BackendError};
use crate::session::ApiToken;

/// Question asked before deleting a post.
pub const DELETE_PROMPT: &str = "¿Estás seguro de eliminar esta noticia permanentemente?";

/// Shown after a post is published.
pub const PUBLISHED_MESSAGE: &str = "Noticia publicada con éxito";

/// Which mutating call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Publish,
    Delete,
}

impl Operation {
    const fn rejection_message(self) -> &'static str {
        match self {
            Self::Publish => "Error al publicar. Verifique los campos o su sesión.",
            Self::Delete => "No se pudo eliminar la noticia. Verifique su sesión.",
        }
    }
}

/// Failures of editor operations. `Display` is the notification text.
#[derive(Debug, Error)]
pub enum EditorError {
    /// A required field is missing; nothing was sent.
    #[error("{0}")]
    Validation(#[from] DraftError),

    /// The backend refused the call (bad fields or an expired token).
    #[error("{}", .operation.rejection_message())]
    Rejected {
        operation: Operation,
        #[source]
        source: BackendError,
    },

    /// The backend could not be reached.
    #[error("Error de conexión")]
    Connection(#[source] BackendError),

    /// The editor's request scope was cancelled.
    #[error("Operación cancelada")]
    Cancelled,
}

impl EditorError {
    fn from_backend(operation: Operation, err: BackendError) -> Self {
        if err.is_rejection() {
            Self::Rejected {
                operation,
                source: err,
            }
        } else {
            Self::Connection(err)
        }
    }

    /// Error notification for the admin.
    #[must_use]
    pub fn notification(&self) -> Notification {
        Notification::error(self.to_string())
    }
}

impl From<Cancelled> for EditorError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

/// A change made on the backend. The post list is stale until reloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// A post was created; carries it when the backend echoed it back.
    Published(Option<Post>),
    /// A post was deleted.
    Deleted(PostId),
}

impl Mutation {
    /// Success notification, if the change warrants one.
    #[must_use]
    pub fn notification(&self) -> Option<Notification> {
        match self {
            Self::Published(_) => Some(Notification::success(PUBLISHED_MESSAGE)),
            Self::Deleted(_) => None,
        }
    }
}

/// Editor for one admin, holding the token it was mounted with.
///
/// Every backend call runs in the editor's [`RequestScope`]; dropping the
/// editor cancels whatever is still in flight.
#[derive(Debug)]
pub struct NewsEditor {
    backend: BackendClient,
    token: ApiToken,
    categories: Vec<Category>,
    posts: Vec<Post>,
    draft: Draft,
    scope: RequestScope,
}

impl NewsEditor {
    #[must_use]
    pub fn new(backend: BackendClient, token: ApiToken) -> Self {
        Self::with_draft(backend, token, Draft::new())
    }

    /// Resume editing a draft kept from an earlier request.
    #[must_use]
    pub fn with_draft(backend: BackendClient, token: ApiToken, draft: Draft) -> Self {
        Self {
            backend,
            token,
            categories: Vec::new(),
            posts: Vec::new(),
            draft,
            scope: RequestScope::new(),
        }
    }

    /// Load categories and posts concurrently.
    pub async fn mount(&mut self) {
        let (categories, posts) = tokio::join!(
            self.scope.run(self.backend.list_categories()),
            self.scope.run(self.backend.list_posts()),
        );
        self.apply_categories(categories);
        self.apply_posts(posts);
    }

    /// Refresh the category list. Failures are logged and keep the old list.
    pub async fn load_categories(&mut self) {
        let result = self.scope.run(self.backend.list_categories()).await;
        self.apply_categories(result);
    }

    /// Refresh the post list. Failures are logged and keep the old list.
    pub async fn load_posts(&mut self) {
        let result = self.scope.run(self.backend.list_posts()).await;
        self.apply_posts(result);
    }

    fn apply_categories(&mut self, result: Result<Result<Vec<Category>, BackendError>, Cancelled>) {
        match result {
            Ok(Ok(categories)) => {
                self.draft.track_categories(&categories);
                self.categories = categories;
            }
            Ok(Err(err)) => tracing::warn!(error = %err, "Failed to load categories"),
            Err(Cancelled) => tracing::debug!("Category load cancelled"),
        }
    }

    fn apply_posts(&mut self, result: Result<Result<Vec<Post>, BackendError>, Cancelled>) {
        match result {
            Ok(Ok(posts)) => self.posts = posts,
            Ok(Err(err)) => tracing::warn!(error = %err, "Failed to load posts"),
            Err(Cancelled) => tracing::debug!("Post load cancelled"),
        }
    }

    /// Validate and publish the draft. The draft is reset only on success.
    ///
    /// # Errors
    ///
    /// Returns `Validation` without calling the backend if a required field
    /// is empty; otherwise the backend failure, classified.
    pub async fn submit(&mut self) -> Result<Mutation, EditorError> {
        let submission = self.draft.begin_submit()?;

        let result = self
            .scope
            .run(self.backend.create_post(&submission, &self.token))
            .await;

        match result {
            Ok(Ok(created)) => {
                self.draft.finish_submit(true);
                Ok(Mutation::Published(created))
            }
            Ok(Err(err)) => {
                self.draft.finish_submit(false);
                tracing::warn!(error = %err, "Failed to publish post");
                Err(EditorError::from_backend(Operation::Publish, err))
            }
            Err(Cancelled) => {
                self.draft.finish_submit(false);
                Err(EditorError::Cancelled)
            }
        }
    }

    /// Delete a post after `confirm` agrees. Returns `None` when declined.
    ///
    /// # Errors
    ///
    /// Returns the backend failure, classified.
    pub async fn delete_post(
        &mut self,
        id: PostId,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<Option<Mutation>, EditorError> {
        if !confirm(DELETE_PROMPT) {
            return Ok(None);
        }

        self.scope
            .run(self.backend.delete_post(id, &self.token))
            .await?
            .map_err(|err| {
                tracing::warn!(post_id = %id, error = %err, "Failed to delete post");
                EditorError::from_backend(Operation::Delete, err)
            })?;

        Ok(Some(Mutation::Deleted(id)))
    }

    /// Wrap the selected content in `open`/`close`; returns the new caret position.
    pub fn insert_markup(&mut self, selection: Selection, open: &str, close: &str) -> usize {
        let edit = insert_markup(self.draft.content(), selection, open, close);
        self.draft.set_content(edit.text);
        edit.cursor
    }

    /// Apply a toolbar tag; returns the new caret position.
    pub fn apply_tag(&mut self, selection: Selection, tag: MarkupTag) -> usize {
        self.draft.apply_markup(selection, tag)
    }

    /// Discard the draft, asking `confirm` first when it has content.
    pub fn cancel_draft(&mut self, confirm: impl FnOnce(&str) -> bool) -> CancelOutcome {
        self.draft.cancel(confirm)
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    #[must_use]
    pub const fn draft(&self) -> &Draft {
        &self.draft
    }

    pub const fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    #[must_use]
    pub fn into_draft(self) -> Draft {
        self.draft
    }

    #[must_use]
    pub const fn scope(&self) -> &RequestScope {
        &self.scope
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use alamo_core::{CategoryId, DraftPhase, ImageUpload};

    use super::*;
    use crate::config::BackendConfig;

    fn editor() -> NewsEditor {
        let backend =
            BackendClient::new(&BackendConfig::new("http://127.0.0.1:9").unwrap()).unwrap();
        NewsEditor::new(backend, ApiToken::new("abc"))
    }

    fn filled(editor: &mut NewsEditor) {
        let draft = editor.draft_mut();
        draft.set_title("Acto cívico");
        draft.set_content("Lunes a las 8");
        draft.choose_category(CategoryId::new(1));
    }

    #[test]
    fn test_insert_markup_places_cursor_after_closing_tag() {
        let mut editor = editor();
        editor.draft_mut().set_content("hello");

        let cursor = editor.insert_markup(Selection::new(0, 5), "<b>", "</b>");

        assert_eq!(editor.draft().content(), "<b>hello</b>");
        assert_eq!(cursor, 12);
    }

    #[test]
    fn test_apply_tag_wraps_list() {
        let mut editor = editor();
        editor.draft_mut().set_content("uno");

        editor.apply_tag(Selection::new(0, 3), MarkupTag::List);

        assert_eq!(editor.draft().content(), "<ul><li>uno</li></ul>");
    }

    #[test]
    fn test_cancel_declined_keeps_draft() {
        let mut editor = editor();
        editor.draft_mut().set_title("Borrador");

        let outcome = editor.cancel_draft(|_| false);

        assert_eq!(outcome, CancelOutcome::Kept);
        assert_eq!(editor.draft().title(), "Borrador");
    }

    #[test]
    fn test_cancel_confirmed_resets_draft() {
        let mut editor = editor();
        editor.draft_mut().set_title("Borrador");

        let outcome = editor.cancel_draft(|prompt| {
            assert_eq!(prompt, alamo_core::DISCARD_PROMPT);
            true
        });

        assert_eq!(outcome, CancelOutcome::Discarded);
        assert!(editor.draft().is_blank());
        assert_eq!(editor.draft().phase(), DraftPhase::Empty);
    }

    #[tokio::test]
    async fn test_submit_missing_title_sends_nothing() {
        let mut editor = editor();
        editor.draft_mut().set_content("Sin título");

        let err = editor.submit().await.unwrap_err();

        assert!(matches!(err, EditorError::Validation(DraftError::MissingTitle)));
        assert_eq!(editor.draft().phase(), DraftPhase::Editing);
    }

    #[tokio::test]
    async fn test_submit_unreachable_backend_keeps_draft() {
        let mut editor = editor();
        filled(&mut editor);

        let err = editor.submit().await.unwrap_err();

        assert!(matches!(err, EditorError::Connection(_)));
        assert_eq!(err.to_string(), "Error de conexión");
        assert_eq!(editor.draft().title(), "Acto cívico");
        assert_eq!(editor.draft().phase(), DraftPhase::Editing);
    }

    #[tokio::test]
    async fn test_submit_in_cancelled_scope() {
        let mut editor = editor();
        filled(&mut editor);
        editor
            .draft_mut()
            .attach_image(ImageUpload::new("a.png", "image/png", vec![1, 2, 3]).unwrap());
        editor.scope().cancel();

        let err = editor.submit().await.unwrap_err();

        assert!(matches!(err, EditorError::Cancelled));
        assert!(editor.draft().image().is_some());
        assert_eq!(editor.draft().phase(), DraftPhase::Editing);
    }

    #[tokio::test]
    async fn test_delete_declined_does_nothing() {
        let mut editor = editor();

        let outcome = editor
            .delete_post(PostId::new(3), |prompt| {
                assert_eq!(prompt, DELETE_PROMPT);
                false
            })
            .await
            .unwrap();

        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_mount_with_unreachable_backend_leaves_lists_empty() {
        let mut editor = editor();
        editor.mount().await;

        assert!(editor.categories().is_empty());
        assert!(editor.posts().is_empty());
    }

    #[test]
    fn test_rejection_messages_follow_operation() {
        let publish = EditorError::from_backend(Operation::Publish, BackendError::Unauthorized);
        assert_eq!(
            publish.to_string(),
            "Error al publicar. Verifique los campos o su sesión."
        );

        let delete = EditorError::from_backend(Operation::Delete, BackendError::Unauthorized);
        assert_eq!(
            delete.to_string(),
            "No se pudo eliminar la noticia. Verifique su sesión."
        );
        assert!(delete.notification().is_error());
    }

    #[test]
    fn test_published_mutation_notifies() {
        let notification = Mutation::Published(None).notification().unwrap();
        assert_eq!(notification.message, PUBLISHED_MESSAGE);
        assert!(Mutation::Deleted(PostId::new(1)).notification().is_none());
    }
}

//! News editor route handlers.
//!
//! The draft lives in the session between requests. Every editor action is
//! a form post that updates the draft and redirects back to `GET /news`,
//! which re-fetches categories and posts.

use std::str::FromStr;

use alamo_core::{
    CancelOutcome, CategoryId, DISCARD_PROMPT, Draft, ImageError, ImageUpload, MarkupTag,
    Notification, Post, PostId, Selection,
};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::render;
use crate::error::AppError;
use crate::filters;
use crate::flash;
use crate::middleware::RequireToken;
use crate::news::{DELETE_PROMPT, NewsEditor};
use crate::session::{ApiToken, StoreError, keys};
use crate::state::AppState;

/// Build the news router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/news", get(index).post(edit))
        .route("/news/{id}/delete", post(delete))
}

// =============================================================================
// Templates
// =============================================================================

/// Editor page template.
#[derive(Template)]
#[template(path = "news/index.html")]
struct NewsIndexTemplate {
    current_path: String,
    notifications: Vec<Notification>,
    categories: Vec<CategoryOption>,
    posts: Vec<PostRow>,
    title: String,
    content: String,
    image: Option<ImagePreview>,
    toolbar: Vec<ToolbarButton>,
    cursor: Option<usize>,
    confirm_discard: bool,
    discard_prompt: &'static str,
    delete_prompt: &'static str,
}

/// Delete confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "news/confirm_delete.html")]
struct ConfirmDeleteTemplate {
    current_path: String,
    notifications: Vec<Notification>,
    post_id: PostId,
    post_title: Option<String>,
    prompt: &'static str,
}

/// Category `<option>` for the editor.
struct CategoryOption {
    id: CategoryId,
    name: String,
    selected: bool,
}

/// A row in the published posts list.
struct PostRow {
    id: PostId,
    title: String,
    category: String,
    published: String,
    content: String,
}

impl From<&Post> for PostRow {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            category: post.category_label().to_string(),
            published: post.published_on_display(),
            content: post.content.clone(),
        }
    }
}

/// Cover image preview embedded as a data URL.
struct ImagePreview {
    file_name: String,
    data_url: String,
}

/// A formatting button above the content field.
struct ToolbarButton {
    action: &'static str,
    label: &'static str,
}

impl NewsIndexTemplate {
    fn new(editor: &NewsEditor, notifications: Vec<Notification>, query: EditorQuery) -> Self {
        let draft = editor.draft();
        Self {
            current_path: "/news".to_string(),
            notifications,
            categories: editor
                .categories()
                .iter()
                .map(|category| CategoryOption {
                    id: category.id,
                    name: category.name.clone(),
                    selected: draft.category() == Some(category.id),
                })
                .collect(),
            posts: editor.posts().iter().map(PostRow::from).collect(),
            title: draft.title().to_string(),
            content: draft.content().to_string(),
            image: draft.image().map(|image| ImagePreview {
                file_name: image.file_name().to_string(),
                data_url: image.data_url(),
            }),
            toolbar: MarkupTag::ALL
                .iter()
                .map(|tag| ToolbarButton {
                    action: tag.as_str(),
                    label: tag.label(),
                })
                .collect(),
            cursor: query.cursor,
            confirm_discard: query.confirm.as_deref() == Some("discard"),
            discard_prompt: DISCARD_PROMPT,
            delete_prompt: DELETE_PROMPT,
        }
    }
}

// =============================================================================
// Request Types
// =============================================================================

/// Query parameters for the editor page.
#[derive(Debug, Default, Deserialize)]
pub struct EditorQuery {
    /// Caret position to restore in the content field, in characters.
    cursor: Option<usize>,
    /// `discard` asks the admin to confirm dropping the draft.
    confirm: Option<String>,
}

/// Form data for deleting a post.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    confirmed: Option<String>,
}

/// What the editor form asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditorAction {
    Publish,
    Markup(MarkupTag),
    RemoveImage,
    Cancel,
}

impl FromStr for EditorAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "publish" => Ok(Self::Publish),
            "remove_image" => Ok(Self::RemoveImage),
            "cancel" => Ok(Self::Cancel),
            other => MarkupTag::from_str(other)
                .map(Self::Markup)
                .map_err(|e| AppError::BadRequest(e.to_string())),
        }
    }
}

/// An uploaded file before it is checked.
struct ImageField {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// The multipart editor form. Absent fields leave the stored draft as is.
#[derive(Default)]
struct EditorForm {
    action: Option<String>,
    title: Option<String>,
    content: Option<String>,
    category: Option<String>,
    image: Option<ImageField>,
    selection_start: Option<usize>,
    selection_end: Option<usize>,
    confirmed: bool,
}

impl EditorForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "imagen" => {
                    let file_name = field.file_name().unwrap_or("imagen").to_string();
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field.bytes().await?;
                    // Browsers send an empty part when no file was picked
                    if !bytes.is_empty() {
                        form.image = Some(ImageField {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                "titulo" => form.title = Some(field.text().await?),
                "contenido" => form.content = Some(normalize_newlines(&field.text().await?)),
                "categoria" => form.category = Some(field.text().await?),
                "action" => form.action = Some(field.text().await?),
                "selection_start" => form.selection_start = field.text().await?.trim().parse().ok(),
                "selection_end" => form.selection_end = field.text().await?.trim().parse().ok(),
                "confirmed" => form.confirmed = field.text().await?.trim() == "true",
                _ => {}
            }
        }

        Ok(form)
    }

    fn selection(&self, content: &str) -> Selection {
        let end_of_text = content.chars().count();
        let start = self.selection_start.unwrap_or(end_of_text);
        let end = self.selection_end.unwrap_or(start);
        Selection::new(start, end)
    }

    /// Copy submitted fields into the draft; returns a notification if the
    /// uploaded file was refused.
    fn apply_to(&mut self, draft: &mut Draft) -> Option<Notification> {
        if let Some(title) = self.title.take().filter(|title| title != draft.title()) {
            draft.set_title(title);
        }
        if let Some(content) = self.content.take().filter(|content| content != draft.content()) {
            draft.set_content(content);
        }
        if let Some(category) = self
            .category
            .as_deref()
            .and_then(|raw| CategoryId::from_str(raw).ok())
            .filter(|category| draft.category() != Some(*category))
        {
            draft.choose_category(category);
        }

        let field = self.image.take()?;
        match ImageUpload::new(field.file_name, field.content_type, field.bytes) {
            Ok(image) => {
                draft.attach_image(image);
                None
            }
            Err(ImageError::NotAnImage(content_type)) => {
                tracing::debug!(%content_type, "Rejected non-image upload");
                Some(Notification::error(
                    "El archivo seleccionado no es una imagen.",
                ))
            }
            Err(ImageError::Empty) => None,
        }
    }
}

/// Browsers submit textarea content with CRLF line breaks.
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

// =============================================================================
// Draft Storage
// =============================================================================

async fn load_draft(session: &Session) -> Result<Draft, StoreError> {
    Ok(session
        .get::<Draft>(keys::NEWS_DRAFT)
        .await?
        .unwrap_or_default())
}

async fn save_draft(session: &Session, draft: &Draft) -> Result<(), StoreError> {
    session.insert(keys::NEWS_DRAFT, draft).await?;
    Ok(())
}

fn editor(state: &AppState, token: ApiToken, draft: Draft) -> NewsEditor {
    NewsEditor::with_draft(state.backend().clone(), token, draft)
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Editor page with categories, published posts and the stored draft.
///
/// GET /news
#[instrument(skip_all)]
async fn index(
    State(state): State<AppState>,
    RequireToken(token): RequireToken,
    session: Session,
    Query(query): Query<EditorQuery>,
) -> Result<Response, AppError> {
    let mut editor = editor(&state, token, load_draft(&session).await?);
    editor.mount().await;

    // Mounting may have picked the default category
    save_draft(&session, editor.draft()).await?;

    let notifications = flash::take(&session).await?;
    let template = NewsIndexTemplate::new(&editor, notifications, query);

    Ok(render(&template).into_response())
}

/// Apply an editor action to the stored draft.
///
/// POST /news
#[instrument(skip_all)]
async fn edit(
    State(state): State<AppState>,
    RequireToken(token): RequireToken,
    session: Session,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let mut form = EditorForm::read(multipart).await?;
    let action = form
        .action
        .as_deref()
        .unwrap_or("publish")
        .parse::<EditorAction>()?;

    let mut draft = load_draft(&session).await?;
    if let Some(notification) = form.apply_to(&mut draft) {
        flash::push(&session, notification).await?;
    }

    let mut editor = editor(&state, token, draft);
    let location = match action {
        EditorAction::Publish => {
            match editor.submit().await {
                Ok(mutation) => {
                    if let Some(notification) = mutation.notification() {
                        flash::push(&session, notification).await?;
                    }
                }
                Err(err) => flash::push(&session, err.notification()).await?,
            }
            "/news".to_string()
        }
        EditorAction::Markup(tag) => {
            let selection = form.selection(editor.draft().content());
            let cursor = editor.apply_tag(selection, tag);
            format!("/news?cursor={cursor}")
        }
        EditorAction::RemoveImage => {
            editor.draft_mut().remove_image();
            "/news".to_string()
        }
        EditorAction::Cancel => match editor.cancel_draft(|_| form.confirmed) {
            CancelOutcome::Discarded => "/news".to_string(),
            CancelOutcome::Kept => "/news?confirm=discard".to_string(),
        },
    };

    save_draft(&session, editor.draft()).await?;
    Ok(Redirect::to(&location).into_response())
}

/// Ask for confirmation, then delete a post.
///
/// POST /news/{id}/delete
#[instrument(skip_all)]
async fn delete(
    State(state): State<AppState>,
    RequireToken(token): RequireToken,
    session: Session,
    Path(id): Path<PostId>,
    Form(form): Form<DeleteForm>,
) -> Result<Response, AppError> {
    let confirmed = form.confirmed.as_deref() == Some("true");
    let mut editor = editor(&state, token, Draft::new());

    if !confirmed {
        editor.load_posts().await;
        let post_title = editor
            .posts()
            .iter()
            .find(|post| post.id == id)
            .map(|post| post.title.clone());

        let template = ConfirmDeleteTemplate {
            current_path: "/news".to_string(),
            notifications: Vec::new(),
            post_id: id,
            post_title,
            prompt: DELETE_PROMPT,
        };
        return Ok(template.into_response());
    }

    match editor.delete_post(id, |_| true).await {
        Ok(mutation) => {
            if let Some(notification) = mutation.and_then(|m| m.notification()) {
                flash::push(&session, notification).await?;
            }
        }
        Err(err) => flash::push(&session, err.notification()).await?,
    }

    Ok(Redirect::to("/news").into_response())
}

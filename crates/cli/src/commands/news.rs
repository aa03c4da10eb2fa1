//! News commands: list, categories, publish and delete.

use std::path::{Path, PathBuf};

use alamo_admin::news::{Mutation, NewsEditor};
use alamo_core::{CategoryId, ImageUpload, Notification, Post, PostId};

use super::{CliError, Context, confirm};

/// A post described on the command line.
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category: Option<i64>,
    pub image: Option<PathBuf>,
}

/// Print every published post.
///
/// # Errors
///
/// Returns error if the backend cannot be reached.
pub async fn list(ctx: &Context) -> Result<(), CliError> {
    let posts = ctx.backend()?.list_posts().await?;
    print_posts(&posts);
    Ok(())
}

/// Print every category.
///
/// # Errors
///
/// Returns error if the backend cannot be reached.
#[allow(clippy::print_stdout)]
pub async fn categories(ctx: &Context) -> Result<(), CliError> {
    let categories = ctx.backend()?.list_categories().await?;
    for category in &categories {
        println!("{:>5}  {}", category.id.as_i64(), category.name);
    }
    Ok(())
}

/// Publish a post, then print the refreshed list.
///
/// # Errors
///
/// Returns error if no token is saved, the image is unreadable, or the
/// editor refuses or fails the submission.
pub async fn publish(ctx: &Context, post: NewPost) -> Result<(), CliError> {
    let token = ctx.token().await?;
    let mut editor = NewsEditor::new(ctx.backend()?, token);
    editor.load_categories().await;

    let draft = editor.draft_mut();
    draft.set_title(post.title);
    draft.set_content(post.content);
    if let Some(category) = post.category {
        draft.choose_category(CategoryId::new(category));
    }
    if let Some(path) = post.image {
        let image = read_image(&path).await?;
        draft.attach_image(image);
    }

    let mutation = editor.submit().await?;
    report(mutation.notification());
    if let Mutation::Published(Some(created)) = &mutation {
        tracing::info!(post_id = %created.id, "Post published");
    }

    editor.load_posts().await;
    print_posts(editor.posts());
    Ok(())
}

/// Delete a post, asking first unless `yes` is set.
///
/// # Errors
///
/// Returns error if no token is saved or the backend refuses the delete.
pub async fn delete(ctx: &Context, id: i64, yes: bool) -> Result<(), CliError> {
    let token = ctx.token().await?;
    let mut editor = NewsEditor::new(ctx.backend()?, token);

    let id = PostId::new(id);
    match editor.delete_post(id, |question| yes || confirm(question)).await? {
        Some(mutation) => {
            report(mutation.notification());
            tracing::info!(post_id = %id, "Post deleted");
        }
        None => tracing::info!("Cancelled"),
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_posts(posts: &[Post]) {
    if posts.is_empty() {
        println!("No hay noticias publicadas.");
        return;
    }
    for post in posts {
        println!(
            "{:>5}  {:<10}  {:<12}  {}",
            post.id.as_i64(),
            post.published_on_display(),
            post.category_label(),
            post.title
        );
    }
}

#[allow(clippy::print_stdout)]
fn report(notification: Option<Notification>) {
    if let Some(notification) = notification {
        println!("{}", notification.message);
    }
}

/// The post body from `--content`, or else from `--content-file`.
///
/// # Errors
///
/// Returns `CliError::MissingContent` when neither is given, or the read error.
pub async fn read_content(content: Option<String>, file: Option<PathBuf>) -> Result<String, CliError> {
    match (content, file) {
        (Some(content), _) => Ok(content),
        (None, Some(path)) => Ok(tokio::fs::read_to_string(path).await?),
        (None, None) => Err(CliError::MissingContent),
    }
}

async fn read_image(path: &Path) -> Result<ImageUpload, CliError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map_or_else(|| "imagen".to_string(), |name| name.to_string_lossy().into_owned());

    ImageUpload::new(file_name, content_type_for(path), bytes).map_err(|source| CliError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Guess the image content type from the file extension.
fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use alamo_admin::session::{ApiToken, TokenStore};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn logged_in(server: &MockServer, dir: &tempfile::TempDir) -> Context {
        let ctx = Context::new(Some(server.uri()), dir.path().join("session"));
        ctx.store().set_token(&ApiToken::new("abc")).await.unwrap();
        ctx
    }

    #[tokio::test]
    async fn test_publish_uses_first_category_and_reloads_posts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/categorias/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": 3, "nombre": "Eventos"}])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/noticias/"))
            .and(header("authorization", "Token abc"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9, "titulo": "Aviso"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/noticias/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": 9, "titulo": "Aviso"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let ctx = logged_in(&server, &dir).await;
        let post = NewPost {
            title: "Aviso".to_string(),
            content: "Sin clases el viernes".to_string(),
            category: None,
            image: None,
        };

        publish(&ctx, post).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let created = requests
            .iter()
            .find(|r| r.method.as_str() == "POST")
            .unwrap();
        let body = String::from_utf8_lossy(&created.body);
        assert!(body.contains("name=\"categoria\"\r\n\r\n3"));
    }

    #[tokio::test]
    async fn test_publish_requires_login() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(Some(server.uri()), dir.path().join("session"));
        let post = NewPost {
            title: "Aviso".to_string(),
            content: "Texto".to_string(),
            category: Some(1),
            image: None,
        };

        assert!(matches!(publish(&ctx, post).await, Err(CliError::NotLoggedIn)));
    }

    #[tokio::test]
    async fn test_read_content_prefers_inline_text() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("aviso.html");
        std::fs::write(&file, "<p>Desde archivo</p>").unwrap();

        let inline = read_content(Some("En línea".to_string()), Some(file.clone())).await.unwrap();
        assert_eq!(inline, "En línea");

        let from_file = read_content(None, Some(file)).await.unwrap();
        assert_eq!(from_file, "<p>Desde archivo</p>");

        assert!(matches!(read_content(None, None).await, Err(CliError::MissingContent)));
        assert!(matches!(
            read_content(None, Some(dir.path().join("falta.html"))).await,
            Err(CliError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_with_yes_skips_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/noticias/9/"))
            .and(header("authorization", "Token abc"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let ctx = logged_in(&server, &dir).await;

        delete(&ctx, 9, true).await.unwrap();
    }

    #[test]
    fn test_content_type_for_known_extensions() {
        assert_eq!(content_type_for(Path::new("portada.PNG")), "image/png");
        assert_eq!(content_type_for(Path::new("a/b/foto.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("foto.jpg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("anim.gif")), "image/gif");
    }

    #[test]
    fn test_content_type_for_unknown_is_not_an_image() {
        assert_eq!(content_type_for(Path::new("notas.txt")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("sin_extension")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_read_image_rejects_non_image_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notas.txt");
        std::fs::write(&path, b"hola").unwrap();

        let err = read_image(&path).await.unwrap_err();
        assert!(matches!(err, CliError::Image { .. }));
    }

    #[tokio::test]
    async fn test_read_image_keeps_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portada.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let image = read_image(&path).await.unwrap();
        assert_eq!(image.file_name(), "portada.png");
        assert_eq!(image.content_type(), "image/png");
    }
}

//! News and category endpoints.

use alamo_core::{Category, Post, PostId, Submission};
use reqwest::multipart::{Form, Part};

use super::{BackendClient, BackendError};
use crate::session::ApiToken;

impl BackendClient {
    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a category list.
    pub async fn list_categories(&self) -> Result<Vec<Category>, BackendError> {
        self.get_json("api/categorias/").await
    }

    /// List all posts, in backend order.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a post list.
    pub async fn list_posts(&self) -> Result<Vec<Post>, BackendError> {
        self.get_json("api/noticias/").await
    }

    /// Create a post from a validated draft.
    ///
    /// Returns the created post when the backend echoes it back as JSON.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects the post.
    pub async fn create_post(
        &self,
        submission: &Submission,
        token: &ApiToken,
    ) -> Result<Option<Post>, BackendError> {
        let url = self.endpoint("api/noticias/")?;
        let form = multipart_form(submission)?;

        let response = self
            .http()
            .post(url)
            .header(reqwest::header::AUTHORIZATION, token.authorization())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::parse_error(response).await);
        }

        let body = response.text().await?;
        let created = serde_json::from_str::<Post>(&body).ok();
        tracing::info!(
            post_id = ?created.as_ref().map(|post| post.id),
            title = %submission.title,
            "Created post"
        );
        Ok(created)
    }

    /// Delete a post by id.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend refuses the delete.
    pub async fn delete_post(&self, id: PostId, token: &ApiToken) -> Result<(), BackendError> {
        self.delete(&format!("api/noticias/{id}/"), token).await?;
        tracing::info!(post_id = %id, "Deleted post");
        Ok(())
    }
}

/// Build the multipart body: `titulo`, `contenido`, `categoria`, optional `imagen`.
fn multipart_form(submission: &Submission) -> Result<Form, BackendError> {
    let mut form = Form::new()
        .text("titulo", submission.title.clone())
        .text("contenido", submission.content.clone())
        .text("categoria", submission.category.to_string());

    if let Some(image) = &submission.image {
        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.content_type())?;
        form = form.part("imagen", part);
    }

    Ok(form)
}

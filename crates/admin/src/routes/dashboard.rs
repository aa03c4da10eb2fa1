//! Dashboard route handler: the login-or-shell decision at `/`.

use alamo_core::Notification;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};

use super::auth::login_page;
use crate::error::AppError;
use crate::filters;
use crate::flash;
use crate::middleware::AdminSession;
use crate::session::View;
use crate::state::AppState;

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    current_path: String,
    notifications: Vec<Notification>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// Login form when logged out, otherwise the dashboard shell.
///
/// GET /
async fn index(
    State(state): State<AppState>,
    AdminSession { controller, session }: AdminSession,
) -> Result<Response, AppError> {
    match controller.view() {
        View::LoginForm => Ok(login_page(&state, None, String::new()).into_response()),
        View::Shell(_) => {
            let template = DashboardTemplate {
                current_path: "/".to_string(),
                notifications: flash::take(&session).await?,
            };
            Ok(template.into_response())
        }
    }
}

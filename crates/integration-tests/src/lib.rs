//! Integration tests for the Álamo admin panel.
//!
//! Every test runs against a [`wiremock`] stand-in for the school backend, so
//! no real server or credentials are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p alamo-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_controller` - Login and logout against the token endpoint
//! - `news_editor` - Listing, publishing and deleting posts
//! - `file_token_store` - Token persistence for the CLI
//! - `admin_routes` - The panel served over HTTP, driven by a cookie client

use alamo_admin::backend::BackendClient;
use alamo_admin::config::{AdminConfig, BackendConfig};
use alamo_admin::state::AppState;
use serde_json::{Value, json};
use wiremock::MockServer;

/// Token handed out by the mocked backend.
pub const TEST_TOKEN: &str = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b";

/// Backend client pointed at a mock server.
///
/// # Panics
///
/// Panics if the mock server URI is not a valid backend URL.
#[must_use]
pub fn backend_for(server: &MockServer) -> BackendClient {
    let config = BackendConfig::new(&server.uri()).expect("mock server URI is a valid URL");
    BackendClient::new(&config).expect("Failed to create backend client")
}

/// Start the admin panel on an ephemeral port; returns its base URL.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn spawn_admin(server: &MockServer) -> String {
    let backend = BackendConfig::new(&server.uri()).expect("mock server URI is a valid URL");
    let state = AppState::new(AdminConfig::local(backend)).expect("Failed to build app state");
    let app = alamo_admin::app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Test server stopped");
        }
    });

    format!("http://{addr}")
}

/// Browser-like client that keeps the session cookie and does not follow redirects.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Categories as the backend lists them.
#[must_use]
pub fn categories_json() -> Value {
    json!([
        {"id": 1, "nombre": "Eventos"},
        {"id": 2, "nombre": "Académico"}
    ])
}

/// Posts as the backend lists them.
#[must_use]
pub fn posts_json() -> Value {
    json!([
        {
            "id": 12,
            "titulo": "Inicio de Inscripciones",
            "contenido": "<b>Atención</b> representantes",
            "categoria": 2,
            "categoria_nombre": "Académico",
            "fecha_publicacion": "2024-09-02T08:30:00-04:00",
            "imagen": null
        },
        {
            "id": 7,
            "titulo": "Acto cívico",
            "contenido": "Lunes a las 8",
            "categoria": null,
            "categoria_nombre": null,
            "fecha_publicacion": "2024-08-15",
            "imagen": "/media/noticias/acto.jpg"
        }
    ])
}

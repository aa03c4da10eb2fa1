//! The admin panel served over HTTP, driven like a browser.

use alamo_integration_tests::{TEST_TOKEN, browser, categories_json, posts_json, spawn_admin};
use reqwest::{Client, StatusCode, header};
use serde_json::json;
use wiremock::matchers::{header as header_matcher, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api-token-auth/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": TEST_TOKEN})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categorias/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_json()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/noticias/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts_json()))
        .mount(&server)
        .await;
    server
}

async fn logged_in(base: &str) -> Client {
    let client = browser();
    let resp = client
        .post(format!("{base}/login"))
        .form(&[("username", "directora"), ("password", "secreta")])
        .send()
        .await
        .expect("login request");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    client
}

async fn post_listings(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .expect("recording enabled")
        .iter()
        .filter(|r| r.method.as_str() == "GET" && r.url.path() == "/api/noticias/")
        .count()
}

fn location(resp: &reqwest::Response) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_health() {
    let server = backend().await;
    let base = spawn_admin(&server).await;

    let resp = browser()
        .get(format!("{base}/health"))
        .send()
        .await
        .expect("health request");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(
        resp.headers()
            .get("x-frame-options")
            .and_then(|v| v.to_str().ok()),
        Some("DENY")
    );
    assert_eq!(resp.text().await.expect("body"), "ok");

    let ready = browser()
        .get(format!("{base}/health/ready"))
        .send()
        .await
        .expect("readiness request");
    assert_eq!(ready.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_root_shows_login_form_when_logged_out() {
    let server = backend().await;
    let base = spawn_admin(&server).await;

    let resp = browser().get(format!("{base}/")).send().await.expect("request");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains("Acceso Administrativo"));
    assert!(!body.contains("Cerrar Sesión"));
    assert!(body.contains("Volver a la página principal"));
    assert!(body.contains("localhost:3000"));
}

#[tokio::test]
async fn test_news_requires_login() {
    let server = backend().await;
    let base = spawn_admin(&server).await;

    let resp = browser().get(format!("{base}/news")).send().await.expect("request");

    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/");
}

#[tokio::test]
async fn test_refused_login_rerenders_form_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api-token-auth/"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;
    let base = spawn_admin(&server).await;

    let resp = browser()
        .post(format!("{base}/login"))
        .form(&[("username", "directora"), ("password", "equivocada")])
        .send()
        .await
        .expect("login request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = resp.text().await.expect("body");
    assert!(body.contains("Credenciales incorrectas. Verifique usuario y contraseña."));
    assert!(body.contains("value=\"directora\""));
}

#[tokio::test]
async fn test_login_then_logout() {
    let server = backend().await;
    let base = spawn_admin(&server).await;
    let client = logged_in(&base).await;

    let shell = client.get(format!("{base}/")).send().await.expect("request");
    let body = shell.text().await.expect("body");
    assert!(body.contains("Cerrar Sesión"));
    assert!(body.contains("Noticias y Anuncios"));

    let resp = client
        .post(format!("{base}/logout"))
        .send()
        .await
        .expect("logout request");
    assert_eq!(location(&resp), "/");

    let after = client.get(format!("{base}/news")).send().await.expect("request");
    assert!(after.status().is_redirection());
}

#[tokio::test]
async fn test_news_page_lists_posts_and_categories() {
    let server = backend().await;
    let base = spawn_admin(&server).await;
    let client = logged_in(&base).await;

    let resp = client.get(format!("{base}/news")).send().await.expect("request");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains("Inicio de Inscripciones"));
    assert!(body.contains("02/09/2024"));
    assert!(body.contains("Académico"));
    assert!(body.contains("Eventos"));
}

#[tokio::test]
async fn test_publish_from_form_notifies_and_clears_draft() {
    let server = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/noticias/"))
        .and(header_matcher("authorization", format!("Token {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 13, "titulo": "Acto de grado"})))
        .expect(1)
        .mount(&server)
        .await;
    let base = spawn_admin(&server).await;
    let client = logged_in(&base).await;

    // Mounting the editor picks the default category
    client.get(format!("{base}/news")).send().await.expect("request");
    let listed_before = post_listings(&server).await;

    let form = reqwest::multipart::Form::new()
        .text("action", "publish")
        .text("titulo", "Acto de grado")
        .text("contenido", "Viernes\r\na las 9")
        .text("categoria", "1");
    let resp = client
        .post(format!("{base}/news"))
        .multipart(form)
        .send()
        .await
        .expect("publish request");
    assert_eq!(location(&resp), "/news");

    let page = client.get(format!("{base}/news")).send().await.expect("request");
    let body = page.text().await.expect("body");
    assert!(body.contains("Noticia publicada con éxito"));
    assert!(!body.contains("value=\"Acto de grado\""));
    assert_eq!(post_listings(&server).await, listed_before + 1);

    // Notifications are shown once
    let again = client.get(format!("{base}/news")).send().await.expect("request");
    assert!(!again.text().await.expect("body").contains("Noticia publicada con éxito"));
}

#[tokio::test]
async fn test_publish_missing_fields_keeps_draft() {
    let server = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/noticias/"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let base = spawn_admin(&server).await;
    let client = logged_in(&base).await;

    let form = reqwest::multipart::Form::new()
        .text("action", "publish")
        .text("titulo", "Solo título")
        .text("contenido", "");
    client
        .post(format!("{base}/news"))
        .multipart(form)
        .send()
        .await
        .expect("publish request");

    let body = client
        .get(format!("{base}/news"))
        .send()
        .await
        .expect("request")
        .text()
        .await
        .expect("body");
    assert!(body.contains("value=\"Solo título\""));
    assert!(body.contains("notification-error"));
}

#[tokio::test]
async fn test_markup_action_wraps_selection() {
    let server = backend().await;
    let base = spawn_admin(&server).await;
    let client = logged_in(&base).await;

    let form = reqwest::multipart::Form::new()
        .text("action", "bold")
        .text("contenido", "hola mundo")
        .text("selection_start", "0")
        .text("selection_end", "4");
    let resp = client
        .post(format!("{base}/news"))
        .multipart(form)
        .send()
        .await
        .expect("markup request");
    assert_eq!(location(&resp), "/news?cursor=11");

    let body = client
        .get(format!("{base}/news?cursor=11"))
        .send()
        .await
        .expect("request")
        .text()
        .await
        .expect("body");
    assert!(body.contains("data-cursor=\"11\""));
    assert!(body.contains("&lt;b&gt;hola") || body.contains("&#60;b&#62;hola"));
}

#[tokio::test]
async fn test_delete_asks_before_calling_backend() {
    let server = backend().await;
    Mock::given(method("DELETE"))
        .and(path("/api/noticias/12/"))
        .and(header_matcher("authorization", format!("Token {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let base = spawn_admin(&server).await;
    let client = logged_in(&base).await;

    let ask = client
        .post(format!("{base}/news/12/delete"))
        .form(&[("confirmed", "false")])
        .send()
        .await
        .expect("delete request");
    assert_eq!(ask.status(), StatusCode::OK);
    let body = ask.text().await.expect("body");
    assert!(body.contains("¿Estás seguro de eliminar esta noticia permanentemente?"));
    assert!(body.contains("Inicio de Inscripciones"));

    let confirmed = client
        .post(format!("{base}/news/12/delete"))
        .form(&[("confirmed", "true")])
        .send()
        .await
        .expect("delete request");
    assert_eq!(location(&confirmed), "/news");
}

async fn page(client: &Client, url: String) -> String {
    client
        .get(url)
        .send()
        .await
        .expect("request")
        .text()
        .await
        .expect("body")
}

#[tokio::test]
async fn test_cancel_asks_before_discarding_draft() {
    let server = backend().await;
    let base = spawn_admin(&server).await;
    let client = logged_in(&base).await;

    let form = reqwest::multipart::Form::new()
        .text("action", "cancel")
        .text("titulo", "Borrador")
        .text("contenido", "Texto a medias")
        .text("confirmed", "false");
    let kept = client
        .post(format!("{base}/news"))
        .multipart(form)
        .send()
        .await
        .expect("cancel request");
    assert_eq!(location(&kept), "/news?confirm=discard");

    let body = page(&client, format!("{base}/news?confirm=discard")).await;
    assert!(body.contains("role=\"alertdialog\""));
    assert!(body.contains("¿Descartar los cambios actuales?"));
    assert!(body.contains("value=\"Borrador\""));

    let form = reqwest::multipart::Form::new()
        .text("action", "cancel")
        .text("confirmed", "true");
    let discarded = client
        .post(format!("{base}/news"))
        .multipart(form)
        .send()
        .await
        .expect("cancel request");
    assert_eq!(location(&discarded), "/news");

    let body = page(&client, format!("{base}/news")).await;
    assert!(!body.contains("role=\"alertdialog\""));
    assert!(!body.contains("value=\"Borrador\""));
    assert!(!body.contains("Texto a medias"));
}

#[tokio::test]
async fn test_remove_image_keeps_rest_of_draft() {
    let server = backend().await;
    let base = spawn_admin(&server).await;
    let client = logged_in(&base).await;

    let image = reqwest::multipart::Part::bytes(vec![0x89, b'P', b'N', b'G'])
        .file_name("portada.png")
        .mime_str("image/png")
        .expect("valid mime");
    let form = reqwest::multipart::Form::new()
        .text("action", "cancel")
        .text("confirmed", "false")
        .text("titulo", "Con portada")
        .part("imagen", image);
    client
        .post(format!("{base}/news"))
        .multipart(form)
        .send()
        .await
        .expect("upload request");

    let body = page(&client, format!("{base}/news")).await;
    assert!(body.contains("alt=\"Vista previa\""));

    let form = reqwest::multipart::Form::new().text("action", "remove_image");
    let resp = client
        .post(format!("{base}/news"))
        .multipart(form)
        .send()
        .await
        .expect("remove request");
    assert_eq!(location(&resp), "/news");

    let body = page(&client, format!("{base}/news")).await;
    assert!(!body.contains("alt=\"Vista previa\""));
    assert!(body.contains("value=\"Con portada\""));
}

mod common;

use reqwest::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn mensagem_then_correio_shows_up_on_display() {
    let app = TestApp::spawn().await;

    let empty = app.get_json("/api/mensagens").await;
    assert_eq!(empty["status"], json!(false));
    assert_eq!(empty["error"], json!("no records"));
    assert_eq!(empty["data"], json!(null));

    let page = app
        .post_form("/mensagens", &[("path", "foto1.png"), ("description", "abraço")])
        .await;
    assert!(page.contains("record inserted"), "{page}");
    assert!(page.contains("<code>foto1.png</code>"));

    let mensagens = app.get_json("/api/mensagens").await;
    assert_eq!(mensagens["status"], json!(true));
    let table = mensagens["data"].as_object().unwrap();
    assert_eq!(table.len(), 1);
    let (id, mensagem) = table.iter().next().unwrap();
    assert_eq!(mensagem["id"], json!(id));
    assert_eq!(mensagem["path"], json!("foto1.png"));

    let page = app
        .post_form("/", &[("de", ""), ("para", "Maria"), ("mensagem", id.as_str())])
        .await;
    assert!(page.contains("record inserted"), "{page}");

    let correios = app.get_json("/api/correios").await;
    assert_eq!(correios["status"], json!(true));
    let list = correios["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["de"], json!(""));
    assert_eq!(list[0]["para"], json!("Maria"));
    assert_eq!(list[0]["mensagem"], json!(id));

    let display = app.get("/display").await.text().await.unwrap();
    assert!(display.contains("Para: Maria"));
    assert!(display.contains("/static/img/foto1.png"));
    assert!(!display.contains("De:"));
    assert!(!display.contains("mensagem-ausente"));
    assert!(display.contains("Responsável: Fábrica do Futuro"));
}

#[tokio::test]
async fn registering_the_same_path_twice_keeps_one_mensagem() {
    let app = TestApp::spawn().await;

    app.post_form("/mensagens", &[("path", "foto1.png"), ("description", "abraço")])
        .await;
    let page = app
        .post_form("/mensagens", &[("path", "foto1.png"), ("description", "beijo")])
        .await;

    assert!(page.contains("record already present"), "{page}");
    let mensagens = app.get_json("/api/mensagens").await;
    assert_eq!(mensagens["data"].as_object().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_correio_is_rejected_inline() {
    let app = TestApp::spawn().await;
    app.post_form("/mensagens", &[("path", "foto1.png"), ("description", "abraço")])
        .await;

    let page = app
        .post_form("/", &[("de", "João"), ("para", " "), ("mensagem", "bogus")])
        .await;

    assert!(page.contains("field-error"), "{page}");
    assert!(page.contains(r#"value="João""#));

    let correios = app.get_json("/api/correios").await;
    assert_eq!(correios["status"], json!(false));
}

#[tokio::test]
async fn user_text_is_escaped() {
    let app = TestApp::spawn().await;

    let page = app
        .post_form(
            "/mensagens",
            &[("path", "x.png"), ("description", "<script>alert(1)</script>")],
        )
        .await;

    assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!page.contains("<script>alert(1)"));
}

#[tokio::test]
async fn unknown_routes_get_the_quedelhe_page() {
    let app = TestApp::spawn().await;

    for path in ["/quedelhe", "/nao/existe"] {
        let response = app.get(path).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.text().await.unwrap().contains("Que-de-lhe?"));
    }
}

#[tokio::test]
async fn display_script_is_served() {
    let app = TestApp::spawn().await;

    let response = app.get("/static/correio.js").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[reqwest::header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/javascript")
    );
    assert!(response.text().await.unwrap().contains("/api/correios"));
}

#[tokio::test]
async fn empty_form_page_points_at_mensagens() {
    let app = TestApp::spawn().await;

    let page = app.get("/").await.text().await.unwrap();

    assert!(page.contains("Nenhuma mensagem cadastrada"));
    assert!(page.contains("no records"));
}

use axum::{debug_handler, http::{StatusCode, header}, response::{Html, IntoResponse}};

use crate::{Markdown, Site, outcome::Outcome};

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

/// Escapes text for use inside HTML elements and quoted attributes. Braces
/// are escaped too so user text never looks like a template placeholder.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '{' => escaped.push_str("&#123;"),
            '}' => escaped.push_str("&#125;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wraps `body` in the site layout. `body` must already be escaped.
pub fn page(site: &Site, title: &str, body: &str) -> Html<String> {
    Html(
        include_res!(str, "/pages/layout.html")
            .replace("{title}", &escape(title))
            .replace("{responsavel}", &escape(&site.responsavel))
            .replace("{body}", body),
    )
}

/// Alert box for a repository outcome: the message on success, the error
/// and its detail on failure.
pub fn notice<T>(outcome: &Outcome<T>) -> String {
    match outcome {
        Ok(success) => include_res!(str, "/pages/notice.html")
            .replace("{kind}", "info")
            .replace("{exception}", "")
            .replace("{message}", &escape(&success.message)),
        Err(failure) => include_res!(str, "/pages/notice.html")
            .replace("{kind}", "danger")
            .replace(
                "{exception}",
                &failure
                    .exception
                    .as_deref()
                    .map(|e| format!("<pre>{}</pre>", escape(e)))
                    .unwrap_or_default(),
            )
            .replace("{message}", &escape(&failure.message)),
    }
}

#[debug_handler]
pub async fn quedelhe() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Markdown(include_res!(str, "/pages/quedelhe.md")))
}

#[debug_handler]
pub async fn display_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        include_res!(str, "/static/correio.js"),
    )
}

#[debug_handler]
pub async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        include_res!(str, "/static/correio.css"),
    )
}

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::include_res;

pub type AppResult<T> = Result<T, AppError>;

/// Unexpected failure inside a page handler. The cause and its backtrace go
/// to the log; the browser only gets a short apology in the notice box.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, backtrace = %self.0.backtrace(), "page failed to render");
        let body = include_res!(str, "/pages/notice.html")
            .replace("{kind}", "danger")
            .replace("{exception}", "")
            .replace("{message}", "Não foi possível montar esta página. Tente de novo.");
        (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failure_page_hides_the_cause() {
        let err = AppError::from(anyhow::anyhow!("mensagens table unreadable at /srv/store"));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(body.contains("alert-danger"));
        assert!(body.contains("Tente de novo"));
        assert!(!body.contains("/srv/store"));
    }
}

pub mod api;
pub mod appresult;
pub mod config;
pub mod db;
pub mod display;
pub mod forms;
pub mod index;
pub mod mensagens;
pub mod outcome;
pub mod repo;
pub mod res;
pub mod serve;
pub mod store;

use std::{ops::Deref, sync::Arc};

use axum::{extract::FromRef, response::{Html, IntoResponse}, routing::get, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use appresult::{AppError, AppResult};

use config::Config;
use db::{Correio, Mensagem};
use repo::Repository;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub correios: Repository<Correio>,
    pub mensagens: Repository<Mensagem>,
    pub site: Site,
}

/// Page-wide labels from the config.
#[derive(Clone)]
pub struct Site {
    pub responsavel: Arc<str>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        AppState {
            correios: Repository::new(&config.storage.data_dir),
            mensagens: Repository::new(&config.storage.data_dir),
            site: Site {
                responsavel: config.server.responsavel.as_str().into(),
            },
        }
    }
}

pub fn app(config: &Config) -> Router {
    Router::new()
        .route("/", get(index::correio_page).post(index::send_correio))
        .route("/display", get(display::display))
        .route("/mensagens", get(mensagens::mensagens_page).post(mensagens::register_mensagem))
        .route("/quedelhe", get(res::quedelhe))
        .route("/static/correio.js", get(res::display_script))
        .route("/static/correio.css", get(res::stylesheet))
        .nest_service("/static/img", ServeDir::new(&config.storage.images_dir))
        .merge(api::router())
        .fallback(res::quedelhe)
        .with_state(AppState::new(config))
        .layer(TraceLayer::new_for_http())
}

pub struct Markdown<T>(pub T);

impl<T> IntoResponse for Markdown<T>
where
    T: Deref<Target = str>
{
    fn into_response(self) -> axum::response::Response {
        use pulldown_cmark::{Parser, Options};

        let parser = Parser::new_ext(&*self.0, Options::ENABLE_STRIKETHROUGH);

        let mut html_output = String::new();
        pulldown_cmark::html::push_html(&mut html_output, parser);
        Html(html_output).into_response()
    }
}

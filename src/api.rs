//! JSON endpoints polled by the display script.

use std::collections::BTreeMap;

use axum::{debug_handler, extract::State, routing::get, Json, Router};

use crate::{
    db::{Correio, Mensagem},
    outcome::Envelope,
    repo::Repository,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/correios", get(correios))
        .route("/api/mensagens", get(mensagens))
}

#[debug_handler(state = AppState)]
pub(crate) async fn correios(
    State(correios): State<Repository<Correio>>,
) -> Json<Envelope<Vec<Correio>>> {
    Json(correios.list_all().await.into())
}

/// Same envelope, `data` keyed by id.
#[debug_handler(state = AppState)]
pub(crate) async fn mensagens(
    State(mensagens): State<Repository<Mensagem>>,
) -> Json<Envelope<BTreeMap<String, Mensagem>>> {
    Json(mensagens.index_by_id().await.into())
}

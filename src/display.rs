use std::collections::BTreeMap;

use axum::{debug_handler, extract::State, response::Html};

use crate::{
    db::{Correio, Mensagem},
    include_res,
    repo::Repository,
    res::{self, escape},
    AppResult, AppState, Site,
};

#[debug_handler(state = AppState)]
pub(crate) async fn display(
    State(correios): State<Repository<Correio>>,
    State(mensagens): State<Repository<Mensagem>>,
    State(site): State<Site>,
) -> AppResult<Html<String>> {
    let listed = correios.list_all().await;
    let indexed = mensagens.index_by_id().await;

    let mut notices = String::new();
    if listed.is_err() {
        notices += &res::notice(&listed);
    }
    if indexed.is_err() {
        notices += &res::notice(&indexed);
    }

    let correios = listed.map(|found| found.data).unwrap_or_default();
    let mensagens = indexed.map(|found| found.data).unwrap_or_default();

    let slides: String = correios
        .iter()
        .enumerate()
        .map(|(index, correio)| slide(index, correio, &mensagens))
        .collect();

    // The lookup table sits inside a <script> element.
    let lookup = serde_json::to_string(&mensagens)?.replace("</", "<\\/");

    let body = include_res!(str, "/pages/display.html")
        .replace("{notices}", &notices)
        .replace("{slides}", &slides)
        .replace("{mensagens}", &lookup);

    Ok(res::page(&site, "Correio Elegante", &body))
}

fn slide(index: usize, correio: &Correio, mensagens: &BTreeMap<String, Mensagem>) -> String {
    let figure = match mensagens.get(&correio.mensagem) {
        Some(mensagem) => format!(
            r#"<img class="d-block w-100" src="/static/img/{}" alt="{}">"#,
            escape(&mensagem.path),
            escape(&mensagem.description),
        ),
        None => {
            tracing::warn!(correio = %correio.id, mensagem = %correio.mensagem, "correio points at an unknown mensagem");
            include_res!(str, "/pages/missing_mensagem.html").to_owned()
        }
    };

    let de = correio
        .sender()
        .map(|de| format!("<h4>De: {}</h4>", escape(de)))
        .unwrap_or_default();

    include_res!(str, "/pages/slide.html")
        .replace("{active}", if index == 0 { " active" } else { "" })
        .replace("{index}", &index.to_string())
        .replace("{id}", &escape(&correio.id))
        .replace("{figure}", &figure)
        .replace("{de}", &de)
        .replace("{para}", &escape(&correio.para))
}

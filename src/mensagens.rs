use axum::{debug_handler, extract::State, response::Html, Form};

use crate::{
    db::Mensagem,
    forms::{Invalid, MensagemForm},
    include_res,
    outcome::Failure,
    repo::Repository,
    res::{self, escape},
    AppState, Site,
};

#[debug_handler(state = AppState)]
pub(crate) async fn mensagens_page(
    State(mensagens): State<Repository<Mensagem>>,
    State(site): State<Site>,
) -> Html<String> {
    render(&site, &mensagens, &MensagemForm::default(), None, String::new()).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn register_mensagem(
    State(mensagens): State<Repository<Mensagem>>,
    State(site): State<Site>,
    Form(form): Form<MensagemForm>,
) -> Html<String> {
    match form.validate() {
        Ok(draft) => {
            let inserted = mensagens.insert(draft).await;
            render(&site, &mensagens, &MensagemForm::default(), None, res::notice(&inserted)).await
        }
        Err(invalid) => {
            let notices = res::notice::<()>(&Err(Failure::from(&invalid)));
            render(&site, &mensagens, &form, Some(&invalid), notices).await
        }
    }
}

async fn render(
    site: &Site,
    mensagens: &Repository<Mensagem>,
    form: &MensagemForm,
    invalid: Option<&Invalid>,
    mut notices: String,
) -> Html<String> {
    let listed = mensagens.list_all().await;

    let mut items = String::new();
    match &listed {
        Ok(found) => {
            for mensagem in &found.data {
                items += &include_res!(str, "/pages/mensagem_item.html")
                    .replace("{id}", &escape(&mensagem.id))
                    .replace("{path}", &escape(&mensagem.path))
                    .replace("{description}", &escape(&mensagem.description));
            }
        }
        Err(_) => notices += &res::notice(&listed),
    }

    let field_error = |field: &str| {
        invalid
            .and_then(|invalid| invalid.message_for(field))
            .map(|message| format!(r#"<p class="field-error">{}</p>"#, escape(message)))
            .unwrap_or_default()
    };

    let body = include_res!(str, "/pages/mensagens.html")
        .replace("{path_error}", &field_error("path"))
        .replace("{description_error}", &field_error("description"))
        .replace("{notices}", &notices)
        .replace("{items}", &items)
        .replace("{path}", &escape(&form.path))
        .replace("{description}", &escape(&form.description));

    res::page(site, "Mensagens cadastradas", &body)
}

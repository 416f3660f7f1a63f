use axum::{debug_handler, extract::State, response::Html, Form};

use crate::{
    db::{Correio, Mensagem},
    forms::{CorreioForm, Invalid},
    include_res,
    outcome::Failure,
    repo::Repository,
    res::{self, escape},
    AppState, Site,
};

#[debug_handler(state = AppState)]
pub(crate) async fn correio_page(
    State(mensagens): State<Repository<Mensagem>>,
    State(site): State<Site>,
) -> Html<String> {
    let listed = mensagens.list_all().await;

    let mut notices = String::new();
    if listed.is_err() {
        notices += &res::notice(&listed);
    }
    let choices = listed.as_ref().map(|found| found.data.as_slice()).unwrap_or_default();

    render(&site, choices, &CorreioForm::default(), None, &notices)
}

#[debug_handler(state = AppState)]
pub(crate) async fn send_correio(
    State(correios): State<Repository<Correio>>,
    State(mensagens): State<Repository<Mensagem>>,
    State(site): State<Site>,
    Form(form): Form<CorreioForm>,
) -> Html<String> {
    let listed = mensagens.list_all().await;

    let mut notices = String::new();
    if listed.is_err() {
        notices += &res::notice(&listed);
    }
    let choices = listed.as_ref().map(|found| found.data.as_slice()).unwrap_or_default();

    match form.validate(choices) {
        Ok(draft) => {
            let inserted = correios.insert(draft).await;
            notices += &res::notice(&inserted);
            render(&site, choices, &CorreioForm::default(), None, &notices)
        }
        Err(invalid) => {
            tracing::debug!(?invalid, "correio form rejected");
            notices += &res::notice::<()>(&Err(Failure::from(&invalid)));
            render(&site, choices, &form, Some(&invalid), &notices)
        }
    }
}

fn render(
    site: &Site,
    choices: &[Mensagem],
    form: &CorreioForm,
    invalid: Option<&Invalid>,
    notices: &str,
) -> Html<String> {
    let mut items = String::new();
    for mensagem in choices {
        let checked = if mensagem.id == form.mensagem { " checked" } else { "" };
        items += &include_res!(str, "/pages/choice.html")
            .replace("{checked}", checked)
            .replace("{id}", &escape(&mensagem.id))
            .replace("{path}", &escape(&mensagem.path))
            .replace("{description}", &escape(&mensagem.description));
    }
    if items.is_empty() {
        items = include_res!(str, "/pages/no_choices.html").to_owned();
    }

    let field_error = |field: &str| {
        invalid
            .and_then(|invalid| invalid.message_for(field))
            .map(|message| format!(r#"<p class="field-error">{}</p>"#, escape(message)))
            .unwrap_or_default()
    };

    let body = include_res!(str, "/pages/correio.html")
        .replace("{para_error}", &field_error("para"))
        .replace("{mensagem_error}", &field_error("mensagem"))
        .replace("{notices}", notices)
        .replace("{choices}", &items)
        .replace("{de}", &escape(&form.de))
        .replace("{para}", &escape(&form.para));

    res::page(site, "Correio Elegante", &body)
}

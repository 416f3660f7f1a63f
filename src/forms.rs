//! Submitted forms and their validation.

use serde::Deserialize;

use crate::{
    db::{Mensagem, NewCorreio, NewMensagem},
    outcome::{ErrorKind, Failure},
};

const REQUIRED: &str = "Este campo é obrigatório.";
const NOT_A_CHOICE: &str = "Escolha uma das mensagens cadastradas.";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorreioForm {
    #[serde(default)]
    pub de: String,
    #[serde(default)]
    pub para: String,
    #[serde(default)]
    pub mensagem: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MensagemForm {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invalid {
    pub fields: Vec<FieldError>,
}

impl Invalid {
    fn push(&mut self, field: &'static str, message: &'static str) {
        self.fields.push(FieldError { field, message });
    }

    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.fields.iter().find(|e| e.field == field).map(|e| e.message)
    }

    fn into_result<T>(self, ok: impl FnOnce() -> T) -> Result<T, Invalid> {
        if self.fields.is_empty() { Ok(ok()) } else { Err(self) }
    }
}

impl From<&Invalid> for Failure {
    fn from(invalid: &Invalid) -> Self {
        let fields: Vec<_> = invalid.fields.iter().map(|e| e.field).collect();
        Failure::new(ErrorKind::ValidationFailed, "o formulário tem erros")
            .with_exception(fields.join(", "))
    }
}

fn required(value: &str) -> Option<String> {
    Some(value.trim().to_owned()).filter(|v| !v.is_empty())
}

impl CorreioForm {
    /// `para` is required, `mensagem` must be the id of one of `choices`.
    pub fn validate(&self, choices: &[Mensagem]) -> Result<NewCorreio, Invalid> {
        let mut invalid = Invalid::default();

        let para = required(&self.para);
        if para.is_none() {
            invalid.push("para", REQUIRED);
        }

        let mensagem = required(&self.mensagem);
        match &mensagem {
            None => invalid.push("mensagem", REQUIRED),
            Some(id) if !choices.iter().any(|m| &m.id == id) => invalid.push("mensagem", NOT_A_CHOICE),
            Some(_) => {}
        }

        invalid.into_result(|| NewCorreio {
            de: self.de.trim().to_owned(),
            para: para.unwrap_or_default(),
            mensagem: mensagem.unwrap_or_default(),
        })
    }
}

impl MensagemForm {
    pub fn validate(&self) -> Result<NewMensagem, Invalid> {
        let mut invalid = Invalid::default();

        let path = required(&self.path);
        if path.is_none() {
            invalid.push("path", REQUIRED);
        }
        let description = required(&self.description);
        if description.is_none() {
            invalid.push("description", REQUIRED);
        }

        invalid.into_result(|| NewMensagem {
            path: path.unwrap_or_default(),
            description: description.unwrap_or_default(),
        })
    }
}

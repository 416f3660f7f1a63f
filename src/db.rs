use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// A record kept in one collection of the store, keyed by its own `id`.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Root attribute, also the store file name.
    const COLLECTION: &'static str;

    /// Caller-supplied fields, everything but the id.
    type Draft: Send;

    fn from_draft(id: String, draft: Self::Draft) -> Self;

    fn id(&self) -> &str;

    /// Records sharing a unique key are not inserted twice.
    fn unique_key(&self) -> Option<&str> {
        None
    }
}

/// An image and its caption that greetings can point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mensagem {
    pub id: String,
    pub path: String,
    pub description: String,

    // unique: path
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMensagem {
    pub path: String,
    pub description: String,
}

impl Record for Mensagem {
    const COLLECTION: &'static str = "mensagens";
    type Draft = NewMensagem;

    fn from_draft(id: String, NewMensagem { path, description }: NewMensagem) -> Self {
        Mensagem {
            id,
            path,
            description,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.path)
    }
}

/// A greeting. `mensagem` is a `Mensagem` id but nothing checks it on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correio {
    pub id: String,
    pub de: String,
    pub para: String,
    pub mensagem: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCorreio {
    pub de: String,
    pub para: String,
    pub mensagem: String,
}

impl Record for Correio {
    const COLLECTION: &'static str = "correios";
    type Draft = NewCorreio;

    fn from_draft(id: String, NewCorreio { de, para, mensagem }: NewCorreio) -> Self {
        Correio {
            id,
            de,
            para,
            mensagem,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl Correio {
    /// Sender, unless it was left blank.
    pub fn sender(&self) -> Option<&str> {
        Some(self.de.trim()).filter(|de| !de.is_empty())
    }
}

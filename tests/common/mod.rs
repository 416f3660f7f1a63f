use std::path::Path;

use correio::config::{Config, ServerConfig, StorageConfig};
use tempfile::TempDir;
use tokio::net::TcpListener;

pub fn config(root: &Path) -> Config {
    Config {
        server: ServerConfig {
            socket: None,
            host: "127.0.0.1".to_owned(),
            port: 0,
            log_level: "info".to_owned(),
            responsavel: "Fábrica do Futuro".to_owned(),
        },
        storage: StorageConfig {
            data_dir: root.join("store"),
            images_dir: root.join("img"),
        },
    }
}

/// A running app on a random local port, with its own scratch storage.
#[allow(dead_code)]
pub struct TestApp {
    pub base: String,
    pub client: reqwest::Client,
    _root: TempDir,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn spawn() -> Self {
        let root = tempfile::tempdir().expect("create temporary storage dir");
        let app = correio::app(&config(root.path()));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
        let addr = listener.local_addr().expect("test listener address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve test app");
        });

        Self {
            base: format!("http://{addr}"),
            client: reqwest::Client::new(),
            _root: root,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.expect("GET request")
    }

    pub async fn get_json(&self, path: &str) -> serde_json::Value {
        self.get(path).await.json().await.expect("JSON body")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> String {
        let response = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request");
        assert!(response.status().is_success(), "POST {path}: {}", response.status());
        response.text().await.expect("text body")
    }
}

//! Transactional record store, one SQLite file per collection.
//!
//! A store exposes a single root namespace of named attributes. Each
//! attribute is an ordered mapping from key to a compressed JSON record.
//! An attribute that was never initialized reads back as `None`, which is
//! how callers tell an untouched collection from an empty one.

mod codec;

use std::path::PathBuf;

use serde::{Serialize, de::DeserializeOwned};
use sqlx::{
    Connection, Executor, Sqlite, SqliteConnection,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous},
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS root (
    attr TEXT PRIMARY KEY NOT NULL
);
CREATE TABLE IF NOT EXISTS entries (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    attr TEXT NOT NULL REFERENCES root (attr),
    key TEXT NOT NULL,
    body BLOB NOT NULL,
    UNIQUE (attr, key)
);
"#;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not create store directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store {} is missing or corrupted: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
    #[error("record body is not valid zlib: {0}")]
    Compression(#[source] std::io::Error),
    #[error("record body is not valid json: {0}")]
    Codec(#[from] serde_json::Error),
}

/// An open handle on one collection file. Call [`Store::close`] when done.
#[derive(Debug)]
pub struct Store {
    conn: SqliteConnection,
    path: PathBuf,
}

impl Store {
    /// Opens the store at `path`, creating parent directories and the file
    /// itself on first use. A file that is not a store is never repaired.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Store> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Directory {
                    path: parent.to_owned(),
                    source,
                })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Full);

        let mut conn = match SqliteConnection::connect_with(&options).await {
            Ok(conn) => conn,
            Err(source) => return Err(StoreError::Unavailable { path, source }),
        };

        if let Err(source) = Executor::execute(&mut conn, SCHEMA).await {
            if let Err(e) = conn.close().await {
                tracing::warn!(path = %path.display(), error = %e, "could not close rejected store");
            }
            return Err(StoreError::Unavailable { path, source });
        }

        tracing::trace!(path = %path.display(), "store opened");
        Ok(Store { conn, path })
    }

    /// Committed entries of `attr` in insertion order, `None` if the
    /// attribute was never initialized.
    pub async fn load<T: DeserializeOwned>(
        &mut self,
        attr: &str,
    ) -> StoreResult<Option<Vec<(String, T)>>> {
        load_entries(&mut self.conn, attr).await
    }

    pub async fn begin(&mut self) -> StoreResult<Transaction<'_>> {
        Ok(Transaction {
            tx: self.conn.begin().await?,
        })
    }

    pub async fn close(self) {
        if let Err(e) = self.conn.close().await {
            tracing::warn!(path = %self.path.display(), error = %e, "store was already closed");
        }
    }
}

/// Staged writes against a [`Store`]. Dropping without [`commit`] rolls
/// back, but callers are expected to [`abort`] explicitly.
///
/// [`commit`]: Transaction::commit
/// [`abort`]: Transaction::abort
pub struct Transaction<'c> {
    tx: sqlx::Transaction<'c, Sqlite>,
}

impl Transaction<'_> {
    pub async fn ensure_root(&mut self, attr: &str) -> StoreResult<()> {
        sqlx::query("INSERT OR IGNORE INTO root (attr) VALUES (?)")
            .bind(attr)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    pub async fn load<T: DeserializeOwned>(
        &mut self,
        attr: &str,
    ) -> StoreResult<Option<Vec<(String, T)>>> {
        load_entries(&mut *self.tx, attr).await
    }

    /// Stages `record` under `key`. The attribute must already exist.
    pub async fn put<T: Serialize>(&mut self, attr: &str, key: &str, record: &T) -> StoreResult<()> {
        let body = codec::encode(record)?;
        sqlx::query("INSERT INTO entries (attr, key, body) VALUES (?, ?, ?)")
            .bind(attr)
            .bind(key)
            .bind(body)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    pub async fn commit(self) -> StoreResult<()> {
        Ok(self.tx.commit().await?)
    }

    pub async fn abort(self) {
        if let Err(e) = self.tx.rollback().await {
            tracing::warn!(error = %e, "transaction was already closed");
        }
    }
}

async fn load_entries<T: DeserializeOwned>(
    conn: &mut SqliteConnection,
    attr: &str,
) -> StoreResult<Option<Vec<(String, T)>>> {
    let initialized: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM root WHERE attr = ?")
        .bind(attr)
        .fetch_optional(&mut *conn)
        .await?;
    if initialized.is_none() {
        return Ok(None);
    }

    let rows: Vec<(String, Vec<u8>)> =
        sqlx::query_as("SELECT key, body FROM entries WHERE attr = ? ORDER BY seq")
            .bind(attr)
            .fetch_all(&mut *conn)
            .await?;

    rows.into_iter()
        .map(|(key, body)| Ok((key, codec::decode(&body)?)))
        .collect::<StoreResult<Vec<_>>>()
        .map(Some)
}

//! Collection repositories over the record store.
//!
//! Each operation opens its own store handle and closes it on every path
//! before returning. Store failures never escape as errors: they come back
//! as a [`Failure`] the handlers can render.

use std::{
    collections::BTreeMap,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use uuid::Uuid;

use crate::{
    db::Record,
    outcome::{ErrorKind, Failure, Outcome, Success},
    store::{Store, StoreError, StoreResult, Transaction},
};

pub struct Repository<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _record: PhantomData,
        }
    }
}

enum Staged {
    Fresh,
    Duplicate(String),
}

impl<R: Record> Repository<R> {
    /// Repository over `<data_dir>/<collection>.db`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{}.db", R::COLLECTION)),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn list_all(&self) -> Outcome<Vec<R>> {
        let mut store = self.open().await?;
        let loaded = load::<R>(&mut store).await;
        store.close().await;

        match loaded {
            Ok(Some(records)) => Ok(Success::new("records retrieved", records)),
            Ok(None) => Err(Failure::new(ErrorKind::Empty, "no records")),
            Err(e) => Err(self.unavailable(e)),
        }
    }

    /// Every record keyed by id, for lookup tables.
    pub async fn index_by_id(&self) -> Outcome<BTreeMap<String, R>> {
        self.list_all().await.map(|found| {
            found.map(|records| {
                records
                    .into_iter()
                    .map(|record| (record.id().to_owned(), record))
                    .collect()
            })
        })
    }

    pub async fn get_by_id(&self, id: &str) -> Outcome<R> {
        let mut store = self.open().await?;
        let loaded = load::<R>(&mut store).await;
        store.close().await;

        let records = loaded.map_err(|e| self.unavailable(e))?.unwrap_or_default();
        records
            .into_iter()
            .find(|record| record.id() == id)
            .map(|record| Success::new("record found", record))
            .ok_or_else(|| Failure::new(ErrorKind::NotFound, "not found"))
    }

    /// Stores a new record under a fresh id and returns that id. A record
    /// whose unique key is already taken is not stored again; the id of the
    /// one already there comes back instead.
    pub async fn insert(&self, draft: R::Draft) -> Outcome<String> {
        let mut store = self.open().await?;
        let inserted = self.insert_in(&mut store, draft).await;
        store.close().await;
        inserted
    }

    async fn insert_in(&self, store: &mut Store, draft: R::Draft) -> Outcome<String> {
        let record = R::from_draft(Uuid::new_v4().to_string(), draft);

        let mut tx = store.begin().await.map_err(|e| self.aborted(e))?;
        match stage(&mut tx, &record).await {
            Ok(Staged::Duplicate(existing)) => {
                tx.abort().await;
                tracing::debug!(collection = R::COLLECTION, id = %existing, "record already present");
                Ok(Success::new("record already present", existing))
            }
            Ok(Staged::Fresh) => match tx.commit().await {
                Ok(()) => {
                    tracing::info!(collection = R::COLLECTION, id = record.id(), "record inserted");
                    Ok(Success::new("record inserted", record.id().to_owned()))
                }
                Err(e) => Err(self.aborted(e)),
            },
            Err(e) => {
                tx.abort().await;
                Err(self.aborted(e))
            }
        }
    }

    async fn open(&self) -> Result<Store, Failure> {
        Store::open(&self.path).await.map_err(|e| self.unavailable(e))
    }

    fn unavailable(&self, e: StoreError) -> Failure {
        tracing::error!(collection = R::COLLECTION, error = %e, "store unavailable");
        Failure::new(
            ErrorKind::StoreUnavailable,
            format!("{} store is missing or corrupted", R::COLLECTION),
        )
        .with_exception(e)
    }

    fn aborted(&self, e: StoreError) -> Failure {
        tracing::error!(collection = R::COLLECTION, error = %e, "insert aborted");
        Failure::new(ErrorKind::TransactionFailed, "insert aborted").with_exception(e)
    }
}

async fn load<R: Record>(store: &mut Store) -> StoreResult<Option<Vec<R>>> {
    let Some(entries) = store.load::<R>(R::COLLECTION).await? else {
        return Ok(None);
    };
    Ok(Some(unkey(entries)))
}

async fn stage<R: Record>(tx: &mut Transaction<'_>, record: &R) -> StoreResult<Staged> {
    tx.ensure_root(R::COLLECTION).await?;

    if let Some(key) = record.unique_key() {
        let existing = unkey(tx.load::<R>(R::COLLECTION).await?.unwrap_or_default());
        if let Some(found) = existing.iter().find(|r| r.unique_key() == Some(key)) {
            return Ok(Staged::Duplicate(found.id().to_owned()));
        }
    }

    tx.put(R::COLLECTION, record.id(), record).await?;
    Ok(Staged::Fresh)
}

fn unkey<R: Record>(entries: Vec<(String, R)>) -> Vec<R> {
    entries
        .into_iter()
        .map(|(key, record)| {
            if key != record.id() {
                tracing::warn!(collection = R::COLLECTION, %key, id = record.id(), "record id differs from its key");
            }
            record
        })
        .collect()
}

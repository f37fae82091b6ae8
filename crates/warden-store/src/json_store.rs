//! JSON document store
//!
//! The database is one JSON object mapping collection names to arrays of
//! documents; every document carries a string `id`. There are no partial
//! writes: each call loads the whole file, applies the change, and writes
//! the whole file back.
//!
//! A missing, empty, or unparseable data file reads as an empty database.
//! `save` will recreate it; `update` treats it as "nothing to update".

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::warn;

use crate::error::{StoreError, StoreResult};

type Database = BTreeMap<String, Vec<Value>>;

/// File-backed keyed document store
///
/// The mutex spans every read-modify-write cycle, making each merge atomic
/// with respect to other writers on the same store handle.
pub struct JsonStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Open a store at the given data file path
    ///
    /// The file is not created until the first `save`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fetch a document by collection and id
    pub async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let db = self.read_db().await;
        Ok(db
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc_id(doc) == Some(id)).cloned()))
    }

    /// Create or merge a document (idempotent upsert)
    ///
    /// If the id already exists, `fields` are merged onto the existing
    /// document; fields not mentioned in the patch survive.
    pub async fn save(&self, collection: &str, id: &str, fields: Value) -> StoreResult<()> {
        let fields = into_object(fields)?;

        let _guard = self.write_lock.lock().await;
        let mut db = self.read_db().await;
        let docs = db.entry(collection.to_string()).or_default();

        match docs
            .iter_mut()
            .find(|doc| doc_id(doc) == Some(id))
            .and_then(Value::as_object_mut)
        {
            Some(existing) => merge_fields(existing, fields),
            None => {
                let mut doc = Map::new();
                doc.insert("id".to_string(), Value::String(id.to_string()));
                merge_fields(&mut doc, fields);
                docs.push(Value::Object(doc));
            }
        }

        self.write_db(&db).await
    }

    /// Merge fields onto an existing document
    ///
    /// Returns false without touching the file when the collection or the
    /// id is absent; `update` never creates documents.
    pub async fn update(&self, collection: &str, id: &str, fields: Value) -> StoreResult<bool> {
        let fields = into_object(fields)?;

        let _guard = self.write_lock.lock().await;
        let mut db = self.read_db().await;

        let Some(existing) = db
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc_id(doc) == Some(id)))
            .and_then(Value::as_object_mut)
        else {
            return Ok(false);
        };

        merge_fields(existing, fields);
        self.write_db(&db).await?;
        Ok(true)
    }

    async fn read_db(&self) -> Database {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(_) => return Database::new(),
        };

        match serde_json::from_slice(&bytes) {
            Ok(db) => db,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Data file unreadable, treating as empty");
                Database::new()
            }
        }
    }

    async fn write_db(&self, db: &Database) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(db)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

fn doc_id(doc: &Value) -> Option<&str> {
    doc.get("id").and_then(Value::as_str)
}

fn into_object(fields: Value) -> StoreResult<Map<String, Value>> {
    match fields {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::InvalidPatch),
    }
}

/// Shallow merge: each top-level field in the patch replaces the existing one
fn merge_fields(doc: &mut Map<String, Value>, fields: Map<String, Value>) {
    for (key, value) in fields {
        doc.insert(key, value);
    }
}

//! Record store seam.
//!
//! The core reads and writes records only through [`RecordStore`]; it never
//! holds connection state. [`InMemoryStore`] backs tests and demos.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::category::Category;
use crate::error::{Error, Result};
use crate::record::{Record, RecordId};

/// Which records a fetch returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Every record in the collection.
    #[default]
    All,
    /// Records of one heating-source category.
    Category(Category),
}

impl Filter {
    /// Whether `record` passes the filter.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::All => true,
            Filter::Category(c) => record.heating_source == *c,
        }
    }
}

/// Persistent record collections.
///
/// Fetch order is unspecified; nothing in the core relies on it.
pub trait RecordStore {
    /// Materialize the records of `collection` that pass `filter`.
    fn fetch(&self, collection: &str, filter: &Filter) -> Result<Vec<Record>>;

    /// Set the cluster label of one record.
    fn update_label(&self, collection: &str, id: &RecordId, label: usize) -> Result<()>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn fetch(&self, collection: &str, filter: &Filter) -> Result<Vec<Record>> {
        (**self).fetch(collection, filter)
    }

    fn update_label(&self, collection: &str, id: &RecordId, label: usize) -> Result<()> {
        (**self).update_label(collection, id, label)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    fn fetch(&self, collection: &str, filter: &Filter) -> Result<Vec<Record>> {
        (**self).fetch(collection, filter)
    }

    fn update_label(&self, collection: &str, id: &RecordId, label: usize) -> Result<()> {
        (**self).update_label(collection, id, label)
    }
}

/// Thread-safe in-memory collections.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<BTreeMap<String, Vec<Record>>>,
}

impl InMemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append records to `collection`, creating it if needed.
    pub fn insert(
        &self,
        collection: &str,
        records: impl IntoIterator<Item = Record>,
    ) -> Result<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| Error::Store("lock poisoned".into()))?;
        collections
            .entry(collection.to_string())
            .or_default()
            .extend(records);
        Ok(())
    }
}

impl RecordStore for InMemoryStore {
    fn fetch(&self, collection: &str, filter: &Filter) -> Result<Vec<Record>> {
        let collections = self
            .collections
            .read()
            .map_err(|_| Error::Store("lock poisoned".into()))?;
        Ok(collections
            .get(collection)
            .map(|records| records.iter().filter(|r| filter.matches(r)).cloned().collect())
            .unwrap_or_default())
    }

    fn update_label(&self, collection: &str, id: &RecordId, label: usize) -> Result<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| Error::Store("lock poisoned".into()))?;
        let record = collections
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|r| &r.id == id))
            .ok_or_else(|| Error::NotFound {
                collection: collection.to_string(),
                id: id.clone(),
            })?;
        record.cluster_label = Some(label);
        Ok(())
    }
}

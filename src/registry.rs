//! Registry of loaded lists.
//!
//! One `Registry` is built per process and shared with the request handlers.
//! Each list is loaded from disk on first use and then kept for the process
//! lifetime behind its own mutex; every store operation runs with that list
//! locked, so requests against one list are serialized while different
//! lists never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::{Config, ListCatalog, ListEntry, StatesConfig};
use crate::error::{Error, Result};
use crate::storage::Storage;
use crate::store::ListStore;

/// Shared handle to one loaded list
pub type ListHandle = Arc<Mutex<ListStore>>;

#[derive(Debug)]
pub struct Registry {
    catalog: ListCatalog,
    storage: Storage,
    states: StatesConfig,
    loaded: Mutex<HashMap<String, ListHandle>>,
}

impl Registry {
    pub fn new(catalog: ListCatalog, storage: Storage, states: StatesConfig) -> Self {
        Self {
            catalog,
            storage,
            states,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Build from loaded settings and catalog
    pub fn from_config(config: &Config, catalog: ListCatalog) -> Self {
        let storage = Storage::new(config.data_dir.clone(), catalog.default_id())
            .with_legacy_file(config.legacy_file.clone());
        Self::new(catalog, storage, config.states.clone())
    }

    pub fn lists(&self) -> &[ListEntry] {
        self.catalog.entries()
    }

    pub fn default_list(&self) -> &str {
        self.catalog.default_id()
    }

    /// Map any requested id onto a configured list
    ///
    /// Unknown, blank or absent ids resolve to the default list.
    pub fn resolve(&self, requested: Option<&str>) -> &str {
        requested
            .map(str::trim)
            .and_then(|id| self.catalog.get(id))
            .map(|entry| entry.id.as_str())
            .unwrap_or_else(|| self.catalog.default_id())
    }

    /// Handle to a configured list, loading it on first access
    pub fn store(&self, list_id: &str) -> Result<ListHandle> {
        let entry = self.catalog.get(list_id).ok_or_else(|| {
            Error::InvalidArgument(format!("unknown list '{list_id}'"))
        })?;

        let mut loaded = lock(&self.loaded)?;
        let handle = loaded.entry(entry.id.clone()).or_insert_with(|| {
            let path = self.storage.list_file(&entry.id);
            Arc::new(Mutex::new(ListStore::load(
                entry.id.clone(),
                path,
                self.states.clone(),
            )))
        });
        Ok(Arc::clone(handle))
    }

    /// Resolve `requested` and run `f` with that list locked
    pub fn with_list<T, F>(&self, requested: Option<&str>, f: F) -> Result<T>
    where
        F: FnOnce(&mut ListStore) -> Result<T>,
    {
        let list_id = self.resolve(requested);
        let handle = self.store(list_id)?;
        let mut store = lock(handle.as_ref())?;
        f(&mut *store)
    }

    /// Reset the resolved list; returns its id
    pub fn reset(&self, requested: Option<&str>) -> Result<String> {
        self.with_list(requested, |store| {
            store.reset()?;
            Ok(store.list_id().to_string())
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| Error::OperationFailed("list lock poisoned".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::NewTodo;
    use std::fs;
    use tempfile::TempDir;

    fn two_lists(dir: &TempDir) -> Registry {
        let catalog = ListCatalog::new(vec![
            ListEntry {
                id: "privat".to_string(),
                title: "Privat".to_string(),
            },
            ListEntry {
                id: "arbeit".to_string(),
                title: "Arbeit".to_string(),
            },
        ])
        .unwrap();
        let storage = Storage::new(dir.path().to_path_buf(), catalog.default_id());
        Registry::new(catalog, storage, StatesConfig::default())
    }

    #[test]
    fn resolve_known_ids_and_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let registry = two_lists(&dir);

        assert_eq!(registry.resolve(Some("arbeit")), "arbeit");
        assert_eq!(registry.resolve(Some(" arbeit ")), "arbeit");
        assert_eq!(registry.resolve(Some("nope")), "privat");
        assert_eq!(registry.resolve(Some("")), "privat");
        assert_eq!(registry.resolve(None), "privat");
    }

    #[test]
    fn store_is_loaded_once_and_cached() {
        let dir = TempDir::new().unwrap();
        let registry = two_lists(&dir);

        let first = registry.store("privat").unwrap();
        let second = registry.store("privat").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn store_rejects_unconfigured_ids() {
        let dir = TempDir::new().unwrap();
        let registry = two_lists(&dir);
        assert!(matches!(
            registry.store("../secret"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn lists_are_independent() {
        let dir = TempDir::new().unwrap();
        let registry = two_lists(&dir);

        registry
            .with_list(Some("arbeit"), |store| store.create(NewTodo::titled("report")))
            .unwrap();
        let privat = registry
            .with_list(Some("privat"), |store| store.create(NewTodo::titled("milk")))
            .unwrap();
        assert_eq!(privat.id, 1);

        assert!(dir.path().join("arbeit.json").exists());
        assert!(dir.path().join("privat.json").exists());
    }

    #[test]
    fn existing_file_is_loaded_on_first_access() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("arbeit.json"),
            r#"[{"id": 4, "title": "Bericht", "done": false, "state": "idle", "comment": ""}]"#,
        )
        .unwrap();
        let registry = two_lists(&dir);

        let titles = registry
            .with_list(Some("arbeit"), |store| {
                Ok(store.list().iter().map(|t| t.title.clone()).collect::<Vec<_>>())
            })
            .unwrap();
        assert_eq!(titles, vec!["Bericht".to_string()]);
    }

    #[test]
    fn reset_clears_resolved_list() {
        let dir = TempDir::new().unwrap();
        let registry = two_lists(&dir);
        registry
            .with_list(None, |store| store.create(NewTodo::titled("a")))
            .unwrap();

        assert_eq!(registry.reset(Some("unknown")).unwrap(), "privat");
        let next = registry
            .with_list(None, |store| store.create(NewTodo::titled("b")))
            .unwrap();
        assert_eq!(next.id, 1);
    }

    #[test]
    fn legacy_file_backs_default_list() {
        let dir = TempDir::new().unwrap();
        let legacy = dir.path().join("todos.json");
        let config = Config {
            data_dir: dir.path().join("data"),
            legacy_file: Some(legacy.clone()),
            ..Config::default()
        };
        let registry = Registry::from_config(&config, ListCatalog::default());

        registry
            .with_list(None, |store| store.create(NewTodo::titled("legacy")))
            .unwrap();
        assert!(legacy.exists());
        assert!(!dir.path().join("data").exists());
    }
}

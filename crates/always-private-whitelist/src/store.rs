//! Whitelist store
//!
//! Read-modify-write over a single storage key. Nothing here is
//! transactional: two writers racing on the same store can overwrite each
//! other, which is acceptable for a single interactive user.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

use always_private_storage::{KeyValueStore, KeyValueStoreExt, StorageError};

use crate::domain::normalize_domain;
use crate::error::WhitelistError;
use crate::Result;

/// Storage key holding the whitelist array
pub const WHITELIST_KEY: &str = "whitelist";

/// Suggested file name for exported whitelists
pub const EXPORT_FILE_NAME: &str = "always-private-whitelist.json";

/// Outcome of a successful import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Entries that were not already whitelisted
    pub added: usize,
    /// Size of the whitelist after the merge
    pub total: usize,
}

#[derive(Clone)]
pub struct WhitelistStore {
    store: Arc<dyn KeyValueStore>,
}

impl WhitelistStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current whitelist in insertion order, empty if never saved
    pub fn get(&self) -> Result<Vec<String>> {
        match self.store.get_json::<Vec<String>>(WHITELIST_KEY) {
            Ok(list) => Ok(list.unwrap_or_default()),
            Err(StorageError::Json { source, .. }) => {
                tracing::warn!(error = %source, "Stored whitelist is corrupt, treating as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the stored whitelist wholesale
    ///
    /// Every entry is reduced to its hostname and duplicates collapse onto
    /// their first occurrence. One entry that is not a hostname rejects the
    /// whole list and leaves storage untouched.
    pub fn save(&self, list: &[String]) -> Result<()> {
        let hosts = normalize_entries(list.iter().map(String::as_str))?;
        self.store.set_json(WHITELIST_KEY, &hosts)?;
        tracing::debug!(entries = hosts.len(), "Saved whitelist");
        Ok(())
    }

    pub fn contains(&self, host: &str) -> Result<bool> {
        Ok(self.get()?.iter().any(|entry| entry == host))
    }

    /// Append a domain unless it is already present
    ///
    /// Returns `true` if the whitelist changed. Blank input is ignored.
    pub fn add(&self, domain: &str) -> Result<bool> {
        if domain.trim().is_empty() {
            return Ok(false);
        }

        let host = normalize_domain(domain)
            .ok_or_else(|| WhitelistError::InvalidDomain(domain.trim().to_string()))?;

        let mut list = self.get()?;
        if list.contains(&host) {
            tracing::debug!(host = %host, "Domain already whitelisted");
            return Ok(false);
        }

        list.push(host.clone());
        self.save(&list)?;

        tracing::info!(host = %host, "Added domain to whitelist");
        Ok(true)
    }

    /// Remove every occurrence of a domain
    ///
    /// Returns `true` if anything was removed.
    pub fn remove(&self, domain: &str) -> Result<bool> {
        let raw = domain.trim();
        let host = normalize_domain(raw);

        let mut list = self.get()?;
        let before = list.len();
        list.retain(|entry| entry != raw && Some(entry) != host.as_ref());

        if list.len() == before {
            return Ok(false);
        }

        self.save(&list)?;
        tracing::info!(domain = %raw, removed = before - list.len(), "Removed domain from whitelist");
        Ok(true)
    }

    /// Merge an imported JSON payload into the whitelist
    ///
    /// The payload must be an array of strings, each reducible to a
    /// hostname. Any violation rejects the whole import and leaves the
    /// stored whitelist untouched. Existing entries keep their order, new
    /// ones follow in the order they first appear.
    pub fn import_merge(&self, payload: &Value) -> Result<ImportSummary> {
        let items = payload
            .as_array()
            .ok_or_else(|| WhitelistError::InvalidFormat("not an array.".to_string()))?;

        let mut raw_entries = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let raw = item.as_str().ok_or_else(|| {
                WhitelistError::InvalidFormat(format!("entry {} is not a string.", index))
            })?;
            raw_entries.push(raw);
        }
        let incoming = normalize_entries(raw_entries)?;

        let current = self.get()?;
        let mut merged = normalize_entries(current.iter().map(String::as_str))?;
        let existing = merged.len();
        for host in incoming {
            if !merged.contains(&host) {
                merged.push(host);
            }
        }

        self.save(&merged)?;

        let summary = ImportSummary {
            added: merged.len() - existing,
            total: merged.len(),
        };
        tracing::info!(added = summary.added, total = summary.total, "Imported whitelist");
        Ok(summary)
    }

    /// Parse `text` as JSON and merge it, see [`WhitelistStore::import_merge`]
    pub fn import_json(&self, text: &str) -> Result<ImportSummary> {
        let payload: Value = serde_json::from_str(text)?;
        self.import_merge(&payload)
    }

    /// Current whitelist as a pretty-printed JSON array
    pub fn export(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.get()?)?)
    }
}

/// Reduce entries to hostnames, dropping repeats after their first occurrence
fn normalize_entries<'a>(entries: impl IntoIterator<Item = &'a str>) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut hosts = Vec::new();
    for raw in entries {
        let host =
            normalize_domain(raw).ok_or_else(|| WhitelistError::InvalidDomain(raw.to_string()))?;
        if seen.insert(host.clone()) {
            hosts.push(host);
        }
    }
    Ok(hosts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use always_private_storage::{Database, MemoryStore};
    use serde_json::json;

    fn memory_store() -> WhitelistStore {
        WhitelistStore::new(Arc::new(MemoryStore::new()))
    }

    fn as_set(list: Vec<String>) -> HashSet<String> {
        list.into_iter().collect()
    }

    #[test]
    fn test_get_empty_when_unset() {
        let store = memory_store();
        assert!(store.get().unwrap().is_empty());
    }

    #[test]
    fn test_add_is_idempotent() {
        let store = memory_store();
        assert!(store.add("x.com").unwrap());
        assert!(!store.add("x.com").unwrap());
        assert_eq!(store.get().unwrap(), vec!["x.com".to_string()]);
    }

    #[test]
    fn test_add_normalizes_input() {
        let store = memory_store();
        store.add("  https://Docs.Example.com/guide ").unwrap();
        assert_eq!(store.get().unwrap(), vec!["docs.example.com".to_string()]);
        assert!(store.contains("docs.example.com").unwrap());
        assert!(!store.contains("example.com").unwrap());
    }

    #[test]
    fn test_add_blank_is_noop() {
        let store = memory_store();
        assert!(!store.add("   ").unwrap());
        assert!(store.get().unwrap().is_empty());
    }

    #[test]
    fn test_add_rejects_invalid_domain() {
        let store = memory_store();
        let result = store.add("not a domain");
        assert!(matches!(result, Err(WhitelistError::InvalidDomain(_))));
        assert!(store.get().unwrap().is_empty());
    }

    #[test]
    fn test_add_preserves_order() {
        let store = memory_store();
        store.add("b.com").unwrap();
        store.add("a.com").unwrap();
        store.add("c.com").unwrap();
        assert_eq!(store.get().unwrap(), vec!["b.com", "a.com", "c.com"]);
    }

    #[test]
    fn test_remove_matches_normalized_input() {
        let store = memory_store();
        store
            .save(&["a.com".to_string(), "b.com".to_string()])
            .unwrap();

        assert!(!store.remove("c.com").unwrap());
        assert!(store.remove("https://A.com/").unwrap());
        assert_eq!(store.get().unwrap(), vec!["b.com".to_string()]);
        assert!(!store.remove("a.com").unwrap());
    }

    #[test]
    fn test_duplicates_collapse_on_save() {
        let store = memory_store();
        store
            .save(&[
                "a.com".to_string(),
                "b.com".to_string(),
                "a.com".to_string(),
            ])
            .unwrap();
        assert_eq!(store.get().unwrap(), vec!["a.com", "b.com"]);

        assert!(store.remove("a.com").unwrap());
        assert_eq!(store.get().unwrap(), vec!["b.com".to_string()]);
        assert!(!store.remove("a.com").unwrap());
    }

    #[test]
    fn test_save_overwrites() {
        let store = memory_store();
        store.add("old.com").unwrap();
        store.save(&["new.com".to_string()]).unwrap();
        assert_eq!(store.get().unwrap(), vec!["new.com".to_string()]);
    }

    #[test]
    fn test_save_stores_hostnames_only() {
        let store = memory_store();
        store
            .save(&[
                "Example.COM".to_string(),
                "https://x.com/p".to_string(),
                "x.com".to_string(),
            ])
            .unwrap();

        assert_eq!(store.get().unwrap(), vec!["example.com", "x.com"]);
        assert!(store.contains("example.com").unwrap());
    }

    #[test]
    fn test_save_rejects_non_hostname_without_writing() {
        let store = memory_store();
        store.add("keep.com").unwrap();

        let result = store.save(&["a.com".to_string(), "my intranet".to_string()]);
        assert!(matches!(result, Err(WhitelistError::InvalidDomain(_))));
        assert_eq!(store.get().unwrap(), vec!["keep.com".to_string()]);
    }

    #[test]
    fn test_saved_list_survives_export_import() {
        let source = memory_store();
        source
            .save(&[
                "Example.COM".to_string(),
                "https://x.com/p".to_string(),
                "sub.Domain.org".to_string(),
            ])
            .unwrap();

        let target = memory_store();
        target.import_json(&source.export().unwrap()).unwrap();
        assert_eq!(as_set(target.get().unwrap()), as_set(source.get().unwrap()));
        assert!(target.contains("sub.domain.org").unwrap());
    }

    #[test]
    fn test_import_merge_is_set_union() {
        let store = memory_store();
        store
            .save(&["b.com".to_string(), "c.com".to_string()])
            .unwrap();

        let summary = store.import_merge(&json!(["a.com", "b.com"])).unwrap();
        assert_eq!(summary, ImportSummary { added: 1, total: 3 });

        let list = store.get().unwrap();
        assert_eq!(list.len(), 3);

        let expected: HashSet<String> = ["a.com", "b.com", "c.com"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(as_set(list), expected);
    }

    #[test]
    fn test_import_rejects_non_array() {
        let store = memory_store();
        store.add("keep.com").unwrap();

        let result = store.import_merge(&json!("not-an-array"));
        assert!(matches!(result, Err(WhitelistError::InvalidFormat(_))));
        assert_eq!(store.get().unwrap(), vec!["keep.com".to_string()]);
    }

    #[test]
    fn test_import_rejects_mixed_array_without_partial_apply() {
        let store = memory_store();
        store.add("keep.com").unwrap();

        let result = store.import_merge(&json!(["a.com", 42, "b.com"]));
        assert!(matches!(result, Err(WhitelistError::InvalidFormat(_))));
        assert_eq!(store.get().unwrap(), vec!["keep.com".to_string()]);
    }

    #[test]
    fn test_import_json_rejects_unparsable_text() {
        let store = memory_store();
        store.add("keep.com").unwrap();

        assert!(matches!(
            store.import_json("{ definitely not json"),
            Err(WhitelistError::Json(_))
        ));
        assert_eq!(store.get().unwrap(), vec!["keep.com".to_string()]);
    }

    #[test]
    fn test_export_then_import_roundtrip() {
        let source = memory_store();
        source.add("a.com").unwrap();
        source.add("b.org").unwrap();
        source.add("sub.c.net").unwrap();

        let exported = source.export().unwrap();
        assert!(exported.starts_with("[\n  \""));

        let target = memory_store();
        target.import_json(&exported).unwrap();
        assert_eq!(as_set(target.get().unwrap()), as_set(source.get().unwrap()));
    }

    #[test]
    fn test_corrupt_value_reads_as_empty() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(WHITELIST_KEY, "{\"oops\": true}").unwrap();

        let store = WhitelistStore::new(kv);
        assert!(store.get().unwrap().is_empty());
    }

    #[test]
    fn test_database_backend() {
        let db = Database::open_in_memory().unwrap();
        let store = WhitelistStore::new(Arc::new(db.clone()));
        store.add("example.com").unwrap();

        assert_eq!(
            db.get_setting(WHITELIST_KEY).unwrap().as_deref(),
            Some(r#"["example.com"]"#)
        );
    }
}

/*!
 * Tests for the key-value persistence backends
 */

use std::sync::Arc;
use tempfile::TempDir;

use translai::database::{KeyValueStore, MemoryStore, SqliteStore};
use translai::glossary::store::{local_names_key, GLOBAL_NAMES_KEY};
use translai::{GlossaryStore, NamePair, WorkId};

#[tokio::test]
async fn test_sqliteStore_reopened_shouldKeepGlossary() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("translai.db");
    let work = WorkId::new("58127");

    {
        let store = SqliteStore::open(&path).unwrap();
        let mut glossary = GlossaryStore::load(store, work.clone()).await.unwrap();
        glossary
            .add_if_absent(vec![NamePair::new("李明", "Li Ming"), NamePair::new("赵", "Zhao")])
            .await
            .unwrap();
        glossary.promote("赵").await.unwrap();
        glossary.set_checked("李明").await.unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let glossary = GlossaryStore::load(store.clone(), work.clone()).await.unwrap();
    assert_eq!(glossary.global_pairs(), &[NamePair::new("赵", "Zhao")]);
    assert!(glossary.lookup("李明").unwrap().checked);

    let keys = store.keys_with_prefix(GLOBAL_NAMES_KEY).await.unwrap();
    assert_eq!(keys, vec![GLOBAL_NAMES_KEY.to_string(), local_names_key(&work)]);
}

#[tokio::test]
async fn test_sqliteStore_keysWithPrefix_shouldEscapeWildcards() {
    let store = SqliteStore::new_in_memory().unwrap();
    store.set("names:1", "[]").await.unwrap();
    store.set("names_x", "[]").await.unwrap();
    store.set("apiKey", "k").await.unwrap();

    let keys = store.keys_with_prefix("names_").await.unwrap();
    assert_eq!(keys, vec!["names_x".to_string()]);
}

#[tokio::test]
async fn test_sqliteStore_delete_shouldTolerateMissingKey() {
    let store = SqliteStore::new_in_memory().unwrap();
    store.delete("apiKey").await.unwrap();

    store.set("apiKey", "k").await.unwrap();
    store.delete("apiKey").await.unwrap();
    assert!(store.get("apiKey").await.unwrap().is_none());
}

#[tokio::test]
async fn test_memoryStore_sharedThroughArc_shouldSeeSameValues() {
    let store = Arc::new(MemoryStore::new());
    let alias = store.clone();

    alias.set("names", "[]").await.unwrap();

    assert_eq!(store.get("names").await.unwrap().as_deref(), Some("[]"));
    assert_eq!(store.len(), 1);
}

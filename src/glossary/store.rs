/*!
 * Scoped glossary storage.
 *
 * A `GlossaryStore` owns the work-local and global pair collections for one
 * session. Every mutation is followed by a persist of both scopes through the
 * key-value store; the in-memory state never outlives the session otherwise.
 */

use log::{debug, info};

use super::{NamePair, Scope};
use crate::database::KeyValueStore;
use crate::errors::StoreError;
use crate::work::WorkId;

/// Key under which the global scope is persisted
pub const GLOBAL_NAMES_KEY: &str = "names";

/// Key under which a work's local scope is persisted
pub fn local_names_key(work_id: &WorkId) -> String {
    format!("{}:{}", GLOBAL_NAMES_KEY, work_id)
}

/// Local and global name pairs for one work, backed by a key-value store.
pub struct GlossaryStore<S: KeyValueStore> {
    backend: S,
    work_id: WorkId,
    local: Vec<NamePair>,
    global: Vec<NamePair>,
}

impl<S: KeyValueStore> GlossaryStore<S> {
    /// Populate both scopes for `work_id`; missing keys yield empty scopes.
    pub async fn load(backend: S, work_id: WorkId) -> Result<Self, StoreError> {
        let local = read_pairs(&backend, &local_names_key(&work_id)).await?;
        let global = read_pairs(&backend, GLOBAL_NAMES_KEY).await?;

        info!(
            "Loaded glossary for work {}: {} local, {} global names",
            work_id,
            local.len(),
            global.len()
        );

        Ok(Self {
            backend,
            work_id,
            local,
            global,
        })
    }

    /// Work this glossary was loaded for
    pub fn work_id(&self) -> &WorkId {
        &self.work_id
    }

    /// Pairs scoped to this work
    pub fn local_pairs(&self) -> &[NamePair] {
        &self.local
    }

    /// Pairs shared across all works
    pub fn global_pairs(&self) -> &[NamePair] {
        &self.global
    }

    /// Find a pair by `original`, local scope first.
    pub fn lookup(&self, original: &str) -> Option<&NamePair> {
        self.local
            .iter()
            .chain(self.global.iter())
            .find(|pair| pair.original == original)
    }

    /// Scope holding `original`, local first.
    pub fn scope_of(&self, original: &str) -> Option<Scope> {
        if self.local.iter().any(|pair| pair.original == original) {
            Some(Scope::Local)
        } else if self.global.iter().any(|pair| pair.original == original) {
            Some(Scope::Global)
        } else {
            None
        }
    }

    /// Local pairs followed by global pairs.
    pub fn effective_pairs(&self) -> Vec<NamePair> {
        self.local.iter().chain(self.global.iter()).cloned().collect()
    }

    /// Append to the local scope every pair whose `original` is not known yet.
    ///
    /// Returns the number of pairs added. Duplicates, including duplicates within
    /// `pairs` itself, are skipped silently.
    pub async fn add_if_absent<I>(&mut self, pairs: I) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = NamePair>,
    {
        let mut added = 0;
        for pair in pairs {
            if self.lookup(&pair.original).is_none() {
                debug!("New local name: {}", pair);
                self.local.push(pair);
                added += 1;
            }
        }

        self.persist().await?;
        Ok(added)
    }

    /// Move a pair from the local to the global scope.
    ///
    /// Returns `false` without touching anything when `original` is not local.
    pub async fn promote(&mut self, original: &str) -> Result<bool, StoreError> {
        let Some(index) = self.local.iter().position(|pair| pair.original == original) else {
            return Ok(false);
        };

        let pair = self.local.remove(index);
        info!("Promoting name to global scope: {}", pair);
        self.global.push(pair);
        self.persist().await?;
        Ok(true)
    }

    /// Remove `original` from whichever scope holds it.
    pub async fn remove(&mut self, original: &str) -> Result<bool, StoreError> {
        let before = self.local.len() + self.global.len();
        self.local.retain(|pair| pair.original != original);
        self.global.retain(|pair| pair.original != original);
        let removed = self.local.len() + self.global.len() < before;

        if removed {
            info!("Removed name '{}'", original);
        }
        self.persist().await?;
        Ok(removed)
    }

    /// Replace the translated form of `original`.
    pub async fn set_translated(
        &mut self,
        original: &str,
        new_translated: &str,
    ) -> Result<bool, StoreError> {
        let updated = match self.lookup_mut(original) {
            Some(pair) => {
                pair.translated = new_translated.to_string();
                true
            }
            None => false,
        };

        self.persist().await?;
        Ok(updated)
    }

    /// Mark `original` as reviewed.
    pub async fn set_checked(&mut self, original: &str) -> Result<bool, StoreError> {
        let updated = match self.lookup_mut(original) {
            Some(pair) => {
                pair.checked = true;
                true
            }
            None => false,
        };

        self.persist().await?;
        Ok(updated)
    }

    /// Write both scopes to the backend, local first.
    pub async fn persist(&self) -> Result<(), StoreError> {
        write_pairs(&self.backend, &local_names_key(&self.work_id), &self.local).await?;
        write_pairs(&self.backend, GLOBAL_NAMES_KEY, &self.global).await?;
        debug!(
            "Persisted glossary: {} local, {} global",
            self.local.len(),
            self.global.len()
        );
        Ok(())
    }

    fn lookup_mut(&mut self, original: &str) -> Option<&mut NamePair> {
        self.local
            .iter_mut()
            .chain(self.global.iter_mut())
            .find(|pair| pair.original == original)
    }
}

async fn read_pairs<S: KeyValueStore>(backend: &S, key: &str) -> Result<Vec<NamePair>, StoreError> {
    match backend.get(key).await? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

async fn write_pairs<S: KeyValueStore>(
    backend: &S,
    key: &str,
    pairs: &[NamePair],
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(pairs)?;
    backend.set(key, &raw).await
}

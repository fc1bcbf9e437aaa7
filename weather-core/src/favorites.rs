//! Persisted favorite locations.
//!
//! The store holds one key whose value is a set of JSON-encoded
//! [`FavoriteLocation`] records. Records are identified by `name`: saving a
//! record replaces any stored record with the same name, and removal drops
//! every record with that name, so stale encodings never linger.

use std::collections::BTreeSet;

use tokio::sync::{Mutex, watch};

use crate::{error::StoreError, model::FavoriteLocation, store::KeyValueStore};

pub const FAVORITES_KEY: &str = "saved_locations";

/// Canonical encoding of a favorite: compact JSON, fields in declaration order.
pub fn encode(location: &FavoriteLocation) -> Result<String, StoreError> {
    serde_json::to_string(location).map_err(StoreError::Encode)
}

/// Decode every record, dropping any that fail, sorted by display name.
fn decode_sorted(raw: &BTreeSet<String>) -> Vec<FavoriteLocation> {
    let mut list: Vec<FavoriteLocation> = raw
        .iter()
        .filter_map(|json| match serde_json::from_str(json) {
            Ok(location) => Some(location),
            Err(e) => {
                tracing::warn!(error = %e, record = %json, "skipping unreadable favorite");
                None
            }
        })
        .collect();

    list.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    list
}

fn stored_name(json: &str) -> Option<String> {
    serde_json::from_str::<FavoriteLocation>(json).ok().map(|loc| loc.name)
}

#[derive(Debug)]
pub struct FavoritesRepository {
    /// Serializes read-modify-write cycles on the single stored set.
    store: Mutex<Box<dyn KeyValueStore>>,
    updates: watch::Sender<Vec<FavoriteLocation>>,
}

impl FavoritesRepository {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        let (updates, _) = watch::channel(Vec::new());
        Self {
            store: Mutex::new(Box::new(store)),
            updates,
        }
    }

    /// Live view of the list. A new value is published on every read and write.
    pub fn subscribe(&self) -> watch::Receiver<Vec<FavoriteLocation>> {
        self.updates.subscribe()
    }

    /// All favorites, sorted ascending by display name.
    pub async fn list(&self) -> Result<Vec<FavoriteLocation>, StoreError> {
        let store = self.store.lock().await;
        let raw = store.read_set(FAVORITES_KEY).await?;
        Ok(self.publish(&raw))
    }

    pub async fn save(&self, location: &FavoriteLocation) -> Result<(), StoreError> {
        let encoded = encode(location)?;

        let store = self.store.lock().await;
        let mut raw = store.read_set(FAVORITES_KEY).await?;
        raw.retain(|json| stored_name(json).as_deref() != Some(location.name.as_str()));
        raw.insert(encoded);
        store.write_set(FAVORITES_KEY, &raw).await?;

        tracing::info!(name = %location.name, "favorite saved");
        self.publish(&raw);
        Ok(())
    }

    /// Remove a favorite. Removing one that is not stored is a no-op.
    pub async fn remove(&self, location: &FavoriteLocation) -> Result<(), StoreError> {
        let encoded = encode(location)?;
        self.remove_where(|json| {
            *json == encoded || stored_name(json).as_deref() == Some(location.name.as_str())
        })
        .await
    }

    pub async fn remove_named(&self, name: &str) -> Result<(), StoreError> {
        self.remove_where(|json| stored_name(json).as_deref() == Some(name))
            .await
    }

    pub async fn is_favorite(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.list().await?.iter().any(|loc| loc.name == name))
    }

    async fn remove_where<F>(&self, matches: F) -> Result<(), StoreError>
    where
        F: Fn(&String) -> bool,
    {
        let store = self.store.lock().await;
        let mut raw = store.read_set(FAVORITES_KEY).await?;
        let before = raw.len();
        raw.retain(|json| !matches(json));

        if raw.len() == before {
            tracing::debug!("favorite not stored, nothing to remove");
            return Ok(());
        }

        store.write_set(FAVORITES_KEY, &raw).await?;
        tracing::info!(removed = before - raw.len(), "favorite removed");
        self.publish(&raw);
        Ok(())
    }

    fn publish(&self, raw: &BTreeSet<String>) -> Vec<FavoriteLocation> {
        let list = decode_sorted(raw);
        self.updates.send_replace(list.clone());
        list
    }
}

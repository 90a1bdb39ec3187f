//! Offline cart and custom-package buffers.
//!
//! Entries are kept as a JSON array under one key of a [`KeyValueStore`]
//! until the user signs in, then pushed to the server one by one. Sync is
//! best effort: entries the server rejects are logged and dropped, and the
//! buffer is cleared once every entry has been attempted.
//!
//! Writes are read-modify-write over the whole array without locking, so two
//! writers on the same store can lose each other's updates.

use chrono::{SecondsFormat, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;

use crate::constants::{
    CART_ID_PREFIX, CART_STORAGE_KEY, CUSTOM_PACKAGE_ID_PREFIX, CUSTOM_PACKAGE_STORAGE_KEY,
};
use crate::data_backend::CateringApi;
use crate::data_types::cart_types::{
    CreateCartItemRequest, CreateCustomPackageRequest, CustomPackageDraft, LocalCartItem,
    NewCartItem, NewCustomPackageDraft,
};
use crate::errors::StorageError;
use crate::kv_store::KeyValueStore;

pub trait Buffered {
    fn local_id(&self) -> &str;
}

impl Buffered for LocalCartItem {
    fn local_id(&self) -> &str {
        &self.id
    }
}

impl Buffered for CustomPackageDraft {
    fn local_id(&self) -> &str {
        &self.id
    }
}

/// Ordered list of `T` stored as JSON under `key`.
struct LocalBuffer<S, T> {
    store: S,
    key: &'static str,
    _entity: PhantomData<fn() -> T>,
}

impl<S: KeyValueStore, T: Serialize + DeserializeOwned + Buffered> LocalBuffer<S, T> {
    fn new(store: S, key: &'static str) -> Self {
        LocalBuffer {
            store,
            key,
            _entity: PhantomData,
        }
    }

    /// Unreadable contents count as an empty buffer.
    fn read(&self) -> Vec<T> {
        let stored = match self.store.get(self.key) {
            Ok(Some(stored)) => stored,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::error!("Error reading {}: {}", self.key, e);
                return Vec::new();
            }
        };

        serde_json::from_str(&stored).unwrap_or_else(|e| {
            log::error!("Error decoding {}: {}", self.key, e);
            Vec::new()
        })
    }

    fn write(&self, entries: &[T]) -> Result<(), StorageError> {
        let json = serde_json::to_string(entries)?;
        self.store.set(self.key, &json)
    }

    fn push(&self, entry: &T) -> Result<(), StorageError>
    where
        T: Clone,
    {
        let mut entries = self.read();
        entries.push(entry.clone());
        self.write(&entries)
    }

    fn remove(&self, id: &str) -> Result<(), StorageError> {
        let mut entries = self.read();
        let before = entries.len();
        entries.retain(|entry| entry.local_id() != id);
        if entries.len() == before {
            return Ok(());
        }
        self.write(&entries)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.store.delete(self.key)
    }
}

fn new_local_id(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!("{}_{}_{}", prefix, Utc::now().timestamp_millis(), suffix)
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Outcome of pushing a buffer to the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub attempted: usize,
    pub synced: usize,
    /// Local ids of entries the server did not accept. They are gone from
    /// the buffer as well.
    pub dropped: Vec<String>,
}

impl SyncReport {
    pub fn failed(&self) -> usize {
        self.dropped.len()
    }
}

pub struct CartStorage<S> {
    buffer: LocalBuffer<S, LocalCartItem>,
}

impl<S: KeyValueStore> CartStorage<S> {
    pub fn new(store: S) -> Self {
        CartStorage {
            buffer: LocalBuffer::new(store, CART_STORAGE_KEY),
        }
    }

    pub fn get_items(&self) -> Vec<LocalCartItem> {
        self.buffer.read()
    }

    pub fn add_item(&self, item: NewCartItem) -> Result<LocalCartItem, StorageError> {
        let now = now_iso();
        let item = LocalCartItem {
            id: new_local_id(CART_ID_PREFIX),
            package_id: item.package_id,
            package: item.package,
            location: item.location,
            guests: item.guests,
            date: item.date,
            price_at_time: item.price_at_time,
            created_at: now.clone(),
            updated_at: now,
        };
        self.buffer.push(&item)?;
        log::debug!("Buffered cart item {} for package {}", item.id, item.package_id);

        Ok(item)
    }

    pub fn remove_item(&self, item_id: &str) -> Result<(), StorageError> {
        self.buffer.remove(item_id)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.buffer.clear()
    }

    /// Pushes every buffered item to the server cart, then clears the buffer
    /// whether or not each push succeeded.
    pub async fn sync_to_server(&self, api: &dyn CateringApi) -> Result<SyncReport, StorageError> {
        let items = self.get_items();
        let mut report = SyncReport::default();
        if items.is_empty() {
            return Ok(report);
        }

        for item in &items {
            report.attempted += 1;
            match api.create_cart_item(&CreateCartItemRequest::from(item)).await {
                Ok(()) => report.synced += 1,
                Err(e) => {
                    log::error!("Error syncing cart item {} to server: {}", item.id, e);
                    report.dropped.push(item.id.clone());
                }
            }
        }

        self.clear()?;
        log::info!(
            "Cart sync: {} of {} items synced",
            report.synced,
            report.attempted
        );

        Ok(report)
    }
}

pub struct CustomPackageStorage<S> {
    buffer: LocalBuffer<S, CustomPackageDraft>,
}

impl<S: KeyValueStore> CustomPackageStorage<S> {
    pub fn new(store: S) -> Self {
        CustomPackageStorage {
            buffer: LocalBuffer::new(store, CUSTOM_PACKAGE_STORAGE_KEY),
        }
    }

    pub fn get_packages(&self) -> Vec<CustomPackageDraft> {
        self.buffer.read()
    }

    pub fn add_package(&self, draft: NewCustomPackageDraft) -> Result<CustomPackageDraft, StorageError> {
        let draft = CustomPackageDraft {
            id: new_local_id(CUSTOM_PACKAGE_ID_PREFIX),
            caterer_id: draft.caterer_id,
            caterer_name: draft.caterer_name,
            dish_ids: draft.dish_ids,
            people_count: draft.people_count,
            dishes: draft.dishes,
            total_price: draft.total_price,
            currency: draft.currency,
            created_at: now_iso(),
        };
        self.buffer.push(&draft)?;
        log::debug!("Buffered custom package {} ({} dishes)", draft.id, draft.dish_ids.len());

        Ok(draft)
    }

    pub fn remove_package(&self, draft_id: &str) -> Result<(), StorageError> {
        self.buffer.remove(draft_id)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.buffer.clear()
    }

    /// Creates every buffered draft as a package on the server, then clears
    /// the buffer whether or not each creation succeeded.
    pub async fn sync_to_server(&self, api: &dyn CateringApi) -> Result<SyncReport, StorageError> {
        let drafts = self.get_packages();
        let mut report = SyncReport::default();
        if drafts.is_empty() {
            return Ok(report);
        }

        for draft in &drafts {
            report.attempted += 1;
            match api
                .create_custom_package(&CreateCustomPackageRequest::from(draft))
                .await
            {
                Ok(_) => report.synced += 1,
                Err(e) => {
                    log::error!("Error syncing custom package {} to server: {}", draft.id, e);
                    report.dropped.push(draft.id.clone());
                }
            }
        }

        self.clear()?;
        log::info!(
            "Custom package sync: {} of {} packages synced",
            report.synced,
            report.attempted
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::cart_types::PackageSnapshot;
    use crate::data_types::catalog_types::CatererSummary;
    use crate::kv_store::MemoryStore;
    use std::sync::Arc;

    fn new_item(package_id: &str) -> NewCartItem {
        NewCartItem {
            package_id: package_id.into(),
            package: PackageSnapshot {
                id: package_id.into(),
                name: "Arabic Feast".into(),
                people_count: 20,
                total_price: 2000.0,
                price_per_person: 100.0,
                currency: "AED".into(),
                cover_image_url: None,
                caterer: CatererSummary::default(),
            },
            location: Some("Dubai Marina".into()),
            guests: Some(30),
            date: Some("2026-12-01T14:00:00.000Z".into()),
            price_at_time: Some(3000.0),
        }
    }

    #[test]
    fn add_item_appends_with_fresh_id() {
        let cart = CartStorage::new(MemoryStore::new());
        let first = cart.add_item(new_item("p1")).unwrap();
        let before = cart.get_items();
        let second = cart.add_item(new_item("p1")).unwrap();
        let after = cart.get_items();

        assert_eq!(after.len(), before.len() + 1);
        assert_ne!(first.id, second.id);
        assert!(second.id.starts_with("local_"));
        assert_eq!(second.created_at, second.updated_at);
        assert_eq!(after.last(), Some(&second));
        assert_eq!(after.first(), Some(&first));
    }

    #[test]
    fn remove_unknown_id_changes_nothing() {
        let cart = CartStorage::new(MemoryStore::new());
        cart.add_item(new_item("p1")).unwrap();
        cart.add_item(new_item("p2")).unwrap();
        let before = cart.get_items();

        cart.remove_item("local_0_missing").unwrap();
        assert_eq!(cart.get_items(), before);
    }

    #[test]
    fn remove_keeps_order_of_the_rest() {
        let cart = CartStorage::new(MemoryStore::new());
        let a = cart.add_item(new_item("a")).unwrap();
        let b = cart.add_item(new_item("b")).unwrap();
        let c = cart.add_item(new_item("c")).unwrap();

        cart.remove_item(&b.id).unwrap();
        cart.remove_item(&b.id).unwrap();
        assert_eq!(cart.get_items(), vec![a, c]);
    }

    #[test]
    fn clear_empties_buffer() {
        let cart = CartStorage::new(MemoryStore::new());
        cart.add_item(new_item("p1")).unwrap();
        cart.clear().unwrap();
        assert!(cart.get_items().is_empty());
        cart.clear().unwrap();
    }

    #[test]
    fn corrupt_buffer_reads_as_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(CART_STORAGE_KEY, "{not json").unwrap();
        let cart = CartStorage::new(Arc::clone(&store));
        assert!(cart.get_items().is_empty());

        // next write replaces the garbage
        cart.add_item(new_item("p1")).unwrap();
        assert_eq!(cart.get_items().len(), 1);
    }

    #[test]
    fn cart_and_drafts_use_separate_keys() {
        let store = Arc::new(MemoryStore::new());
        let cart = CartStorage::new(Arc::clone(&store));
        let drafts = CustomPackageStorage::new(Arc::clone(&store));

        cart.add_item(new_item("p1")).unwrap();
        let draft = drafts
            .add_package(NewCustomPackageDraft {
                caterer_id: "c1".into(),
                caterer_name: "Al Fanar".into(),
                dish_ids: vec!["d1".into(), "d2".into()],
                people_count: 15,
                dishes: Vec::new(),
                total_price: 450.0,
                currency: "AED".into(),
            })
            .unwrap();
        assert!(draft.id.starts_with("custom_"));

        drafts.clear().unwrap();
        assert_eq!(cart.get_items().len(), 1);
        assert!(drafts.get_packages().is_empty());
        assert!(store.get(CUSTOM_PACKAGE_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn local_ids_have_expected_shape() {
        let id = new_local_id("local");
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "local");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}

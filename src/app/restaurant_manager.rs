//! The restaurant data manager.
//!
//! Owns the authoritative in-memory collection and mirrors every mutation into a
//! [`DurableStore`] as one serialized JSON array:
//! 1.  CRUD with id assignment and creation timestamps.
//! 2.  Read-only views: category filter, keyword search, sorted views,
//!     rating thresholds and proximity.
//! 3.  Write-then-commit persistence, so a failed store write never leaves the
//!     in-memory collection ahead of the store.

use crate::domain::location::Coordinate;
use crate::domain::restaurant::{
    Category, NewRestaurant, Restaurant, RestaurantPatch, MAX_RATING, MIN_RATING,
};
use crate::error::{Error, Result};
use crate::storage::{DurableStore, DEFAULT_STORAGE_KEY};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Minimum rating of the "high rated" view.
pub const HIGH_RATING_THRESHOLD: u8 = 4;

/// How `add` picks the next id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdPolicy {
    /// `max(existing ids) + 1`, or 1 when empty. Deleting the highest record
    /// frees its id for the next add.
    #[default]
    MaxPlusOne,
    /// Counter seeded from the max id at load time that never goes down while
    /// the manager is alive.
    Watermark,
}

#[derive(Debug, Clone)]
pub struct ManagerOptions {
    pub storage_key: String,
    pub id_policy: IdPolicy,
    /// Reject adds whose name and address both match an existing record.
    pub reject_duplicates: bool,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            id_policy: IdPolicy::default(),
            reject_duplicates: false,
        }
    }
}

impl ManagerOptions {
    /// Settings used by the API server: stable ids and duplicate rejection.
    pub fn server() -> Self {
        Self {
            id_policy: IdPolicy::Watermark,
            reject_duplicates: true,
            ..Self::default()
        }
    }
}

/// The main component that owns the restaurant collection.
pub struct RestaurantManager {
    store: Arc<dyn DurableStore>,
    options: ManagerOptions,
    restaurants: Vec<Restaurant>,
    /// Highest id assigned or loaded so far.
    watermark: i64,
}

impl RestaurantManager {
    /// Loads the collection from `store` (empty when the key is missing).
    pub async fn load(store: Arc<dyn DurableStore>, options: ManagerOptions) -> Result<Self> {
        let stored: Vec<Restaurant> = match store.get(&options.storage_key).await? {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)?,
            _ => Vec::new(),
        };
        let restaurants = drop_invalid(stored);
        let watermark = restaurants.iter().map(|r| r.id).max().unwrap_or(0);

        info!(
            count = restaurants.len(),
            watermark,
            key = %options.storage_key,
            "Loaded restaurants from store"
        );

        Ok(Self {
            store,
            options,
            restaurants,
            watermark,
        })
    }

    pub fn options(&self) -> &ManagerOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    /// Highest id assigned or loaded so far.
    pub fn watermark(&self) -> i64 {
        self.watermark
    }

    fn next_id(&self) -> Result<i64> {
        let last = match self.options.id_policy {
            IdPolicy::MaxPlusOne => self.restaurants.iter().map(|r| r.id).max().unwrap_or(0),
            IdPolicy::Watermark => self.watermark,
        };
        last.checked_add(1)
            .ok_or_else(|| Error::Storage(anyhow::anyhow!("No ids left after {last}")))
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.restaurants.iter().position(|r| r.id == id)
    }

    /// Serializes `next` into the store; the caller commits it on success.
    async fn persist(&self, next: &[Restaurant]) -> Result<()> {
        let raw = serde_json::to_string(next)?;
        self.store.set(&self.options.storage_key, &raw).await?;
        Ok(())
    }

    /// Validates `data`, assigns an id, stamps `created_at`, appends and persists.
    pub async fn add(&mut self, data: NewRestaurant) -> Result<Restaurant> {
        debug!(name = %data.name, address = %data.address, "Adding restaurant");
        data.validate()?;

        if self.options.reject_duplicates
            && self
                .restaurants
                .iter()
                .any(|r| r.name == data.name && r.address == data.address)
        {
            warn!(name = %data.name, address = %data.address, "Duplicate restaurant rejected");
            return Err(Error::Duplicate {
                name: data.name,
                address: data.address,
            });
        }

        let id = self.next_id()?;
        let record = data.into_record(id, Utc::now());

        let mut next = self.restaurants.clone();
        next.push(record.clone());
        self.persist(&next).await?;

        self.restaurants = next;
        self.watermark = self.watermark.max(id);
        info!(id, name = %record.name, "Restaurant added");
        Ok(record)
    }

    /// Shallow-merges `patch` over the record with `id`.
    pub async fn update(&mut self, id: i64, patch: RestaurantPatch) -> Result<Restaurant> {
        debug!(id, "Updating restaurant");
        let index = self.position(id).ok_or(Error::NotFound { id })?;

        let mut merged = patch.merge_into(&self.restaurants[index])?;
        merged.updated_at = Some(Utc::now());

        let mut next = self.restaurants.clone();
        next[index] = merged.clone();
        self.persist(&next).await?;

        self.restaurants = next;
        info!(id, name = %merged.name, "Restaurant updated");
        Ok(merged)
    }

    /// Removes and returns the record with `id`.
    pub async fn delete(&mut self, id: i64) -> Result<Restaurant> {
        debug!(id, "Deleting restaurant");
        let Some(index) = self.position(id) else {
            warn!(id, "Restaurant to delete not found");
            return Err(Error::NotFound { id });
        };

        let mut next = self.restaurants.clone();
        let removed = next.remove(index);
        self.persist(&next).await?;

        self.restaurants = next;
        info!(id, "Restaurant deleted");
        Ok(removed)
    }

    /// Adds `seed` when the collection is empty. Returns how many were added.
    pub async fn seed_if_empty(&mut self, seed: Vec<NewRestaurant>) -> Result<usize> {
        if !self.restaurants.is_empty() {
            info!("Initial data already present, skipping seed");
            return Ok(0);
        }
        let count = seed.len();
        for data in seed {
            let record = self.add(data).await?;
            debug!(id = record.id, name = %record.name, "Seeded restaurant");
        }
        info!(count, "Seeded initial restaurants");
        Ok(count)
    }

    /// Copy of the whole collection in stored order.
    pub fn all(&self) -> Vec<Restaurant> {
        self.restaurants.clone()
    }

    pub fn get(&self, id: i64) -> Option<Restaurant> {
        self.restaurants.iter().find(|r| r.id == id).cloned()
    }

    pub fn by_category(&self, category: Category) -> Vec<Restaurant> {
        self.filtered(|r| r.category == category)
    }

    /// Case-insensitive substring search over name, address and review.
    pub fn search(&self, query: &str) -> Vec<Restaurant> {
        let needle = query.to_lowercase();
        self.filtered(|r| r.matches_keyword(&needle))
    }

    /// Stable sort by rating; highest first unless `ascending`.
    pub fn sorted_by_rating(&self, ascending: bool) -> Vec<Restaurant> {
        let mut out = self.all();
        if ascending {
            out.sort_by(|a, b| a.rating.cmp(&b.rating));
        } else {
            out.sort_by(|a, b| b.rating.cmp(&a.rating));
        }
        out
    }

    /// Stable sort by creation time; newest first when `newest`.
    pub fn sorted_by_date(&self, newest: bool) -> Vec<Restaurant> {
        let mut out = self.all();
        if newest {
            out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        } else {
            out.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        }
        out
    }

    pub fn with_min_rating(&self, min: u8) -> Vec<Restaurant> {
        self.filtered(|r| r.rating >= min)
    }

    pub fn high_rated(&self) -> Vec<Restaurant> {
        self.with_min_rating(HIGH_RATING_THRESHOLD)
    }

    /// Records strictly closer than `radius_km` to `center`.
    pub fn nearby(&self, center: Coordinate, radius_km: f64) -> Vec<Restaurant> {
        self.filtered(|r| center.distance_km(&r.coordinate()) < radius_km)
    }

    fn filtered(&self, keep: impl Fn(&Restaurant) -> bool) -> Vec<Restaurant> {
        self.restaurants.iter().filter(|r| keep(r)).cloned().collect()
    }
}

/// Skips stored records that break the collection invariants: rating outside
/// 1..=5, coordinates out of range, or an id already seen earlier in the array.
fn drop_invalid(stored: Vec<Restaurant>) -> Vec<Restaurant> {
    let mut seen = HashSet::new();
    stored
        .into_iter()
        .filter(|r| {
            let problem = if !(MIN_RATING..=MAX_RATING).contains(&i64::from(r.rating)) {
                Some("rating out of range")
            } else if !r.coordinate().is_valid() {
                Some("coordinates out of range")
            } else if !seen.insert(r.id) {
                Some("duplicate id")
            } else {
                None
            };
            if let Some(problem) = problem {
                warn!(id = r.id, name = %r.name, problem, "Skipping stored restaurant");
            }
            problem.is_none()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn new_restaurant(name: &str, category: Category, rating: i64) -> NewRestaurant {
        NewRestaurant {
            name: name.to_string(),
            address: format!("{name} street, Jung-gu, Seoul"),
            category,
            rating,
            review: None,
            latitude: 37.5,
            longitude: 127.0,
        }
    }

    async fn empty_manager(policy: IdPolicy) -> (Arc<MemoryStore>, RestaurantManager) {
        let store = Arc::new(MemoryStore::new());
        let options = ManagerOptions {
            id_policy: policy,
            ..ManagerOptions::default()
        };
        let manager = RestaurantManager::load(store.clone(), options).await.unwrap();
        (store, manager)
    }

    fn names(records: &[Restaurant]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[tokio::test]
    async fn add_sort_delete_scenario() -> Result<()> {
        let (_store, mut manager) = empty_manager(IdPolicy::MaxPlusOne).await;

        let a = manager.add(new_restaurant("A", Category::Korean, 4)).await?;
        assert_eq!(a.id, 1);
        assert_eq!(manager.all().len(), 1);

        let b = manager.add(new_restaurant("B", Category::Cafe, 5)).await?;
        assert_eq!(b.id, 2);
        assert_eq!(names(&manager.sorted_by_rating(false)), ["B", "A"]);

        manager.delete(1).await?;
        assert_eq!(names(&manager.all()), ["B"]);
        Ok(())
    }

    #[tokio::test]
    async fn max_plus_one_reuses_freed_top_id() -> Result<()> {
        let (_store, mut manager) = empty_manager(IdPolicy::MaxPlusOne).await;
        manager.add(new_restaurant("A", Category::Korean, 4)).await?;
        manager.add(new_restaurant("B", Category::Korean, 4)).await?;
        manager.delete(2).await?;

        let c = manager.add(new_restaurant("C", Category::Korean, 4)).await?;
        assert_eq!(c.id, 2);

        // Deleting below the max does not matter for either policy.
        manager.delete(1).await?;
        let d = manager.add(new_restaurant("D", Category::Korean, 4)).await?;
        assert_eq!(d.id, 3);
        Ok(())
    }

    #[tokio::test]
    async fn watermark_never_reuses_ids_within_a_session() -> Result<()> {
        let (store, mut manager) = empty_manager(IdPolicy::Watermark).await;
        manager.add(new_restaurant("A", Category::Korean, 4)).await?;
        manager.add(new_restaurant("B", Category::Korean, 4)).await?;
        manager.delete(2).await?;

        let c = manager.add(new_restaurant("C", Category::Korean, 4)).await?;
        assert_eq!(c.id, 3);
        assert_eq!(manager.watermark(), 3);

        // A reload recomputes the watermark from what is stored.
        manager.delete(3).await?;
        let options = ManagerOptions {
            id_policy: IdPolicy::Watermark,
            ..ManagerOptions::default()
        };
        let mut reloaded = RestaurantManager::load(store, options).await?;
        assert_eq!(reloaded.watermark(), 1);
        let d = reloaded.add(new_restaurant("D", Category::Korean, 4)).await?;
        assert_eq!(d.id, 2);
        Ok(())
    }

    #[tokio::test]
    async fn update_merges_only_present_fields() -> Result<()> {
        let (_store, mut manager) = empty_manager(IdPolicy::MaxPlusOne).await;
        let original = manager.add(new_restaurant("A", Category::Korean, 4)).await?;

        let patch = RestaurantPatch {
            rating: Some(2),
            review: Some(Some("Changed my mind".to_string())),
            ..Default::default()
        };
        let updated = manager.update(original.id, patch).await?;

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.rating, 2);
        assert_eq!(updated.review.as_deref(), Some("Changed my mind"));
        assert_eq!(updated.name, original.name);
        assert_eq!(updated.address, original.address);
        assert_eq!(updated.category, original.category);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at.is_some());
        assert_eq!(manager.get(original.id), Some(updated));
        Ok(())
    }

    #[tokio::test]
    async fn missing_id_leaves_store_untouched() -> Result<()> {
        let (store, mut manager) = empty_manager(IdPolicy::MaxPlusOne).await;
        manager.add(new_restaurant("A", Category::Korean, 4)).await?;
        let before = store.get(DEFAULT_STORAGE_KEY).await?;
        let before_all = manager.all();

        let err = manager
            .update(42, RestaurantPatch {
                name: Some("ghost".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { id: 42 }));
        assert!(matches!(manager.delete(42).await, Err(Error::NotFound { id: 42 })));

        assert_eq!(store.get(DEFAULT_STORAGE_KEY).await?, before);
        assert_eq!(manager.all(), before_all);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_update_is_rejected_without_change() -> Result<()> {
        let (_store, mut manager) = empty_manager(IdPolicy::MaxPlusOne).await;
        let a = manager.add(new_restaurant("A", Category::Korean, 4)).await?;
        let bad = RestaurantPatch {
            rating: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            manager.update(a.id, bad).await,
            Err(Error::Validation { .. })
        ));
        assert_eq!(manager.get(a.id), Some(a));
        Ok(())
    }

    #[tokio::test]
    async fn search_is_case_insensitive_over_text_fields() -> Result<()> {
        let (_store, mut manager) = empty_manager(IdPolicy::MaxPlusOne).await;
        let mut with_review = new_restaurant("Gyodong Jjamppong", Category::Chinese, 4);
        with_review.review = Some("Spicy SEAFOOD noodles".into());
        manager.add(with_review).await?;
        manager.add(new_restaurant("Ginza Ryoko", Category::Japanese, 5)).await?;

        assert_eq!(names(&manager.search("seafood")), ["Gyodong Jjamppong"]);
        assert_eq!(names(&manager.search("RYOKO")), ["Ginza Ryoko"]);
        assert_eq!(manager.search("jung-gu").len(), 2);
        assert_eq!(manager.search("a").len(), 2);
        assert!(manager.search("pizza").is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn category_and_rating_views() -> Result<()> {
        let (_store, mut manager) = empty_manager(IdPolicy::MaxPlusOne).await;
        manager.add(new_restaurant("A", Category::Korean, 3)).await?;
        manager.add(new_restaurant("B", Category::Cafe, 5)).await?;
        manager.add(new_restaurant("C", Category::Korean, 4)).await?;

        assert_eq!(names(&manager.by_category(Category::Korean)), ["A", "C"]);
        assert!(manager.by_category(Category::Western).is_empty());
        assert_eq!(names(&manager.high_rated()), ["B", "C"]);
        assert_eq!(names(&manager.with_min_rating(3)), ["A", "B", "C"]);
        Ok(())
    }

    #[tokio::test]
    async fn sorts_are_stable_and_respect_direction() -> Result<()> {
        let stored = json!([
            {"id": 1, "name": "A", "address": "x", "category": "korean", "rating": 4,
             "latitude": 37.5, "longitude": 127.0, "createdAt": "2024-01-01T00:00:00Z"},
            {"id": 2, "name": "B", "address": "x", "category": "korean", "rating": 5,
             "latitude": 37.5, "longitude": 127.0, "createdAt": "2024-01-03T00:00:00Z"},
            {"id": 3, "name": "C", "address": "x", "category": "korean", "rating": 4,
             "latitude": 37.5, "longitude": 127.0, "createdAt": "2024-01-02T00:00:00Z"},
            {"id": 4, "name": "D", "address": "x", "category": "korean", "rating": 5,
             "latitude": 37.5, "longitude": 127.0, "createdAt": "2024-01-03T00:00:00Z"}
        ]);
        let store = Arc::new(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, &stored.to_string()));
        let manager = RestaurantManager::load(store, ManagerOptions::default()).await?;

        assert_eq!(names(&manager.sorted_by_rating(false)), ["B", "D", "A", "C"]);
        assert_eq!(names(&manager.sorted_by_rating(true)), ["A", "C", "B", "D"]);
        assert_eq!(names(&manager.sorted_by_date(true)), ["B", "D", "C", "A"]);
        assert_eq!(names(&manager.sorted_by_date(false)), ["A", "C", "B", "D"]);
        // Stored order is untouched by the views.
        assert_eq!(names(&manager.all()), ["A", "B", "C", "D"]);
        assert_eq!(manager.watermark(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn nearby_uses_haversine_radius() -> Result<()> {
        let (_store, mut manager) = empty_manager(IdPolicy::MaxPlusOne).await;
        let mut near = new_restaurant("Near", Category::Korean, 4);
        near.latitude = 37.563692;
        near.longitude = 126.982814;
        let mut far = new_restaurant("Far", Category::Korean, 4);
        far.latitude = 35.1796;
        far.longitude = 129.0756;
        manager.add(near).await?;
        manager.add(far).await?;

        let city_hall = Coordinate::new(37.566826, 126.9786567);
        assert_eq!(names(&manager.nearby(city_hall, 5.0)), ["Near"]);
        assert_eq!(manager.nearby(city_hall, 500.0).len(), 2);
        assert!(manager.nearby(city_hall, 0.1).is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn store_round_trip_preserves_collection() -> Result<()> {
        let (store, mut manager) = empty_manager(IdPolicy::MaxPlusOne).await;
        let mut a = new_restaurant("A", Category::Western, 3);
        a.review = Some("Steak".into());
        manager.add(a).await?;
        manager.add(new_restaurant("B", Category::Etc, 1)).await?;
        manager
            .update(2, RestaurantPatch {
                address: Some("Moved".into()),
                ..Default::default()
            })
            .await?;

        let reloaded = RestaurantManager::load(store, ManagerOptions::default()).await?;
        assert_eq!(reloaded.all(), manager.all());
        Ok(())
    }

    #[tokio::test]
    async fn returned_vectors_are_copies() -> Result<()> {
        let (_store, mut manager) = empty_manager(IdPolicy::MaxPlusOne).await;
        manager.add(new_restaurant("A", Category::Korean, 4)).await?;
        let mut copy = manager.all();
        copy[0].name = "tampered".into();
        copy.clear();
        assert_eq!(names(&manager.all()), ["A"]);
        Ok(())
    }

    #[tokio::test]
    async fn duplicates_rejected_only_when_enabled() -> Result<()> {
        let store = Arc::new(MemoryStore::new());
        let mut strict = RestaurantManager::load(store, ManagerOptions::server()).await?;
        strict.add(new_restaurant("A", Category::Korean, 4)).await?;
        assert!(matches!(
            strict.add(new_restaurant("A", Category::Korean, 2)).await,
            Err(Error::Duplicate { .. })
        ));
        assert_eq!(strict.len(), 1);

        let (_store, mut lenient) = empty_manager(IdPolicy::MaxPlusOne).await;
        lenient.add(new_restaurant("A", Category::Korean, 4)).await?;
        lenient.add(new_restaurant("A", Category::Korean, 4)).await?;
        assert_eq!(lenient.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn seed_only_fills_an_empty_collection() -> Result<()> {
        let (_store, mut manager) = empty_manager(IdPolicy::Watermark).await;
        let seeded = manager
            .seed_if_empty(crate::domain::seed::initial_restaurants())
            .await?;
        assert_eq!(seeded, 5);
        let again = manager
            .seed_if_empty(crate::domain::seed::initial_restaurants())
            .await?;
        assert_eq!(again, 0);
        assert_eq!(manager.len(), 5);
        Ok(())
    }

    /// Store whose writes can be switched to fail.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
    }

    #[async_trait]
    impl DurableStore for FlakyStore {
        async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                anyhow::bail!("disk full");
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> anyhow::Result<()> {
            self.inner.remove(key).await
        }
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_state() -> Result<()> {
        let store = Arc::new(FlakyStore::default());
        let mut manager = RestaurantManager::load(store.clone(), ManagerOptions::default()).await?;
        manager.add(new_restaurant("A", Category::Korean, 4)).await?;
        let snapshot = manager.all();

        store.fail_writes.store(true, Ordering::SeqCst);
        assert!(matches!(
            manager.add(new_restaurant("B", Category::Korean, 4)).await,
            Err(Error::Storage(_))
        ));
        assert!(manager.delete(1).await.is_err());
        assert!(manager
            .update(1, RestaurantPatch {
                rating: Some(1),
                ..Default::default()
            })
            .await
            .is_err());
        assert_eq!(manager.all(), snapshot);

        store.fail_writes.store(false, Ordering::SeqCst);
        let b = manager.add(new_restaurant("B", Category::Korean, 4)).await?;
        assert_eq!(b.id, 2);
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_store_fails_to_load() {
        let store = Arc::new(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, "{not json"));
        let result = RestaurantManager::load(store, ManagerOptions::default()).await;
        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    fn stored(id: i64, name: &str, rating: u8, latitude: f64) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "address": "Jung-gu",
            "category": "korean",
            "rating": rating,
            "latitude": latitude,
            "longitude": 126.98,
            "createdAt": "2024-03-01T09:00:00Z"
        })
    }

    #[tokio::test]
    async fn load_skips_records_that_break_invariants() -> Result<()> {
        let raw = json!([
            stored(1, "Kept", 4, 37.56),
            stored(1, "Same id", 3, 37.56),
            stored(2, "Too many stars", 9, 37.56),
            stored(3, "No stars", 0, 37.56),
            stored(4, "Off the map", 2, 137.5),
            stored(5, "Also kept", 5, 37.57),
        ])
        .to_string();
        let store = Arc::new(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, &raw));
        let mut manager = RestaurantManager::load(store, ManagerOptions::default()).await?;

        assert_eq!(names(&manager.all()), ["Kept", "Also kept"]);
        assert_eq!(manager.watermark(), 5);

        manager.delete(1).await?;
        assert!(manager.get(1).is_none());
        Ok(())
    }

    #[tokio::test]
    async fn exhausted_id_space_is_an_error() -> Result<()> {
        let raw = json!([stored(i64::MAX, "Last", 4, 37.56)]).to_string();
        for policy in [IdPolicy::MaxPlusOne, IdPolicy::Watermark] {
            let store = Arc::new(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, &raw));
            let options = ManagerOptions {
                id_policy: policy,
                ..ManagerOptions::default()
            };
            let mut manager = RestaurantManager::load(store, options).await?;
            let result = manager.add(new_restaurant("Next", Category::Etc, 3)).await;
            assert!(matches!(result, Err(Error::Storage(_))), "{policy:?}");
            assert_eq!(manager.len(), 1);
        }
        Ok(())
    }
}

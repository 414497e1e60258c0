//! The data-access interface shared by the local and remote variants.

use crate::app::restaurant_manager::RestaurantManager;
use crate::domain::location::{Coordinate, DEFAULT_NEARBY_RADIUS_KM};
use crate::domain::restaurant::{Category, NewRestaurant, Restaurant, RestaurantPatch};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A data manager shared between tasks. Each operation holds the lock for its
/// whole duration.
pub type SharedManager = Arc<Mutex<RestaurantManager>>;

/// Every operation the view layer needs, regardless of where records live.
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    async fn all(&self) -> Result<Vec<Restaurant>>;

    /// Fails with a not-found error when `id` does not exist.
    async fn get(&self, id: i64) -> Result<Restaurant>;

    async fn add(&self, data: NewRestaurant) -> Result<Restaurant>;

    async fn update(&self, id: i64, patch: RestaurantPatch) -> Result<Restaurant>;

    async fn delete(&self, id: i64) -> Result<()>;

    async fn by_category(&self, category: Category) -> Result<Vec<Restaurant>>;

    async fn search(&self, keyword: &str) -> Result<Vec<Restaurant>>;

    /// Highest rating first.
    async fn sorted_by_rating(&self) -> Result<Vec<Restaurant>>;

    /// Newest first.
    async fn sorted_by_date(&self) -> Result<Vec<Restaurant>>;

    async fn high_rated(&self) -> Result<Vec<Restaurant>>;

    async fn with_min_rating(&self, min: u8) -> Result<Vec<Restaurant>>;

    /// `radius_km` defaults to 5 km.
    async fn nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
    ) -> Result<Vec<Restaurant>>;
}

/// Repository over an in-process [`RestaurantManager`].
#[derive(Clone)]
pub struct LocalRepository {
    manager: SharedManager,
}

impl LocalRepository {
    pub fn new(manager: RestaurantManager) -> Self {
        Self::from_shared(Arc::new(Mutex::new(manager)))
    }

    pub fn from_shared(manager: SharedManager) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> SharedManager {
        self.manager.clone()
    }
}

#[async_trait]
impl RestaurantRepository for LocalRepository {
    async fn all(&self) -> Result<Vec<Restaurant>> {
        Ok(self.manager.lock().await.all())
    }

    async fn get(&self, id: i64) -> Result<Restaurant> {
        self.manager
            .lock()
            .await
            .get(id)
            .ok_or(Error::NotFound { id })
    }

    async fn add(&self, data: NewRestaurant) -> Result<Restaurant> {
        self.manager.lock().await.add(data).await
    }

    async fn update(&self, id: i64, patch: RestaurantPatch) -> Result<Restaurant> {
        self.manager.lock().await.update(id, patch).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.manager.lock().await.delete(id).await.map(|_| ())
    }

    async fn by_category(&self, category: Category) -> Result<Vec<Restaurant>> {
        Ok(self.manager.lock().await.by_category(category))
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Restaurant>> {
        Ok(self.manager.lock().await.search(keyword))
    }

    async fn sorted_by_rating(&self) -> Result<Vec<Restaurant>> {
        Ok(self.manager.lock().await.sorted_by_rating(false))
    }

    async fn sorted_by_date(&self) -> Result<Vec<Restaurant>> {
        Ok(self.manager.lock().await.sorted_by_date(true))
    }

    async fn high_rated(&self) -> Result<Vec<Restaurant>> {
        Ok(self.manager.lock().await.high_rated())
    }

    async fn with_min_rating(&self, min: u8) -> Result<Vec<Restaurant>> {
        Ok(self.manager.lock().await.with_min_rating(min))
    }

    async fn nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
    ) -> Result<Vec<Restaurant>> {
        let center = Coordinate::new(latitude, longitude);
        if !center.is_valid() {
            return Err(Error::InvalidLocation {
                latitude,
                longitude,
            });
        }
        let radius = radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
        Ok(self.manager.lock().await.nearby(center, radius))
    }
}

//! Address lookup capability and an offline implementation.

use crate::domain::location::Coordinate;
use crate::domain::restaurant::NewRestaurant;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A forward geocoding result.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeHit {
    pub coordinate: Coordinate,
    pub address: String,
}

/// Converts between coordinates and addresses. `Ok(None)` means no result,
/// `Err` means the lookup itself failed.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse(&self, at: Coordinate) -> Result<Option<String>>;

    async fn forward(&self, query: &str) -> Result<Option<GeocodeHit>>;
}

#[async_trait]
impl<G: Geocoder + ?Sized> Geocoder for Arc<G> {
    async fn reverse(&self, at: Coordinate) -> Result<Option<String>> {
        (**self).reverse(at).await
    }

    async fn forward(&self, query: &str) -> Result<Option<GeocodeHit>> {
        (**self).forward(query).await
    }
}

/// Default distance within which reverse lookups snap to a known address.
pub const DEFAULT_SNAP_DISTANCE_KM: f64 = 1.0;

/// Fixed address table. Forward lookups are case-insensitive substring matches;
/// reverse lookups return the nearest entry within the snap distance.
#[derive(Debug, Clone)]
pub struct GazetteerGeocoder {
    entries: Vec<GeocodeHit>,
    snap_distance_km: f64,
}

impl Default for GazetteerGeocoder {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl GazetteerGeocoder {
    pub fn new(entries: Vec<GeocodeHit>) -> Self {
        Self {
            entries,
            snap_distance_km: DEFAULT_SNAP_DISTANCE_KM,
        }
    }

    pub fn with_snap_distance(mut self, km: f64) -> Self {
        self.snap_distance_km = km;
        self
    }

    /// Table built from the addresses of `records`.
    pub fn from_records(records: &[NewRestaurant]) -> Self {
        Self::new(
            records
                .iter()
                .map(|r| GeocodeHit {
                    coordinate: r.coordinate(),
                    address: r.address.clone(),
                })
                .collect(),
        )
    }

    pub fn insert(&mut self, address: impl Into<String>, at: Coordinate) {
        self.entries.push(GeocodeHit {
            coordinate: at,
            address: address.into(),
        });
    }
}

#[async_trait]
impl Geocoder for GazetteerGeocoder {
    async fn reverse(&self, at: Coordinate) -> Result<Option<String>> {
        let nearest = self
            .entries
            .iter()
            .map(|e| (at.distance_km(&e.coordinate), e))
            .filter(|(d, _)| *d <= self.snap_distance_km)
            .min_by(|(a, _), (b, _)| a.total_cmp(b));
        Ok(nearest.map(|(_, e)| e.address.clone()))
    }

    async fn forward(&self, query: &str) -> Result<Option<GeocodeHit>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(None);
        }
        Ok(self
            .entries
            .iter()
            .find(|e| e.address.to_lowercase().contains(&needle))
            .cloned())
    }
}

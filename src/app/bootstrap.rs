//! Composition root: where records live, which geocoder answers address
//! lookups, and the view controller wired over both.

use crate::app::repository::{LocalRepository, RestaurantRepository};
use crate::app::restaurant_manager::{ManagerOptions, RestaurantManager};
use crate::client::RemoteClient;
use crate::domain::seed::initial_restaurants;
use crate::error::Result;
use crate::infra::config::{self, DataSource};
use crate::map::{GazetteerGeocoder, Geocoder, KakaoGeocoder, MapAdapter, MapCanvas};
use crate::storage::DurableStore;
use crate::ui::{ListView, ViewController};
use std::sync::Arc;
use std::time::Duration;

pub enum Backend {
    /// Records kept by an in-process manager over a durable store.
    Local {
        store: Arc<dyn DurableStore>,
        options: ManagerOptions,
    },
    /// Records served by a remote API.
    Remote { base_url: String },
}

impl Backend {
    pub async fn into_repository(self) -> Result<Arc<dyn RestaurantRepository>> {
        match self {
            Backend::Local { store, options } => {
                let manager = RestaurantManager::load(store, options).await?;
                tracing::info!(records = manager.len(), "Using local restaurant store");
                Ok(Arc::new(LocalRepository::new(manager)))
            }
            Backend::Remote { base_url } => {
                tracing::info!(%base_url, "Using remote restaurant API");
                Ok(Arc::new(RemoteClient::new(base_url)))
            }
        }
    }
}

/// Everything the view layer needs from configuration.
pub struct ViewSettings {
    pub backend: Backend,
    pub kakao_api_key: Option<String>,
    pub revert_delay: Duration,
}

impl ViewSettings {
    /// Reads `MOTMAP_DATA_SOURCE` (with the store or API settings it implies),
    /// `KAKAO_REST_API_KEY` and `MOTMAP_ERROR_REVERT_MS`.
    pub async fn from_env() -> anyhow::Result<Self> {
        let backend = match config::data_source()? {
            DataSource::Local => Backend::Local {
                store: config::open_store(config::store_backend()?).await?,
                options: ManagerOptions::default(),
            },
            DataSource::Remote => Backend::Remote {
                base_url: config::api_base_url(),
            },
        };
        Ok(Self {
            backend,
            kakao_api_key: config::kakao_api_key(),
            revert_delay: config::error_revert_delay()?,
        })
    }
}

/// Kakao when a key is configured, otherwise the offline table of the seed
/// addresses.
pub fn geocoder_for(kakao_api_key: Option<String>) -> Arc<dyn Geocoder> {
    match kakao_api_key {
        Some(key) => {
            tracing::info!("Using Kakao geocoder");
            Arc::new(KakaoGeocoder::new(key))
        }
        None => {
            tracing::info!("No Kakao key, using offline geocoder");
            Arc::new(GazetteerGeocoder::from_records(&initial_restaurants()))
        }
    }
}

/// Builds a view controller over `canvas` and `view`. Call
/// [`ViewController::run`] (or `init`) on the result to start it.
pub async fn compose<C: MapCanvas, V: ListView>(
    settings: ViewSettings,
    canvas: C,
    view: V,
) -> Result<ViewController<C, Arc<dyn Geocoder>, V>> {
    let repo = settings.backend.into_repository().await?;
    let map = MapAdapter::new(canvas, geocoder_for(settings.kakao_api_key));
    Ok(ViewController::new(repo, map, view).with_revert_delay(settings.revert_delay))
}

use crate::app::repository::SharedManager;
use crate::domain::restaurant::Restaurant;
use crate::error::Error;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub manager: SharedManager,
}

/// A record as returned by the API: the stored fields plus the category label.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantResponse {
    #[serde(flatten)]
    pub record: Restaurant,
    pub category_display_name: String,
}

impl From<Restaurant> for RestaurantResponse {
    fn from(record: Restaurant) -> Self {
        let category_display_name = record.category.display_name().to_string();
        Self {
            record,
            category_display_name,
        }
    }
}

pub fn to_responses(records: Vec<Restaurant>) -> Vec<RestaurantResponse> {
    records.into_iter().map(RestaurantResponse::from).collect()
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub restaurants: usize,
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct SearchQuery {
    /// Matched case-insensitively against name, address and review.
    pub keyword: String,
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Search radius in kilometres (default 5).
    #[serde(default)]
    pub radius: Option<f64>,
}

pub fn invalid_json(err: JsonRejection) -> Error {
    Error::InvalidRequest {
        message: format!("Invalid JSON body: {}", err.body_text()),
    }
}

pub fn invalid_query(err: QueryRejection) -> Error {
    Error::InvalidRequest {
        message: format!("Invalid query parameters: {}", err.body_text()),
    }
}

pub fn invalid_path(err: PathRejection) -> Error {
    Error::InvalidRequest {
        message: format!("Invalid path parameter: {}", err.body_text()),
    }
}

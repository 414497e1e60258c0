//! Geocoding through the Kakao Local REST API.

use crate::domain::location::Coordinate;
use crate::error::{Error, Result};
use crate::map::geocoder::{GeocodeHit, Geocoder};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const KAKAO_API_BASE_URL: &str = "https://dapi.kakao.com";

#[derive(Debug, Deserialize)]
struct Documents<T> {
    documents: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct AddressDocument {
    address_name: String,
    /// Longitude, as a decimal string.
    x: String,
    /// Latitude, as a decimal string.
    y: String,
}

#[derive(Debug, Deserialize)]
struct CoordDocument {
    address: Option<AddressName>,
    road_address: Option<AddressName>,
}

#[derive(Debug, Deserialize)]
struct AddressName {
    address_name: String,
}

#[derive(Clone)]
pub struct KakaoGeocoder {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl KakaoGeocoder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, KAKAO_API_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn lookup<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<T>> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("KakaoAK {}", self.api_key))
            .query(query)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(%url, error = %e, "Geocoding request failed");
                Error::Geocoding(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(%url, status = status.as_u16(), "Geocoding service returned an error");
            return Err(Error::Geocoding(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body: Documents<T> = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("unexpected response: {e}")))?;
        Ok(body.documents)
    }
}

#[async_trait]
impl Geocoder for KakaoGeocoder {
    async fn reverse(&self, at: Coordinate) -> Result<Option<String>> {
        let docs: Vec<CoordDocument> = self
            .lookup(
                "/v2/local/geo/coord2address.json",
                &[("x", at.longitude.to_string()), ("y", at.latitude.to_string())],
            )
            .await?;
        Ok(docs
            .into_iter()
            .next()
            .and_then(|d| d.address.or(d.road_address))
            .map(|a| a.address_name))
    }

    async fn forward(&self, query: &str) -> Result<Option<GeocodeHit>> {
        let docs: Vec<AddressDocument> = self
            .lookup("/v2/local/search/address.json", &[("query", query.to_string())])
            .await?;
        let Some(first) = docs.into_iter().next() else {
            return Ok(None);
        };

        let parse = |raw: &str| {
            raw.parse::<f64>()
                .map_err(|_| Error::Geocoding(format!("bad coordinate '{raw}'")))
        };
        Ok(Some(GeocodeHit {
            coordinate: Coordinate::new(parse(&first.y)?, parse(&first.x)?),
            address: first.address_name,
        }))
    }
}

//! HTTP client for the restaurant REST API.

use crate::app::repository::RestaurantRepository;
use crate::domain::location::DEFAULT_NEARBY_RADIUS_KM;
use crate::domain::restaurant::{Category, NewRestaurant, Restaurant, RestaurantPatch};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// Talks to `/api/restaurants` on a remote server. One attempt per call.
#[derive(Clone, Debug)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteClient {
    /// `base_url` is the collection root, e.g. `http://127.0.0.1:8080/api/restaurants`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one request. `Ok(None)` means the server answered 204 or an empty body.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<JsonValue>,
    ) -> Result<Option<T>> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "API request");

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(%method, %url, error = %e, "API request could not be sent");
            Error::Transport {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let bytes = response.bytes().await.map_err(|e| {
            tracing::error!(%method, %url, error = %e, "Failed to read API response");
            Error::Transport {
                status: Some(status.as_u16()),
                message: e.to_string(),
            }
        })?;

        if !status.is_success() {
            let message = error_message(status, &bytes);
            tracing::error!(%method, %url, status = status.as_u16(), %message, "API request failed");
            return Err(Error::Transport {
                status: Some(status.as_u16()),
                message,
            });
        }

        if bytes.is_empty() {
            return Ok(None);
        }
        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            tracing::error!(%method, %url, error = %e, "Unexpected API response body");
            Error::Serialization(e)
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        self.request(Method::GET, path, query, None)
            .await?
            .ok_or_else(|| empty_body(path))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: JsonValue,
    ) -> Result<T> {
        self.request(method, path, &[], Some(body))
            .await?
            .ok_or_else(|| empty_body(path))
    }
}

/// The `message` field of a JSON error body, or `HTTP {status}: {reason}`.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<JsonValue>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(JsonValue::as_str).map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )
        })
}

fn empty_body(path: &str) -> Error {
    Error::Transport {
        status: None,
        message: format!("Empty response body from {path}"),
    }
}

#[async_trait]
impl RestaurantRepository for RemoteClient {
    async fn all(&self) -> Result<Vec<Restaurant>> {
        self.fetch("", &[]).await
    }

    async fn get(&self, id: i64) -> Result<Restaurant> {
        self.fetch(&format!("/{id}"), &[]).await
    }

    async fn add(&self, data: NewRestaurant) -> Result<Restaurant> {
        self.send_json(Method::POST, "", serde_json::to_value(data)?)
            .await
    }

    async fn update(&self, id: i64, patch: RestaurantPatch) -> Result<Restaurant> {
        self.send_json(Method::PUT, &format!("/{id}"), serde_json::to_value(patch)?)
            .await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.request::<JsonValue>(Method::DELETE, &format!("/{id}"), &[], None)
            .await
            .map(|_| ())
    }

    async fn by_category(&self, category: Category) -> Result<Vec<Restaurant>> {
        self.fetch(&format!("/category/{}", category.as_str()), &[])
            .await
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Restaurant>> {
        self.fetch("/search", &[("keyword", keyword.to_string())])
            .await
    }

    async fn sorted_by_rating(&self) -> Result<Vec<Restaurant>> {
        self.fetch("/sorted/rating", &[]).await
    }

    async fn sorted_by_date(&self) -> Result<Vec<Restaurant>> {
        self.fetch("/sorted/date", &[]).await
    }

    async fn high_rated(&self) -> Result<Vec<Restaurant>> {
        self.fetch("/high-rated", &[]).await
    }

    async fn with_min_rating(&self, min: u8) -> Result<Vec<Restaurant>> {
        self.fetch(&format!("/rating/{min}"), &[]).await
    }

    async fn nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
    ) -> Result<Vec<Restaurant>> {
        let radius = radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
        self.fetch(
            "/nearby",
            &[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("radius", radius.to_string()),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(id: i64, name: &str) -> JsonValue {
        json!({
            "id": id,
            "name": name,
            "address": "Jung-gu, Seoul",
            "category": "korean",
            "categoryDisplayName": "Korean",
            "rating": 4,
            "review": null,
            "latitude": 37.56,
            "longitude": 126.98,
            "createdAt": "2025-09-29T00:45:00"
        })
    }

    async fn client_for(server: &MockServer) -> RemoteClient {
        RemoteClient::new(format!("{}/api/restaurants/", server.uri()))
    }

    #[tokio::test]
    async fn lists_records_and_ignores_extra_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/restaurants"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([record(1, "A"), record(2, "B")])))
            .expect(1)
            .mount(&server)
            .await;

        let all = client_for(&server).await.all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].name, "B");
        assert_eq!(all[0].created_at.to_rfc3339(), "2025-09-29T00:45:00+00:00");
    }

    #[tokio::test]
    async fn search_sends_encoded_keyword() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/restaurants/search"))
            .and(query_param("keyword", "kal guksu & co"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([record(3, "Kal guksu & co")])))
            .expect(1)
            .mount(&server)
            .await;

        let hits = client_for(&server).await.search("kal guksu & co").await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn add_posts_json_body() {
        let server = MockServer::start().await;
        let data = NewRestaurant {
            name: "A".into(),
            address: "Jung-gu, Seoul".into(),
            category: Category::Korean,
            rating: 4,
            review: None,
            latitude: 37.56,
            longitude: 126.98,
        };
        Mock::given(method("POST"))
            .and(path("/api/restaurants"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::to_value(&data).unwrap()))
            .respond_with(ResponseTemplate::new(201).set_body_json(record(7, "A")))
            .expect(1)
            .mount(&server)
            .await;

        let created = client_for(&server).await.add(data).await.unwrap();
        assert_eq!(created.id, 7);
    }

    #[tokio::test]
    async fn delete_accepts_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/restaurants/4"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).await.delete(4).await.unwrap();
    }

    #[tokio::test]
    async fn server_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/restaurants/9"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "code": "R001",
                "message": "Restaurant not found. ID: 9",
                "status": 404,
                "timestamp": "2025-09-29T00:45:00Z"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).await.get(9).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Restaurant not found. ID: 9");
    }

    #[tokio::test]
    async fn non_json_error_falls_back_to_status_line() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/restaurants/high-rated"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.high_rated().await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
        assert!(matches!(err, Error::Transport { status: Some(503), .. }));
    }

    #[tokio::test]
    async fn nearby_defaults_radius() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/restaurants/nearby"))
            .and(query_param("latitude", "37.5"))
            .and(query_param("longitude", "127"))
            .and(query_param("radius", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let hits = client_for(&server).await.nearby(37.5, 127.0, None).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let client = RemoteClient::new("http://127.0.0.1:9/api/restaurants");
        let err = client.all().await.unwrap_err();
        assert!(matches!(err, Error::Transport { status: None, .. }));
    }
}

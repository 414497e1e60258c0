//! `/api/restaurants` handlers over the shared data manager.

use crate::domain::location::{Coordinate, DEFAULT_NEARBY_RADIUS_KM};
use crate::domain::restaurant::{Category, NewRestaurant, RestaurantPatch, MAX_RATING, MIN_RATING};
use crate::error::{Error, ErrorResponse, Result};
use crate::transport::http::types::{
    invalid_json, invalid_path, invalid_query, to_responses, AppState, NearbyQuery,
    RestaurantResponse, SearchQuery,
};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

type ListResult = Result<Json<Vec<RestaurantResponse>>>;

#[utoipa::path(
    get,
    path = "/api/restaurants",
    responses((status = 200, description = "All restaurants", body = [RestaurantResponse]))
)]
pub async fn list_handler(State(state): State<AppState>) -> ListResult {
    let manager = state.manager.lock().await;
    Ok(Json(to_responses(manager.all())))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/{id}",
    params(("id" = i64, Path, description = "Restaurant id")),
    responses(
        (status = 200, description = "The restaurant", body = RestaurantResponse),
        (status = 404, description = "No such restaurant", body = ErrorResponse)
    )
)]
pub async fn get_handler(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<RestaurantResponse>> {
    let Path(id) = id.map_err(invalid_path)?;
    let manager = state.manager.lock().await;
    let record = manager.get(id).ok_or(Error::NotFound { id })?;
    Ok(Json(record.into()))
}

#[utoipa::path(
    post,
    path = "/api/restaurants",
    request_body = NewRestaurant,
    responses(
        (status = 201, description = "Created", body = RestaurantResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Same name and address already registered", body = ErrorResponse)
    )
)]
pub async fn create_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<NewRestaurant>, JsonRejection>,
) -> Result<(StatusCode, Json<RestaurantResponse>)> {
    let Json(data) = body.map_err(invalid_json)?;
    let mut manager = state.manager.lock().await;
    let record = manager.add(data).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

#[utoipa::path(
    put,
    path = "/api/restaurants/{id}",
    params(("id" = i64, Path, description = "Restaurant id")),
    request_body = RestaurantPatch,
    responses(
        (status = 200, description = "Updated", body = RestaurantResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "No such restaurant", body = ErrorResponse)
    )
)]
pub async fn update_handler(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
    body: std::result::Result<Json<RestaurantPatch>, JsonRejection>,
) -> Result<Json<RestaurantResponse>> {
    let Path(id) = id.map_err(invalid_path)?;
    let Json(patch) = body.map_err(invalid_json)?;
    let mut manager = state.manager.lock().await;
    let record = manager.update(id, patch).await?;
    Ok(Json(record.into()))
}

#[utoipa::path(
    delete,
    path = "/api/restaurants/{id}",
    params(("id" = i64, Path, description = "Restaurant id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such restaurant", body = ErrorResponse)
    )
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<StatusCode> {
    let Path(id) = id.map_err(invalid_path)?;
    let mut manager = state.manager.lock().await;
    manager.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/restaurants/category/{category}",
    params(("category" = String, Path, description = "korean, chinese, japanese, western, cafe or etc")),
    responses(
        (status = 200, description = "Restaurants in the category", body = [RestaurantResponse]),
        (status = 400, description = "Unknown category", body = ErrorResponse)
    )
)]
pub async fn by_category_handler(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ListResult {
    let category: Category = category.parse()?;
    let manager = state.manager.lock().await;
    Ok(Json(to_responses(manager.by_category(category))))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/rating/{rating}",
    params(("rating" = i64, Path, description = "Minimum rating, 1 to 5")),
    responses(
        (status = 200, description = "Restaurants rated at least `rating`", body = [RestaurantResponse]),
        (status = 400, description = "Rating out of range", body = ErrorResponse)
    )
)]
pub async fn min_rating_handler(
    State(state): State<AppState>,
    rating: std::result::Result<Path<i64>, PathRejection>,
) -> ListResult {
    let Path(rating) = rating.map_err(invalid_path)?;
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(Error::InvalidRating(rating));
    }
    let manager = state.manager.lock().await;
    Ok(Json(to_responses(manager.with_min_rating(rating as u8))))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching restaurants", body = [RestaurantResponse]),
        (status = 400, description = "Missing keyword", body = ErrorResponse)
    )
)]
pub async fn search_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<SearchQuery>, QueryRejection>,
) -> ListResult {
    let Query(query) = query.map_err(invalid_query)?;
    tracing::debug!(keyword = %query.keyword, "Keyword search");
    let manager = state.manager.lock().await;
    Ok(Json(to_responses(manager.search(&query.keyword))))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/sorted/rating",
    responses((status = 200, description = "Highest rating first", body = [RestaurantResponse]))
)]
pub async fn sorted_by_rating_handler(State(state): State<AppState>) -> ListResult {
    let manager = state.manager.lock().await;
    Ok(Json(to_responses(manager.sorted_by_rating(false))))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/sorted/date",
    responses((status = 200, description = "Newest first", body = [RestaurantResponse]))
)]
pub async fn sorted_by_date_handler(State(state): State<AppState>) -> ListResult {
    let manager = state.manager.lock().await;
    Ok(Json(to_responses(manager.sorted_by_date(true))))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/high-rated",
    responses((status = 200, description = "Restaurants rated 4 or higher", body = [RestaurantResponse]))
)]
pub async fn high_rated_handler(State(state): State<AppState>) -> ListResult {
    let manager = state.manager.lock().await;
    Ok(Json(to_responses(manager.high_rated())))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/nearby",
    params(NearbyQuery),
    responses(
        (status = 200, description = "Restaurants within the radius", body = [RestaurantResponse]),
        (status = 400, description = "Invalid coordinates", body = ErrorResponse)
    )
)]
pub async fn nearby_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<NearbyQuery>, QueryRejection>,
) -> ListResult {
    let Query(query) = query.map_err(invalid_query)?;
    let center = Coordinate::new(query.latitude, query.longitude);
    if !center.is_valid() {
        return Err(Error::InvalidLocation {
            latitude: query.latitude,
            longitude: query.longitude,
        });
    }
    let radius = query.radius.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
    tracing::debug!(?center, radius, "Nearby search");
    let manager = state.manager.lock().await;
    Ok(Json(to_responses(manager.nearby(center, radius))))
}

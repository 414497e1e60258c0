use crate::domain::location::Coordinate;
use crate::domain::restaurant::{Category, NewRestaurant, Restaurant, RestaurantPatch};
use crate::error::ErrorResponse;
use crate::transport::http::handlers::{health, restaurants};
use crate::transport::http::types::{AppState, HealthResponse, RestaurantResponse};
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        restaurants::list_handler,
        restaurants::get_handler,
        restaurants::create_handler,
        restaurants::update_handler,
        restaurants::delete_handler,
        restaurants::by_category_handler,
        restaurants::min_rating_handler,
        restaurants::search_handler,
        restaurants::sorted_by_rating_handler,
        restaurants::sorted_by_date_handler,
        restaurants::high_rated_handler,
        restaurants::nearby_handler
    ),
    components(schemas(
        Restaurant,
        RestaurantResponse,
        NewRestaurant,
        RestaurantPatch,
        Category,
        Coordinate,
        ErrorResponse,
        HealthResponse
    )),
    tags((name = "restaurants", description = "Bookmarked restaurants"))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/",
            get(restaurants::list_handler).post(restaurants::create_handler),
        )
        .route(
            "/:id",
            get(restaurants::get_handler)
                .put(restaurants::update_handler)
                .delete(restaurants::delete_handler),
        )
        .route("/category/:category", get(restaurants::by_category_handler))
        .route("/rating/:rating", get(restaurants::min_rating_handler))
        .route("/search", get(restaurants::search_handler))
        .route("/sorted/rating", get(restaurants::sorted_by_rating_handler))
        .route("/sorted/date", get(restaurants::sorted_by_date_handler))
        .route("/high-rated", get(restaurants::high_rated_handler))
        .route("/nearby", get(restaurants::nearby_handler));

    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .nest("/api/restaurants", api)
        .with_state(app_state)
}

// MOTMAP API server.

use motmap::app::repository::SharedManager;
use motmap::app::restaurant_manager::{ManagerOptions, RestaurantManager};
use motmap::domain::seed::initial_restaurants;
use motmap::infra::{config, telemetry};
use motmap::transport;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init_tracing()?;

    // --- Store + data manager ---
    let backend = config::store_backend()?;
    tracing::info!(?backend, "Opening durable store");
    let store = config::open_store(backend).await?;

    let mut manager = RestaurantManager::load(store, ManagerOptions::server()).await?;
    if config::seed_enabled()? {
        let seeded = manager.seed_if_empty(initial_restaurants()).await?;
        if seeded > 0 {
            tracing::info!(seeded, "Initial restaurant data loaded");
        }
    }
    let manager: SharedManager = Arc::new(Mutex::new(manager));

    // --- API server ---
    let app_state = transport::http::AppState {
        manager: manager.clone(),
    };
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = config::bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on http://{}", listener.local_addr()?);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", listener.local_addr()?);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            let count = manager.lock().await.len();
            tracing::info!(restaurants = count, "Shutdown signal received, stopping");
        }
    }

    Ok(())
}

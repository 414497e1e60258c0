use motmap::app::bootstrap::{self, ViewSettings};
use motmap::app::restaurant_manager::{ManagerOptions, RestaurantManager};
use motmap::app::repository::RestaurantRepository;
use motmap::client::RemoteClient;
use motmap::infra::config;
use motmap::map::{Geocoder, HeadlessCanvas, KakaoGeocoder};
use motmap::ui::HeadlessView;
use std::time::Duration;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--remote] [--geocode] [--view]\n\
         \n\
         Reads env vars (all optional):\n\
           MOTMAP_BIND_ADDR, MOTMAP_STORE, MOTMAP_DATA_DIR, DATABASE_URL, MOTMAP_SEED,\n\
           MOTMAP_DATA_SOURCE, MOTMAP_API_BASE_URL, KAKAO_REST_API_KEY, MOTMAP_ERROR_REVERT_MS\n\
         \n\
           --remote   also check that the API at MOTMAP_API_BASE_URL answers\n\
           --geocode  also run one Kakao address lookup\n\
           --view     also build the view layer headlessly and render the list once\n"
    );
    std::process::exit(2);
}

/// `/health` next to the collection root, e.g. `http://host:8080/health`.
fn health_url(api_base_url: &str) -> String {
    let base = api_base_url.trim_end_matches('/');
    let root = base.strip_suffix("/api/restaurants").unwrap_or(base);
    format!("{root}/health")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let check_remote = args.iter().any(|a| a == "--remote");
    let check_geocode = args.iter().any(|a| a == "--geocode");
    let check_view = args.iter().any(|a| a == "--view");

    // Force-read config (nice error messages if invalid)
    let bind = config::bind_addr()?;
    let backend = config::store_backend()?;
    let seed = config::seed_enabled()?;
    let revert = config::error_revert_delay()?;
    let source = config::data_source()?;
    let api_base_url = config::api_base_url();
    let kakao_key = config::kakao_api_key();

    println!("> Preflight:");
    println!("  MOTMAP_BIND_ADDR={}", bind);
    println!("  MOTMAP_STORE={:?}", backend);
    println!("  MOTMAP_DATA_DIR={}", config::data_dir().display());
    println!("  MOTMAP_SEED={}", seed);
    println!("  MOTMAP_DATA_SOURCE={:?}", source);
    println!("  MOTMAP_API_BASE_URL={}", api_base_url);
    println!("  MOTMAP_ERROR_REVERT_MS={}", revert.as_millis());
    println!(
        "  KAKAO_REST_API_KEY={}",
        if kakao_key.is_some() { "set" } else { "not set (offline geocoder)" }
    );

    // Store is reachable and its contents parse
    let store = config::open_store(backend).await?;
    let manager = RestaurantManager::load(store, ManagerOptions::server()).await?;
    println!("  Store readable: {} restaurants, highest id {}", manager.len(), manager.watermark());

    if check_remote {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        let url = health_url(&api_base_url);
        let response = http
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("API not reachable at {}: {}", url, e))?;
        if !response.status().is_success() {
            anyhow::bail!("API health check returned {}", response.status());
        }
        println!("  API health: ok ({})", url);

        let remote = RemoteClient::with_client(http, api_base_url.clone());
        let count = remote.all().await?.len();
        println!("  API lists {} restaurants", count);
    }

    if check_geocode {
        let Some(key) = kakao_key else {
            anyhow::bail!("--geocode needs KAKAO_REST_API_KEY");
        };
        let hit = KakaoGeocoder::new(key).forward("Sejong-daero 110").await?;
        match hit {
            Some(hit) => println!(
                "  Kakao geocoder: ok ({} -> {:.6}, {:.6})",
                hit.address, hit.coordinate.latitude, hit.coordinate.longitude
            ),
            None => eprintln!("  Warning: Kakao geocoder answered but found nothing."),
        }
    }

    if check_view {
        let settings = ViewSettings::from_env().await?;
        let view = HeadlessView::new();
        let mut ui = bootstrap::compose(settings, HeadlessCanvas::new(), view.clone()).await?;
        ui.init().await;
        let screen = view.snapshot();
        if let Some(error) = screen.error() {
            anyhow::bail!("View layer could not load the list: {}", error);
        }
        println!(
            "  View layer: {} restaurants listed, {} markers, revert after {} ms",
            screen.items().len(),
            ui.map().canvas().marker_count(),
            ui.revert_delay().as_millis()
        );
    }

    println!("> Preflight OK.");
    Ok(())
}

//! Restart test:
//! 1) Start a server over a file store in a temp dir and write through the API.
//! 2) Stop it (simulated restart).
//! 3) Start a second server on the same directory and check the data survived.

use motmap::storage::{FileStore, DEFAULT_STORAGE_KEY};
use motmap::{
    transport, Category, ManagerOptions, NewRestaurant, RemoteClient, RestaurantManager,
    RestaurantRepository,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

async fn start_server(
    dir: &Path,
) -> Result<(String, tokio::task::JoinHandle<()>), Box<dyn std::error::Error>> {
    let store = Arc::new(FileStore::open(dir).await?);
    let manager = RestaurantManager::load(store, ManagerOptions::server()).await?;
    let state = transport::http::AppState {
        manager: Arc::new(Mutex::new(manager)),
    };
    let router = transport::http::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Ok((format!("http://{addr}/api/restaurants"), server))
}

fn place(name: &str, rating: i64) -> NewRestaurant {
    NewRestaurant {
        name: name.to_string(),
        address: format!("{name}, Mapo-gu, Seoul"),
        category: Category::Japanese,
        rating,
        review: Some("Omakase".into()),
        latitude: 37.5563,
        longitude: 126.9236,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_restart_keeps_records() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;

    // --- Phase A ---
    let (url_a, server_a) = start_server(dir.path()).await?;
    let api_a = RemoteClient::new(url_a);
    let first = api_a.add(place("Sushi Hiro", 5)).await?;
    let second = api_a.add(place("Ramen Taro", 3)).await?;
    api_a.delete(first.id).await?;
    server_a.abort();

    let raw = tokio::fs::read_to_string(dir.path().join(format!("{DEFAULT_STORAGE_KEY}.json"))).await?;
    assert!(raw.contains("Ramen Taro"));
    assert!(!raw.contains("Sushi Hiro"));

    // --- Phase B ---
    let (url_b, _server_b) = start_server(dir.path()).await?;
    let api_b = RemoteClient::new(url_b);
    let all = api_b.all().await?;
    assert_eq!(all, vec![second.clone()]);
    assert_eq!(all[0].created_at, second.created_at);

    let third = api_b.add(place("Udon Jiro", 4)).await?;
    assert_eq!(third.id, second.id + 1);
    assert_eq!(api_b.sorted_by_rating().await?.first().map(|r| r.id), Some(third.id));
    Ok(())
}

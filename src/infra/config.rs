//! Centralized configuration (environment variables + defaults).

use crate::storage::{DurableStore, FileStore, MemoryStore, PostgresStore};
use anyhow::{anyhow, Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080/api/restaurants";
pub const DEFAULT_ERROR_REVERT_MS: u64 = 3000;

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Where the server listens (`MOTMAP_BIND_ADDR`).
pub fn bind_addr() -> Result<SocketAddr> {
    let raw = var("MOTMAP_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    raw.parse()
        .with_context(|| format!("MOTMAP_BIND_ADDR must be host:port, got '{raw}'"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    Memory,
    #[default]
    File,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "file" => Ok(StoreBackend::File),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            other => Err(anyhow!(
                "MOTMAP_STORE must be one of memory, file, postgres; got '{other}'"
            )),
        }
    }
}

/// Durable store kind (`MOTMAP_STORE`, default `file`).
pub fn store_backend() -> Result<StoreBackend> {
    var("MOTMAP_STORE").map_or(Ok(StoreBackend::default()), |raw| raw.parse())
}

/// Directory of the file store (`MOTMAP_DATA_DIR`).
pub fn data_dir() -> PathBuf {
    PathBuf::from(var("MOTMAP_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()))
}

/// Database URL; required only for the postgres store.
pub fn database_url() -> Result<String> {
    var("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL must be set for MOTMAP_STORE=postgres"))
}

/// Whether an empty server store gets the initial records (`MOTMAP_SEED`, default true).
pub fn seed_enabled() -> Result<bool> {
    var("MOTMAP_SEED").map_or(Ok(true), |raw| parse_flag("MOTMAP_SEED", &raw))
}

/// Where the view layer reads records from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSource {
    /// In-process data manager over the configured store.
    #[default]
    Local,
    /// The REST API at [`api_base_url`].
    Remote,
}

impl FromStr for DataSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(DataSource::Local),
            "remote" | "api" => Ok(DataSource::Remote),
            other => Err(anyhow!(
                "MOTMAP_DATA_SOURCE must be local or remote; got '{other}'"
            )),
        }
    }
}

/// Data source of the view layer (`MOTMAP_DATA_SOURCE`, default `local`).
pub fn data_source() -> Result<DataSource> {
    var("MOTMAP_DATA_SOURCE").map_or(Ok(DataSource::default()), |raw| raw.parse())
}

/// Collection root of the remote API (`MOTMAP_API_BASE_URL`).
pub fn api_base_url() -> String {
    var("MOTMAP_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

/// Kakao Local REST key, when the Kakao geocoder should be used.
pub fn kakao_api_key() -> Option<String> {
    var("KAKAO_REST_API_KEY")
}

/// Delay before an inline error reverts to the full list (`MOTMAP_ERROR_REVERT_MS`).
pub fn error_revert_delay() -> Result<Duration> {
    let ms = match var("MOTMAP_ERROR_REVERT_MS") {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("MOTMAP_ERROR_REVERT_MS must be milliseconds, got '{raw}'"))?,
        None => DEFAULT_ERROR_REVERT_MS,
    };
    Ok(Duration::from_millis(ms))
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(anyhow!("{name} must be true or false, got '{raw}'")),
    }
}

/// Opens the configured durable store.
pub async fn open_store(backend: StoreBackend) -> Result<Arc<dyn DurableStore>> {
    let store: Arc<dyn DurableStore> = match backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::File => Arc::new(FileStore::open(data_dir()).await?),
        StoreBackend::Postgres => Arc::new(PostgresStore::connect(&database_url()?).await?),
    };
    Ok(store)
}

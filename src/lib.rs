pub mod app;
pub mod client;
pub mod domain;
pub mod error;
pub mod infra;
pub mod map;
pub mod storage;
pub mod transport;
pub mod ui;

// Convenience re-exports (keeps call-sites clean)
pub use app::bootstrap::Backend;
pub use app::repository::{LocalRepository, RestaurantRepository, SharedManager};
pub use app::restaurant_manager::{IdPolicy, ManagerOptions, RestaurantManager};
pub use client::RemoteClient;
pub use domain::{Category, Coordinate, NewRestaurant, Restaurant, RestaurantPatch};
pub use error::{Error, ErrorCode, ErrorResponse, Result};

pub mod bootstrap;
pub mod repository;
pub mod restaurant_manager;

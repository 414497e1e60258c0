//! Domain types: the restaurant record, coordinates and seed data.

pub mod location;
pub mod restaurant;
pub mod seed;

pub use location::{Coordinate, DEFAULT_NEARBY_RADIUS_KM};
pub use restaurant::{Category, NewRestaurant, Restaurant, RestaurantPatch, NO_REVIEW_PLACEHOLDER};

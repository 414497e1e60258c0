//! The restaurant record and its creation / update payloads.

use crate::domain::location::Coordinate;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Placeholder shown wherever a record has no review.
pub const NO_REVIEW_PLACEHOLDER: &str = "No review";

/// Cuisine category. Serialized lowercase; reading is lenient and maps anything
/// unrecognized to [`Category::Etc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Korean,
    Chinese,
    Japanese,
    Western,
    Cafe,
    Etc,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Korean,
        Category::Chinese,
        Category::Japanese,
        Category::Western,
        Category::Cafe,
        Category::Etc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Korean => "korean",
            Category::Chinese => "chinese",
            Category::Japanese => "japanese",
            Category::Western => "western",
            Category::Cafe => "cafe",
            Category::Etc => "etc",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Korean => "Korean",
            Category::Chinese => "Chinese",
            Category::Japanese => "Japanese",
            Category::Western => "Western",
            Category::Cafe => "Cafe",
            Category::Etc => "Etc",
        }
    }

    /// Lenient conversion used when reading stored or remote data.
    pub fn from_label(raw: &str) -> Category {
        raw.parse().unwrap_or(Category::Etc)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse, case-insensitive. Used for path parameters and form input.
impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| Error::InvalidCategory(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Category::from_label(&raw))
    }
}

/// A bookmarked restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub category: Category,
    pub rating: u8,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng")]
    pub longitude: f64,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Restaurant {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Review text, or the placeholder when there is none.
    pub fn review_or_placeholder(&self) -> &str {
        match self.review.as_deref() {
            Some(r) if !r.trim().is_empty() => r,
            _ => NO_REVIEW_PLACEHOLDER,
        }
    }

    /// Filled and empty stars, e.g. `★★★★☆` for a rating of 4.
    pub fn stars(&self) -> String {
        let filled = usize::from(self.rating.min(MAX_RATING as u8));
        format!("{}{}", "★".repeat(filled), "☆".repeat(MAX_RATING as usize - filled))
    }

    /// Case-insensitive substring match over name, address and review.
    /// `needle` must already be lowercased.
    pub fn matches_keyword(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.address.to_lowercase().contains(needle)
            || self
                .review
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains(needle)
    }
}

/// Creation payload: a record without id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewRestaurant {
    pub name: String,
    pub address: String,
    pub category: Category,
    pub rating: i64,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng")]
    pub longitude: f64,
}

impl NewRestaurant {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Required-field, rating and coordinate checks.
    pub fn validate(&self) -> Result<()> {
        let mut field_errors = BTreeMap::new();
        check_text(&mut field_errors, "name", &self.name, "Name is required");
        check_text(&mut field_errors, "address", &self.address, "Address is required");
        check_rating(&mut field_errors, self.rating);
        if !field_errors.is_empty() {
            return Err(Error::Validation { field_errors });
        }
        check_location(self.coordinate())
    }

    pub(crate) fn into_record(self, id: i64, created_at: DateTime<Utc>) -> Restaurant {
        Restaurant {
            id,
            name: self.name,
            address: self.address,
            category: self.category,
            rating: clamp_rating(self.rating),
            review: self.review,
            latitude: self.latitude,
            longitude: self.longitude,
            created_at,
            updated_at: None,
        }
    }
}

/// Partial update. Absent fields leave the record unchanged; `review: null`
/// clears the review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, nullable)]
    pub review: Option<Option<String>>,
    #[serde(default, alias = "lat", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lng", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl RestaurantPatch {
    pub fn is_empty(&self) -> bool {
        *self == RestaurantPatch::default()
    }

    /// Checks the fields that are present.
    pub fn validate(&self) -> Result<()> {
        let mut field_errors = BTreeMap::new();
        if let Some(name) = &self.name {
            check_text(&mut field_errors, "name", name, "Name must not be blank");
        }
        if let Some(address) = &self.address {
            check_text(&mut field_errors, "address", address, "Address must not be blank");
        }
        if let Some(rating) = self.rating {
            check_rating(&mut field_errors, rating);
        }
        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation { field_errors })
        }
    }

    /// Shallow merge over `record`. The id and timestamps are never touched.
    pub fn merge_into(&self, record: &Restaurant) -> Result<Restaurant> {
        self.validate()?;

        let mut merged = record.clone();
        if let Some(name) = &self.name {
            merged.name = name.clone();
        }
        if let Some(address) = &self.address {
            merged.address = address.clone();
        }
        if let Some(category) = self.category {
            merged.category = category;
        }
        if let Some(rating) = self.rating {
            merged.rating = clamp_rating(rating);
        }
        if let Some(review) = &self.review {
            merged.review = review.clone();
        }
        if let Some(latitude) = self.latitude {
            merged.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            merged.longitude = longitude;
        }

        check_location(merged.coordinate())?;
        Ok(merged)
    }
}

fn check_text(errors: &mut BTreeMap<String, String>, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), message.to_string());
    }
}

fn check_rating(errors: &mut BTreeMap<String, String>, rating: i64) {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        errors.insert(
            "rating".to_string(),
            format!("Rating must be between {MIN_RATING} and {MAX_RATING}"),
        );
    }
}

fn check_location(at: Coordinate) -> Result<()> {
    if at.is_valid() {
        Ok(())
    } else {
        Err(Error::InvalidLocation {
            latitude: at.latitude,
            longitude: at.longitude,
        })
    }
}

// Only called after validation.
fn clamp_rating(rating: i64) -> u8 {
    rating.clamp(MIN_RATING, MAX_RATING) as u8
}

fn double_option<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// RFC 3339 timestamps, also accepting offset-less values (taken as UTC).
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) => parse(&raw).map(Some).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }

    pub(super) fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|_| format!("expected RFC3339 timestamp, got '{raw}'"))
    }
}

/// Parses a timestamp the same way stored records are read.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    timestamp::parse(raw).map_err(|message| Error::InvalidRequest { message })
}

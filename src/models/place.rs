use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A point of interest as stored in the `Places` collection. Ids are small
/// integers assigned by the seeder so clients can pass them around without
/// hex-string plumbing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Place {
    #[serde(rename = "_id")]
    pub id: i32,
    pub name: String,
    pub category: String,
    pub description: String,
    pub ai_summary: String,
    pub rating: f64,
    pub review_count: i32,
    pub price_level: i32,
    pub walking_time: i32,
    pub driving_time: i32,
    pub coordinates: Coordinates,
    pub tags: Vec<String>,
    pub vibe: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Wire form of a place. The frontend expects camelCase keys.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResponse {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub description: String,
    pub ai_summary: String,
    pub rating: f64,
    pub review_count: i32,
    pub price_level: i32,
    pub walking_time: i32,
    pub driving_time: i32,
    pub coordinates: Coordinates,
    pub tags: Vec<String>,
    pub vibe: Vec<String>,
    pub image_url: Option<String>,
}

impl From<Place> for PlaceResponse {
    fn from(place: Place) -> Self {
        PlaceResponse {
            id: place.id,
            name: place.name,
            category: place.category,
            description: place.description,
            ai_summary: place.ai_summary,
            rating: place.rating,
            review_count: place.review_count,
            price_level: place.price_level,
            walking_time: place.walking_time,
            driving_time: place.driving_time,
            coordinates: place.coordinates,
            tags: place.tags,
            vibe: place.vibe,
            image_url: place.image_url,
        }
    }
}

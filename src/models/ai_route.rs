use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::place::Coordinates;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AiRouteRequest {
    pub prompt: String,
    #[serde(default)]
    pub city: Option<String>,
}

/// A place assembled from Gemini suggestions plus Google Places data.
/// Not persisted; ids are Google place ids rather than seed-catalog ints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiPlace {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub ai_summary: String,
    pub rating: f64,
    pub review_count: i32,
    pub price_level: i32,
    /// Minutes of walking to the next stop, 0 for the last one.
    pub walking_time: i32,
    pub driving_time: i32,
    pub coordinates: Coordinates,
    pub image_url: String,
    pub tags: Vec<String>,
    pub vibe: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AiRoute {
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub place_ids: Vec<String>,
    pub places: Vec<AiPlace>,
    pub narrative: String,
    pub total_walking_time: i32,
    pub total_driving_time: i32,
    pub created_at: DateTime<Utc>,
    pub demo_mode: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AiRouteResponse {
    pub success: bool,
    pub message: String,
    pub route: Option<AiRoute>,
    pub error: Option<String>,
}

impl AiRouteResponse {
    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        AiRouteResponse {
            success: false,
            message: message.into(),
            route: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteSuggestion {
    pub prompt: String,
    pub theme: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RouteSuggestionsResponse {
    pub suggestions: Vec<RouteSuggestion>,
    pub user_route_count: i64,
    pub message: String,
    pub demo_mode: bool,
}

//! Travel time lookups via the Google Distance Matrix API.
//!
//! Used by AI route generation to measure the walk between consecutive
//! stops. Requires `GOOGLE_PLACES_API_KEY` (the same key covers Places and
//! Distance Matrix).

use reqwest;
use serde::Deserialize;
use std::{env, time::Duration};

#[derive(Debug, Deserialize)]
struct DistanceMatrixResponse {
    status: String,
    rows: Vec<DistanceMatrixRow>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixRow {
    elements: Vec<DistanceMatrixElement>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixElement {
    status: String,
    distance: Option<DistanceMatrixValue>,
    duration: Option<DistanceMatrixValue>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixValue {
    value: u32, // meters for distance, seconds for duration
}

#[derive(Debug, Clone, Copy)]
pub enum TravelMode {
    Driving,
    Walking,
    Transit,
    Bicycling,
}

impl TravelMode {
    fn as_str(&self) -> &str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Transit => "transit",
            TravelMode::Bicycling => "bicycling",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DistanceResult {
    pub distance_meters: u32,
    pub duration_minutes: u32,
}

pub struct DistanceService {
    http_client: reqwest::Client,
    api_key: String,
}

impl DistanceService {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let api_key = env::var("GOOGLE_PLACES_API_KEY")
            .map_err(|_| "GOOGLE_PLACES_API_KEY environment variable not set")?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
        })
    }

    /// Travel time between two coordinates for the given mode.
    pub async fn get_distance(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
        travel_mode: TravelMode,
    ) -> Result<DistanceResult, Box<dyn std::error::Error>> {
        let origins = format!("{},{}", origin.0, origin.1);
        let destinations = format!("{},{}", destination.0, destination.1);

        let url = format!(
            "https://maps.googleapis.com/maps/api/distancematrix/json?origins={}&destinations={}&mode={}&key={}",
            origins, destinations, travel_mode.as_str(), self.api_key
        );

        let response = self.http_client.get(&url).send().await?;
        let response_text = response.text().await?;

        let matrix: DistanceMatrixResponse = serde_json::from_str(&response_text).map_err(|e| {
            format!(
                "Failed to parse Distance Matrix response: {}. Response: {}",
                e, response_text
            )
        })?;

        if matrix.status != "OK" {
            return Err(format!("Distance Matrix API error: {}", matrix.status).into());
        }

        if matrix.rows.is_empty() || matrix.rows[0].elements.is_empty() {
            return Err("No distance data returned from Distance Matrix".into());
        }

        let element = &matrix.rows[0].elements[0];

        if element.status != "OK" {
            return Err(format!("Distance Matrix element error: {}", element.status).into());
        }

        let distance = element.distance.as_ref().ok_or("Distance not available")?;
        let duration = element.duration.as_ref().ok_or("Duration not available")?;

        Ok(DistanceResult {
            distance_meters: distance.value,
            duration_minutes: duration.value / 60,
        })
    }

    /// Minutes on foot between two stops.
    pub async fn walking_minutes(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
    ) -> Result<u32, Box<dyn std::error::Error>> {
        let result = self
            .get_distance(origin, destination, TravelMode::Walking)
            .await?;
        Ok(result.duration_minutes)
    }
}

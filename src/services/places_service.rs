//! Google Places client: resolves AI-suggested stop names into verified
//! places (text search, then details), with photo URLs and review snippets.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;

use crate::models::place::Coordinates;

const PLACES_API_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/place";
const PHOTO_MAX_WIDTH: u32 = 400;
const MAX_RETRIES: u32 = 2;
const RETRY_DELAY_SECS: u64 = 1;
const DETAILS_FIELDS: &str = "name,formatted_address,geometry,rating,user_ratings_total,\
                              price_level,types,photos,reviews,editorial_summary";

#[derive(Debug)]
pub enum PlacesError {
    EnvironmentError(String),
    HttpError(reqwest::Error),
    ResponseError(String),
}

impl fmt::Display for PlacesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacesError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
            PlacesError::HttpError(err) => write!(f, "HTTP error: {}", err),
            PlacesError::ResponseError(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl Error for PlacesError {}

impl From<reqwest::Error> for PlacesError {
    fn from(err: reqwest::Error) -> Self {
        PlacesError::HttpError(err)
    }
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<TextSearchResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextSearchResult {
    place_id: String,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<DetailsPayload>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsPayload {
    name: Option<String>,
    formatted_address: Option<String>,
    geometry: Option<Geometry>,
    rating: Option<f64>,
    user_ratings_total: Option<i32>,
    price_level: Option<i32>,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    photos: Vec<PhotoRef>,
    #[serde(default)]
    reviews: Vec<ReviewPayload>,
    editorial_summary: Option<EditorialSummary>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct PhotoRef {
    photo_reference: String,
}

#[derive(Debug, Deserialize)]
struct ReviewPayload {
    author_name: Option<String>,
    rating: Option<i32>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EditorialSummary {
    overview: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceReview {
    pub author_name: String,
    pub rating: i32,
    pub text: String,
}

/// A verified place as assembled from text search + details.
#[derive(Debug, Clone)]
pub struct PlaceDetails {
    pub place_id: String,
    pub name: String,
    pub description: String,
    pub address: String,
    pub coordinates: Coordinates,
    pub rating: f64,
    pub review_count: i32,
    pub price_level: i32,
    pub category: String,
    pub types: Vec<String>,
    pub photo_url: Option<String>,
    pub reviews: Vec<PlaceReview>,
}

pub struct PlacesService {
    http_client: reqwest::Client,
    api_key: String,
}

impl PlacesService {
    pub fn new() -> Result<Self, PlacesError> {
        let api_key = std::env::var("GOOGLE_PLACES_API_KEY").map_err(|_| {
            PlacesError::EnvironmentError("GOOGLE_PLACES_API_KEY environment variable not set".to_string())
        })?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
        })
    }

    /// Looks a place up by name, optionally biased to a city. `Ok(None)`
    /// means the name resolved to nothing; errors mean the API misbehaved.
    pub async fn find_place(
        &self,
        place_name: &str,
        city: Option<&str>,
    ) -> Result<Option<PlaceDetails>, PlacesError> {
        let query = match city {
            Some(city) => format!("{} {}", place_name, city),
            None => place_name.to_string(),
        };

        let place_id = match self.search_place_id(&query).await? {
            Some(id) => id,
            None => {
                println!("No places found for: {}", place_name);
                return Ok(None);
            }
        };

        self.fetch_details(&place_id).await
    }

    async fn search_place_id(&self, query: &str) -> Result<Option<String>, PlacesError> {
        let url = format!("{}/textsearch/json", PLACES_API_ENDPOINT);

        let mut last_error: Option<PlacesError> = None;
        for attempt in 0..=MAX_RETRIES {
            let response = match self
                .http_client
                .get(&url)
                .query(&[
                    ("query", query),
                    ("type", "establishment"),
                    ("key", &self.api_key),
                ])
                .send()
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    last_error = Some(err.into());
                    if attempt < MAX_RETRIES {
                        sleep(backoff_delay(attempt)).await;
                        continue;
                    }
                    break;
                }
            };

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                last_error = Some(PlacesError::ResponseError(
                    "Places API rate limit (429)".to_string(),
                ));
                if attempt < MAX_RETRIES {
                    eprintln!("Rate limit hit, retrying text search...");
                    sleep(backoff_delay(attempt)).await;
                    continue;
                }
                break;
            }

            let body: TextSearchResponse = response.json().await?;

            if body.status == "ZERO_RESULTS" {
                return Ok(None);
            }
            if body.status != "OK" {
                return Err(PlacesError::ResponseError(format!(
                    "Places API error: {} - {}",
                    body.status,
                    body.error_message.unwrap_or_default()
                )));
            }

            return Ok(body.results.into_iter().next().map(|r| r.place_id));
        }

        Err(last_error.unwrap_or_else(|| {
            PlacesError::ResponseError("Text search failed after retries".to_string())
        }))
    }

    async fn fetch_details(&self, place_id: &str) -> Result<Option<PlaceDetails>, PlacesError> {
        let url = format!("{}/details/json", PLACES_API_ENDPOINT);

        let mut last_error: Option<PlacesError> = None;
        for attempt in 0..=MAX_RETRIES {
            let response = match self
                .http_client
                .get(&url)
                .query(&[
                    ("place_id", place_id),
                    ("fields", DETAILS_FIELDS),
                    ("key", &self.api_key),
                ])
                .send()
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    last_error = Some(err.into());
                    if attempt < MAX_RETRIES {
                        sleep(backoff_delay(attempt)).await;
                        continue;
                    }
                    break;
                }
            };

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                last_error = Some(PlacesError::ResponseError(
                    "Places API rate limit (429)".to_string(),
                ));
                if attempt < MAX_RETRIES {
                    eprintln!("Rate limit hit, retrying place details...");
                    sleep(backoff_delay(attempt)).await;
                    continue;
                }
                break;
            }

            let body: DetailsResponse = response.json().await?;

            if body.status != "OK" {
                return Err(PlacesError::ResponseError(format!(
                    "Place Details API error: {} - {}",
                    body.status,
                    body.error_message.unwrap_or_default()
                )));
            }

            let payload = match body.result {
                Some(payload) => payload,
                None => return Ok(None),
            };

            return Ok(Some(self.format_place(place_id, payload)));
        }

        Err(last_error.unwrap_or_else(|| {
            PlacesError::ResponseError("Place details failed after retries".to_string())
        }))
    }

    fn format_place(&self, place_id: &str, payload: DetailsPayload) -> PlaceDetails {
        let location = payload
            .geometry
            .and_then(|g| g.location)
            .map(|l| Coordinates { lat: l.lat, lng: l.lng })
            .unwrap_or(Coordinates { lat: 0.0, lng: 0.0 });

        let description = payload
            .editorial_summary
            .and_then(|s| s.overview)
            .filter(|overview| !overview.is_empty())
            .unwrap_or_else(|| describe_from_types(&payload.types));

        let photo_url = payload.photos.first().map(|photo| {
            format!(
                "{}/photo?maxwidth={}&photoreference={}&key={}",
                PLACES_API_ENDPOINT, PHOTO_MAX_WIDTH, photo.photo_reference, self.api_key
            )
        });

        let reviews = payload
            .reviews
            .into_iter()
            .take(3)
            .map(|review| PlaceReview {
                author_name: review.author_name.unwrap_or_else(|| "Anonymous".to_string()),
                rating: review.rating.unwrap_or(0),
                text: review.text.unwrap_or_default(),
            })
            .collect();

        PlaceDetails {
            place_id: place_id.to_string(),
            name: payload.name.unwrap_or_default(),
            description,
            address: payload.formatted_address.unwrap_or_default(),
            coordinates: location,
            rating: payload.rating.unwrap_or(0.0),
            review_count: payload.user_ratings_total.unwrap_or(0),
            price_level: payload.price_level.unwrap_or(1),
            category: determine_category(&payload.types),
            types: payload.types,
            photo_url,
            reviews,
        }
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(RETRY_DELAY_SECS * 2u64.pow(attempt))
}

/// Maps Google place types onto the app's category vocabulary. First
/// matching bucket wins.
pub fn determine_category(types: &[String]) -> String {
    let buckets: [(&str, &[&str]); 8] = [
        ("restaurant", &["restaurant", "food", "meal_takeaway", "meal_delivery"]),
        ("cafe", &["cafe", "bakery"]),
        ("park", &["park", "tourist_attraction", "zoo", "aquarium"]),
        ("museum", &["museum", "art_gallery"]),
        ("shop", &["store", "shopping_mall", "clothing_store", "book_store"]),
        ("entertainment", &["movie_theater", "night_club", "bar", "casino"]),
        ("nature", &["park", "natural_feature", "campground"]),
        ("culture", &["museum", "art_gallery", "library", "university"]),
    ];

    for (category, type_list) in buckets {
        if types.iter().any(|t| type_list.contains(&t.as_str())) {
            return category.to_string();
        }
    }

    "establishment".to_string()
}

/// Readable fallback description built from the first three place types,
/// for places without an editorial summary.
fn describe_from_types(types: &[String]) -> String {
    if types.is_empty() {
        return String::new();
    }

    let readable: Vec<String> = types
        .iter()
        .take(3)
        .map(|t| {
            t.split('_')
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    format!("A {}", readable.join(", "))
}

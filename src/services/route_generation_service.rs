//! End-to-end AI route assembly: Gemini sketches the tour, Google Places
//! verifies each stop, Gemini writes the final narrative, and the Distance
//! Matrix fills in walking times. Every failure path degrades into a
//! `success: false` response rather than an HTTP error, so clients always
//! get the same envelope.

use chrono::Utc;
use uuid::Uuid;

use crate::models::ai_route::{AiPlace, AiRoute, AiRouteResponse};
use crate::services::distance_service::DistanceService;
use crate::services::gemini_service::GeminiService;
use crate::services::places_service::{PlaceDetails, PlacesService};

const MIN_PROMPT_CHARS: usize = 10;
const MAX_PROMPT_CHARS: usize = 500;
const DEFAULT_LEG_WALKING_MINUTES: i32 = 10;
const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

pub struct RouteGenerator {
    gemini: Option<GeminiService>,
    places: Option<PlacesService>,
    distance: Option<DistanceService>,
}

impl RouteGenerator {
    /// Builds a generator from whatever API keys are present. Missing keys
    /// leave the corresponding stage disabled instead of failing startup.
    pub fn new() -> Self {
        let gemini = match GeminiService::new() {
            Ok(service) => Some(service),
            Err(e) => {
                println!("GeminiService not available: {}", e);
                None
            }
        };

        let places = match PlacesService::new() {
            Ok(service) => Some(service),
            Err(e) => {
                println!("PlacesService not available: {}", e);
                None
            }
        };

        let distance = match DistanceService::new() {
            Ok(service) => Some(service),
            Err(e) => {
                println!(
                    "DistanceService not available: {}. Using fallback walking times.",
                    e
                );
                None
            }
        };

        Self {
            gemini,
            places,
            distance,
        }
    }

    pub fn gemini_configured(&self) -> bool {
        self.gemini.is_some()
    }

    pub fn places_configured(&self) -> bool {
        self.places.is_some()
    }

    pub async fn generate_route(&self, prompt: &str, city: Option<&str>) -> AiRouteResponse {
        let gemini = match &self.gemini {
            Some(gemini) => gemini,
            None => {
                return AiRouteResponse::failure(
                    "AI route generation is not configured",
                    "GEMINI_API_KEY not set",
                )
            }
        };
        let places_service = match &self.places {
            Some(places) => places,
            None => {
                return AiRouteResponse::failure(
                    "AI route generation is not configured",
                    "GOOGLE_PLACES_API_KEY not set",
                )
            }
        };

        // Let the model infer the city from the prompt when none was given
        let location = city.unwrap_or("any city");

        let initial = match gemini.generate_initial_route(prompt, location).await {
            Ok(initial) => initial,
            Err(err) => {
                eprintln!("Error generating initial route: {}", err);
                return AiRouteResponse::failure("Failed to generate route", err.to_string());
            }
        };
        println!("Generated initial route: {}", initial.name);

        let search_city = if location == "any city" {
            None
        } else {
            Some(location)
        };

        println!("Enriching {} places with Google Places API", initial.stops.len());
        let mut enriched: Vec<(PlaceDetails, String)> = Vec::new();
        for stop in &initial.stops {
            match places_service.find_place(stop, search_city).await {
                Ok(Some(details)) => {
                    let blurb = initial.descriptions.get(stop).cloned().unwrap_or_default();
                    enriched.push((details, blurb));
                    println!("Successfully enriched place: {}", stop);
                }
                Ok(None) => {
                    eprintln!("Could not find place details for: {}", stop);
                }
                Err(err) => {
                    eprintln!("Error enriching place '{}': {}", stop, err);
                }
            }
        }

        if enriched.is_empty() {
            return AiRouteResponse::failure(
                "Could not find any of the suggested places",
                "No places found in Google Places API",
            );
        }
        println!(
            "Successfully enriched {} out of {} places",
            enriched.len(),
            initial.stops.len()
        );

        // Keep only places Google actually has review data for
        let verified: Vec<(PlaceDetails, String)> = enriched
            .into_iter()
            .filter(|(details, _)| {
                if details.rating == 0.0 || details.review_count == 0 {
                    eprintln!("Skipping {} - no review data from Google Places", details.name);
                    false
                } else {
                    true
                }
            })
            .collect();

        if verified.is_empty() {
            return AiRouteResponse::failure(
                "Could not get real data from Google Places API for the suggested places",
                "No valid places with real data",
            );
        }

        let details: Vec<PlaceDetails> = verified.iter().map(|(d, _)| d.clone()).collect();
        let (narrative, name) = match gemini.refine_route_narrative(&initial.name, &details).await {
            Ok(refined) => {
                let name = refined.refined_name.unwrap_or_else(|| initial.name.clone());
                (refined.narrative, name)
            }
            Err(err) => {
                eprintln!("Failed to refine narrative, using fallback: {}", err);
                (fallback_narrative(&initial.name, location), initial.name.clone())
            }
        };

        let walking_times = self.leg_walking_times(&details).await;
        let total_walking_time: i32 = walking_times.iter().sum();

        let places: Vec<AiPlace> = verified
            .iter()
            .enumerate()
            .map(|(i, (details, blurb))| build_ai_place(details, blurb, walking_times[i]))
            .collect();

        let route = AiRoute {
            id: Uuid::new_v4().to_string(),
            name: name.clone(),
            user_id: "demo".to_string(),
            place_ids: places.iter().map(|p| p.id.clone()).collect(),
            places,
            narrative,
            total_walking_time,
            total_driving_time: total_walking_time / 2,
            created_at: Utc::now(),
            demo_mode: true,
        };

        AiRouteResponse {
            success: true,
            message: format!("Successfully generated route: {}", name),
            route: Some(route),
            error: None,
        }
    }

    /// Walking minutes from each stop to the next; the last entry is 0.
    async fn leg_walking_times(&self, details: &[PlaceDetails]) -> Vec<i32> {
        let mut times = vec![0i32; details.len()];

        for i in 0..details.len().saturating_sub(1) {
            let origin = details[i].coordinates;
            let destination = details[i + 1].coordinates;

            times[i] = match &self.distance {
                Some(distance) => {
                    match distance
                        .walking_minutes(
                            (origin.lat, origin.lng),
                            (destination.lat, destination.lng),
                        )
                        .await
                    {
                        Ok(minutes) => minutes as i32,
                        Err(err) => {
                            eprintln!("Error calculating walking time: {}", err);
                            DEFAULT_LEG_WALKING_MINUTES
                        }
                    }
                }
                None => DEFAULT_LEG_WALKING_MINUTES,
            };
        }

        times
    }
}

impl Default for RouteGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_prompt(prompt: &str) -> Result<(), String> {
    let length = prompt.chars().count();
    if length < MIN_PROMPT_CHARS || length > MAX_PROMPT_CHARS {
        return Err(format!(
            "Prompt must be between {} and {} characters",
            MIN_PROMPT_CHARS, MAX_PROMPT_CHARS
        ));
    }
    Ok(())
}

fn fallback_narrative(route_name: &str, city: &str) -> String {
    format!(
        "Embark on an exciting journey through {}, where each stop offers unique experiences \
         and discoveries. This carefully curated route takes you through the best that {} has \
         to offer, combining local favorites with hidden gems.",
        route_name, city
    )
}

fn build_ai_place(details: &PlaceDetails, ai_summary: &str, walking_time: i32) -> AiPlace {
    let description = if details.description.is_empty() {
        "No description available".to_string()
    } else {
        details.description.clone()
    };

    let tags: Vec<String> = if details.types.is_empty() {
        vec!["interesting".to_string()]
    } else {
        details.types.iter().take(3).cloned().collect()
    };

    let vibe = if details.rating > 4.0 {
        vec!["popular".to_string()]
    } else {
        vec!["interesting".to_string()]
    };

    AiPlace {
        id: details.place_id.clone(),
        name: details.name.clone(),
        category: details.category.clone(),
        description,
        ai_summary: ai_summary.to_string(),
        rating: details.rating,
        review_count: details.review_count,
        price_level: details.price_level,
        walking_time,
        driving_time: walking_time / 2,
        coordinates: details.coordinates,
        image_url: details
            .photo_url
            .clone()
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        tags,
        vibe,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::place::Coordinates;

    fn details(name: &str, rating: f64, types: &[&str]) -> PlaceDetails {
        PlaceDetails {
            place_id: format!("gp-{}", name),
            name: name.to_string(),
            description: String::new(),
            address: "123 Main St".to_string(),
            coordinates: Coordinates { lat: 37.87, lng: -122.27 },
            rating,
            review_count: 120,
            price_level: 2,
            category: "cafe".to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
            photo_url: None,
            reviews: vec![],
        }
    }

    #[test]
    fn test_validate_prompt_bounds() {
        assert!(validate_prompt("too short").is_err());
        assert!(validate_prompt("exactly ten").is_ok());
        assert!(validate_prompt(&"p".repeat(500)).is_ok());
        assert!(validate_prompt(&"p".repeat(501)).is_err());
    }

    #[test]
    fn test_validate_prompt_counts_characters() {
        // 10 multi-byte characters should pass even though they are 20+ bytes
        assert!(validate_prompt(&"é".repeat(10)).is_ok());
    }

    #[test]
    fn test_build_ai_place_defaults() {
        let place = build_ai_place(&details("Cafe", 4.5, &[]), "cozy corner", 12);
        assert_eq!(place.description, "No description available");
        assert_eq!(place.tags, vec!["interesting"]);
        assert_eq!(place.vibe, vec!["popular"]);
        assert_eq!(place.image_url, PLACEHOLDER_IMAGE);
        assert_eq!(place.walking_time, 12);
        assert_eq!(place.driving_time, 6);
        assert_eq!(place.ai_summary, "cozy corner");
    }

    #[test]
    fn test_build_ai_place_takes_first_three_types() {
        let place = build_ai_place(
            &details("Cafe", 3.9, &["cafe", "food", "point_of_interest", "establishment"]),
            "",
            0,
        );
        assert_eq!(place.tags, vec!["cafe", "food", "point_of_interest"]);
        assert_eq!(place.vibe, vec!["interesting"]);
    }

    #[test]
    fn test_fallback_narrative_mentions_route_and_city() {
        let narrative = fallback_narrative("Berkeley Coffee Crawl", "Berkeley, CA");
        assert!(narrative.contains("Berkeley Coffee Crawl"));
        assert!(narrative.contains("Berkeley, CA"));
    }
}

//! Google Gemini client for AI route generation.
//!
//! Talks to the generateContent REST endpoint with JSON-mode output and
//! turns the model's replies into validated route structures. Transient
//! failures are retried with exponential backoff; safety blocks are not.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;

use crate::services::places_service::PlaceDetails;

const GEMINI_API_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const TEMPERATURE: f32 = 0.7;
const MAX_OUTPUT_TOKENS: i32 = 2048;
const MAX_RETRIES: u32 = 2;
const RETRY_DELAY_SECS: u64 = 1;
const MAX_STOPS_PER_ROUTE: usize = 8;

#[derive(Debug)]
pub enum GeminiError {
    EnvironmentError(String),
    HttpError(reqwest::Error),
    SafetyBlocked(String),
    ResponseError(String),
    ParseError(String),
}

impl fmt::Display for GeminiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeminiError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
            GeminiError::HttpError(err) => write!(f, "HTTP error: {}", err),
            GeminiError::SafetyBlocked(msg) => write!(f, "Safety block: {}", msg),
            GeminiError::ResponseError(msg) => write!(f, "Response error: {}", msg),
            GeminiError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl Error for GeminiError {}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        GeminiError::HttpError(err)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: i32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

/// First-pass route sketch: a name plus stop names with one-line blurbs.
#[derive(Debug, Clone)]
pub struct InitialRoute {
    pub name: String,
    pub stops: Vec<String>,
    pub descriptions: HashMap<String, String>,
}

/// Second-pass refinement over verified place data.
#[derive(Debug, Clone)]
pub struct RefinedRoute {
    pub narrative: String,
    pub refined_name: Option<String>,
}

pub struct GeminiService {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiService {
    pub fn new() -> Result<Self, GeminiError> {
        let api_key = env::var("GEMINI_API_KEY").map_err(|_| {
            GeminiError::EnvironmentError("GEMINI_API_KEY environment variable not set".to_string())
        })?;

        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            model,
        })
    }

    /// Asks the model for a 3-5 stop walking tour matching the prompt.
    pub async fn generate_initial_route(
        &self,
        user_prompt: &str,
        location: &str,
    ) -> Result<InitialRoute, GeminiError> {
        println!("Generating initial route for: {} in {}", user_prompt, location);

        let prompt = initial_route_prompt(user_prompt, location);
        let response_text = self.generate_with_retry(&prompt).await?;
        let value = extract_json(&response_text)?;
        parse_initial_route(value)
    }

    /// Second model pass: weaves verified place details into a narrative
    /// and optionally improves the route name.
    pub async fn refine_route_narrative(
        &self,
        route_name: &str,
        places: &[PlaceDetails],
    ) -> Result<RefinedRoute, GeminiError> {
        println!("Refining route narrative for: {}", route_name);

        let prompt = refinement_prompt(route_name, places);
        let response_text = self.generate_with_retry(&prompt).await?;
        let value = extract_json(&response_text)?;
        parse_refined_route(value)
    }

    async fn generate_with_retry(&self, prompt: &str) -> Result<String, GeminiError> {
        let mut attempt = 0;
        loop {
            match self.generate_once(prompt).await {
                Ok(text) => return Ok(text),
                // Safety blocks will not succeed on retry
                Err(GeminiError::SafetyBlocked(msg)) => {
                    return Err(GeminiError::SafetyBlocked(msg));
                }
                Err(err) => {
                    if attempt < MAX_RETRIES {
                        let delay = Duration::from_secs(RETRY_DELAY_SECS * 2u64.pow(attempt));
                        eprintln!("Gemini error, retrying in {}s: {}", delay.as_secs(), err);
                        sleep(delay).await;
                        attempt += 1;
                    } else {
                        eprintln!(
                            "Failed to generate content after {} attempts",
                            MAX_RETRIES + 1
                        );
                        return Err(err);
                    }
                }
            }
        }
    }

    async fn generate_once(&self, prompt: &str) -> Result<String, GeminiError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_API_ENDPOINT, self.model, self.api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                response_mime_type: "application/json".to_string(),
            },
        };

        let response = self.http_client.post(&url).json(&request).send().await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(GeminiError::ResponseError(
                "Gemini API rate limit (429)".to_string(),
            ));
        }

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GeminiError::ResponseError(format!(
                "Gemini API error {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            GeminiError::ParseError(format!("Failed to parse Gemini response envelope: {}", e))
        })?;

        if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GeminiError::SafetyBlocked(format!(
                "Content was blocked by safety filters ({}). Please rephrase your request.",
                reason
            )));
        }

        let candidate = parsed
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| {
                GeminiError::ResponseError("No candidates in Gemini response".to_string())
            })?;

        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(GeminiError::SafetyBlocked(
                "Content was blocked by safety filters. Please rephrase your request.".to_string(),
            ));
        }

        let text = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|p| p.text)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GeminiError::ResponseError(
                "Empty response from Gemini API".to_string(),
            ));
        }

        Ok(text)
    }
}

fn initial_route_prompt(user_prompt: &str, location: &str) -> String {
    format!(
        r#"You are an expert travel guide creating personalized walking tour itineraries.

User Request: "{user_prompt}"
Location: "{location}"

Create a walking tour with 3-5 interesting places. Your response MUST be ONLY valid JSON with this exact structure:
{{
  "name": "Creative route name",
  "stops": ["Place 1", "Place 2", "Place 3"],
  "descriptions": {{
    "Place 1": "Brief description",
    "Place 2": "Brief description",
    "Place 3": "Brief description"
  }}
}}

IMPORTANT:
- Return ONLY the JSON object, no other text
- Ensure all JSON brackets and quotes are properly closed
- Include descriptions for ALL stops
- Use real, well-known locations in {location}
- Make the route name creative and descriptive"#
    )
}

fn refinement_prompt(route_name: &str, places: &[PlaceDetails]) -> String {
    let places_json: Vec<Value> = places
        .iter()
        .map(|place| {
            serde_json::json!({
                "name": place.name,
                "description": place.description,
                "rating": place.rating,
                "review_count": place.review_count,
                "address": place.address,
                "reviews": place.reviews.iter().take(2).collect::<Vec<_>>(),
            })
        })
        .collect();

    let formatted_places =
        serde_json::to_string_pretty(&places_json).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are an expert travel guide. Based on the following verified place details, create a compelling narrative for this tour.

Route: "{route_name}"

Places:
{formatted_places}

Your response MUST be valid JSON with this structure:
{{
  "narrative": "2-3 paragraph engaging story connecting these places",
  "refined_name": "Improved route name (optional)",
  "travel_times": {{
    "Place 1 to Place 2": {{"walking": 10, "driving": 3}},
    "Place 2 to Place 3": {{"walking": 15, "driving": 5}}
  }}
}}

Make the narrative engaging and informative, incorporating the ratings and reviews.
The narrative should tell a story that connects these places thematically.
Estimate realistic walking times between consecutive places (in minutes).
If the original route name is already good, you can omit refined_name or keep it the same."#
    )
}

/// Pulls a JSON object out of a model reply, tolerating markdown fences
/// and surrounding prose.
fn extract_json(response_text: &str) -> Result<Value, GeminiError> {
    if let Ok(value) = serde_json::from_str(response_text) {
        return Ok(value);
    }

    let candidate = if let Some(pos) = response_text.find("```json") {
        let start = pos + 7;
        let end = response_text[start..]
            .find("```")
            .map(|i| start + i)
            .unwrap_or(response_text.len());
        response_text[start..end].trim()
    } else if let Some(pos) = response_text.find("```") {
        let start = pos + 3;
        let end = response_text[start..]
            .find("```")
            .map(|i| start + i)
            .unwrap_or(response_text.len());
        response_text[start..end].trim()
    } else {
        let start = response_text.find('{');
        let end = response_text.rfind('}');
        match (start, end) {
            (Some(start), Some(end)) if end > start => &response_text[start..=end],
            _ => {
                return Err(GeminiError::ParseError(format!(
                    "Could not extract valid JSON from response: {}",
                    response_text.chars().take(200).collect::<String>()
                )))
            }
        }
    };

    serde_json::from_str(candidate).map_err(|e| {
        GeminiError::ParseError(format!("Could not parse extracted JSON: {}", e))
    })
}

fn parse_initial_route(value: Value) -> Result<InitialRoute, GeminiError> {
    for field in ["name", "stops", "descriptions"] {
        if value.get(field).is_none() {
            return Err(GeminiError::ResponseError(format!(
                "Missing required field in route response: {}",
                field
            )));
        }
    }

    let name = value
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Untitled Route")
        .to_string();

    let mut stops: Vec<String> = value
        .get("stops")
        .and_then(Value::as_array)
        .map(|stops| {
            stops
                .iter()
                .filter_map(|s| s.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    if stops.len() < 2 {
        return Err(GeminiError::ResponseError(
            "Route must have at least 2 stops".to_string(),
        ));
    }

    if stops.len() > MAX_STOPS_PER_ROUTE {
        eprintln!(
            "Route has {} stops, truncating to {}",
            stops.len(),
            MAX_STOPS_PER_ROUTE
        );
        stops.truncate(MAX_STOPS_PER_ROUTE);
    }

    let descriptions = match value.get("descriptions") {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| (k.clone(), v.as_str().unwrap_or_default().to_string()))
            .collect(),
        _ => {
            return Err(GeminiError::ResponseError(
                "Descriptions must be a dictionary".to_string(),
            ))
        }
    };

    Ok(InitialRoute {
        name,
        stops,
        descriptions,
    })
}

fn parse_refined_route(value: Value) -> Result<RefinedRoute, GeminiError> {
    let narrative = match value.get("narrative").and_then(Value::as_str) {
        Some(narrative) => narrative.to_string(),
        None => {
            return Err(GeminiError::ResponseError(
                "Missing required field in refinement response: narrative".to_string(),
            ))
        }
    };

    if narrative.chars().count() < 50 {
        return Err(GeminiError::ResponseError(
            "Narrative must be a substantial text (at least 50 characters)".to_string(),
        ));
    }

    if let Some(travel_times) = value.get("travel_times") {
        if !travel_times.is_object() {
            return Err(GeminiError::ResponseError(
                "travel_times must be a dictionary".to_string(),
            ));
        }
    }

    let refined_name = value
        .get("refined_name")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(RefinedRoute {
        narrative,
        refined_name,
    })
}

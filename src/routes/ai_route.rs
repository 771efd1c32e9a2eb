use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::models::ai_route::{
    AiRouteRequest, AiRouteResponse, RouteSuggestion, RouteSuggestionsResponse,
};
use crate::services::route_generation_service::{validate_prompt, RouteGenerator};

pub async fn ai_health(generator: web::Data<RouteGenerator>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "gemini_configured": generator.gemini_configured(),
        "places_configured": generator.places_configured(),
    }))
}

pub async fn generate_route(
    generator: web::Data<RouteGenerator>,
    input: web::Json<AiRouteRequest>,
) -> impl Responder {
    let body = input.into_inner();
    println!("AI route generation request: {}", body.prompt);

    // Bad input gets the same envelope as any other generation failure.
    if let Err(message) = validate_prompt(&body.prompt) {
        return HttpResponse::Ok().json(AiRouteResponse::failure(message, "Invalid prompt"));
    }

    let response = generator
        .generate_route(&body.prompt, body.city.as_deref())
        .await;
    HttpResponse::Ok().json(response)
}

pub async fn route_suggestions() -> impl Responder {
    let suggestions = vec![
        RouteSuggestion {
            prompt: "Show me the best coffee shops and cafes in Berkeley".to_string(),
            theme: "Coffee Culture".to_string(),
            duration: "2-3 hours".to_string(),
            description: "Discover Berkeley's vibrant coffee scene".to_string(),
        },
        RouteSuggestion {
            prompt: "I want to explore Berkeley's parks and outdoor spaces".to_string(),
            theme: "Nature & Parks".to_string(),
            duration: "3-4 hours".to_string(),
            description: "Connect with nature in Berkeley's beautiful outdoor spaces".to_string(),
        },
        RouteSuggestion {
            prompt: "Find me some hidden gems and local favorites".to_string(),
            theme: "Hidden Gems".to_string(),
            duration: "2-3 hours".to_string(),
            description: "Discover places only locals know about".to_string(),
        },
        RouteSuggestion {
            prompt: "I'm interested in art and culture, what should I visit?".to_string(),
            theme: "Arts & Culture".to_string(),
            duration: "3-4 hours".to_string(),
            description: "Explore Berkeley's artistic and cultural side".to_string(),
        },
        RouteSuggestion {
            prompt: "Show me the best food scene with restaurants and cafes".to_string(),
            theme: "Food Scene".to_string(),
            duration: "4-5 hours".to_string(),
            description: "Taste your way through Berkeley's culinary delights".to_string(),
        },
    ];

    HttpResponse::Ok().json(RouteSuggestionsResponse {
        suggestions,
        user_route_count: 0,
        message: "Demo suggestions for testing the AI route generation".to_string(),
        demo_mode: true,
    })
}

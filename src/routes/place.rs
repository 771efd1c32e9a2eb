use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::db::mongo::DB_NAME;
use crate::models::place::{Place, PlaceResponse};
use crate::services::recommendation_service::top_recommendations;

#[derive(Debug, Deserialize)]
pub struct PlaceFilters {
    pub category: Option<String>,
    #[serde(rename = "priceLevel")]
    pub price_level: Option<i32>,
    pub tags: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub mood: String,
    #[serde(default = "default_time_available", rename = "timeAvailable")]
    pub time_available: i32,
    #[serde(default = "default_price_level", rename = "priceLevel")]
    pub price_level: i32,
    #[serde(default)]
    pub interests: Vec<String>,
}

fn default_time_available() -> i32 {
    60
}

fn default_price_level() -> i32 {
    3
}

pub async fn list_places(
    data: web::Data<Arc<Client>>,
    query: web::Query<PlaceFilters>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Place> = client.database(DB_NAME).collection("Places");

    let filters = query.into_inner();
    let mut filter = doc! {};

    if let Some(category) = filters.category.filter(|c| !c.is_empty()) {
        filter.insert("category", category);
    }
    if let Some(price_level) = filters.price_level {
        filter.insert("price_level", doc! { "$lte": price_level });
    }
    if let Some(tags) = filters.tags.filter(|t| !t.is_empty()) {
        let tag_list: Vec<String> = tags.split(',').map(|t| t.trim().to_string()).collect();
        filter.insert("tags", doc! { "$in": tag_list });
    }

    match collection.find(filter).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Place>>().await {
            Ok(places) => {
                let places: Vec<PlaceResponse> =
                    places.into_iter().map(PlaceResponse::from).collect();
                HttpResponse::Ok().json(json!({ "places": places }))
            }
            Err(err) => {
                eprintln!("Failed to collect places: {:?}", err);
                HttpResponse::InternalServerError()
                    .json(json!({ "error": "Failed to fetch places" }))
            }
        },
        Err(err) => {
            eprintln!("Failed to find places: {:?}", err);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch places" }))
        }
    }
}

pub async fn get_place(data: web::Data<Arc<Client>>, path: web::Path<i32>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Place> = client.database(DB_NAME).collection("Places");

    let place_id = path.into_inner();

    match collection.find_one(doc! { "_id": place_id }).await {
        Ok(Some(place)) => HttpResponse::Ok().json(json!({ "place": PlaceResponse::from(place) })),
        Ok(None) => HttpResponse::NotFound().json(json!({ "error": "Place not found" })),
        Err(err) => {
            eprintln!("Failed to fetch place: {:?}", err);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch place" }))
        }
    }
}

pub async fn recommendations(
    data: web::Data<Arc<Client>>,
    input: web::Json<RecommendationRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Place> = client.database(DB_NAME).collection("Places");

    let body = input.into_inner();

    // Hard constraints go to the database; scoring happens in memory.
    let filter = doc! {
        "walking_time": { "$lte": body.time_available },
        "price_level": { "$lte": body.price_level },
    };

    let places = match collection.find(filter).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Place>>().await {
            Ok(places) => places,
            Err(err) => {
                eprintln!("Failed to collect places: {:?}", err);
                return HttpResponse::InternalServerError()
                    .json(json!({ "error": "Failed to fetch recommendations" }));
            }
        },
        Err(err) => {
            eprintln!("Failed to find places: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to fetch recommendations" }));
        }
    };

    let recommendations: Vec<PlaceResponse> =
        top_recommendations(places, &body.mood, &body.interests)
            .into_iter()
            .map(PlaceResponse::from)
            .collect();

    HttpResponse::Ok().json(json!({ "recommendations": recommendations }))
}

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use mongodb::bson::{doc, to_bson};
use mongodb::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::db::mongo::DB_NAME;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::place::Place;
use crate::models::route::Route;
use crate::models::user::{User, UserPreferences, UserResponse};
use crate::services::gamification::{calculate_level, level_progress, level_title, LevelProgress};

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitPlaceRequest {
    pub place_id: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub visited_places: usize,
    pub routes_created: u64,
    pub street_cred: i32,
    pub level: i32,
    pub level_title: String,
    pub progress: LevelProgress,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub stats: ProfileStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitPlaceResponse {
    pub street_cred: i32,
    pub level: i32,
    pub visited_places: Vec<i32>,
}

pub async fn get_profile(user: AuthenticatedUser, data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let users: mongodb::Collection<User> = client.database(DB_NAME).collection("Users");
    let routes: mongodb::Collection<Route> = client.database(DB_NAME).collection("Routes");

    let found = match users.find_one(doc! { "_id": user.user_id }).await {
        Ok(Some(found)) => found,
        Ok(None) => return HttpResponse::NotFound().json(json!({ "error": "User not found" })),
        Err(err) => {
            eprintln!("Failed to fetch user: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to fetch profile" }));
        }
    };

    let routes_created = match routes.count_documents(doc! { "user_id": user.user_id }).await {
        Ok(count) => count,
        Err(err) => {
            eprintln!("Failed to count routes: {:?}", err);
            0
        }
    };

    let level = calculate_level(found.street_cred);
    let stats = ProfileStats {
        visited_places: found.visited_places.len(),
        routes_created,
        street_cred: found.street_cred,
        level,
        level_title: level_title(level).to_string(),
        progress: level_progress(found.street_cred),
    };

    HttpResponse::Ok().json(ProfileResponse {
        user: UserResponse::from(&found),
        stats,
    })
}

pub async fn update_profile(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    input: web::Json<ProfileUpdateRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let users: mongodb::Collection<User> = client.database(DB_NAME).collection("Users");

    let name = input.into_inner().name;
    if name.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({ "error": "Name is required" }));
    }

    let update = doc! {
        "$set": {
            "name": &name,
            "updated_at": Utc::now().to_rfc3339(),
        }
    };

    match users.update_one(doc! { "_id": user.user_id }, update).await {
        Ok(result) => {
            if result.matched_count == 0 {
                return HttpResponse::NotFound().json(json!({ "error": "User not found" }));
            }
        }
        Err(err) => {
            eprintln!("Failed to update profile: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to update profile" }));
        }
    }

    match users.find_one(doc! { "_id": user.user_id }).await {
        Ok(Some(updated)) => HttpResponse::Ok().json(json!({ "user": UserResponse::from(&updated) })),
        Ok(None) => HttpResponse::NotFound().json(json!({ "error": "User not found" })),
        Err(err) => {
            eprintln!("Failed to fetch user: {:?}", err);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch user" }))
        }
    }
}

pub async fn update_preferences(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    input: web::Json<UserPreferences>,
) -> impl Responder {
    let client = data.into_inner();
    let users: mongodb::Collection<User> = client.database(DB_NAME).collection("Users");

    let preferences = input.into_inner();
    let preferences_bson = match to_bson(&preferences) {
        Ok(bson) => bson,
        Err(err) => {
            eprintln!("Failed to serialize preferences: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to update preferences" }));
        }
    };

    let update = doc! {
        "$set": {
            "preferences": preferences_bson,
            "updated_at": Utc::now().to_rfc3339(),
        }
    };

    match users.update_one(doc! { "_id": user.user_id }, update).await {
        Ok(result) => {
            if result.matched_count == 0 {
                return HttpResponse::NotFound().json(json!({ "error": "User not found" }));
            }
            HttpResponse::Ok().json(json!({ "preferences": preferences }))
        }
        Err(err) => {
            eprintln!("Failed to update preferences: {:?}", err);
            HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to update preferences" }))
        }
    }
}

pub async fn visit_place(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    input: web::Json<VisitPlaceRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let users: mongodb::Collection<User> = client.database(DB_NAME).collection("Users");
    let places: mongodb::Collection<Place> = client.database(DB_NAME).collection("Places");

    let place_id = input.into_inner().place_id;

    match places.find_one(doc! { "_id": place_id }).await {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(json!({ "error": "Place not found" })),
        Err(err) => {
            eprintln!("Failed to fetch place: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to record visit" }));
        }
    }

    let found = match users.find_one(doc! { "_id": user.user_id }).await {
        Ok(Some(found)) => found,
        Ok(None) => return HttpResponse::NotFound().json(json!({ "error": "User not found" })),
        Err(err) => {
            eprintln!("Failed to fetch user: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to record visit" }));
        }
    };

    // Re-visiting a place earns nothing and changes nothing.
    if found.visited_places.contains(&place_id) {
        return HttpResponse::Ok().json(VisitPlaceResponse {
            street_cred: found.street_cred,
            level: calculate_level(found.street_cred),
            visited_places: found.visited_places,
        });
    }

    let new_street_cred = found.street_cred + 10;
    let mut new_visited = found.visited_places;
    new_visited.push(place_id);

    let update = doc! {
        "$set": {
            "street_cred": new_street_cred,
            "visited_places": new_visited.clone(),
            "updated_at": Utc::now().to_rfc3339(),
        }
    };

    match users.update_one(doc! { "_id": user.user_id }, update).await {
        Ok(_) => HttpResponse::Ok().json(VisitPlaceResponse {
            street_cred: new_street_cred,
            level: calculate_level(new_street_cred),
            visited_places: new_visited,
        }),
        Err(err) => {
            eprintln!("Failed to update visited places: {:?}", err);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to record visit" }))
        }
    }
}

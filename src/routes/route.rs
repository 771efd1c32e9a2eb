use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::db::mongo::DB_NAME;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::place::Place;
use crate::models::route::Route;
use crate::models::user::User;
use crate::services::gamification::calculate_street_cred;
use crate::services::narrative::generate_route_narrative;

#[derive(Debug, Deserialize)]
pub struct RouteCreateRequest {
    pub name: String,
    pub place_ids: Vec<i32>,
}

pub async fn create_route(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    input: web::Json<RouteCreateRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let places: mongodb::Collection<Place> = client.database(DB_NAME).collection("Places");
    let routes: mongodb::Collection<Route> = client.database(DB_NAME).collection("Routes");
    let users: mongodb::Collection<User> = client.database(DB_NAME).collection("Users");

    let body = input.into_inner();

    if body.place_ids.len() < 2 {
        return HttpResponse::BadRequest()
            .json(json!({ "error": "Route must include at least 2 places" }));
    }

    // Validate every id up front, keeping documents in request order.
    let mut members: Vec<Place> = Vec::with_capacity(body.place_ids.len());
    for &place_id in &body.place_ids {
        match places.find_one(doc! { "_id": place_id }).await {
            Ok(Some(place)) => members.push(place),
            Ok(None) => {
                return HttpResponse::NotFound()
                    .json(json!({ "error": format!("Place not found: {}", place_id) }));
            }
            Err(err) => {
                eprintln!("Failed to fetch place {}: {:?}", place_id, err);
                return HttpResponse::InternalServerError()
                    .json(json!({ "error": "Failed to create route" }));
            }
        }
    }

    let total_walking_time: i32 = members.iter().map(|p| p.walking_time).sum();
    let total_driving_time: i32 = members.iter().map(|p| p.driving_time).sum();
    let narrative = generate_route_narrative(&members);

    let mut route = Route {
        id: None,
        user_id: user.user_id,
        name: body.name,
        place_ids: body.place_ids,
        total_walking_time,
        total_driving_time,
        narrative,
        created_at: Some(Utc::now()),
    };

    match routes.insert_one(&route).await {
        Ok(result) => route.id = result.inserted_id.as_object_id(),
        Err(err) => {
            eprintln!("Failed to insert route: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to create route" }));
        }
    }

    recompute_street_cred(&users, &routes, user.user_id).await;

    match route.populate(&client).await {
        Ok(populated) => HttpResponse::Created().json(json!({ "route": populated })),
        Err(err) => {
            eprintln!("Failed to populate route: {:?}", err);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to load route" }))
        }
    }
}

pub async fn list_routes(user: AuthenticatedUser, data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let routes: mongodb::Collection<Route> = client.database(DB_NAME).collection("Routes");

    let cursor = match routes
        .find(doc! { "user_id": user.user_id })
        .sort(doc! { "created_at": -1 })
        .await
    {
        Ok(cursor) => cursor,
        Err(err) => {
            eprintln!("Failed to find routes: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to fetch routes" }));
        }
    };

    let list: Vec<Route> = match cursor.try_collect().await {
        Ok(list) => list,
        Err(err) => {
            eprintln!("Failed to collect routes: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to fetch routes" }));
        }
    };

    let mut populated = Vec::with_capacity(list.len());
    for route in list {
        match route.populate(&client).await {
            Ok(route) => populated.push(route),
            Err(err) => {
                eprintln!("Failed to populate route: {:?}", err);
                return HttpResponse::InternalServerError()
                    .json(json!({ "error": "Failed to fetch routes" }));
            }
        }
    }

    HttpResponse::Ok().json(json!({ "routes": populated }))
}

pub async fn get_route(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    let routes: mongodb::Collection<Route> = client.database(DB_NAME).collection("Routes");

    let route_id = match ObjectId::parse_str(path.into_inner()) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest().json(json!({ "error": "Invalid route ID format" }))
        }
    };

    match routes.find_one(doc! { "_id": route_id }).await {
        Ok(Some(route)) => {
            if route.user_id != user.user_id {
                return HttpResponse::Forbidden().json(json!({ "error": "Access denied" }));
            }
            match route.populate(&client).await {
                Ok(populated) => HttpResponse::Ok().json(json!({ "route": populated })),
                Err(err) => {
                    eprintln!("Failed to populate route: {:?}", err);
                    HttpResponse::InternalServerError()
                        .json(json!({ "error": "Failed to fetch route" }))
                }
            }
        }
        Ok(None) => HttpResponse::NotFound().json(json!({ "error": "Route not found" })),
        Err(err) => {
            eprintln!("Failed to fetch route: {:?}", err);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch route" }))
        }
    }
}

pub async fn delete_route(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    let routes: mongodb::Collection<Route> = client.database(DB_NAME).collection("Routes");
    let users: mongodb::Collection<User> = client.database(DB_NAME).collection("Users");

    let route_id = match ObjectId::parse_str(path.into_inner()) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest().json(json!({ "error": "Invalid route ID format" }))
        }
    };

    match routes.find_one(doc! { "_id": route_id }).await {
        Ok(Some(route)) => {
            if route.user_id != user.user_id {
                return HttpResponse::Forbidden().json(json!({ "error": "Access denied" }));
            }
        }
        Ok(None) => return HttpResponse::NotFound().json(json!({ "error": "Route not found" })),
        Err(err) => {
            eprintln!("Failed to fetch route: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to delete route" }));
        }
    }

    if let Err(err) = routes.delete_one(doc! { "_id": route_id }).await {
        eprintln!("Failed to delete route: {:?}", err);
        return HttpResponse::InternalServerError()
            .json(json!({ "error": "Failed to delete route" }));
    }

    // Cred counts routes, so a deletion lowers it again.
    recompute_street_cred(&users, &routes, user.user_id).await;

    HttpResponse::Ok().json(json!({ "message": "Route deleted successfully" }))
}

/// Street cred is derived state. Recomputing from the live counts keeps it
/// honest no matter how the route set changed.
async fn recompute_street_cred(
    users: &mongodb::Collection<User>,
    routes: &mongodb::Collection<Route>,
    user_id: ObjectId,
) {
    let user = match users.find_one(doc! { "_id": user_id }).await {
        Ok(Some(user)) => user,
        Ok(None) => return,
        Err(err) => {
            eprintln!("Failed to fetch user for street cred update: {:?}", err);
            return;
        }
    };

    let routes_count = match routes.count_documents(doc! { "user_id": user_id }).await {
        Ok(count) => count,
        Err(err) => {
            eprintln!("Failed to count routes: {:?}", err);
            return;
        }
    };

    let street_cred = calculate_street_cred(user.visited_places.len(), routes_count);
    let update = doc! {
        "$set": {
            "street_cred": street_cred,
            "updated_at": Utc::now().to_rfc3339(),
        }
    };

    if let Err(err) = users.update_one(doc! { "_id": user_id }, update).await {
        eprintln!("Failed to update street cred: {:?}", err);
    }
}

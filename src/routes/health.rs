use actix_web::{web, HttpResponse, Responder};
use mongodb::{bson::doc, Client};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use crate::db::mongo::DB_NAME;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "City Companion API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn health_check(client: web::Data<Arc<Client>>) -> impl Responder {
    let mut health = HealthStatus {
        status: "healthy".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let mongo_result = check_mongodb(&client).await;
    health
        .services
        .insert("mongodb".to_string(), mongo_result.clone());

    health
        .services
        .insert("gemini".to_string(), check_api_key("GEMINI_API_KEY"));

    health.services.insert(
        "google_places".to_string(),
        check_api_key("GOOGLE_PLACES_API_KEY"),
    );

    // Only the database is a hard dependency; the AI endpoints degrade on
    // their own when keys are missing.
    if mongo_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

async fn check_mongodb(client: &web::Data<Arc<Client>>) -> ServiceStatus {
    match client.database(DB_NAME).run_command(doc! {"ping": 1}).await {
        Ok(_) => ServiceStatus {
            status: "ok".to_string(),
            details: Some("Connected successfully to MongoDB".to_string()),
        },
        Err(e) => {
            eprintln!("MongoDB health check failed: {}", e);

            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Failed to connect: {}", e)),
            }
        }
    }
}

fn check_api_key(var: &str) -> ServiceStatus {
    match env::var(var) {
        Ok(key) if !key.is_empty() => {
            let masked_key = if key.len() > 8 {
                format!("{}***{}", &key[0..4], &key[key.len() - 4..])
            } else {
                "***".to_string()
            };

            ServiceStatus {
                status: "configured".to_string(),
                details: Some(format!("{} configured ({})", var, masked_key)),
            }
        }
        _ => ServiceStatus {
            status: "not_configured".to_string(),
            details: Some(format!("{} not configured", var)),
        },
    }
}

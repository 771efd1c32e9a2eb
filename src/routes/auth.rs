use actix_web::{web, HttpResponse, Responder};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::error::WriteError;
use mongodb::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::db::mongo::DB_NAME;
use crate::middleware::auth::{jwt_secret, Claims};
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::user::{User, UserPreferences, UserResponse};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

pub async fn register(
    data: web::Data<Arc<Client>>,
    input: web::Json<RegisterRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<User> = client.database(DB_NAME).collection("Users");

    let body = input.into_inner();

    if !is_valid_email(&body.email) {
        return HttpResponse::BadRequest().json(json!({ "error": "Invalid email address" }));
    }
    if body.name.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({ "error": "Name is required" }));
    }
    if body.password.chars().count() < 8 {
        return HttpResponse::BadRequest()
            .json(json!({ "error": "Password must be at least 8 characters" }));
    }

    match collection.find_one(doc! { "email": &body.email }).await {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest().json(json!({ "error": "Email already registered" }))
        }
        Ok(None) => {}
        Err(err) => {
            eprintln!("Database error: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to create user" }));
        }
    }

    let password_hash = match bcrypt::hash(&body.password, bcrypt::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(err) => {
            eprintln!("Failed to hash password: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to create user" }));
        }
    };

    let curr_time = Utc::now();
    let mut user = User {
        id: None,
        email: body.email,
        password: password_hash,
        name: body.name,
        preferences: UserPreferences::default(),
        street_cred: 0,
        visited_places: Vec::new(),
        created_at: Some(curr_time),
        updated_at: Some(curr_time),
    };

    match collection.insert_one(&user).await {
        Ok(result) => {
            let user_id = match result.inserted_id.as_object_id() {
                Some(id) => id,
                None => {
                    return HttpResponse::InternalServerError()
                        .json(json!({ "error": "Failed to create user" }))
                }
            };
            user.id = Some(user_id);

            match generate_token(&user.email, user_id) {
                Ok(token) => HttpResponse::Created().json(AuthResponse {
                    token,
                    user: UserResponse::from(&user),
                }),
                Err(err) => {
                    eprintln!("Token generation failed: {:?}", err);
                    HttpResponse::InternalServerError()
                        .json(json!({ "error": "Token generation failed" }))
                }
            }
        }
        // A unique index on email can still race the find_one above.
        Err(err) => match *err.kind {
            mongodb::error::ErrorKind::Write(error_info) => match error_info {
                mongodb::error::WriteFailure::WriteError(WriteError { code, .. }) => {
                    if code == 11000 {
                        HttpResponse::BadRequest()
                            .json(json!({ "error": "Email already registered" }))
                    } else {
                        println!("Error code: {}", code);
                        HttpResponse::InternalServerError()
                            .json(json!({ "error": "Failed to create user" }))
                    }
                }
                _ => HttpResponse::InternalServerError()
                    .json(json!({ "error": "Failed to create user" })),
            },
            _ => {
                HttpResponse::InternalServerError().json(json!({ "error": "Failed to create user" }))
            }
        },
    }
}

pub async fn login(
    data: web::Data<Arc<Client>>,
    input: web::Json<LoginRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<User> = client.database(DB_NAME).collection("Users");

    let body = input.into_inner();

    match collection.find_one(doc! { "email": &body.email }).await {
        Ok(Some(user)) => {
            if !bcrypt::verify(&body.password, &user.password).unwrap_or(false) {
                return HttpResponse::Unauthorized()
                    .json(json!({ "error": "Incorrect email or password" }));
            }

            let user_id = match user.id {
                Some(id) => id,
                None => {
                    return HttpResponse::InternalServerError()
                        .json(json!({ "error": "Failed to sign in" }))
                }
            };

            match generate_token(&user.email, user_id) {
                Ok(token) => HttpResponse::Ok().json(AuthResponse {
                    token,
                    user: UserResponse::from(&user),
                }),
                Err(err) => {
                    eprintln!("Token generation failed: {:?}", err);
                    HttpResponse::InternalServerError()
                        .json(json!({ "error": "Token generation failed" }))
                }
            }
        }
        // Same response for unknown email and wrong password.
        Ok(None) => {
            HttpResponse::Unauthorized().json(json!({ "error": "Incorrect email or password" }))
        }
        Err(err) => {
            eprintln!("Database error: {:?}", err);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to sign in" }))
        }
    }
}

pub async fn session(user: AuthenticatedUser, data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<User> = client.database(DB_NAME).collection("Users");

    match collection.find_one(doc! { "_id": user.user_id }).await {
        Ok(Some(user)) => HttpResponse::Ok().json(json!({ "user": UserResponse::from(&user) })),
        Ok(None) => HttpResponse::NotFound().json(json!({ "error": "User not found" })),
        Err(err) => {
            eprintln!("Failed to fetch user: {:?}", err);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch user" }))
        }
    }
}

fn is_valid_email(email: &str) -> bool {
    let re = regex::Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*$",
    );
    return re.unwrap().is_match(email);
}

fn token_lifetime_minutes() -> i64 {
    std::env::var("JWT_EXPIRES_IN_MINUTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10_080)
}

pub fn generate_token(email: &str, user_id: ObjectId) -> Result<String, jsonwebtoken::errors::Error> {
    let secret = jwt_secret();
    let now = Utc::now();

    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::minutes(token_lifetime_minutes())).timestamp() as usize,
        user_id: user_id.to_hex(),
    };

    let header = Header::new(Algorithm::HS256);
    encode(&header, &claims, &EncodingKey::from_secret(secret.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_addresses() {
        assert!(is_valid_email("walker@example.com"));
        assert!(is_valid_email("first.last+tag@sub.domain.org"));
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@domain@twice.com"));
        assert!(!is_valid_email("@nouser.com"));
        assert!(!is_valid_email("trailing-dot@domain."));
    }

    #[test]
    fn test_token_round_trips_with_same_secret() {
        let user_id = ObjectId::new();
        let token = generate_token("walker@example.com", user_id).unwrap();

        let decoded = jsonwebtoken::decode::<Claims>(
            &token,
            &jsonwebtoken::DecodingKey::from_secret(jwt_secret().as_bytes()),
            &jsonwebtoken::Validation::new(Algorithm::HS256),
        )
        .unwrap();

        assert_eq!(decoded.claims.sub, "walker@example.com");
        assert_eq!(decoded.claims.user_id, user_id.to_hex());
        assert!(decoded.claims.exp > decoded.claims.iat);
    }
}

use actix_cors::Cors;
use actix_web::dev::Service;
use actix_web::{middleware::Logger, web, App, HttpResponse, Responder};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use city_companion_api::db::mongo::create_mongo_client;
use city_companion_api::middleware::auth::{jwt_secret, AuthMiddleware, Claims};
use city_companion_api::routes;
use city_companion_api::services::route_generation_service::RouteGenerator;

pub struct TestApp {
    pub client: Arc<mongodb::Client>,
}

impl TestApp {
    pub async fn new() -> Self {
        // Short timeouts keep the suite fast when no local MongoDB is
        // running; every handler that needs the database is mocked below.
        let mongo_uri = std::env::var("MONGODB_URI").unwrap_or_else(|_| {
            "mongodb://localhost:27017/?serverSelectionTimeoutMS=1000&connectTimeoutMS=1000"
                .to_string()
        });
        let client = create_mongo_client(&mongo_uri).await;

        Self { client }
    }

    /// Mirror of the production route tree. The banner, health check, AI
    /// scope and the JWT middleware are the real thing; handlers that would
    /// talk to MongoDB are mocks returning the production response shapes.
    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.client.clone()))
            .app_data(web::Data::new(RouteGenerator::new()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            // `test::init_service` skips the HTTP dispatcher, which is what
            // turns service-level errors (e.g. the auth middleware's
            // `ErrorUnauthorized`) into responses on a real server. Mirror
            // that conversion here so `call_service` sees the same 401s a
            // client would.
            .wrap_fn(|req, srv| {
                // Holding a clone of the real request across the call would
                // break routing (`match_info_mut` needs unique ownership), so
                // the error branch pairs the response with a fresh dummy
                // request; assertions only ever look at status and body.
                let fut = srv.call(req);
                async move {
                    match fut.await {
                        Ok(res) => Ok(res.map_into_boxed_body()),
                        Err(err) => {
                            let dummy = actix_web::test::TestRequest::default().to_http_request();
                            Ok(actix_web::dev::ServiceResponse::from_err(err, dummy))
                        }
                    }
                }
            })
            .route("/", web::get().to(routes::health::root))
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api/v1")
                    .service(
                        web::scope("/auth")
                            .route("/register", web::post().to(register_rejected))
                            .route("/login", web::post().to(login_rejected))
                            .service(
                                web::scope("")
                                    .wrap(AuthMiddleware)
                                    .route("/session", web::get().to(session_info)),
                            ),
                    )
                    .service(
                        web::scope("/places")
                            .route("", web::get().to(get_places))
                            .route("/recommendations", web::post().to(get_recommendations))
                            .route("/{id}", web::get().to(place_not_found)),
                    )
                    .service(
                        web::scope("/ai")
                            .route("/health", web::get().to(routes::ai_route::ai_health))
                            .route(
                                "/generate-route",
                                web::post().to(routes::ai_route::generate_route),
                            )
                            .route(
                                "/route-suggestions",
                                web::get().to(routes::ai_route::route_suggestions),
                            ),
                    )
                    .service(
                        web::scope("/users")
                            .wrap(AuthMiddleware)
                            .route("/profile", web::get().to(get_profile))
                            .route("/profile", web::put().to(update_profile))
                            .route("/preferences", web::put().to(update_preferences))
                            .route("/visit-place", web::post().to(visit_place)),
                    )
                    .service(
                        web::scope("/routes")
                            .wrap(AuthMiddleware)
                            .route("", web::post().to(create_route))
                            .route("", web::get().to(get_routes))
                            .route("/{id}", web::get().to(route_not_found))
                            .route("/{id}", web::delete().to(delete_route)),
                    )
                    .service(
                        web::scope("/expenses")
                            .wrap(AuthMiddleware)
                            .route("", web::post().to(create_expense))
                            .route("", web::get().to(get_expenses))
                            .route("/{id}", web::delete().to(delete_expense)),
                    ),
            )
    }
}

// Mock handler functions for testing

async fn register_rejected() -> impl Responder {
    HttpResponse::BadRequest().json(serde_json::json!({"error": "Invalid email address"}))
}

async fn login_rejected() -> impl Responder {
    HttpResponse::Unauthorized().json(serde_json::json!({"error": "Incorrect email or password"}))
}

async fn session_info() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "user": {
            "id": get_test_user_id(),
            "email": get_test_email(),
            "name": "Test Walker",
            "preferences": {
                "mood": [],
                "interests": [],
                "pace": null,
                "budget": null,
                "atmosphere": []
            },
            "street_cred": 0,
            "visited_places": []
        }
    }))
}

async fn get_places() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"places": []}))
}

async fn get_recommendations() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"recommendations": []}))
}

async fn place_not_found() -> impl Responder {
    HttpResponse::NotFound().json(serde_json::json!({"error": "Place not found"}))
}

async fn get_profile() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "user": {
            "id": get_test_user_id(),
            "email": get_test_email(),
            "name": "Test Walker",
            "street_cred": 35,
            "visited_places": [1]
        },
        "stats": {
            "visitedPlaces": 1,
            "routesCreated": 1,
            "streetCred": 35,
            "level": 1,
            "levelTitle": "Novice Explorer"
        }
    }))
}

async fn update_profile() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "user": {"id": get_test_user_id(), "name": "Renamed Walker"}
    }))
}

async fn update_preferences() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "preferences": {
            "mood": ["curious"],
            "interests": ["coffee"],
            "pace": null,
            "budget": null,
            "atmosphere": []
        }
    }))
}

async fn visit_place() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "streetCred": 10,
        "level": 1,
        "visitedPlaces": [1]
    }))
}

async fn create_route() -> impl Responder {
    HttpResponse::Created().json(serde_json::json!({
        "route": {
            "id": "64b000000000000000000001",
            "name": "Test Route",
            "places": [],
            "total_walking_time": 0,
            "total_driving_time": 0,
            "narrative": "Your journey awaits!"
        }
    }))
}

async fn get_routes() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"routes": []}))
}

async fn route_not_found() -> impl Responder {
    HttpResponse::NotFound().json(serde_json::json!({"error": "Route not found"}))
}

async fn delete_route() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"message": "Route deleted successfully"}))
}

async fn create_expense() -> impl Responder {
    HttpResponse::Created().json(serde_json::json!({
        "expense": {
            "id": "64b000000000000000000002",
            "amount": 12.5,
            "category": "food",
            "description": "Lunch"
        }
    }))
}

async fn get_expenses() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "expenses": [],
        "summary": {
            "total": 0.0,
            "count": 0,
            "average": 0.0,
            "by_category": {},
            "category_percentages": {}
        }
    }))
}

async fn delete_expense() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"message": "Expense deleted successfully"}))
}

pub fn get_test_user_id() -> String {
    "507f1f77bcf86cd799439011".to_string()
}

pub fn get_test_email() -> String {
    "walker@example.com".to_string()
}

pub fn get_test_password() -> String {
    "strollthrough42".to_string()
}

/// A real token signed with the same secret the middleware verifies against.
pub fn make_auth_token() -> String {
    let user_id = ObjectId::parse_str(get_test_user_id()).unwrap();
    routes::auth::generate_token(&get_test_email(), user_id).unwrap()
}

/// A structurally valid token whose expiry is an hour in the past.
pub fn expired_auth_token() -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: get_test_email(),
        exp: (now - 3600) as usize,
        iat: (now - 7200) as usize,
        user_id: get_test_user_id(),
    };

    jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(jwt_secret().as_bytes()),
    )
    .unwrap()
}

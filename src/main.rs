use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

mod db;
mod middleware;
mod models;
mod routes;
mod services;

use services::route_generation_service::RouteGenerator;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    let mongo_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let client = db::mongo::create_mongo_client(&mongo_uri).await;
    println!("MongoDB connection established");

    // Services read their API keys once at startup.
    let route_generator = web::Data::new(RouteGenerator::new());

    let cors_origins =
        std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string());

    println!("Starting HTTP server...");

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);
        for origin in cors_origins.split(',').map(str::trim).filter(|o| !o.is_empty()) {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .app_data(web::Data::new(client.clone()))
            .app_data(route_generator.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .route("/", web::get().to(routes::health::root))
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api/v1")
                    // Public routes
                    .service(
                        web::scope("/auth")
                            .route("/register", web::post().to(routes::auth::register))
                            .route("/login", web::post().to(routes::auth::login))
                            .service(
                                web::scope("")
                                    .wrap(middleware::auth::AuthMiddleware)
                                    .route("/session", web::get().to(routes::auth::session)),
                            ),
                    )
                    .service(
                        web::scope("/places")
                            .route("", web::get().to(routes::place::list_places))
                            .route(
                                "/recommendations",
                                web::post().to(routes::place::recommendations),
                            )
                            .route("/{id}", web::get().to(routes::place::get_place)),
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
                    // Protected routes
                    .service(
                        web::scope("/users")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route("/profile", web::get().to(routes::user::get_profile))
                            .route("/profile", web::put().to(routes::user::update_profile))
                            .route(
                                "/preferences",
                                web::put().to(routes::user::update_preferences),
                            )
                            .route("/visit-place", web::post().to(routes::user::visit_place)),
                    )
                    .service(
                        web::scope("/routes")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route("", web::post().to(routes::route::create_route))
                            .route("", web::get().to(routes::route::list_routes))
                            .route("/{id}", web::get().to(routes::route::get_route))
                            .route("/{id}", web::delete().to(routes::route::delete_route)),
                    )
                    .service(
                        web::scope("/expenses")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route("", web::post().to(routes::expense::create_expense))
                            .route("", web::get().to(routes::expense::list_expenses))
                            .route("/{id}", web::delete().to(routes::expense::delete_expense)),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}

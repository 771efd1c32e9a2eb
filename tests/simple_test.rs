use actix_web::dev::Service;
use actix_web::{test, web, App, HttpResponse};
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use city_companion_api::middleware::auth::AuthMiddleware;
use city_companion_api::routes;

async fn protected_ok() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({"status": "OK"})))
}

async fn echo_json(_body: web::Json<serde_json::Value>) -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({"received": true})))
}

#[actix_web::test]
async fn test_root_banner() {
    let app = test::init_service(
        App::new()
            .route("/", web::get().to(routes::health::root))
    ).await;

    let req = test::TestRequest::get()
        .uri("/")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "City Companion API");
}

#[actix_web::test]
async fn test_route_suggestions_endpoint() {
    let app = test::init_service(
        App::new()
            .route("/suggestions", web::get().to(routes::ai_route::route_suggestions))
    ).await;

    let req = test::TestRequest::get()
        .uri("/suggestions")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 5);
    assert_eq!(body["demo_mode"], true);
}

#[actix_web::test]
async fn test_auth_middleware_missing_header() {
    let app = test::init_service(
        App::new()
            // `init_service` has no HTTP dispatcher to convert the
            // middleware's `ErrorUnauthorized` into a response, so mirror
            // that conversion here as the real server would.
            .wrap_fn(|req, srv| {
                let fut = srv.call(req);
                async move {
                    match fut.await {
                        Ok(res) => Ok(res.map_into_boxed_body()),
                        Err(err) => {
                            let dummy = test::TestRequest::default().to_http_request();
                            Ok(actix_web::dev::ServiceResponse::from_err(err, dummy))
                        }
                    }
                }
            })
            .service(
                web::scope("/protected")
                    .wrap(AuthMiddleware)
                    .route("", web::get().to(protected_ok)),
            ),
    ).await;

    let req = test::TestRequest::get()
        .uri("/protected")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_auth_middleware_invalid_token() {
    let app = test::init_service(
        App::new()
            // See test_auth_middleware_missing_header: convert service-level
            // auth errors into responses the way the HTTP dispatcher does.
            .wrap_fn(|req, srv| {
                let fut = srv.call(req);
                async move {
                    match fut.await {
                        Ok(res) => Ok(res.map_into_boxed_body()),
                        Err(err) => {
                            let dummy = test::TestRequest::default().to_http_request();
                            Ok(actix_web::dev::ServiceResponse::from_err(err, dummy))
                        }
                    }
                }
            })
            .service(
                web::scope("/protected")
                    .wrap(AuthMiddleware)
                    .route("", web::get().to(protected_ok)),
            ),
    ).await;

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(("Authorization", "Bearer garbage"))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_auth_middleware_valid_token() {
    let app = test::init_service(
        App::new().service(
            web::scope("/protected")
                .wrap(AuthMiddleware)
                .route("", web::get().to(protected_ok)),
        ),
    ).await;

    let token = routes::auth::generate_token("walker@example.com", ObjectId::new()).unwrap();
    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "OK");
}

#[actix_web::test]
async fn test_method_not_allowed() {
    let app = test::init_service(
        App::new()
            .route("/get-only", web::get().to(protected_ok))
    ).await;

    let req = test::TestRequest::post()
        .uri("/get-only")
        .to_request();

    let resp = test::call_service(&app, req).await;
    // In actix-web, a route that doesn't exist returns 404, not 405
    // 405 is returned when the route exists but the method is not allowed
    assert!(resp.status() == 404 || resp.status() == 405);
}

#[actix_web::test]
async fn test_json_parsing() {
    let app = test::init_service(
        App::new()
            .route("/json", web::post().to(echo_json))
    ).await;

    // Test valid JSON
    let req = test::TestRequest::post()
        .uri("/json")
        .set_json(&json!({"test": "data"}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    // Test malformed JSON
    let req = test::TestRequest::post()
        .uri("/json")
        .set_payload("{ invalid json")
        .insert_header((actix_web::http::header::CONTENT_TYPE, "application/json"))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}

#[actix_web::test]
async fn test_cors_headers() {
    let app = test::init_service(
        App::new()
            .wrap(actix_cors::Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header())
            .route("/cors", web::get().to(routes::health::root))
    ).await;

    let req = test::TestRequest::get()
        .uri("/cors")
        .insert_header(("Origin", "http://localhost:3000"))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

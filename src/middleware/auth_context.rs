use std::future::{ready, Ready};

use actix_web::{
    dev::Payload, error::ErrorUnauthorized, Error, FromRequest, HttpMessage, HttpRequest,
};
use mongodb::bson::oid::ObjectId;

use crate::middleware::auth::Claims;

/// Extractor giving handlers the verified identity behind the request.
/// Only usable inside scopes wrapped with `AuthMiddleware`.
#[derive(Clone)]
pub struct AuthenticatedUser {
    pub user_id: ObjectId,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(claims) = req.extensions().get::<Claims>() {
            match ObjectId::parse_str(&claims.user_id) {
                Ok(user_id) => ready(Ok(AuthenticatedUser {
                    user_id,
                    email: claims.sub.clone(),
                })),
                Err(_) => ready(Err(ErrorUnauthorized("Invalid user id in token"))),
            }
        } else {
            ready(Err(ErrorUnauthorized("User not authenticated")))
        }
    }
}

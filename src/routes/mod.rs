pub mod ai_route;
pub mod auth;
pub mod expense;
pub mod health;
pub mod place;
pub mod route;
pub mod user;

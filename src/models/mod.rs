pub mod ai_route;
pub mod expense;
pub mod place;
pub mod route;
pub mod user;

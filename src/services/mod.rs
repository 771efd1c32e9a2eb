pub mod distance_service;
pub mod gamification;
pub mod gemini_service;
pub mod narrative;
pub mod places_service;
pub mod recommendation_service;
pub mod route_generation_service;

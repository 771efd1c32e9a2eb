use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub mood: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub pace: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub atmosphere: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub password: String, // Always hashed
    pub name: String,
    #[serde(default)]
    pub preferences: UserPreferences,
    #[serde(default)]
    pub street_cred: i32,
    #[serde(default)]
    pub visited_places: Vec<i32>,
    // We always want these fields, but have them optional so we can set them in the code
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Wire form of a user. The password hash never leaves the database layer.
#[derive(Debug, Deserialize, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub preferences: UserPreferences,
    pub street_cred: i32,
    pub visited_places: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: user.email.clone(),
            name: user.name.clone(),
            preferences: user.preferences.clone(),
            street_cred: user.street_cred,
            visited_places: user.visited_places.clone(),
            created_at: user.created_at,
        }
    }
}

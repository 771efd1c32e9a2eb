use std::collections::HashMap;

use bson::doc;
use chrono::{DateTime, Utc};
use futures::stream::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use crate::db::mongo::DB_NAME;
use crate::models::place::{Place, PlaceResponse};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Route {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub name: String,
    pub place_ids: Vec<i32>,
    pub total_walking_time: i32,
    pub total_driving_time: i32,
    pub narrative: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Route with its member places expanded, as returned to clients.
#[derive(Debug, Deserialize, Serialize)]
pub struct PopulatedRoute {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub places: Vec<PlaceResponse>,
    pub total_walking_time: i32,
    pub total_driving_time: i32,
    pub narrative: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Route {
    /// Expands `place_ids` into full place documents, preserving order.
    /// Places that have been removed since the route was saved are skipped.
    pub async fn populate(self, client: &Client) -> Result<PopulatedRoute, mongodb::error::Error> {
        let collection: Collection<Place> = client.database(DB_NAME).collection("Places");

        let mut place_map: HashMap<i32, Place> = HashMap::new();
        if !self.place_ids.is_empty() {
            let cursor = collection
                .find(doc! { "_id": { "$in": self.place_ids.clone() } })
                .await?;
            let places: Vec<Place> = cursor.try_collect().await?;
            for place in places {
                place_map.insert(place.id, place);
            }
        }

        let places = self
            .place_ids
            .iter()
            .filter_map(|id| place_map.get(id).cloned().map(PlaceResponse::from))
            .collect();

        Ok(PopulatedRoute {
            id: self.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: self.user_id.to_hex(),
            name: self.name,
            places,
            total_walking_time: self.total_walking_time,
            total_driving_time: self.total_driving_time,
            narrative: self.narrative,
            created_at: self.created_at,
        })
    }
}

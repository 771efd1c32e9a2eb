use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const EXPENSE_CATEGORIES: [&str; 6] = [
    "food",
    "transport",
    "shopping",
    "entertainment",
    "accommodation",
    "other",
];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Expense {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub amount: f64,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub place_id: Option<i32>,
    #[serde(default)]
    pub place_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ExpenseResponse {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Expense> for ExpenseResponse {
    fn from(expense: &Expense) -> Self {
        ExpenseResponse {
            id: expense.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: expense.user_id.to_hex(),
            amount: expense.amount,
            category: expense.category.clone(),
            description: expense.description.clone(),
            place_id: expense.place_id,
            place_name: expense.place_name.clone(),
            notes: expense.notes.clone(),
            date: expense.date,
            created_at: expense.created_at,
        }
    }
}

/// Aggregate view of a user's spending, money rounded to cents.
#[derive(Debug, Deserialize, Serialize)]
pub struct ExpenseSummary {
    pub total: f64,
    pub count: usize,
    pub average: f64,
    pub by_category: HashMap<String, f64>,
    pub category_percentages: HashMap<String, f64>,
}

use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::mongo::DB_NAME;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::expense::{Expense, ExpenseResponse, ExpenseSummary, EXPENSE_CATEGORIES};

#[derive(Debug, Deserialize)]
pub struct ExpenseCreateRequest {
    pub amount: f64,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub place_id: Option<i32>,
    #[serde(default)]
    pub place_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<ExpenseResponse>,
    pub summary: ExpenseSummary,
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub async fn create_expense(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    input: web::Json<ExpenseCreateRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Expense> =
        client.database(DB_NAME).collection("Expenses");

    let body = input.into_inner();

    if body.amount <= 0.0 {
        return HttpResponse::BadRequest()
            .json(json!({ "error": "Amount must be greater than 0" }));
    }
    if !EXPENSE_CATEGORIES.contains(&body.category.as_str()) {
        return HttpResponse::BadRequest().json(json!({
            "error": format!("Category must be one of: {}", EXPENSE_CATEGORIES.join(", "))
        }));
    }
    if body.description.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({ "error": "Description is required" }));
    }

    let mut expense = Expense {
        id: None,
        user_id: user.user_id,
        amount: body.amount,
        category: body.category,
        description: body.description,
        place_id: body.place_id,
        place_name: body.place_name,
        notes: body.notes,
        date: body.date.unwrap_or_else(Utc::now),
        created_at: Some(Utc::now()),
    };

    match collection.insert_one(&expense).await {
        Ok(result) => {
            expense.id = result.inserted_id.as_object_id();
            HttpResponse::Created().json(json!({ "expense": ExpenseResponse::from(&expense) }))
        }
        Err(err) => {
            eprintln!("Failed to insert expense: {:?}", err);
            HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to create expense" }))
        }
    }
}

pub async fn list_expenses(user: AuthenticatedUser, data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Expense> =
        client.database(DB_NAME).collection("Expenses");

    let cursor = match collection
        .find(doc! { "user_id": user.user_id })
        .sort(doc! { "date": -1 })
        .await
    {
        Ok(cursor) => cursor,
        Err(err) => {
            eprintln!("Failed to find expenses: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to fetch expenses" }));
        }
    };

    let list: Vec<Expense> = match cursor.try_collect().await {
        Ok(list) => list,
        Err(err) => {
            eprintln!("Failed to collect expenses: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to fetch expenses" }));
        }
    };

    let total: f64 = list.iter().map(|e| e.amount).sum();
    let count = list.len();
    let average = if count > 0 { total / count as f64 } else { 0.0 };

    let mut by_category: HashMap<String, f64> = HashMap::new();
    for expense in &list {
        *by_category.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }
    for amount in by_category.values_mut() {
        *amount = round_cents(*amount);
    }

    let mut category_percentages: HashMap<String, f64> = HashMap::new();
    if total > 0.0 {
        for (category, amount) in &by_category {
            category_percentages.insert(category.clone(), round_cents(amount / total * 100.0));
        }
    }

    let summary = ExpenseSummary {
        total: round_cents(total),
        count,
        average: round_cents(average),
        by_category,
        category_percentages,
    };

    let expenses: Vec<ExpenseResponse> = list.iter().map(ExpenseResponse::from).collect();

    HttpResponse::Ok().json(ExpenseListResponse { expenses, summary })
}

pub async fn delete_expense(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Expense> =
        client.database(DB_NAME).collection("Expenses");

    let expense_id = match ObjectId::parse_str(path.into_inner()) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest()
                .json(json!({ "error": "Invalid expense ID format" }))
        }
    };

    match collection.find_one(doc! { "_id": expense_id }).await {
        Ok(Some(expense)) => {
            if expense.user_id != user.user_id {
                return HttpResponse::Forbidden()
                    .json(json!({ "error": "Not authorized to delete this expense" }));
            }
        }
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({ "error": "Expense not found" }))
        }
        Err(err) => {
            eprintln!("Failed to fetch expense: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to delete expense" }));
        }
    }

    match collection.delete_one(doc! { "_id": expense_id }).await {
        Ok(_) => HttpResponse::Ok().json(json!({ "message": "Expense deleted successfully" })),
        Err(err) => {
            eprintln!("Failed to delete expense: {:?}", err);
            HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to delete expense" }))
        }
    }
}

//! One-shot bootstrap of the default accounts and categories for a user.
//!
//! The original service trusted a caller-supplied `user_id` here. That was
//! an unauthenticated write path, so this endpoint now requires the same
//! bearer identity as the transactions resource and derives the owner from
//! the token, never from the request body.

use axum::{Json, extract::State};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{Error, auth::Identity, state::SeedState, stores::SeedStore};

/// An account row to insert on the upstream service.
///
/// Accounts are only ever created by the seed path.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    /// The owner of the account.
    pub user_id: Uuid,
    /// Display name of the account.
    pub name: String,
    /// The 3-letter currency code.
    pub currency: String,
    /// The opening balance.
    pub initial_balance: f64,
}

/// A category row to insert on the upstream service.
///
/// Categories are only ever created by the seed path.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    /// The owner of the category.
    pub user_id: Uuid,
    /// Display name of the category.
    pub name: String,
    /// Whether the category groups expenses or income.
    pub category_type: CategoryType,
}

/// The kind of transactions a category groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryType {
    /// Money spent.
    Expense,
    /// Money earned.
    Income,
}

impl CategoryType {
    /// The lowercase column representation of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryType::Expense => "expense",
            CategoryType::Income => "income",
        }
    }
}

/// The default accounts created for a new user.
pub fn default_accounts(user_id: Uuid) -> Vec<NewAccount> {
    [("Wallet", 100.0), ("Checking", 500.0)]
        .into_iter()
        .map(|(name, initial_balance)| NewAccount {
            user_id,
            name: name.to_owned(),
            currency: "USD".to_owned(),
            initial_balance,
        })
        .collect()
}

/// The default categories created for a new user.
pub fn default_categories(user_id: Uuid) -> Vec<NewCategory> {
    [
        ("Groceries", CategoryType::Expense),
        ("Salary", CategoryType::Income),
    ]
    .into_iter()
    .map(|(name, category_type)| NewCategory {
        user_id,
        name: name.to_owned(),
        category_type,
    })
    .collect()
}

/// Handler for inserting the default rows for the authenticated caller.
///
/// The inserts are unconditional: calling the endpoint twice creates the
/// default rows twice.
///
/// # Errors
/// Returns an [Error::Upstream] if either batch insert fails.
pub async fn seed_endpoint<T>(
    State(state): State<SeedState<T>>,
    identity: Identity,
) -> Result<Json<Value>, Error>
where
    T: SeedStore + Clone + Send + Sync,
{
    state
        .store
        .insert_accounts(&default_accounts(identity.user_id))
        .await?;

    state
        .store
        .insert_categories(&default_categories(identity.user_id))
        .await?;

    Ok(Json(json!({ "ok": true })))
}

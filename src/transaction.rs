//! Transaction management for the finance service.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the request shapes for listing and
//!   creating transactions
//! - The list and create endpoint handlers
//!
//! Both operations are scoped to the resolved [Identity]: listing always
//! filters by the caller's user id and creating always stamps it onto the
//! inserted row, regardless of what the request body claims.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Error,
    auth::Identity,
    state::TransactionState,
    stores::{TransactionPage, TransactionStore},
};

/// The number of transactions returned when a list request does not specify
/// a limit.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// A financial event: money spent, earned, or moved between accounts.
///
/// Rows are owned and timestamped by the upstream service; this is the
/// fixed projection the API exposes. The owner's user id is deliberately
/// not part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The id assigned by the upstream service.
    pub id: Uuid,
    /// The amount of money spent or earned. Signed.
    pub amount: f64,
    /// The 3-letter currency code.
    pub currency: String,
    /// Whether this is an expense, income, or transfer.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Who the money went to or came from.
    pub merchant: Option<String>,
    /// Free-form note.
    pub note: Option<String>,
    /// When the transaction happened.
    pub happened_at: DateTime<Utc>,
    /// When the row was created. Managed by the upstream service.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated. Managed by the upstream service.
    pub updated_at: DateTime<Utc>,
    /// The account this transaction belongs to, if any.
    pub account_id: Option<Uuid>,
    /// The category this transaction belongs to, if any.
    pub category_id: Option<Uuid>,
}

/// The closed set of transaction types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money spent.
    Expense,
    /// Money earned.
    Income,
    /// Money moved between the user's own accounts.
    Transfer,
}

impl TransactionType {
    /// The lowercase wire and column representation of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
            TransactionType::Transfer => "transfer",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            "transfer" => Ok(TransactionType::Transfer),
            _ => Err(Error::InvalidTransactionType),
        }
    }
}

/// A validated transaction ready to be inserted on the upstream service.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The owner of the row. Always the resolved identity of the caller.
    pub user_id: Uuid,
    /// The amount of money spent or earned. Signed.
    pub amount: f64,
    /// The 3-letter currency code.
    pub currency: String,
    /// Whether this is an expense, income, or transfer.
    pub transaction_type: TransactionType,
    /// Who the money went to or came from.
    pub merchant: Option<String>,
    /// Free-form note.
    pub note: Option<String>,
    /// When the transaction happened.
    pub happened_at: DateTime<Utc>,
    /// The account this transaction belongs to, if any.
    pub account_id: Option<Uuid>,
    /// The category this transaction belongs to, if any.
    pub category_id: Option<Uuid>,
    /// Whether the transaction recurs. Stored but not interpreted here.
    pub is_recurring: bool,
}

/// The query parameters accepted by the list endpoint.
///
/// Both values are parsed leniently: a missing, non-numeric, or negative
/// value falls back to the default rather than rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    limit: Option<String>,
    offset: Option<String>,
}

impl ListParams {
    fn page(&self) -> TransactionPage {
        TransactionPage {
            limit: parse_or(self.limit.as_deref(), DEFAULT_LIST_LIMIT),
            offset: parse_or(self.offset.as_deref(), 0),
        }
    }
}

fn parse_or(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(|raw| raw.parse::<i64>().ok())
        .filter(|parsed| *parsed >= 0)
        .unwrap_or(default)
}

/// The request body accepted by the create endpoint.
///
/// `amount` is kept as a raw JSON value so that a missing or non-numeric
/// amount is reported with the endpoint's own 400 message instead of a
/// deserialization rejection. Unknown fields, including any caller-supplied
/// `user_id`, are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTransaction {
    #[serde(default)]
    amount: serde_json::Value,
    currency: Option<String>,
    #[serde(rename = "type")]
    transaction_type: Option<String>,
    merchant: Option<String>,
    note: Option<String>,
    happened_at: Option<DateTime<Utc>>,
    account_id: Option<Uuid>,
    category_id: Option<Uuid>,
    is_recurring: Option<bool>,
}

impl CreateTransaction {
    /// Validate the body and stamp it with the caller's identity.
    ///
    /// Checks short-circuit in order: `amount` first, then `type`. A
    /// missing `happened_at` becomes the current time.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `amount` is not a finite number,
    /// or [Error::InvalidTransactionType] if `type` is outside the closed
    /// set.
    fn into_new_transaction(self, identity: Identity) -> Result<NewTransaction, Error> {
        let amount = self
            .amount
            .as_f64()
            .filter(|amount| amount.is_finite())
            .ok_or(Error::InvalidAmount)?;

        let transaction_type = match self.transaction_type.as_deref() {
            Some(value) => value.parse()?,
            None => TransactionType::Expense,
        };

        Ok(NewTransaction {
            user_id: identity.user_id,
            amount,
            currency: self.currency.unwrap_or_else(|| "USD".to_owned()),
            transaction_type,
            merchant: self.merchant,
            note: self.note,
            happened_at: self.happened_at.unwrap_or_else(Utc::now),
            account_id: self.account_id,
            category_id: self.category_id,
            is_recurring: self.is_recurring.unwrap_or(false),
        })
    }
}

/// Handler for listing the caller's transactions, most recent first.
///
/// # Errors
/// Returns an [Error::Upstream] if the upstream query fails. Requests
/// without a resolvable identity are rejected with 401 by the [Identity]
/// extractor.
pub async fn list_transactions_endpoint<T>(
    State(state): State<TransactionState<T>>,
    identity: Identity,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Transaction>>, Error>
where
    T: TransactionStore + Clone + Send + Sync,
{
    let transactions = state
        .store
        .list_for_user(identity.user_id, params.page())
        .await?;

    Ok(Json(transactions))
}

/// Handler for creating a transaction owned by the caller.
///
/// A missing body is treated as an empty object so that the validation
/// messages stay consistent with field-level failures.
///
/// # Errors
/// Returns an [Error::InvalidAmount] or [Error::InvalidTransactionType] for
/// invalid input, or an [Error::Upstream] if the insert fails.
pub async fn create_transaction_endpoint<T>(
    State(state): State<TransactionState<T>>,
    identity: Identity,
    body: Option<Json<CreateTransaction>>,
) -> Result<(StatusCode, Json<Transaction>), Error>
where
    T: TransactionStore + Clone + Send + Sync,
{
    let body = body.map(|Json(body)| body).unwrap_or_default();

    let new_transaction = body.into_new_transaction(identity)?;
    let created = state.store.create(new_transaction).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

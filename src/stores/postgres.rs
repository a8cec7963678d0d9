//! Implements the upstream store over the service's Postgres endpoint.
//!
//! The hosted platform exposes its database as a plain Postgres connection
//! string, so the store is a `sqlx` pool plus the handful of queries the
//! handlers need. The pool is created once at startup and shared across
//! requests.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, QueryBuilder, postgres::PgPoolOptions};
use uuid::Uuid;

use crate::{
    Error,
    seed::{NewAccount, NewCategory},
    stores::{SeedStore, TransactionPage, TransactionStore},
    transaction::{NewTransaction, Transaction},
};

/// The fixed field projection for transaction queries. The `user_id` column
/// is a query filter, never part of the response.
const TRANSACTION_PROJECTION: &str = "id, amount, currency, type, merchant, note, \
     happened_at, created_at, updated_at, account_id, category_id";

/// Issues queries against the upstream service's Postgres endpoint.
#[derive(Debug, Clone)]
pub struct PgUpstreamStore {
    pool: PgPool,
}

impl PgUpstreamStore {
    /// Create a store over an existing connection `pool`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the upstream service at `url`.
    ///
    /// # Errors
    /// Returns an [Error::Upstream] if the connection cannot be established.
    pub async fn connect(url: &str) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;

        Ok(Self::new(pool))
    }
}

impl TransactionStore for PgUpstreamStore {
    async fn list_for_user(
        &self,
        user_id: Uuid,
        page: TransactionPage,
    ) -> Result<Vec<Transaction>, Error> {
        let sql = format!(
            "SELECT {TRANSACTION_PROJECTION}
             FROM transactions
             WHERE user_id = $1
             ORDER BY happened_at DESC
             LIMIT $2 OFFSET $3"
        );

        let rows = sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(user_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TransactionRow::into_entity).collect()
    }

    async fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let sql = format!(
            "INSERT INTO transactions
                 (user_id, amount, currency, type, merchant, note,
                  happened_at, account_id, category_id, is_recurring)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {TRANSACTION_PROJECTION}"
        );

        let row = sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(transaction.user_id)
            .bind(transaction.amount)
            .bind(transaction.currency)
            .bind(transaction.transaction_type.as_str())
            .bind(transaction.merchant)
            .bind(transaction.note)
            .bind(transaction.happened_at)
            .bind(transaction.account_id)
            .bind(transaction.category_id)
            .bind(transaction.is_recurring)
            .fetch_one(&self.pool)
            .await?;

        row.into_entity()
    }
}

impl SeedStore for PgUpstreamStore {
    async fn insert_accounts(&self, accounts: &[NewAccount]) -> Result<(), Error> {
        let mut query =
            QueryBuilder::new("INSERT INTO accounts (user_id, name, currency, initial_balance) ");

        query.push_values(accounts, |mut row, account| {
            row.push_bind(account.user_id)
                .push_bind(&account.name)
                .push_bind(&account.currency)
                .push_bind(account.initial_balance);
        });

        query.build().execute(&self.pool).await?;

        Ok(())
    }

    async fn insert_categories(&self, categories: &[NewCategory]) -> Result<(), Error> {
        let mut query = QueryBuilder::new("INSERT INTO categories (user_id, name, type) ");

        query.push_values(categories, |mut row, category| {
            row.push_bind(category.user_id)
                .push_bind(&category.name)
                .push_bind(category.category_type.as_str());
        });

        query.build().execute(&self.pool).await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    amount: f64,
    currency: String,
    r#type: String,
    merchant: Option<String>,
    note: Option<String>,
    happened_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    account_id: Option<Uuid>,
    category_id: Option<Uuid>,
}

impl TransactionRow {
    fn into_entity(self) -> Result<Transaction, Error> {
        let transaction_type = self
            .r#type
            .parse()
            .map_err(|_| Error::Upstream(format!("unrecognised transaction type '{}'", self.r#type)))?;

        Ok(Transaction {
            id: self.id,
            amount: self.amount,
            currency: self.currency,
            transaction_type,
            merchant: self.merchant,
            note: self.note,
            happened_at: self.happened_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
            account_id: self.account_id,
            category_id: self.category_id,
        })
    }
}

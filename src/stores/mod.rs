//! The handle to the upstream data service.
//!
//! The upstream owns all persisted state; this crate only shapes queries
//! and inserts. The traits here model that request/response contract so
//! handlers stay independent of the concrete backend and tests can inject
//! in-memory doubles.

mod postgres;

pub use postgres::PgUpstreamStore;

use uuid::Uuid;

use crate::{
    Error,
    seed::{NewAccount, NewCategory},
    transaction::{NewTransaction, Transaction},
};

/// Handles the creation and retrieval of transactions on the upstream
/// service.
pub trait TransactionStore {
    /// Retrieve the transactions owned by `user_id`, most recent first,
    /// windowed by `page`.
    fn list_for_user(
        &self,
        user_id: Uuid,
        page: TransactionPage,
    ) -> impl Future<Output = Result<Vec<Transaction>, Error>> + Send;

    /// Insert a new transaction and return the created row.
    fn create(
        &self,
        transaction: NewTransaction,
    ) -> impl Future<Output = Result<Transaction, Error>> + Send;
}

/// Handles the batch inserts used to bootstrap a new user's rows.
pub trait SeedStore {
    /// Insert `accounts` on the upstream service.
    fn insert_accounts(
        &self,
        accounts: &[NewAccount],
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Insert `categories` on the upstream service.
    fn insert_categories(
        &self,
        categories: &[NewCategory],
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

/// The window of transactions to fetch from
/// [TransactionStore::list_for_user].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionPage {
    /// The maximum number of rows to return.
    pub limit: i64,
    /// The number of rows to skip.
    pub offset: i64,
}

//! Shared helpers for handler tests: an in-memory double for the upstream
//! store and builders for signed access tokens.

use std::sync::{Arc, Mutex};

use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use crate::{
    AppState, Error,
    auth::Claims,
    build_router,
    config::UpstreamConfig,
    seed::{NewAccount, NewCategory},
    stores::{SeedStore, TransactionPage, TransactionStore},
    transaction::{NewTransaction, Transaction},
};

/// The signing secret used for test tokens and test app states.
pub const TEST_SECRET: &str = "a-test-only-signing-secret";

/// Encode a valid access token for `user_id`.
pub fn encode_token(user_id: Uuid) -> String {
    token_with_expiry(user_id, Utc::now() + Duration::minutes(15))
}

/// Encode an access token for `user_id` that has already expired.
pub fn expired_token(user_id: Uuid) -> String {
    token_with_expiry(user_id, Utc::now() - Duration::minutes(15))
}

fn token_with_expiry(user_id: Uuid, expiry: DateTime<Utc>) -> String {
    let claims = Claims {
        sub: user_id,
        exp: expiry.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_ref()),
    )
    .expect("Could not encode test token.")
}

/// Create an [AppState] backed by the given store double and the test
/// signing secret.
pub fn test_app_state(store: FakeUpstreamStore) -> AppState<FakeUpstreamStore> {
    let config = UpstreamConfig {
        url: "https://upstream.test".to_owned(),
        database_url: "postgres://upstream.test/postgres".to_owned(),
        service_key: TEST_SECRET.to_owned(),
        anon_key: "test-anon-key".to_owned(),
    };

    AppState::new(&config, store)
}

/// Create a test server running the full app router over the store double.
pub fn test_server(store: FakeUpstreamStore) -> TestServer {
    TestServer::new(build_router(test_app_state(store)))
}

/// A transaction row as the upstream holds it, including the columns that
/// are not part of the API projection.
#[derive(Debug, Clone)]
pub struct StoredTransaction {
    /// The owner of the row.
    pub user_id: Uuid,
    /// Whether the transaction was marked recurring on insert.
    pub is_recurring: bool,
    /// The projected row.
    pub transaction: Transaction,
}

/// An in-memory stand-in for the upstream data service.
#[derive(Clone, Default)]
pub struct FakeUpstreamStore {
    transactions: Arc<Mutex<Vec<StoredTransaction>>>,
    accounts: Arc<Mutex<Vec<NewAccount>>>,
    categories: Arc<Mutex<Vec<NewCategory>>>,
    fail: bool,
}

impl FakeUpstreamStore {
    /// A store whose every operation fails, for exercising the upstream
    /// error path.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Insert a transaction row directly, bypassing the handlers.
    pub fn push_transaction(
        &self,
        user_id: Uuid,
        amount: f64,
        happened_at: DateTime<Utc>,
    ) -> Transaction {
        let transaction = Transaction {
            id: Uuid::new_v4(),
            amount,
            currency: "USD".to_owned(),
            transaction_type: crate::transaction::TransactionType::Expense,
            merchant: None,
            note: None,
            happened_at,
            created_at: happened_at,
            updated_at: happened_at,
            account_id: None,
            category_id: None,
        };

        self.transactions.lock().unwrap().push(StoredTransaction {
            user_id,
            is_recurring: false,
            transaction: transaction.clone(),
        });

        transaction
    }

    /// All transaction rows currently held by the store.
    pub fn transactions(&self) -> Vec<StoredTransaction> {
        self.transactions.lock().unwrap().clone()
    }

    /// All account rows currently held by the store.
    pub fn accounts(&self) -> Vec<NewAccount> {
        self.accounts.lock().unwrap().clone()
    }

    /// All category rows currently held by the store.
    pub fn categories(&self) -> Vec<NewCategory> {
        self.categories.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<(), Error> {
        if self.fail {
            Err(Error::Upstream("fake upstream store failure".to_owned()))
        } else {
            Ok(())
        }
    }
}

impl TransactionStore for FakeUpstreamStore {
    async fn list_for_user(
        &self,
        user_id: Uuid,
        page: TransactionPage,
    ) -> Result<Vec<Transaction>, Error> {
        self.check_failure()?;

        let mut rows: Vec<Transaction> = self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.user_id == user_id)
            .map(|row| row.transaction.clone())
            .collect();

        rows.sort_by(|a, b| b.happened_at.cmp(&a.happened_at));

        Ok(rows
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn create(&self, new: NewTransaction) -> Result<Transaction, Error> {
        self.check_failure()?;

        let now = Utc::now();
        let transaction = Transaction {
            id: Uuid::new_v4(),
            amount: new.amount,
            currency: new.currency,
            transaction_type: new.transaction_type,
            merchant: new.merchant,
            note: new.note,
            happened_at: new.happened_at,
            created_at: now,
            updated_at: now,
            account_id: new.account_id,
            category_id: new.category_id,
        };

        self.transactions.lock().unwrap().push(StoredTransaction {
            user_id: new.user_id,
            is_recurring: new.is_recurring,
            transaction: transaction.clone(),
        });

        Ok(transaction)
    }
}

impl SeedStore for FakeUpstreamStore {
    async fn insert_accounts(&self, accounts: &[NewAccount]) -> Result<(), Error> {
        self.check_failure()?;
        self.accounts.lock().unwrap().extend_from_slice(accounts);
        Ok(())
    }

    async fn insert_categories(&self, categories: &[NewCategory]) -> Result<(), Error> {
        self.check_failure()?;
        self.categories
            .lock()
            .unwrap()
            .extend_from_slice(categories);
        Ok(())
    }
}

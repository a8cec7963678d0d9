//! Implements the structs that hold the state of the REST server.
//!
//! The full [AppState] is built once at startup from the upstream
//! configuration and the store handle. Each handler pulls out the narrow
//! sub-state it needs via [FromRef], which keeps handlers decoupled from the
//! concrete store and lets tests inject doubles.

use axum::extract::FromRef;
use jsonwebtoken::DecodingKey;

use crate::{
    config::UpstreamConfig,
    stores::{SeedStore, TransactionStore},
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState<T>
where
    T: TransactionStore + SeedStore + Clone + Send + Sync,
{
    /// The key used to verify upstream-issued access tokens.
    pub decoding_key: DecodingKey,
    /// Base URL of the upstream service, embedded in the sign-in page.
    pub upstream_url: String,
    /// The public credential the sign-in page hands to the browser.
    pub anon_key: String,
    /// The handle for issuing queries against the upstream service.
    pub store: T,
}

impl<T> AppState<T>
where
    T: TransactionStore + SeedStore + Clone + Send + Sync,
{
    /// Create a new [AppState] from the upstream `config` and a `store`
    /// handle.
    pub fn new(config: &UpstreamConfig, store: T) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.service_key.as_ref()),
            upstream_url: config.url.clone(),
            anon_key: config.anon_key.clone(),
            store,
        }
    }
}

/// The state needed to resolve a bearer token to an identity.
#[derive(Clone)]
pub struct AuthState {
    /// The key used to verify upstream-issued access tokens.
    pub decoding_key: DecodingKey,
}

impl<T> FromRef<AppState<T>> for AuthState
where
    T: TransactionStore + SeedStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<T>) -> Self {
        Self {
            decoding_key: state.decoding_key.clone(),
        }
    }
}

/// The state needed to list or create transactions.
#[derive(Clone)]
pub struct TransactionState<T>
where
    T: TransactionStore + Clone + Send + Sync,
{
    /// The handle for issuing transaction queries against the upstream.
    pub store: T,
}

impl<T> FromRef<AppState<T>> for TransactionState<T>
where
    T: TransactionStore + SeedStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<T>) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// The state needed to seed default rows for a user.
#[derive(Clone)]
pub struct SeedState<T>
where
    T: SeedStore + Clone + Send + Sync,
{
    /// The handle for issuing seed inserts against the upstream.
    pub store: T,
}

impl<T> FromRef<AppState<T>> for SeedState<T>
where
    T: TransactionStore + SeedStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<T>) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// The state needed to render the sign-in page.
#[derive(Clone)]
pub struct SignInState {
    /// Base URL of the upstream service, used by the browser to reach the
    /// auth API.
    pub upstream_url: String,
    /// The public credential the browser sends with the magic-link request.
    pub anon_key: String,
}

impl<T> FromRef<AppState<T>> for SignInState
where
    T: TransactionStore + SeedStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<T>) -> Self {
        Self {
            upstream_url: state.upstream_url.clone(),
            anon_key: state.anon_key.clone(),
        }
    }
}

//! The API endpoint URIs.

/// The route to list and create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to insert the default accounts and categories for a user.
pub const SEED_API: &str = "/api/seed";
/// The page for requesting a magic-link sign-in email.
pub const SIGN_IN_VIEW: &str = "/sign_in";

// These tests are here so that we know the routes will parse when the router
// is built.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_API);
        assert_endpoint_is_valid_uri(endpoints::SEED_API);
        assert_endpoint_is_valid_uri(endpoints::SIGN_IN_VIEW);
    }
}

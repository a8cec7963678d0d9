//! Resolves bearer tokens to user identities.
//!
//! The upstream auth platform issues access tokens as JWTs signed with the
//! project's service secret, so tokens are verified locally instead of with
//! a round-trip per request. Absence of an identity is the sole failure
//! signal: a missing header, a header that is not `Bearer <token>`, and a
//! token the key rejects all resolve to "no identity" and surface as the
//! same 401 response.

use axum::{
    Json,
    RequestPartsExt,
    body::Body,
    extract::{FromRef, FromRequestParts},
    http::{Response, StatusCode, request::Parts},
    response::IntoResponse,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::state::AuthState;

/// The claims of an upstream-issued access token.
///
/// Only the subject is consumed; it carries the user's id.
#[derive(Serialize, Deserialize)]
pub struct Claims {
    /// The id of the user the token was issued to.
    pub sub: Uuid,
    /// The expiry time of the token as a unix timestamp.
    pub exp: usize,
}

/// The identity resolved from a request's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// The id of the authenticated user.
    pub user_id: Uuid,
}

/// Verify an access token and return the identity it was issued to.
///
/// Returns `None` if the token is empty, malformed, expired, or was not
/// signed with the key behind `decoding_key`. This function never errors.
pub fn verify_token(token: &str, decoding_key: &DecodingKey) -> Option<Identity> {
    // The upstream sets its own audience claim, which is not part of the
    // contract here.
    let mut validation = Validation::default();
    validation.validate_aud = false;

    decode::<Claims>(token, decoding_key, &validation)
        .ok()
        .map(|data| Identity {
            user_id: data.claims.sub,
        })
}

impl<S> FromRequestParts<S> for Identity
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // A header that is present but does not match `Bearer <token>` is
        // treated the same as a missing header.
        let bearer = parts
            .extract::<Option<TypedHeader<Authorization<Bearer>>>>()
            .await
            .ok()
            .flatten()
            .ok_or(AuthError::Unauthorized)?;

        let auth_state = AuthState::from_ref(state);

        verify_token(bearer.token(), &auth_state.decoding_key).ok_or(AuthError::Unauthorized)
    }
}

/// The rejection for handlers that require an identity.
#[derive(Debug)]
pub enum AuthError {
    /// No identity could be resolved from the request.
    Unauthorized,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response<Body> {
        let body = Json(json!({
            "error": "Unauthorized — provide Authorization: Bearer <access_token>",
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

#[cfg(test)]
mod verify_token_tests {
    use jsonwebtoken::DecodingKey;
    use uuid::Uuid;

    use crate::test_utils::{TEST_SECRET, encode_token, expired_token};

    use super::verify_token;

    fn test_decoding_key() -> DecodingKey {
        DecodingKey::from_secret(TEST_SECRET.as_ref())
    }

    #[test]
    fn garbage_token_gives_no_identity() {
        assert_eq!(verify_token("not.a.token", &test_decoding_key()), None);
    }

    #[test]
    fn empty_token_gives_no_identity() {
        assert_eq!(verify_token("", &test_decoding_key()), None);
    }

    #[test]
    fn token_with_wrong_signature_gives_no_identity() {
        let token = encode_token(Uuid::new_v4());
        let other_key = DecodingKey::from_secret(b"a different secret");

        assert_eq!(verify_token(&token, &other_key), None);
    }

    #[test]
    fn expired_token_gives_no_identity() {
        let token = expired_token(Uuid::new_v4());

        assert_eq!(verify_token(&token, &test_decoding_key()), None);
    }

    #[test]
    fn valid_token_resolves_to_its_subject() {
        let user_id = Uuid::new_v4();
        let token = encode_token(user_id);

        let identity = verify_token(&token, &test_decoding_key())
            .expect("a valid token should resolve to an identity");

        assert_eq!(identity.user_id, user_id);
    }
}

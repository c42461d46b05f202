use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use axum_extra::extract::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use util::config;

use crate::auth::claims::{AuthUser, Claims};

/// Pulls a `token=` value out of the raw query string.
///
/// `EventSource` clients cannot set custom request headers, so the live event
/// stream accepts the bearer token as a query parameter. The token is
/// validated exactly like a header-supplied one.
fn token_from_query(parts: &Parts) -> Option<String> {
    let query = parts.uri.query()?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == "token" && !value.is_empty()).then(|| value.to_string())
    })
}

/// Implements extraction of `AuthUser` from request parts.
///
/// Checks for a valid Bearer token in the `Authorization` header, falling back
/// to the `token` query parameter, verifies the JWT against the configured
/// secret, and extracts the claims into an `AuthUser` instance.
///
/// # Errors
/// - Returns `401 Unauthorized` if no credential is present or the token is
///   invalid or expired.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
        {
            Ok(TypedHeader(Authorization(bearer))) => bearer.token().to_string(),
            Err(_) => token_from_query(parts)
                .ok_or((StatusCode::UNAUTHORIZED, "Missing or invalid credentials"))?,
        };

        let token_data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(config::jwt_secret().as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid or expired token"))?;

        Ok(AuthUser(token_data.claims))
    }
}

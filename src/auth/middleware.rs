//! Authentication middleware that checks bearer tokens and resolves the request's owner.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{AppState, Error, auth::TokenVerifier};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// Checks bearer tokens and resolves them to an owner.
    pub token_verifier: Arc<dyn TokenVerifier + Send + Sync>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_verifier: state.token_verifier.clone(),
        }
    }
}

/// Middleware function that checks for a valid bearer token in the
/// `Authorization` header.
///
/// The owner ID is placed into the request and the request executed normally
/// if the token is valid, otherwise a 401 Unauthorized response is returned.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(owner): Extension<OwnerId>` to receive the owner ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let owner = match TypedHeader::<Authorization<Bearer>>::from_request_parts(&mut parts, &state)
        .await
    {
        Ok(TypedHeader(Authorization(bearer))) => state.token_verifier.verify(bearer.token()),
        Err(rejection) => {
            tracing::debug!("missing or malformed authorization header: {rejection}");
            Err(Error::Unauthorized)
        }
    };

    let owner = match owner {
        Ok(owner) => owner,
        Err(error) => return error.into_response(),
    };

    parts.extensions.insert(owner);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}

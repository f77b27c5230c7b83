use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use service::auth::jwt::TOKEN_PREFIX;
use service::user::domain::UserAccount;

use crate::errors::ApiError;
use crate::state::ServerState;

/// Account resolved by [`require_jwt`] for the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserAccount);

/// Like [`CurrentUser`] but rejects non-admins with 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub UserAccount);

/// Route middleware: validates `Authorization: Bearer <token>`.
/// Missing token is 400, bad scheme or invalid/expired token is 401.
/// When the access token was reissued, the new one is returned in the
/// response `Authorization` header.
pub async fn require_jwt(State(state): State<ServerState>, mut req: Request, next: Next) -> Result<Response, ApiError> {
    let header = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let path = req.uri().path().to_owned();

    let authenticated = match state.auth.authenticate(header).await {
        Ok(a) => a,
        Err(e) => {
            warn!(path = %path, code = e.code(), error = %e, "token validation failed");
            return Err(e.into());
        }
    };
    debug!(path = %path, user_id = %authenticated.user.id, "request authenticated");

    req.extensions_mut().insert(CurrentUser(authenticated.user));
    let mut resp = next.run(req).await;

    if let Some(access) = authenticated.reissued_access {
        match HeaderValue::from_str(&format!("{TOKEN_PREFIX}{access}")) {
            Ok(v) => {
                resp.headers_mut().insert(AUTHORIZATION, v);
            }
            Err(e) => warn!(error = %e, "reissued token is not a valid header value"),
        }
    }
    Ok(resp)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("authentication required".into()))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.role.is_admin() {
            return Err(ApiError::Forbidden("admin role required".into()));
        }
        Ok(AdminUser(user))
    }
}

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use tracing::info;

use service::auth::domain::LoginInput;
use service::auth::errors::AuthError;
use service::auth::jwt::TOKEN_PREFIX;
use service::user::domain::UserAccount;

use crate::auth::CurrentUser;
use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

/// Access token goes out in the `Authorization` header, the profile in the body.
#[utoipa::path(
    post, path = "/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Logged in; `Authorization: Bearer <token>` header set", body = crate::openapi::UserResponse),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn login(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<LoginInput>,
) -> Result<(HeaderMap, Json<UserAccount>), ApiError> {
    let session = state.auth.login(input).await?;
    let value = HeaderValue::from_str(&format!("{TOKEN_PREFIX}{}", session.tokens.access_token))
        .map_err(|e| AuthError::TokenError(e.to_string()))?;
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok((headers, Json(session.user)))
}

#[utoipa::path(
    post, path = "/logout", tag = "auth",
    responses((status = 200, description = "Refresh token revoked"), (status = 400, description = "Missing token"), (status = 401, description = "Unauthorized"))
)]
pub async fn logout(State(state): State<ServerState>, CurrentUser(user): CurrentUser) -> Result<StatusCode, ApiError> {
    state.auth.logout(&user.email).await?;
    info!(user_id = %user.id, "logout");
    Ok(StatusCode::OK)
}

use axum::{extract::State, http::StatusCode, Json};

use service::user::domain::{
    ChangePasswordInput, EmailCheckInput, EmailCheckOutput, PasswordConfirmation, SignUpInput, UpdateUserInput,
    UserAccount,
};

use crate::auth::CurrentUser;
use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

#[utoipa::path(
    post, path = "/user", tag = "user",
    request_body = crate::openapi::SignUpRequest,
    responses((status = 200, description = "Registered", body = crate::openapi::UserResponse), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict"))
)]
pub async fn sign_up(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<SignUpInput>,
) -> Result<Json<UserAccount>, ApiError> {
    Ok(Json(state.users.sign_up(input).await?))
}

#[utoipa::path(
    get, path = "/user/email", tag = "user",
    request_body = crate::openapi::EmailCheckRequest,
    responses((status = 200, description = "Whether the email is taken", body = crate::openapi::EmailCheckResponse), (status = 400, description = "Bad Request"))
)]
pub async fn check_email(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<EmailCheckInput>,
) -> Result<Json<EmailCheckOutput>, ApiError> {
    Ok(Json(state.users.is_email_taken(&input.email).await?))
}

#[utoipa::path(
    get, path = "/user", tag = "user",
    responses((status = 200, description = "Current profile", body = crate::openapi::UserResponse), (status = 400, description = "Missing token"), (status = 401, description = "Unauthorized"))
)]
pub async fn profile(State(state): State<ServerState>, CurrentUser(user): CurrentUser) -> Result<Json<UserAccount>, ApiError> {
    Ok(Json(state.users.profile(user.id).await?))
}

#[utoipa::path(
    patch, path = "/user", tag = "user",
    request_body = crate::openapi::UpdateUserRequest,
    responses((status = 200, description = "Updated profile", body = crate::openapi::UserResponse), (status = 400, description = "Bad Request"), (status = 401, description = "Unauthorized"))
)]
pub async fn update(
    State(state): State<ServerState>,
    CurrentUser(user): CurrentUser,
    ApiJson(input): ApiJson<UpdateUserInput>,
) -> Result<Json<UserAccount>, ApiError> {
    Ok(Json(state.users.update_info(&user, input).await?))
}

#[utoipa::path(
    delete, path = "/user", tag = "user",
    request_body = crate::openapi::PasswordRequest,
    responses((status = 200, description = "Withdrawn"), (status = 401, description = "Password mismatch"))
)]
pub async fn withdraw(
    State(state): State<ServerState>,
    CurrentUser(user): CurrentUser,
    ApiJson(input): ApiJson<PasswordConfirmation>,
) -> Result<StatusCode, ApiError> {
    state.users.withdraw(&user, &input.password).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    patch, path = "/user/password", tag = "user",
    request_body = crate::openapi::PasswordRequest,
    responses((status = 200, description = "Password changed; refresh token revoked"), (status = 400, description = "Bad Request"))
)]
pub async fn change_password(
    State(state): State<ServerState>,
    CurrentUser(user): CurrentUser,
    ApiJson(input): ApiJson<ChangePasswordInput>,
) -> Result<StatusCode, ApiError> {
    state.users.change_password(&user, &input.new_password).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    patch, path = "/user/admin/limitedsale", tag = "user",
    request_body = crate::openapi::PasswordRequest,
    responses((status = 200, description = "Now ROLE_ADMIN", body = crate::openapi::UserResponse), (status = 401, description = "Password mismatch"))
)]
pub async fn grant_limited_sale_admin(
    State(state): State<ServerState>,
    CurrentUser(user): CurrentUser,
    ApiJson(input): ApiJson<PasswordConfirmation>,
) -> Result<Json<UserAccount>, ApiError> {
    Ok(Json(state.users.grant_limited_sale_admin(&user, &input.password).await?))
}

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub user_email: String,
    pub user_password: String,
    pub user_cellphone: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest { pub user_email: String, pub user_password: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailCheckRequest { pub user_email: String }

#[derive(Serialize, ToSchema)]
pub struct EmailCheckResponse { pub duplicated: bool }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest { pub user_cellphone: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordRequest { pub user_password: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: Uuid,
    pub user_email: String,
    pub user_cellphone: Option<String>,
    /// `ROLE_USER` or `ROLE_ADMIN`
    pub user_role: String,
    /// `active` or `withdrawn`
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProductRequest {
    pub product_name: String,
    pub product_price: i64,
    pub product_quantity: i32,
    pub product_description: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatchRequest {
    pub product_name: Option<String>,
    pub product_price: Option<i64>,
    pub product_quantity: Option<i32>,
    /// `null` clears the description
    #[schema(nullable)]
    pub product_description: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub product_id: i32,
    pub product_name: String,
    pub product_price: i64,
    pub product_quantity: i32,
    pub product_description: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPageResponse {
    pub items: Vec<ProductResponse>,
    pub page: u32,
    pub per_page: u32,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::user::sign_up,
        crate::routes::user::check_email,
        crate::routes::user::profile,
        crate::routes::user::update,
        crate::routes::user::withdraw,
        crate::routes::user::change_password,
        crate::routes::user::grant_limited_sale_admin,
        crate::routes::product::list,
        crate::routes::product::get,
        crate::routes::product::create,
        crate::routes::product::update,
        crate::routes::product::delete,
    ),
    components(
        schemas(
            HealthResponse,
            SignUpRequest,
            LoginRequest,
            EmailCheckRequest,
            EmailCheckResponse,
            UpdateUserRequest,
            PasswordRequest,
            UserResponse,
            NewProductRequest,
            ProductPatchRequest,
            ProductResponse,
            ProductPageResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "user"),
        (name = "product")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        for p in ["/health", "/login", "/logout", "/user", "/user/email", "/user/password", "/user/admin/limitedsale", "/product", "/product/{id}"] {
            assert!(paths.contains_key(p), "missing {p}");
        }
    }
}

use axum::{extract::State, http::StatusCode, Json};

use service::pagination::Pagination;
use service::product::domain::{NewProductInput, Product, ProductPage, ProductPatch};
use tracing::info;

use crate::auth::AdminUser;
use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::ServerState;

#[utoipa::path(
    get, path = "/product", tag = "product",
    params(
        ("page" = Option<u32>, Query, description = "1-based page"),
        ("perPage" = Option<u32>, Query, description = "page size, max 100")
    ),
    responses((status = 200, description = "Page of products", body = crate::openapi::ProductPageResponse))
)]
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<ProductPage>, ApiError> {
    Ok(Json(state.products.list(page).await?))
}

#[utoipa::path(
    get, path = "/product/{id}", tag = "product",
    params(("id" = i32, Path, description = "product id")),
    responses((status = 200, description = "Product", body = crate::openapi::ProductResponse), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.products.get(id).await?))
}

#[utoipa::path(
    post, path = "/product", tag = "product",
    request_body = crate::openapi::NewProductRequest,
    responses((status = 201, description = "Created", body = crate::openapi::ProductResponse), (status = 400, description = "Bad Request"), (status = 403, description = "Admin only"))
)]
pub async fn create(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    ApiJson(input): ApiJson<NewProductInput>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.products.create(input, Some(admin.id)).await?;
    info!(admin_id = %admin.id, product_id = product.product_id, "admin created product");
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    patch, path = "/product/{id}", tag = "product",
    params(("id" = i32, Path, description = "product id")),
    request_body = crate::openapi::ProductPatchRequest,
    responses((status = 200, description = "Updated", body = crate::openapi::ProductResponse), (status = 400, description = "Bad Request"), (status = 403, description = "Admin only"), (status = 404, description = "Not Found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    AdminUser(_admin): AdminUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.products.update(id, patch).await?))
}

#[utoipa::path(
    delete, path = "/product/{id}", tag = "product",
    params(("id" = i32, Path, description = "product id")),
    responses((status = 204, description = "Deleted"), (status = 403, description = "Admin only"), (status = 404, description = "Not Found"))
)]
pub async fn delete(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    state.products.delete(id).await?;
    info!(admin_id = %admin.id, product_id = id, "admin deleted product");
    Ok(StatusCode::NO_CONTENT)
}

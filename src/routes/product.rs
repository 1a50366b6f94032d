//! Product route handlers
//!
//! Relational adapter endpoints: schema bootstrap and product CRUD.

use crate::error::{not_found_error, ApiResult, ErrorResponse};
use crate::models::{MessageResponse, Product, ProductCreated, ProductInput};
use crate::state::SharedState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use utoipa_axum::{router::OpenApiRouter, routes};

const PRODUCT_NOT_FOUND: &str = "Produto não encontrado.";

pub fn router() -> OpenApiRouter<SharedState> {
    OpenApiRouter::new()
        .routes(routes!(init_db))
        .routes(routes!(list_products, create_product))
        .routes(routes!(get_product, update_product, delete_product))
}

/// Cria o schema e a tabela de produtos
#[utoipa::path(
    post,
    path = "/init-db",
    tag = "Produtos",
    responses(
        (status = 201, description = "Banco de dados e tabela prontos", body = MessageResponse),
        (status = 500, description = "Erro no banco de dados", body = ErrorResponse)
    )
)]
pub async fn init_db(
    State(state): State<SharedState>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    state.products.init_schema().await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Banco de dados e tabela criados com sucesso.",
        )),
    ))
}

/// Lista todos os produtos
#[utoipa::path(
    get,
    path = "/product",
    tag = "Produtos",
    responses(
        (status = 200, description = "Lista de produtos", body = [Product]),
        (status = 500, description = "Erro no banco de dados", body = ErrorResponse)
    )
)]
pub async fn list_products(State(state): State<SharedState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.products.list().await?))
}

/// Busca um produto pelo id
#[utoipa::path(
    get,
    path = "/product/{id}",
    tag = "Produtos",
    params(("id" = i64, Path, description = "Id do produto")),
    responses(
        (status = 200, description = "Produto encontrado", body = Product),
        (status = 404, description = "Produto não encontrado", body = ErrorResponse),
        (status = 500, description = "Erro no banco de dados", body = ErrorResponse)
    )
)]
pub async fn get_product(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Product>> {
    state
        .products
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found_error(PRODUCT_NOT_FOUND))
}

/// Cadastra um produto
#[utoipa::path(
    post,
    path = "/product",
    tag = "Produtos",
    request_body = ProductInput,
    responses(
        (status = 400, description = "Corpo JSON inválido", body = ErrorResponse),
        (status = 201, description = "Produto criado", body = ProductCreated),
        (status = 500, description = "Erro no banco de dados", body = ErrorResponse)
    )
)]
pub async fn create_product(
    State(state): State<SharedState>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ProductCreated>)> {
    let Json(payload) = payload?;
    let created = state.products.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Atualiza um produto
#[utoipa::path(
    put,
    path = "/product/{id}",
    tag = "Produtos",
    params(("id" = i64, Path, description = "Id do produto")),
    request_body = ProductInput,
    responses(
        (status = 400, description = "Corpo JSON inválido", body = ErrorResponse),
        (status = 201, description = "Produto atualizado", body = Product),
        (status = 404, description = "Produto não encontrado", body = ErrorResponse),
        (status = 500, description = "Erro no banco de dados", body = ErrorResponse)
    )
)]
pub async fn update_product(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(payload) = payload?;
    let updated = state
        .products
        .update(id, &payload)
        .await?
        .ok_or_else(|| not_found_error(PRODUCT_NOT_FOUND))?;
    Ok((StatusCode::CREATED, Json(updated)))
}

/// Remove um produto
#[utoipa::path(
    delete,
    path = "/product/{id}",
    tag = "Produtos",
    params(("id" = i64, Path, description = "Id do produto")),
    responses(
        (status = 200, description = "Produto removido", body = String, content_type = "text/plain"),
        (status = 404, description = "Produto não encontrado", body = ErrorResponse),
        (status = 500, description = "Erro no banco de dados", body = ErrorResponse)
    )
)]
pub async fn delete_product(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> ApiResult<&'static str> {
    if state.products.delete(id).await? == 0 {
        return Err(not_found_error(PRODUCT_NOT_FOUND));
    }
    Ok("Produto deletado com sucesso.")
}

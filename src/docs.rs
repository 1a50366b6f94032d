//! API documentation
//!
//! The OpenAPI document is assembled from the same route table the router is
//! built from (see [`crate::routes`]), so every served route is documented.

use axum::{routing::get, Json, Router};
use std::sync::Arc;
use utoipa::openapi::OpenApi as OpenApiDocument;
use utoipa::OpenApi;

/// Path the generated document is served at
pub const DOCS_PATH: &str = "/swagger";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "StoreHub API",
        description = "Produtos (PostgreSQL), usuários (MongoDB) e arquivos (S3) em uma única API."
    ),
    tags(
        (name = "Produtos", description = "CRUD da tabela de produtos"),
        (name = "Usuários", description = "CRUD da coleção de usuários"),
        (name = "Buckets", description = "Listagem, upload e remoção de arquivos"),
        (name = "Sistema", description = "Saúde do serviço")
    )
)]
pub struct ApiDoc;

/// Router serving the finished document
pub fn publish<S>(document: OpenApiDocument) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let document = Arc::new(document);
    Router::new().route(
        DOCS_PATH,
        get(move || {
            let document = Arc::clone(&document);
            async move { Json(document.as_ref().clone()) }
        }),
    )
}

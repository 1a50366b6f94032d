//! Bucket route handlers
//!
//! Object-storage adapter endpoints: bucket and object listing, multipart
//! upload, object removal.

use crate::error::{ApiResult, AppError, ErrorResponse};
use crate::models::{BucketSummary, NewObject, ObjectSummary, UploadResponse, Visibility};
use crate::state::SharedState;
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Name of the multipart field holding the uploaded file
pub const FILE_FIELD: &str = "file";

/// Optional text field: `public` or `private` (default)
pub const VISIBILITY_FIELD: &str = "visibility";

const NO_FILE: &str = "Nenhum arquivo enviado.";

pub fn router(max_upload_bytes: usize) -> OpenApiRouter<SharedState> {
    OpenApiRouter::new()
        .routes(routes!(list_buckets))
        .routes(routes!(list_objects))
        .routes(routes!(upload_object))
        .routes(routes!(delete_object))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Multipart form accepted by the upload route
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    visibility: Option<Visibility>,
}

/// Lista os buckets da conta
#[utoipa::path(
    get,
    path = "/buckets",
    tag = "Buckets",
    responses(
        (status = 200, description = "Lista de buckets", body = [BucketSummary]),
        (status = 500, description = "Erro no armazenamento", body = ErrorResponse)
    )
)]
pub async fn list_buckets(State(state): State<SharedState>) -> ApiResult<Json<Vec<BucketSummary>>> {
    Ok(Json(state.objects.list_buckets().await?))
}

/// Lista os arquivos de um bucket
#[utoipa::path(
    get,
    path = "/buckets/{bucketName}",
    tag = "Buckets",
    params(("bucketName" = String, Path, description = "Nome do bucket")),
    responses(
        (status = 200, description = "Arquivos do bucket", body = [ObjectSummary]),
        (status = 500, description = "Erro no armazenamento", body = ErrorResponse)
    )
)]
pub async fn list_objects(
    State(state): State<SharedState>,
    Path(bucket): Path<String>,
) -> ApiResult<Json<Vec<ObjectSummary>>> {
    Ok(Json(state.objects.list_objects(&bucket).await?))
}

/// Envia um arquivo para o bucket
#[utoipa::path(
    post,
    path = "/buckets/{bucketName}/upload",
    tag = "Buckets",
    params(("bucketName" = String, Path, description = "Nome do bucket")),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Arquivo enviado", body = UploadResponse),
        (status = 400, description = "Nenhum arquivo enviado", body = ErrorResponse),
        (status = 413, description = "Arquivo maior que o limite", body = ErrorResponse),
        (status = 500, description = "Erro no armazenamento", body = ErrorResponse)
    )
)]
pub async fn upload_object(
    State(state): State<SharedState>,
    Path(bucket): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let mut multipart = multipart.map_err(|_| AppError::BadRequest(NO_FILE.to_string()))?;

    let mut upload = None;
    let mut visibility = Visibility::default();
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(VISIBILITY_FIELD) {
            visibility = Visibility::from_form_value(&field.text().await?);
            continue;
        }
        // Only the first file part named `file` is stored; a part without a
        // filename is a plain form value.
        if upload.is_some() || field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        upload = Some((file_name, content_type, bytes));
    }

    let (file_name, content_type, bytes) =
        upload.ok_or_else(|| AppError::BadRequest(NO_FILE.to_string()))?;
    let object = NewObject {
        file_name,
        content_type,
        bytes,
        visibility,
    };
    let stored = state.objects.upload(&bucket, object).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "Arquivo enviado com sucesso.".to_string(),
            file: stored,
        }),
    ))
}

/// Remove um arquivo do bucket
#[utoipa::path(
    delete,
    path = "/buckets/{bucketName}/file/{fileName}",
    tag = "Buckets",
    params(
        ("bucketName" = String, Path, description = "Nome do bucket"),
        ("fileName" = String, Path, description = "Chave do arquivo")
    ),
    responses(
        (status = 200, description = "Arquivo removido", body = String, content_type = "text/plain"),
        (status = 500, description = "Erro no armazenamento", body = ErrorResponse)
    )
)]
pub async fn delete_object(
    State(state): State<SharedState>,
    Path((bucket, key)): Path<(String, String)>,
) -> ApiResult<&'static str> {
    state.objects.delete_object(&bucket, &key).await?;
    Ok("Arquivo deletado com sucesso.")
}

//! User route handlers
//!
//! Document adapter endpoints: connectivity probe and user CRUD.

use crate::error::{not_found_error, ApiResult, ErrorResponse};
use crate::models::{ConnectionProbe, User, UserInput};
use crate::state::SharedState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use utoipa_axum::{router::OpenApiRouter, routes};

const USER_NOT_FOUND: &str = "Usuário não encontrado.";

pub fn router() -> OpenApiRouter<SharedState> {
    OpenApiRouter::new()
        .routes(routes!(test_connection))
        .routes(routes!(list_users, create_user))
        .routes(routes!(get_user, update_user, delete_user))
}

/// Testa a conexão com o MongoDB
#[utoipa::path(
    get,
    path = "/mongodb/testar-conexao",
    tag = "Usuários",
    responses(
        (status = 200, description = "Conexão estabelecida", body = ConnectionProbe),
        (status = 500, description = "Falha ao conectar", body = ErrorResponse)
    )
)]
pub async fn test_connection(State(state): State<SharedState>) -> ApiResult<Json<ConnectionProbe>> {
    let document = state.users.health_check().await?;
    Ok(Json(ConnectionProbe {
        message: "Conexão com o MongoDB estabelecida com sucesso.".to_string(),
        document,
    }))
}

/// Cadastra um usuário
#[utoipa::path(
    post,
    path = "/usuarios",
    tag = "Usuários",
    request_body = UserInput,
    responses(
        (status = 400, description = "Corpo JSON inválido", body = ErrorResponse),
        (status = 201, description = "Usuário criado", body = User),
        (status = 500, description = "Erro no MongoDB", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<SharedState>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(payload) = payload?;
    let user = state.users.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Lista todos os usuários
#[utoipa::path(
    get,
    path = "/usuarios",
    tag = "Usuários",
    responses(
        (status = 200, description = "Lista de usuários", body = [User]),
        (status = 500, description = "Erro no MongoDB", body = ErrorResponse)
    )
)]
pub async fn list_users(State(state): State<SharedState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.users.list().await?))
}

/// Busca um usuário pelo id
#[utoipa::path(
    get,
    path = "/usuarios/{id}",
    tag = "Usuários",
    params(("id" = String, Path, description = "Id do usuário")),
    responses(
        (status = 200, description = "Usuário encontrado", body = User),
        (status = 404, description = "Usuário não encontrado", body = ErrorResponse),
        (status = 500, description = "Erro no MongoDB", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    state
        .users
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found_error(USER_NOT_FOUND))
}

/// Atualiza nome e e-mail de um usuário
#[utoipa::path(
    put,
    path = "/usuarios/{id}",
    tag = "Usuários",
    params(("id" = String, Path, description = "Id do usuário")),
    request_body = UserInput,
    responses(
        (status = 400, description = "Corpo JSON inválido", body = ErrorResponse),
        (status = 201, description = "Usuário atualizado", body = User),
        (status = 404, description = "Usuário não encontrado", body = ErrorResponse),
        (status = 500, description = "Erro no MongoDB", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(payload) = payload?;
    let user = state
        .users
        .update(&id, &payload)
        .await?
        .ok_or_else(|| not_found_error(USER_NOT_FOUND))?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Remove um usuário
#[utoipa::path(
    delete,
    path = "/usuarios/{id}",
    tag = "Usuários",
    params(("id" = String, Path, description = "Id do usuário")),
    responses(
        (status = 200, description = "Usuário removido", body = String, content_type = "text/plain"),
        (status = 404, description = "Usuário não encontrado", body = ErrorResponse),
        (status = 500, description = "Erro no MongoDB", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<&'static str> {
    if state.users.delete(&id).await? == 0 {
        return Err(not_found_error(USER_NOT_FOUND));
    }
    Ok("Usuário deletado com sucesso.")
}

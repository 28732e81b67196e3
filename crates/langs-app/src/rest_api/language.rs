use crate::{
    error::{ApiError, ApiResult, Operation},
    extract::{JsonBody, RecordId},
    repository_from_request,
    state::AppState,
    validate::Garde,
};
use axum::{response::IntoResponse, routing::get, Json};
use http::StatusCode;
use langs_dal::language::{CreateLanguage, Language, LanguageRepository, UpdateLanguage};
use serde::{Deserialize, Serialize};
use tracing::debug;

repository_from_request!(LanguageRepository);

const UPDATED: &str = "Lenguaje actualizado";
const DELETED: &str = "Lenguaje eliminado";

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LanguageMessage {
    pub message: String,
    pub language: Language,
}

impl LanguageMessage {
    fn new(message: &str, language: Language) -> Self {
        LanguageMessage {
            message: message.to_string(),
            language,
        }
    }
}

#[cfg(feature = "openapi")]
#[derive(utoipa::OpenApi)]
#[openapi(paths(
    list_languages,
    get_language,
    create_language,
    update_language,
    delete_language
))]
struct ModuleDocs;

#[cfg(feature = "openapi")]
pub fn api_docs() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi as _;
    ModuleDocs::openapi()
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "", tag = "Language", operation_id = "listLanguages",
    responses((status = StatusCode::OK, description = "All languages", body = Vec<Language>),
    (status = StatusCode::INTERNAL_SERVER_ERROR, body = crate::error::ErrorBody))))]
pub async fn list_languages(repository: LanguageRepository) -> ApiResult<impl IntoResponse> {
    let records = repository
        .list()
        .await
        .map_err(ApiError::on(Operation::List))?;
    Ok((StatusCode::OK, Json(records)))
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/{id}", tag = "Language", operation_id = "getLanguage",
    params(("id" = i64, Path, description = "Language id")),
    responses((status = StatusCode::OK, description = "Get one", body = Language),
    (status = StatusCode::BAD_REQUEST, body = crate::error::ErrorBody),
    (status = StatusCode::NOT_FOUND, body = crate::error::ErrorBody))))]
pub async fn get_language(
    RecordId(id): RecordId,
    repository: LanguageRepository,
) -> ApiResult<impl IntoResponse> {
    let record = repository
        .get(id)
        .await
        .map_err(ApiError::on(Operation::Get))?;

    Ok((StatusCode::OK, Json(record)))
}

#[cfg_attr(feature = "openapi", utoipa::path(post, path = "", tag = "Language", operation_id = "createLanguage",
    request_body = CreateLanguage,
    responses((status = StatusCode::CREATED, description = "Created Language", body = Language),
    (status = StatusCode::BAD_REQUEST, description = "Missing fields", body = crate::error::ErrorBody))))]
pub async fn create_language(
    repository: LanguageRepository,
    Garde(JsonBody(payload)): Garde<JsonBody<CreateLanguage>>,
) -> ApiResult<impl IntoResponse> {
    let record = repository
        .create(payload)
        .await
        .map_err(ApiError::on(Operation::Create))?;

    Ok((StatusCode::CREATED, Json(record)))
}

#[cfg_attr(feature = "openapi", utoipa::path(put, path = "/{id}", tag = "Language", operation_id = "updateLanguage",
    params(("id" = i64, Path, description = "Language id")),
    request_body = UpdateLanguage,
    responses((status = StatusCode::OK, description = "Updated Language", body = LanguageMessage),
    (status = StatusCode::BAD_REQUEST, description = "Invalid id or malformed body", body = crate::error::ErrorBody),
    (status = StatusCode::NOT_FOUND, body = crate::error::ErrorBody))))]
pub async fn update_language(
    RecordId(id): RecordId,
    repository: LanguageRepository,
    JsonBody(payload): JsonBody<UpdateLanguage>,
) -> ApiResult<impl IntoResponse> {
    let record = repository
        .update(id, payload)
        .await
        .map_err(ApiError::on(Operation::Update))?;
    debug!("Updated language {id}");

    Ok((StatusCode::OK, Json(LanguageMessage::new(UPDATED, record))))
}

#[cfg_attr(feature = "openapi", utoipa::path(delete, path = "/{id}", tag = "Language", operation_id = "deleteLanguage",
    params(("id" = i64, Path, description = "Language id")),
    responses((status = StatusCode::OK, description = "Deleted Language", body = LanguageMessage),
    (status = StatusCode::BAD_REQUEST, description = "Invalid id", body = crate::error::ErrorBody),
    (status = StatusCode::NOT_FOUND, body = crate::error::ErrorBody))))]
pub async fn delete_language(
    RecordId(id): RecordId,
    repository: LanguageRepository,
) -> ApiResult<impl IntoResponse> {
    let record = repository
        .delete(id)
        .await
        .map_err(ApiError::on(Operation::Delete))?;
    debug!("Deleted language {id}");

    Ok((StatusCode::OK, Json(LanguageMessage::new(DELETED, record))))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(list_languages).post(create_language))
        .route(
            "/{id}",
            get(get_language)
                .put(update_language)
                .delete(delete_language),
        )
}

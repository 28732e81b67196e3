use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::Serialize;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Operation on the language table, used to pick the message of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::List => "Error al obtener los lenguajes",
            Operation::Get => "Error al obtener el lenguaje",
            Operation::Create => "Error al crear el lenguaje",
            Operation::Update => "Error al actualizar el lenguaje",
            Operation::Delete => "Error al eliminar el lenguaje",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Faltan datos necesarios: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Identificador no valido: {0}")]
    InvalidId(String),

    #[error("{0}")]
    InvalidBody(String),

    #[error("Lenguaje no encontrado")]
    NotFound,

    #[error("{}", .operation.failure_message())]
    Storage {
        operation: Operation,
        #[source]
        source: langs_dal::Error,
    },
}

impl ApiError {
    /// Maps a data layer error for the given operation.
    ///
    /// Missing records become [`ApiError::NotFound`], anything else is a
    /// storage failure.
    pub fn on(operation: Operation) -> impl FnOnce(langs_dal::Error) -> ApiError {
        move |source| {
            if source.is_not_found() {
                ApiError::NotFound
            } else {
                ApiError::Storage { operation, source }
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFields(_) | ApiError::InvalidId(_) | ApiError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Storage { operation, source } => {
                tracing::error!(?operation, error = %source, "Storage failure")
            }
            other => tracing::debug!("Request rejected: {other}"),
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ApiError::MissingFields(vec!["name".into(), "last_version".into()]);
        assert_eq!(err.to_string(), "Faltan datos necesarios: name, last_version");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        assert_eq!(ApiError::NotFound.to_string(), "Lenguaje no encontrado");
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_dal_error_mapping() {
        let not_found = langs_dal::Error::RecordNotFound("Language".into());
        assert!(matches!(
            ApiError::on(Operation::Delete)(not_found),
            ApiError::NotFound
        ));

        let failure = langs_dal::Error::DatabaseError(langs_dal::SqlxError::PoolClosed);
        let err = ApiError::on(Operation::Update)(failure);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Error al actualizar el lenguaje");
    }
}

// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::api::FieldViolation;
use crate::auth::password;
use crate::database::DatabaseError;
use crate::services::ServiceError;

/// HTTP API error with the status code and wire body the clients expect
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    Validation(Vec<FieldViolation>),
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError {
        message: String,
        detail: Option<String>,
    },

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Validation(_) => "Dados inválidos",
            ApiError::InvalidJson(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError { message, .. } => message,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError { .. } => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            // Token rejections keep the bare `error` key existing clients match on
            ApiError::Unauthorized(msg) => json!({ "error": msg }),
            // Login failures and policy messages carry only `erro`
            ApiError::BadRequest(msg) => json!({ "erro": msg }),
            ApiError::Validation(fields) => json!({
                "erro": self.message(),
                "code": self.error_code(),
                "campos": fields,
            }),
            ApiError::InternalServerError { message, detail } => {
                let mut body = json!({
                    "erro": message,
                    "code": self.error_code(),
                });
                if let Some(detail) = detail {
                    body["detalhes"] = json!(detail);
                }
                body
            }
            _ => json!({
                "erro": self.message(),
                "code": self.error_code(),
            }),
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation(fields: Vec<FieldViolation>) -> Self {
        ApiError::Validation(fields)
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn missing_token() -> Self {
        ApiError::Unauthorized("Token não informado".to_string())
    }

    pub fn invalid_token() -> Self {
        ApiError::Unauthorized("Token inválido".to_string())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>, detail: Option<String>) -> Self {
        ApiError::InternalServerError {
            message: message.into(),
            detail,
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }

    /// Map a domain error to its HTTP form. `expose_detail` controls whether
    /// the underlying cause of a 5xx reaches the client.
    pub fn from_service(err: ServiceError, expose_detail: bool) -> Self {
        match err {
            ServiceError::InvalidCredentials => ApiError::bad_request(err.to_string()),
            ServiceError::Conflict(msg) => ApiError::bad_request(msg),
            ServiceError::PasswordPolicy(violations) => {
                ApiError::bad_request(password::describe(&violations))
            }
            ServiceError::NotFound(msg) => ApiError::not_found(msg),
            ServiceError::Unauthorized(msg) => ApiError::unauthorized(msg),
            ServiceError::Persistence(db) => Self::from_database(db, expose_detail),
            ServiceError::Hashing(_) | ServiceError::Token(_) => {
                tracing::error!("Request failed: {}", err);
                ApiError::internal_server_error(
                    "Erro interno do servidor",
                    expose_detail.then(|| err.to_string()),
                )
            }
        }
    }

    fn from_database(err: DatabaseError, expose_detail: bool) -> Self {
        match err {
            DatabaseError::Conflict(constraint) => {
                ApiError::bad_request(format!("Registro duplicado: {}", constraint))
            }
            other => {
                // Don't expose internal SQL errors unless configured to
                tracing::error!("Database error: {}", other);
                ApiError::internal_server_error(
                    "Erro ao acessar o banco de dados",
                    expose_detail.then(|| other.to_string()),
                )
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::PasswordViolation;

    #[test]
    fn token_rejections_use_error_key() {
        let body = ApiError::missing_token().to_json();
        assert_eq!(body, json!({ "error": "Token não informado" }));
        assert_eq!(ApiError::invalid_token().status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn validation_lists_fields() {
        let err = ApiError::validation(vec![FieldViolation::new("titulo", "Campo obrigatório")]);
        let body = err.to_json();
        assert_eq!(body["erro"], "Dados inválidos");
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["campos"][0]["campo"], "titulo");
        assert_eq!(body["campos"][0]["mensagem"], "Campo obrigatório");
    }

    #[test]
    fn login_failure_body_is_bare() {
        let err = ApiError::from_service(ServiceError::InvalidCredentials, false);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_json(), json!({ "erro": "Login ou senha incorretos" }));
    }

    #[test]
    fn password_policy_joins_messages() {
        let err = ApiError::from_service(
            ServiceError::PasswordPolicy(vec![PasswordViolation::TooShort, PasswordViolation::MissingDigit]),
            false,
        );
        let msg = err.to_json()["erro"].as_str().unwrap().to_string();
        assert_eq!(msg.matches("; ").count(), 1);
    }

    #[test]
    fn persistence_detail_follows_flag() {
        let hidden = ApiError::from_service(
            ServiceError::Persistence(DatabaseError::QueryError("relation missing".into())),
            false,
        );
        assert_eq!(hidden.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(hidden.to_json().get("detalhes").is_none());

        let shown = ApiError::from_service(
            ServiceError::Persistence(DatabaseError::QueryError("relation missing".into())),
            true,
        );
        assert!(shown.to_json()["detalhes"]
            .as_str()
            .unwrap()
            .contains("relation missing"));
    }

    #[test]
    fn database_conflict_is_a_bad_request() {
        let err = ApiError::from_service(
            ServiceError::Persistence(DatabaseError::Conflict("admins_email_key".into())),
            true,
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}

//! HTTP 에러 응답 변환
//!
//! shared::tool::error::AppError를 HTTP 응답으로 변환합니다. 어떤 하위
//! 검증이 실패했는지 노출하지 않도록 모든 인증 실패는 동일한 401
//! 본문으로 수렴하고, 내부 원인은 서버 로그에만 남깁니다.

use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use shared::tool::error::AppError;
use std::fmt;

pub type ApiResult<T> = Result<T, ApiError>;

/// AppError의 HTTP 경계 래퍼
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            // 인증 실패 계열은 전부 401로 수렴
            AppError::TokenVerification(_)
            | AppError::RefreshTokenMismatch
            | AppError::UnknownSubject(_)
            | AppError::ProviderExchange { .. } => StatusCode::UNAUTHORIZED,

            AppError::UserNotFound(_) => StatusCode::NOT_FOUND,

            AppError::InvalidInput(_) | AppError::MissingField(_) => StatusCode::BAD_REQUEST,

            AppError::StoreUnavailable(_)
            | AppError::DatabaseConnection(_)
            | AppError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,

            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // 상세 원인은 로그로만
        self.0.log("HTTP 응답 변환");

        match self.status_code() {
            StatusCode::UNAUTHORIZED => HttpResponse::Unauthorized()
                .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
                .json(json!({ "detail": "Could not validate credentials" })),
            StatusCode::NOT_FOUND => {
                HttpResponse::NotFound().json(json!({ "detail": "User not found" }))
            }
            StatusCode::BAD_REQUEST => {
                HttpResponse::BadRequest().json(json!({ "detail": "Invalid request" }))
            }
            StatusCode::SERVICE_UNAVAILABLE => HttpResponse::ServiceUnavailable()
                .json(json!({ "detail": "Service temporarily unavailable" })),
            status => {
                HttpResponse::build(status).json(json!({ "detail": "Internal server error" }))
            }
        }
    }
}

//! 인증 서비스 에러 관리 시스템
//!
//! 소셜 로그인, 토큰 수명주기, 저장소 접근에서 발생하는 모든 에러를
//! 체계적으로 관리합니다. 심각도 분류와 로깅을 지원합니다.

use crate::auth::token::TokenError;
use thiserror::Error;
use tracing::{error, info, warn};

/// 공통 애플리케이션 에러 정의
///
/// 각 에러는 HTTP 계층에서 적절한 상태 코드로 변환됩니다.
/// 인증 실패 계열은 클라이언트에 단일한 메시지로 수렴하고,
/// 상세 원인은 서버 로그에만 남습니다.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    // 소셜 로그인 제공자 에러
    #[error("{provider} 인증 실패: {reason}")]
    ProviderExchange { provider: String, reason: String },

    // 토큰 검증 에러
    #[error("토큰 검증 실패: {0}")]
    TokenVerification(#[from] TokenError),

    // 저장된 refresh 토큰 부재와 불일치는 동일하게 취급
    #[error("Refresh 토큰이 저장된 토큰과 일치하지 않습니다")]
    RefreshTokenMismatch,

    // 토큰은 유효하지만 대응하는 사용자가 없는 정합성 결함
    #[error("토큰 주체에 대응하는 사용자가 없습니다: {0}")]
    UnknownSubject(String),

    // 사용자 관련 에러
    #[error("사용자를 찾을 수 없습니다: {0}")]
    UserNotFound(String),

    #[error("중복된 데이터: {0}")]
    DuplicateEntry(String),

    // 입력값 검증 에러
    #[error("입력값 오류: {0}")]
    InvalidInput(String),

    #[error("필수 필드 누락: {0}")]
    MissingField(String),

    // 데이터베이스 관련 에러
    #[error("데이터베이스 연결 실패: {0}")]
    DatabaseConnection(String),

    #[error("데이터베이스 쿼리 실패: {0}")]
    DatabaseQuery(String),

    // 토큰 저장소 에러
    #[error("토큰 저장소 사용 불가: {0}")]
    StoreUnavailable(String),

    // 시스템 에러
    #[error("내부 서버 에러: {0}")]
    InternalError(String),

    #[error("타임아웃: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// 에러의 심각도를 반환합니다.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Critical: 시스템 장애
            AppError::DatabaseConnection(_) | AppError::StoreUnavailable(_) => {
                ErrorSeverity::Critical
            }

            // High: 비즈니스 로직 실패
            AppError::UnknownSubject(_)
            | AppError::UserNotFound(_)
            | AppError::DatabaseQuery(_)
            | AppError::DuplicateEntry(_)
            | AppError::ProviderExchange { .. } => ErrorSeverity::High,

            // Medium: 입력 오류 및 일시적 장애
            AppError::InvalidInput(_)
            | AppError::MissingField(_)
            | AppError::Timeout(_)
            | AppError::Configuration(_)
            | AppError::InternalError(_) => ErrorSeverity::Medium,

            // Low: 일상적인 인증 실패
            AppError::TokenVerification(_) | AppError::RefreshTokenMismatch => ErrorSeverity::Low,
        }
    }

    /// 에러를 로깅합니다.
    ///
    /// 심각도에 따라 적절한 로깅 레벨을 사용합니다.
    pub fn log(&self, context: &str) {
        let severity = self.severity();
        let error_msg = self.to_string();

        match severity {
            ErrorSeverity::Critical => {
                error!("[CRITICAL] {} - {}", context, error_msg);
            }
            ErrorSeverity::High => {
                error!("[HIGH] {} - {}", context, error_msg);
            }
            ErrorSeverity::Medium => {
                warn!("[MEDIUM] {} - {}", context, error_msg);
            }
            ErrorSeverity::Low => {
                info!("[LOW] {} - {}", context, error_msg);
            }
        }
    }
}

/// 에러 심각도 레벨
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorSeverity {
    Critical, // 시스템 장애
    High,     // 비즈니스 로직 실패
    Medium,   // 입력 오류
    Low,      // 일상적인 인증 실패
}

// SqlxError conversion
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => {
                AppError::UserNotFound("Database record not found".to_string())
            }
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    if code == "23000" || code.starts_with("1062") {
                        // MySQL duplicate entry error
                        AppError::DuplicateEntry(db_err.to_string())
                    } else {
                        AppError::DatabaseQuery(db_err.to_string())
                    }
                } else {
                    AppError::DatabaseQuery(db_err.to_string())
                }
            }
            sqlx::Error::PoolTimedOut => {
                AppError::Timeout("Database connection pool timeout".to_string())
            }
            sqlx::Error::PoolClosed => {
                AppError::DatabaseConnection("Database pool is closed".to_string())
            }
            sqlx::Error::Configuration(_) => {
                AppError::Configuration("Database configuration error".to_string())
            }
            _ => AppError::DatabaseQuery(err.to_string()),
        }
    }
}

// RedisError conversion
impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else {
            AppError::StoreUnavailable(err.to_string())
        }
    }
}

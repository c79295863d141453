//! 요청 인증 헬퍼
//!
//! Authorization 헤더에서 bearer 토큰을 추출합니다.

use crate::error::ApiError;
use actix_web::http::header;
use actix_web::HttpRequest;
use shared::auth::token::TokenError;
use shared::tool::error::AppError;

/// Authorization 헤더에서 bearer 토큰을 추출합니다.
///
/// 헤더 부재, 형식 오류, 빈 토큰은 모두 동일한 인증 실패입니다.
pub fn bearer_token(req: &HttpRequest) -> Result<String, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(unauthenticated)?;

    let auth_value = auth_header.to_str().map_err(|_| unauthenticated())?;

    if !auth_value.starts_with("Bearer ") {
        return Err(unauthenticated());
    }

    let token = auth_value[7..].to_string(); // "Bearer " 제거

    if token.is_empty() {
        return Err(unauthenticated());
    }

    Ok(token)
}

fn unauthenticated() -> ApiError {
    ApiError(AppError::TokenVerification(TokenError::Malformed))
}

//! 사용자 REST API 핸들러

use crate::error::ApiError;
use crate::extractors::bearer_token;
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use shared::auth::auth_service::AuthService;

/// 현재 사용자 조회
///
/// 요청 처리 중 토큰이 선제 갱신된 경우 새 쌍을 응답 헤더로
/// 전달합니다. 클라이언트는 헤더가 있으면 보관 중인 토큰을 교체해야
/// 합니다.
pub async fn read_user_me(
    http_req: HttpRequest,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, ApiError> {
    let token = bearer_token(&http_req)?;
    let outcome = auth.authenticate(&token).await?;

    if !outcome.user.is_active {
        return Ok(HttpResponse::BadRequest().json(json!({ "detail": "Inactive user" })));
    }

    let mut builder = HttpResponse::Ok();
    if let Some(pair) = &outcome.rotated {
        builder.insert_header(("X-New-Access-Token", pair.access_token.as_str()));
        builder.insert_header(("X-New-Refresh-Token", pair.refresh_token.as_str()));
    }

    Ok(builder.json(&outcome.user))
}

/// 사용자 라우트 구성
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/users").route("/me", web::get().to(read_user_me)));
}

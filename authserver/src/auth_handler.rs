//! 소셜 로그인 REST API 핸들러

use crate::error::ApiError;
use crate::extractors::bearer_token;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::auth::auth_service::AuthService;
use shared::auth::types::{Provider, TokenPair};
use shared::tool::error::AppError;
use uuid::Uuid;

/// 소셜 로그인 시작 요청
#[derive(Debug, Deserialize, Serialize)]
pub struct SocialLoginRequest {
    pub provider: String,
}

/// 소셜 로그인 시작 응답
#[derive(Debug, Serialize)]
pub struct SocialLoginResponse {
    pub auth_url: String,
    pub state: String,
}

/// 콜백 요청 (Google, Kakao)
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
}

/// 콜백 요청 (Naver는 state를 되돌려 보냄)
#[derive(Debug, Deserialize)]
pub struct NaverCallbackQuery {
    pub code: String,
    pub state: String,
}

/// 토큰 갱신 요청
#[derive(Debug, Deserialize, Serialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// 토큰 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
        }
    }
}

/// 소셜 로그인 시작 핸들러
///
/// 제공자 인증 URL과 CSRF 방지용 state를 발급합니다.
pub async fn social_login_start(
    req: web::Json<SocialLoginRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, ApiError> {
    let provider = Provider::from_str(&req.provider)
        .ok_or_else(|| ApiError(AppError::InvalidInput(format!("provider: {}", req.provider))))?;

    let state = Uuid::new_v4().to_string();
    let auth_url = auth.social().auth_url(provider, &state);

    Ok(HttpResponse::Ok().json(SocialLoginResponse { auth_url, state }))
}

/// 구글 로그인 콜백 핸들러
pub async fn google_callback(
    query: web::Query<CallbackQuery>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, ApiError> {
    handle_callback(Provider::Google, &query.code, None, auth).await
}

/// 카카오 로그인 콜백 핸들러
pub async fn kakao_callback(
    query: web::Query<CallbackQuery>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, ApiError> {
    handle_callback(Provider::Kakao, &query.code, None, auth).await
}

/// 네이버 로그인 콜백 핸들러
pub async fn naver_callback(
    query: web::Query<NaverCallbackQuery>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    handle_callback(Provider::Naver, &query.code, Some(query.state), auth).await
}

/// 공통 콜백 처리
async fn handle_callback(
    provider: Provider,
    code: &str,
    state: Option<String>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, ApiError> {
    let (_user, pair) = auth.login(provider, code, state.as_deref()).await?;
    Ok(HttpResponse::Ok().json(TokenResponse::from(pair)))
}

/// refresh 토큰으로 새 쌍 발급
pub async fn refresh(
    req: web::Json<RefreshRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, ApiError> {
    let (_user, pair) = auth.refresh(&req.refresh_token).await?;
    Ok(HttpResponse::Ok().json(TokenResponse::from(pair)))
}

/// 로그아웃: 저장된 토큰 쌍 제거
pub async fn logout(
    http_req: HttpRequest,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, ApiError> {
    let token = bearer_token(&http_req)?;
    let outcome = auth.authenticate(&token).await?;
    auth.logout(&outcome.user.id).await?;
    Ok(HttpResponse::Ok().json(json!({})))
}

/// Health Check Endpoint
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// 인증 라우트 구성
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(social_login_start))
            .route("/google/callback", web::get().to(google_callback))
            .route("/kakao/callback", web::get().to(kakao_callback))
            .route("/naver/callback", web::get().to(naver_callback))
            .route("/refresh", web::post().to(refresh))
            .route("/logout", web::post().to(logout)),
    );
}

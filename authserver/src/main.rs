//! 소셜 인증 HTTP 서버
//!
//! Google, Kakao, Naver 소셜 로그인과 JWT 토큰 수명주기를 제공하는
//! REST API 서버입니다.

use actix_web::{middleware, web, App, HttpServer};
use anyhow::Result;
use dotenv::{dotenv, from_path};
use std::path::PathBuf;
use std::sync::Arc;
use std::{env, net::SocketAddr};
use tracing::info;

use authserver::{configure_auth_routes, configure_user_routes, health};
use shared::auth::auth_service::AuthService;
use shared::auth::social_auth::SocialAuthService;
use shared::auth::token::TokenService;
use shared::config::db::DbConfig;
use shared::config::redis_config::RedisConfig;
use shared::config::settings::AuthSettings;
use shared::service::db::UserDbService;
use shared::service::redis::TokenRedisService;

#[tokio::main]
async fn main() -> Result<()> {
    // .env 로드 - workspace root에서 .env 파일 찾기
    let workspace_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    let env_path = workspace_root.join(".env");

    if env_path.exists() {
        from_path(&env_path).map_err(|e| anyhow::anyhow!("Failed to load .env: {}", e))?;
    } else {
        dotenv().ok(); // fallback to default .env loading
    }

    // 로깅 초기화
    shared::logging::init("authserver")?;

    // 인증 설정 로드 (서명 키는 여기서 1회 로드되어 주입됨)
    let settings = AuthSettings::from_env()
        .map_err(|e| anyhow::anyhow!("인증 설정 로드 실패: {e}"))?;

    // http_host, http_port 읽기
    let host = env::var("http_host").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("http_port").unwrap_or_else(|_| "8000".to_string());
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| anyhow::anyhow!("잘못된 주소 형식 '{host}:{port}': {e}"))?;

    // 데이터베이스 연결 풀 초기화
    info!("🔄 MariaDB 연결 풀 초기화 중...");
    let db_config = DbConfig::new()
        .await
        .map_err(|e| anyhow::anyhow!("데이터베이스 연결 실패: {}", e))?;

    let user_directory = UserDbService::new(db_config.get_pool().clone());
    user_directory
        .ensure_schema()
        .await
        .map_err(|e| anyhow::anyhow!("users 테이블 확인 실패: {}", e))?;
    info!("✅ MariaDB 연결 풀 초기화 완료");

    // Redis 연결 초기화
    info!("🔄 Redis 연결 초기화 중...");
    let redis_config = RedisConfig::new()
        .await
        .map_err(|e| anyhow::anyhow!("Redis 연결 실패: {}", e))?;
    let token_store = TokenRedisService::new(redis_config, &settings);
    info!("✅ Redis 연결 초기화 완료");

    // 인증 서비스 조립
    let auth_service = AuthService::new(
        Arc::new(SocialAuthService::new(&settings)),
        TokenService::new(&settings),
        Arc::new(token_store),
        Arc::new(user_directory),
        settings.preemptive_threshold(),
    );
    let auth_data = web::Data::new(auth_service);

    info!("▶ 인증 서버 실행: {}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(auth_data.clone())
            .wrap(middleware::Logger::default())
            .wrap(
                actix_cors::Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .route("/health", web::get().to(health))
            .service(
                web::scope("/api")
                    .configure(configure_auth_routes)
                    .configure(configure_user_routes),
            )
    })
    .bind(addr)
    .map_err(|e| anyhow::anyhow!("서버 바인딩 실패 {}: {}", addr, e))?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("서버 실행 실패: {}", e))
}

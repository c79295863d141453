//! 인증 REST API 테스트
//!
//! in-memory 구현으로 라우트 동작과 에러 응답 정책을 검증합니다.

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use shared::auth::auth_service::AuthService;
use shared::auth::social_auth::SocialAuthService;
use shared::auth::token::TokenService;
use shared::auth::types::{Provider, SocialProfile, TokenPair};
use shared::config::settings::{AuthSettings, OAuthClientSettings};
use shared::model::User;
use shared::service::traits::{TokenStore, UserDirectory};
use shared::tool::error::AppError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use authserver::{configure_auth_routes, configure_user_routes, health};

// ============================================================================
// In-memory test doubles
// ============================================================================

#[derive(Default)]
struct InMemoryDirectory {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_by_social_id(
        &self,
        social_id: &str,
        provider: Provider,
    ) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.social_id == social_id && u.social_provider == provider)
            .cloned())
    }

    async fn create_user(&self, profile: &SocialProfile) -> Result<User, AppError> {
        let user = User::from_profile(profile);
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn touch_last_login(&self, user_id: &str) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.last_login = Some(Utc::now().naive_utc());
        }
        Ok(())
    }
}

#[derive(Default)]
struct InMemoryTokenStore {
    pairs: Mutex<HashMap<String, (String, String)>>,
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn save_token_pair(
        &self,
        user_id: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), AppError> {
        self.pairs.lock().unwrap().insert(
            user_id.to_string(),
            (access_token.to_string(), refresh_token.to_string()),
        );
        Ok(())
    }

    async fn get_token_pair(
        &self,
        user_id: &str,
    ) -> Result<(Option<String>, Option<String>), AppError> {
        let pairs = self.pairs.lock().unwrap();
        match pairs.get(user_id) {
            Some((a, r)) => Ok((Some(a.clone()), Some(r.clone()))),
            None => Ok((None, None)),
        }
    }

    async fn invalidate(&self, user_id: &str) -> Result<(), AppError> {
        self.pairs.lock().unwrap().remove(user_id);
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn test_settings(access_minutes: i64) -> AuthSettings {
    let client = |name: &str| OAuthClientSettings {
        client_id: format!("{name}_client_id"),
        client_secret: format!("{name}_secret"),
        redirect_uri: format!("http://localhost:8000/api/auth/{name}/callback"),
    };
    AuthSettings {
        secret_key: "test-secret-key-min-256-bits-long".into(),
        algorithm: "HS256".into(),
        access_token_expire_minutes: access_minutes,
        refresh_token_expire_days: 30,
        preemptive_refresh_minutes: 5,
        provider_timeout: std::time::Duration::from_secs(2),
        store_timeout: std::time::Duration::from_millis(500),
        google: client("google"),
        kakao: client("kakao"),
        naver: client("naver"),
    }
}

struct Harness {
    auth: AuthService,
    directory: Arc<InMemoryDirectory>,
}

fn harness(access_minutes: i64) -> Harness {
    let settings = test_settings(access_minutes);
    let directory = Arc::new(InMemoryDirectory::default());
    let store = Arc::new(InMemoryTokenStore::default());
    let auth = AuthService::new(
        Arc::new(SocialAuthService::new(&settings)),
        TokenService::new(&settings),
        store,
        directory.clone(),
        settings.preemptive_threshold(),
    );
    Harness { auth, directory }
}

async fn seed_login(h: &Harness) -> (User, TokenPair) {
    let mut profile = SocialProfile::new("12345", Provider::Kakao);
    profile.nickname = Some("Alice".into());
    h.auth.complete_login(&profile).await.unwrap()
}

macro_rules! init_app {
    ($auth:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($auth.clone()))
                .route("/health", web::get().to(health))
                .service(
                    web::scope("/api")
                        .configure(configure_auth_routes)
                        .configure(configure_user_routes),
                ),
        )
        .await
    };
}

// ============================================================================
// Tests
// ============================================================================

#[actix_web::test]
async fn test_health_check() {
    let h = harness(60);
    let app = init_app!(h.auth);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_social_login_start() {
    let h = harness(60);
    let app = init_app!(h.auth);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "provider": "kakao" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    let auth_url = body["auth_url"].as_str().unwrap();
    assert!(auth_url.contains("kauth.kakao.com"));
    assert!(auth_url.contains("client_id="));
    assert!(!body["state"].as_str().unwrap().is_empty());
}

#[actix_web::test]
async fn test_social_login_start_rejects_unknown_provider() {
    let h = harness(60);
    let app = init_app!(h.auth);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "provider": "myspace" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_read_user_me() {
    let h = harness(60);
    let (user, pair) = seed_login(&h).await;
    let app = init_app!(h.auth);

    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    // 선제 갱신 대상이 아니므로 새 토큰 헤더 없음
    assert!(resp.headers().get("X-New-Access-Token").is_none());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], user.id.as_str());
    assert_eq!(body["social_id"], "12345");
    assert_eq!(body["social_provider"], "kakao");
}

#[actix_web::test]
async fn test_me_without_token_is_uniform_401() {
    let h = harness(60);
    let app = init_app!(h.auth);

    let req = test::TestRequest::get().uri("/api/users/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let challenge = resp
        .headers()
        .get("WWW-Authenticate")
        .expect("WWW-Authenticate 헤더")
        .to_str()
        .unwrap();
    assert_eq!(challenge, "Bearer");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Could not validate credentials");
}

#[actix_web::test]
async fn test_me_with_garbage_token_is_uniform_401() {
    let h = harness(60);
    let app = init_app!(h.auth);

    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header(("Authorization", "Bearer garbage.token.value"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // 실패 원인과 무관하게 동일한 본문
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Could not validate credentials");
}

#[actix_web::test]
async fn test_me_rejects_refresh_token() {
    let h = harness(60);
    let (_, pair) = seed_login(&h).await;
    let app = init_app!(h.auth);

    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header(("Authorization", format!("Bearer {}", pair.refresh_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_inactive_user_rejected() {
    let h = harness(60);
    let (_, pair) = seed_login(&h).await;
    h.directory.users.lock().unwrap()[0].is_active = false;
    let app = init_app!(h.auth);

    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Inactive user");
}

#[actix_web::test]
async fn test_refresh_endpoint_rotates_pair() {
    let h = harness(60);
    let (_, pair) = seed_login(&h).await;
    let app = init_app!(h.auth);

    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(json!({ "refresh_token": pair.refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["token_type"], "bearer");
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert_ne!(body["refresh_token"], pair.refresh_token.as_str());

    // 교체된 이전 refresh 토큰은 재사용 불가
    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(json!({ "refresh_token": pair.refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_logout_invalidates_stored_pair() {
    let h = harness(60);
    let (_, pair) = seed_login(&h).await;
    let app = init_app!(h.auth);

    let req = test::TestRequest::post()
        .uri("/api/auth/logout")
        .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    // 로그아웃 이후 refresh는 거부
    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(json!({ "refresh_token": pair.refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_rotation_surfaces_fresh_tokens_in_headers() {
    // access TTL 1분, 임계값 5분: 즉시 선제 갱신 대상
    let h = harness(1);
    let (_, pair) = seed_login(&h).await;
    let app = init_app!(h.auth);

    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let new_access = resp
        .headers()
        .get("X-New-Access-Token")
        .expect("갱신된 access 토큰 헤더")
        .to_str()
        .unwrap()
        .to_string();
    assert!(resp.headers().get("X-New-Refresh-Token").is_some());
    assert_ne!(new_access, pair.access_token);

    // 갱신된 토큰으로 다시 인증 가능
    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header(("Authorization", format!("Bearer {new_access}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

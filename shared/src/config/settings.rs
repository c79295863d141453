//! 인증 설정
//!
//! 서명 키, 알고리즘, 토큰 TTL, 선제 갱신 임계값, 제공자별 OAuth
//! 자격증명을 환경변수에서 한 번 로드합니다. 로드된 값은 불변으로
//! 각 서비스에 주입됩니다. 테스트는 구조체를 직접 구성해 일회용 키를
//! 사용할 수 있습니다.

use crate::tool::error::AppError;
use std::env;
use std::time::Duration;
use tracing::warn;

/// 제공자별 OAuth 클라이언트 자격증명
#[derive(Debug, Clone)]
pub struct OAuthClientSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl OAuthClientSettings {
    fn from_env(prefix: &str, default_redirect: &str) -> Self {
        Self {
            client_id: env::var(format!("{prefix}_CLIENT_ID")).unwrap_or_else(|_| {
                warn!("{}_CLIENT_ID 환경변수가 없어서 더미 값을 사용합니다.", prefix);
                format!("{}_client_id", prefix.to_lowercase())
            }),
            client_secret: env::var(format!("{prefix}_CLIENT_SECRET"))
                .unwrap_or_else(|_| format!("{}_secret", prefix.to_lowercase())),
            redirect_uri: env::var(format!("{prefix}_REDIRECT_URI"))
                .unwrap_or_else(|_| default_redirect.to_string()),
        }
    }
}

/// 인증/토큰 수명주기 설정
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// JWT 서명용 비밀키 (프로세스 전역, 시작 시 1회 로드)
    pub secret_key: String,
    /// 서명 알고리즘 이름 (예: "HS256")
    pub algorithm: String,
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_days: i64,
    /// 남은 유효 시간이 이 값 미만이면 요청 처리 중 선제 갱신
    pub preemptive_refresh_minutes: i64,
    /// 제공자 호출 타임아웃
    pub provider_timeout: Duration,
    /// 토큰 저장소 호출 타임아웃
    pub store_timeout: Duration,
    pub google: OAuthClientSettings,
    pub kakao: OAuthClientSettings,
    pub naver: OAuthClientSettings,
}

impl AuthSettings {
    /// 환경변수에서 설정을 로드합니다.
    ///
    /// SECRET_KEY는 필수이며 나머지는 기본값을 가집니다.
    pub fn from_env() -> Result<Self, AppError> {
        let secret_key = env::var("SECRET_KEY")
            .map_err(|_| AppError::Configuration("SECRET_KEY 환경변수가 필요합니다".into()))?;

        let algorithm = env::var("ALGORITHM").unwrap_or_else(|_| "HS256".to_string());

        let access_token_expire_minutes = env_i64("ACCESS_TOKEN_EXPIRE_MINUTES", 60);
        let refresh_token_expire_days = env_i64("REFRESH_TOKEN_EXPIRE_DAYS", 30);
        let preemptive_refresh_minutes = env_i64("ACCESS_TOKEN_PREEMPTIVE_REFRESH_MINUTES", 5);

        let provider_timeout = Duration::from_secs(env_i64("PROVIDER_TIMEOUT_SECONDS", 10) as u64);
        let store_timeout = Duration::from_millis(env_i64("STORE_TIMEOUT_MILLIS", 2000) as u64);

        Ok(Self {
            secret_key,
            algorithm,
            access_token_expire_minutes,
            refresh_token_expire_days,
            preemptive_refresh_minutes,
            provider_timeout,
            store_timeout,
            google: OAuthClientSettings::from_env(
                "GOOGLE",
                "http://localhost:8000/api/auth/google/callback",
            ),
            kakao: OAuthClientSettings::from_env(
                "KAKAO",
                "http://localhost:8000/api/auth/kakao/callback",
            ),
            naver: OAuthClientSettings::from_env(
                "NAVER",
                "http://localhost:8000/api/auth/naver/callback",
            ),
        })
    }

    pub fn access_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_expire_minutes)
    }

    pub fn refresh_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.refresh_token_expire_days)
    }

    pub fn preemptive_threshold(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.preemptive_refresh_minutes)
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

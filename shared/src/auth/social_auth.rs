//! 통합 소셜 인증 서비스
//!
//! Google, Kakao, Naver의 authorization code 교환과 프로필 정규화를
//! 담당합니다. 호출당 외부 HTTP 왕복 2회(토큰 교환, 프로필 조회)이며
//! 로컬 상태를 변경하지 않습니다.

use super::types::{
    Gender, GoogleUserInfo, KakaoUserInfo, NaverUserInfoResponse, OAuthConfig, OAuthTokenResponse,
    Provider, SocialProfile,
};
use crate::config::settings::AuthSettings;
use crate::tool::error::AppError;
use chrono::{Datelike, NaiveDate, Utc};
use std::time::Duration;
use tracing::{info, warn};

/// 통합 소셜 인증 서비스
pub struct SocialAuthService {
    client: reqwest::Client,
    request_timeout: Duration,
    google_config: OAuthConfig,
    kakao_config: OAuthConfig,
    naver_config: OAuthConfig,
}

impl SocialAuthService {
    /// 서비스 생성
    pub fn new(settings: &AuthSettings) -> Self {
        let google_config = OAuthConfig {
            client_id: settings.google.client_id.clone(),
            client_secret: settings.google.client_secret.clone(),
            redirect_uri: settings.google.redirect_uri.clone(),
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            user_info_url: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
        };

        let kakao_config = OAuthConfig {
            client_id: settings.kakao.client_id.clone(),
            client_secret: settings.kakao.client_secret.clone(),
            redirect_uri: settings.kakao.redirect_uri.clone(),
            auth_url: "https://kauth.kakao.com/oauth/authorize".to_string(),
            token_url: "https://kauth.kakao.com/oauth/token".to_string(),
            user_info_url: "https://kapi.kakao.com/v2/user/me".to_string(),
        };

        let naver_config = OAuthConfig {
            client_id: settings.naver.client_id.clone(),
            client_secret: settings.naver.client_secret.clone(),
            redirect_uri: settings.naver.redirect_uri.clone(),
            auth_url: "https://nid.naver.com/oauth2.0/authorize".to_string(),
            token_url: "https://nid.naver.com/oauth2.0/token".to_string(),
            user_info_url: "https://openapi.naver.com/v1/nid/me".to_string(),
        };

        Self {
            client: reqwest::Client::new(),
            request_timeout: settings.provider_timeout,
            google_config,
            kakao_config,
            naver_config,
        }
    }

    /// 엔드포인트를 직접 지정해 서비스를 생성합니다 (테스트용 포함)
    pub fn from_configs(
        google_config: OAuthConfig,
        kakao_config: OAuthConfig,
        naver_config: OAuthConfig,
        request_timeout: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            request_timeout,
            google_config,
            kakao_config,
            naver_config,
        }
    }

    fn config(&self, provider: Provider) -> &OAuthConfig {
        match provider {
            Provider::Google => &self.google_config,
            Provider::Kakao => &self.kakao_config,
            Provider::Naver => &self.naver_config,
        }
    }

    /// 제공자 인증 URL 생성
    pub fn auth_url(&self, provider: Provider, state: &str) -> String {
        let config = self.config(provider);

        let mut params = vec![
            ("client_id", config.client_id.clone()),
            ("redirect_uri", config.redirect_uri.clone()),
            ("response_type", "code".into()),
            ("state", state.into()),
        ];

        // 제공자별 추가 파라미터
        match provider {
            Provider::Google => {
                params.push(("scope", "openid email profile".into()));
                params.push(("access_type", "offline".into()));
            }
            Provider::Kakao => {
                params.push((
                    "scope",
                    "account_email profile_nickname profile_image".into(),
                ));
            }
            Provider::Naver => {}
        }

        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", config.auth_url, query)
    }

    /// Authorization code를 교환하고 정규화된 프로필을 반환합니다.
    ///
    /// Naver는 제공자가 요구하는 `state` 값을 함께 전달해야 합니다.
    /// 두 왕복 중 어느 쪽이든 실패하면 제공자 이름과 원인을 담은
    /// 단일 인증 실패 에러로 surface 됩니다.
    pub async fn exchange(
        &self,
        provider: Provider,
        code: &str,
        state: Option<&str>,
    ) -> Result<SocialProfile, AppError> {
        let provider_token = self.fetch_token(provider, code, state).await?;
        let profile = self.fetch_profile(provider, &provider_token).await?;

        info!(
            target: "security::auth",
            provider = %provider,
            social_id = %profile.social_id,
            "✅ 소셜 프로필 교환 성공"
        );

        Ok(profile)
    }

    /// Step 1: authorization code를 제공자 access token으로 교환
    async fn fetch_token(
        &self,
        provider: Provider,
        code: &str,
        state: Option<&str>,
    ) -> Result<String, AppError> {
        let config = self.config(provider);

        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
        ];

        // 제공자별 추가 파라미터
        match provider {
            Provider::Google | Provider::Kakao => {
                params.push(("redirect_uri", config.redirect_uri.as_str()));
            }
            Provider::Naver => {
                // Naver는 redirect_uri 대신 state를 되돌려 보내야 함
                let state = state.ok_or_else(|| AppError::MissingField("state".into()))?;
                params.push(("state", state));
            }
        }

        let response = self
            .client
            .post(&config.token_url)
            .timeout(self.request_timeout)
            .form(&params)
            .send()
            .await
            .map_err(|e| exchange_error(provider, format!("토큰 엔드포인트 호출 실패: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(
                target: "security::auth_failure",
                provider = %provider,
                status = %status,
                "❌ authorization code 교환 거부"
            );
            return Err(exchange_error(
                provider,
                format!("invalid authorization code (status {status})"),
            ));
        }

        let token_response: OAuthTokenResponse = response
            .json()
            .await
            .map_err(|e| exchange_error(provider, format!("토큰 응답 파싱 실패: {e}")))?;

        Ok(token_response.access_token)
    }

    /// Step 2: 제공자 access token으로 프로필을 조회하고 정규화
    async fn fetch_profile(
        &self,
        provider: Provider,
        access_token: &str,
    ) -> Result<SocialProfile, AppError> {
        let config = self.config(provider);

        let response = self
            .client
            .get(&config.user_info_url)
            .timeout(self.request_timeout)
            .header("Authorization", format!("Bearer {access_token}"))
            .send()
            .await
            .map_err(|e| exchange_error(provider, format!("프로필 엔드포인트 호출 실패: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(
                target: "security::auth_failure",
                provider = %provider,
                status = %status,
                "❌ 프로필 조회 거부"
            );
            return Err(exchange_error(
                provider,
                format!("invalid access token (status {status})"),
            ));
        }

        match provider {
            Provider::Google => {
                let user: GoogleUserInfo = response
                    .json()
                    .await
                    .map_err(|e| exchange_error(provider, format!("프로필 파싱 실패: {e}")))?;
                Ok(normalize_google(user))
            }
            Provider::Kakao => {
                let user: KakaoUserInfo = response
                    .json()
                    .await
                    .map_err(|e| exchange_error(provider, format!("프로필 파싱 실패: {e}")))?;
                Ok(normalize_kakao(user))
            }
            Provider::Naver => {
                let envelope: NaverUserInfoResponse = response
                    .json()
                    .await
                    .map_err(|e| exchange_error(provider, format!("프로필 파싱 실패: {e}")))?;
                normalize_naver(envelope)
            }
        }
    }
}

fn exchange_error(provider: Provider, reason: String) -> AppError {
    AppError::ProviderExchange {
        provider: provider.as_str().to_string(),
        reason,
    }
}

/// 구글 프로필 정규화
fn normalize_google(user: GoogleUserInfo) -> SocialProfile {
    let mut profile = SocialProfile::new(user.id, Provider::Google);
    profile.email = user.email;
    profile.username = user.name.clone();
    profile.full_name = user.name;
    profile.nickname = user.given_name;
    profile.profile_image = user.picture;
    profile.locale = user.locale;
    profile
}

/// 카카오 프로필 정규화
fn normalize_kakao(user: KakaoUserInfo) -> SocialProfile {
    let account = user.kakao_account.unwrap_or_default();
    let kakao_profile = account.profile.unwrap_or_default();

    let mut profile = SocialProfile::new(user.id.to_string(), Provider::Kakao);
    profile.email = account.email;
    profile.username = kakao_profile.nickname.clone();
    profile.nickname = kakao_profile.nickname.clone();
    profile.full_name = kakao_profile.nickname;
    profile.profile_image = kakao_profile.profile_image_url;
    profile.gender = map_kakao_gender(account.gender.as_deref());
    profile.age_range = account.age_range;
    profile.birth_date = account
        .birthday
        .as_deref()
        .and_then(parse_kakao_birth_date);
    profile
}

/// 네이버 프로필 정규화
fn normalize_naver(envelope: NaverUserInfoResponse) -> Result<SocialProfile, AppError> {
    if envelope.resultcode != "00" {
        return Err(exchange_error(
            Provider::Naver,
            format!(
                "프로필 응답 실패 (resultcode {}, {})",
                envelope.resultcode,
                envelope.message.unwrap_or_default()
            ),
        ));
    }

    let user = envelope
        .response
        .ok_or_else(|| exchange_error(Provider::Naver, "프로필 응답 본문 누락".into()))?;

    let mut profile = SocialProfile::new(user.id, Provider::Naver);
    profile.email = user.email;
    profile.username = user.name.clone();
    profile.full_name = user.name;
    profile.nickname = user.nickname;
    profile.profile_image = user.profile_image;
    profile.gender = map_naver_gender(user.gender.as_deref());
    profile.age_range = user.age;
    profile.birth_date =
        parse_naver_birth_date(user.birthyear.as_deref(), user.birthday.as_deref());
    profile.phone_number = user.mobile;
    Ok(profile)
}

fn map_kakao_gender(value: Option<&str>) -> Gender {
    match value {
        Some("male") => Gender::Male,
        Some("female") => Gender::Female,
        _ => Gender::Unspecified,
    }
}

fn map_naver_gender(value: Option<&str>) -> Gender {
    match value {
        Some("M") => Gender::Male,
        Some("F") => Gender::Female,
        _ => Gender::Unspecified,
    }
}

/// 카카오 생일 파싱
///
/// "MMDD" 형식에 연도가 없으므로 올해 연도와 결합합니다. 결과는
/// 근사값으로 취급해야 합니다.
fn parse_kakao_birth_date(birthday: &str) -> Option<NaiveDate> {
    let year = Utc::now().year();
    NaiveDate::parse_from_str(&format!("{year}{birthday}"), "%Y%m%d").ok()
}

/// 네이버 생년월일 파싱 (birthyear "YYYY" + birthday "MM-DD")
fn parse_naver_birth_date(birthyear: Option<&str>, birthday: Option<&str>) -> Option<NaiveDate> {
    let (year, day) = match (birthyear, birthday) {
        (Some(y), Some(d)) => (y, d),
        _ => return None,
    };
    match NaiveDate::parse_from_str(&format!("{year}-{day}"), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            warn!("잘못된 생년월일 형식: year={}, date={}", year, day);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_settings() -> AuthSettings {
        use crate::config::settings::OAuthClientSettings;
        let client = |name: &str| OAuthClientSettings {
            client_id: format!("{name}_client_id"),
            client_secret: format!("{name}_secret"),
            redirect_uri: format!("http://localhost:8000/api/auth/{name}/callback"),
        };
        AuthSettings {
            secret_key: "test-secret".into(),
            algorithm: "HS256".into(),
            access_token_expire_minutes: 60,
            refresh_token_expire_days: 30,
            preemptive_refresh_minutes: 5,
            provider_timeout: Duration::from_secs(5),
            store_timeout: Duration::from_millis(500),
            google: client("google"),
            kakao: client("kakao"),
            naver: client("naver"),
        }
    }

    #[test]
    fn test_auth_url_generation() {
        let service = SocialAuthService::new(&test_settings());

        let kakao_url = service.auth_url(Provider::Kakao, "test_state");
        assert!(kakao_url.contains("kauth.kakao.com"));
        assert!(kakao_url.contains("client_id="));
        assert!(kakao_url.contains("state=test_state"));

        let google_url = service.auth_url(Provider::Google, "test_state");
        assert!(google_url.contains("accounts.google.com"));
        assert!(google_url.contains("scope="));
        assert!(google_url.contains("access_type=offline"));

        let naver_url = service.auth_url(Provider::Naver, "test_state");
        assert!(naver_url.contains("nid.naver.com"));
        assert!(naver_url.contains("state=test_state"));
    }

    #[test]
    fn test_parse_kakao_birth_date() {
        let date = parse_kakao_birth_date("0907").expect("valid birthday");
        assert_eq!(date.month(), 9);
        assert_eq!(date.day(), 7);
        assert_eq!(date.year(), Utc::now().year());

        assert!(parse_kakao_birth_date("9999").is_none());
        assert!(parse_kakao_birth_date("").is_none());
    }

    #[test]
    fn test_parse_naver_birth_date() {
        let date = parse_naver_birth_date(Some("1990"), Some("09-07")).expect("valid");
        assert_eq!(date, NaiveDate::from_ymd_opt(1990, 9, 7).unwrap());

        assert!(parse_naver_birth_date(None, Some("09-07")).is_none());
        assert!(parse_naver_birth_date(Some("1990"), None).is_none());
        assert!(parse_naver_birth_date(Some("1990"), Some("13-40")).is_none());
    }

    #[test]
    fn test_gender_mapping_defaults_to_unspecified() {
        assert_eq!(map_kakao_gender(Some("male")), Gender::Male);
        assert_eq!(map_kakao_gender(Some("female")), Gender::Female);
        assert_eq!(map_kakao_gender(Some("other")), Gender::Unspecified);
        assert_eq!(map_kakao_gender(None), Gender::Unspecified);

        assert_eq!(map_naver_gender(Some("M")), Gender::Male);
        assert_eq!(map_naver_gender(Some("F")), Gender::Female);
        assert_eq!(map_naver_gender(Some("U")), Gender::Unspecified);
    }

    #[test]
    fn test_normalize_kakao_profile() {
        let user: KakaoUserInfo = serde_json::from_value(json!({
            "id": 12345,
            "kakao_account": {
                "email": "alice@example.com",
                "gender": "female",
                "age_range": "20~29",
                "birthday": "0907",
                "profile": {
                    "nickname": "Alice",
                    "profile_image_url": "https://k.kakaocdn.net/img.png"
                }
            }
        }))
        .unwrap();

        let profile = normalize_kakao(user);
        assert_eq!(profile.social_id, "12345");
        assert_eq!(profile.provider, Provider::Kakao);
        assert_eq!(profile.email.as_deref(), Some("alice@example.com"));
        assert_eq!(profile.nickname.as_deref(), Some("Alice"));
        assert_eq!(profile.gender, Gender::Female);
        assert!(profile.birth_date.is_some());
    }

    #[test]
    fn test_normalize_kakao_minimal_profile() {
        // 동의 항목이 비어 있는 계정
        let user: KakaoUserInfo = serde_json::from_value(json!({ "id": 99 })).unwrap();
        let profile = normalize_kakao(user);
        assert_eq!(profile.social_id, "99");
        assert!(profile.email.is_none());
        assert_eq!(profile.gender, Gender::Unspecified);
    }

    #[test]
    fn test_normalize_naver_profile() {
        let envelope: NaverUserInfoResponse = serde_json::from_value(json!({
            "resultcode": "00",
            "message": "success",
            "response": {
                "id": "naver-abc",
                "email": "bob@naver.com",
                "name": "Bob",
                "nickname": "bobby",
                "gender": "M",
                "age": "30-39",
                "birthyear": "1990",
                "birthday": "09-07",
                "mobile": "010-1234-5678"
            }
        }))
        .unwrap();

        let profile = normalize_naver(envelope).unwrap();
        assert_eq!(profile.social_id, "naver-abc");
        assert_eq!(profile.gender, Gender::Male);
        assert_eq!(
            profile.birth_date,
            NaiveDate::from_ymd_opt(1990, 9, 7)
        );
        assert_eq!(profile.phone_number.as_deref(), Some("010-1234-5678"));
    }

    #[test]
    fn test_normalize_naver_failure_resultcode() {
        let envelope: NaverUserInfoResponse = serde_json::from_value(json!({
            "resultcode": "024",
            "message": "Authentication failed"
        }))
        .unwrap();

        let err = normalize_naver(envelope).unwrap_err();
        assert!(matches!(err, AppError::ProviderExchange { .. }));
    }

    #[test]
    fn test_normalize_google_profile() {
        let user: GoogleUserInfo = serde_json::from_value(json!({
            "id": "g-123",
            "email": "carol@gmail.com",
            "name": "Carol Kim",
            "given_name": "Carol",
            "picture": "https://lh3.googleusercontent.com/p.jpg",
            "locale": "ko"
        }))
        .unwrap();

        let profile = normalize_google(user);
        assert_eq!(profile.social_id, "g-123");
        assert_eq!(profile.username.as_deref(), Some("Carol Kim"));
        assert_eq!(profile.nickname.as_deref(), Some("Carol"));
        assert_eq!(profile.gender, Gender::Unspecified);
        assert!(profile.birth_date.is_none());
    }
}

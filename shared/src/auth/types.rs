//! 인증 관련 공통 타입 정의

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OAuth 제공자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Kakao,
    Naver,
}

impl Provider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "google" => Some(Provider::Google),
            "kakao" => Some(Provider::Kakao),
            "naver" => Some(Provider::Naver),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Kakao => "kakao",
            Provider::Naver => "naver",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 성별
///
/// 제공자별 표기를 단일 도메인으로 정규화합니다. 인식할 수 없는 값은
/// 항상 `Unspecified`로 수렴합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unspecified,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unspecified => "unspecified",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Unspecified,
        }
    }
}

/// 정규화된 소셜 프로필
///
/// 제공자별 응답을 공통 형태로 변환한 결과입니다. 로그인 시도마다 새로
/// 생성되며 사용자 조회/생성에만 사용하고 직접 저장하지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialProfile {
    /// 제공자가 발급한 외부 식별자 (제공자 범위 내에서만 유일)
    pub social_id: String,
    pub provider: Provider,
    pub email: Option<String>,
    pub username: Option<String>,
    pub nickname: Option<String>,
    pub full_name: Option<String>,
    pub profile_image: Option<String>,
    pub gender: Gender,
    /// Kakao는 생일(월일)만 내려주므로 올해 연도와 결합한 근사값
    pub birth_date: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub age_range: Option<String>,
    pub locale: Option<String>,
}

impl SocialProfile {
    pub fn new(social_id: impl Into<String>, provider: Provider) -> Self {
        Self {
            social_id: social_id.into(),
            provider,
            email: None,
            username: None,
            nickname: None,
            full_name: None,
            profile_image: None,
            gender: Gender::Unspecified,
            birth_date: None,
            phone_number: None,
            age_range: None,
            locale: None,
        }
    }
}

/// JWT 토큰 쌍
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl TokenPair {
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer".into(),
        }
    }
}

/// OAuth 설정
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub user_info_url: String,
}

/// OAuth 토큰 응답
#[derive(Debug, Deserialize)]
pub struct OAuthTokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

/// 구글 사용자 정보 (oauth2/v2/userinfo)
#[derive(Debug, Deserialize)]
pub struct GoogleUserInfo {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub picture: Option<String>,
    pub locale: Option<String>,
}

/// 카카오 사용자 정보 (v2/user/me)
#[derive(Debug, Deserialize)]
pub struct KakaoUserInfo {
    pub id: i64,
    pub kakao_account: Option<KakaoAccount>,
}

#[derive(Debug, Default, Deserialize)]
pub struct KakaoAccount {
    pub email: Option<String>,
    pub gender: Option<String>,
    pub age_range: Option<String>,
    /// "MMDD" 형식, 연도 없음
    pub birthday: Option<String>,
    pub profile: Option<KakaoProfile>,
}

#[derive(Debug, Default, Deserialize)]
pub struct KakaoProfile {
    pub nickname: Option<String>,
    pub profile_image_url: Option<String>,
}

/// 네이버 사용자 정보 응답 envelope (v1/nid/me)
///
/// resultcode가 "00"이 아니면 실패 응답입니다.
#[derive(Debug, Deserialize)]
pub struct NaverUserInfoResponse {
    pub resultcode: String,
    pub message: Option<String>,
    pub response: Option<NaverUserInfo>,
}

#[derive(Debug, Deserialize)]
pub struct NaverUserInfo {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub profile_image: Option<String>,
    /// "M" 또는 "F"
    pub gender: Option<String>,
    pub age: Option<String>,
    /// "MM-DD" 형식
    pub birthday: Option<String>,
    pub birthyear: Option<String>,
    pub mobile: Option<String>,
}

//! 사용자 모델
//!
//! 외부 사용자 디렉토리가 소유하는 정식 계정 레코드입니다. 이 코어는
//! (provider, social_id) 자연키로 조회/생성만 수행하고 스키마를
//! 소유하지 않습니다.

use crate::auth::types::{Gender, Provider, SocialProfile};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// 대리 키 (UUID 문자열). 토큰 저장소 키 등 내부 참조에 사용.
    pub id: String,
    /// 제공자가 발급한 외부 식별자
    pub social_id: String,
    pub social_provider: Provider,
    pub email: Option<String>,
    pub username: Option<String>,
    pub nickname: Option<String>,
    pub full_name: Option<String>,
    pub profile_image: Option<String>,
    pub gender: Gender,
    pub birth_date: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub age_range: Option<String>,
    pub locale: Option<String>,
    pub is_active: bool,
    pub last_login: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
}

impl User {
    /// 정규화된 프로필로 신규 사용자 레코드를 만듭니다.
    pub fn from_profile(profile: &SocialProfile) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            social_id: profile.social_id.clone(),
            social_provider: profile.provider,
            email: profile.email.clone(),
            username: profile.username.clone(),
            nickname: profile.nickname.clone(),
            full_name: profile.full_name.clone(),
            profile_image: profile.profile_image.clone(),
            gender: profile.gender,
            birth_date: profile.birth_date,
            phone_number: profile.phone_number.clone(),
            age_range: profile.age_range.clone(),
            locale: profile.locale.clone(),
            is_active: true,
            last_login: None,
            created_at: Some(Utc::now().naive_utc()),
        }
    }
}

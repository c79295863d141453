//! MySQL 사용자 디렉토리
//!
//! (provider, social_id) 자연키로 사용자를 조회/생성하고 마지막 로그인
//! 시각을 갱신합니다. 단일 행 단위 연산만 사용합니다.

use crate::auth::types::{Gender, Provider, SocialProfile};
use crate::config::db::DbConnection;
use crate::model::User;
use crate::service::traits::UserDirectory;
use crate::tool::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::mysql::MySqlRow;
use sqlx::Row;
use tracing::info;

const USER_COLUMNS: &str = "id, social_id, social_provider, email, username, nickname, \
     full_name, profile_image, gender, birth_date, phone_number, age_range, locale, \
     is_active, last_login, created_at";

#[derive(Debug, Clone)]
pub struct UserDbService {
    pool: DbConnection,
}

impl UserDbService {
    pub fn new(pool: DbConnection) -> Self {
        Self { pool }
    }

    /// users 테이블이 없으면 생성합니다 (개발/테스트 환경용).
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id VARCHAR(36) NOT NULL PRIMARY KEY,
                social_id VARCHAR(255) NOT NULL,
                social_provider VARCHAR(16) NOT NULL,
                email VARCHAR(255),
                username VARCHAR(255),
                nickname VARCHAR(255),
                full_name VARCHAR(255),
                profile_image VARCHAR(255),
                gender VARCHAR(16) NOT NULL DEFAULT 'unspecified',
                birth_date DATE,
                phone_number VARCHAR(20),
                age_range VARCHAR(10),
                locale VARCHAR(10),
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                last_login DATETIME,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE KEY uq_social_account (social_provider, social_id)
            ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn map_row(row: &MySqlRow) -> Result<User, AppError> {
        let provider_raw: String = row.try_get("social_provider").map_err(AppError::from)?;
        let social_provider = Provider::from_str(&provider_raw).ok_or_else(|| {
            AppError::DatabaseQuery(format!("알 수 없는 provider 값: {provider_raw}"))
        })?;

        let gender_raw: String = row.try_get("gender").map_err(AppError::from)?;

        Ok(User {
            id: row.try_get("id").map_err(AppError::from)?,
            social_id: row.try_get("social_id").map_err(AppError::from)?,
            social_provider,
            email: row.try_get("email").map_err(AppError::from)?,
            username: row.try_get("username").map_err(AppError::from)?,
            nickname: row.try_get("nickname").map_err(AppError::from)?,
            full_name: row.try_get("full_name").map_err(AppError::from)?,
            profile_image: row.try_get("profile_image").map_err(AppError::from)?,
            gender: Gender::from_str(&gender_raw),
            birth_date: row
                .try_get::<Option<NaiveDate>, _>("birth_date")
                .map_err(AppError::from)?,
            phone_number: row.try_get("phone_number").map_err(AppError::from)?,
            age_range: row.try_get("age_range").map_err(AppError::from)?,
            locale: row.try_get("locale").map_err(AppError::from)?,
            is_active: row.try_get("is_active").map_err(AppError::from)?,
            last_login: row
                .try_get::<Option<NaiveDateTime>, _>("last_login")
                .map_err(AppError::from)?,
            created_at: row
                .try_get::<Option<NaiveDateTime>, _>("created_at")
                .map_err(AppError::from)?,
        })
    }
}

#[async_trait]
impl UserDirectory for UserDbService {
    async fn find_by_social_id(
        &self,
        social_id: &str,
        provider: Provider,
    ) -> Result<Option<User>, AppError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE social_id = ? AND social_provider = ?"
        );

        let row = sqlx::query(&sql)
            .bind(social_id)
            .bind(provider.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn create_user(&self, profile: &SocialProfile) -> Result<User, AppError> {
        let user = User::from_profile(profile);

        sqlx::query(
            "INSERT INTO users (id, social_id, social_provider, email, username, nickname, \
             full_name, profile_image, gender, birth_date, phone_number, age_range, locale, \
             is_active, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.social_id)
        .bind(user.social_provider.as_str())
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.nickname)
        .bind(&user.full_name)
        .bind(&user.profile_image)
        .bind(user.gender.as_str())
        .bind(user.birth_date)
        .bind(&user.phone_number)
        .bind(&user.age_range)
        .bind(&user.locale)
        .bind(user.is_active)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        info!("신규 사용자 생성: user_id={}", user.id);
        Ok(user)
    }

    async fn touch_last_login(&self, user_id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

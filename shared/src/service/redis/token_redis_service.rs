//! Redis 토큰 저장소
//!
//! 사용자별 현재 유효한 access/refresh 토큰 쌍을 종류별 독립 TTL로
//! 보관합니다. 같은 사용자에 대한 재저장은 이전 엔트리를 무조건
//! 덮어씁니다 (last-writer-wins). 만료는 저장소 TTL이 단독으로
//! 책임집니다.

use crate::config::redis_config::RedisConfig;
use crate::config::settings::AuthSettings;
use crate::service::redis::token_key::KeyType;
use crate::service::traits::TokenStore;
use crate::tool::error::AppError;
use async_trait::async_trait;
use redis::Value;
use std::time::Duration;

#[derive(Clone)]
pub struct TokenRedisService {
    redis_config: RedisConfig,
    access_ttl_seconds: u64,
    refresh_ttl_seconds: u64,
    /// 저장소 왕복당 타임아웃. 초과 시 호출자가 갱신 생략 여부를 결정.
    op_timeout: Duration,
}

impl TokenRedisService {
    pub fn new(redis_config: RedisConfig, settings: &AuthSettings) -> Self {
        Self {
            redis_config,
            access_ttl_seconds: (settings.access_token_expire_minutes * 60) as u64,
            refresh_ttl_seconds: (settings.refresh_token_expire_days * 24 * 3600) as u64,
            op_timeout: settings.store_timeout,
        }
    }

    async fn with_timeout<T>(
        &self,
        context: &str,
        fut: impl std::future::Future<Output = Result<T, redis::RedisError>>,
    ) -> Result<T, AppError> {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result.map_err(AppError::from),
            Err(_) => Err(AppError::Timeout(format!("토큰 저장소 {context}"))),
        }
    }
}

#[async_trait]
impl TokenStore for TokenRedisService {
    async fn save_token_pair(
        &self,
        user_id: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), AppError> {
        let mut conn = self.redis_config.get_connection();
        let access_key = KeyType::AccessToken.get_key(user_id);
        let refresh_key = KeyType::RefreshToken.get_key(user_id);

        let mut p = redis::pipe();
        p.set_ex(&access_key, access_token, self.access_ttl_seconds);
        p.set_ex(&refresh_key, refresh_token, self.refresh_ttl_seconds);

        let _resp: Vec<Value> = self
            .with_timeout("save", p.query_async(&mut conn))
            .await?;
        Ok(())
    }

    async fn get_token_pair(
        &self,
        user_id: &str,
    ) -> Result<(Option<String>, Option<String>), AppError> {
        let mut conn = self.redis_config.get_connection();
        let access_key = KeyType::AccessToken.get_key(user_id);
        let refresh_key = KeyType::RefreshToken.get_key(user_id);

        let mut p = redis::pipe();
        p.get(&access_key);
        p.get(&refresh_key);

        let (access, refresh): (Option<String>, Option<String>) = self
            .with_timeout("lookup", p.query_async(&mut conn))
            .await?;
        Ok((access, refresh))
    }

    async fn invalidate(&self, user_id: &str) -> Result<(), AppError> {
        let mut conn = self.redis_config.get_connection();
        let access_key = KeyType::AccessToken.get_key(user_id);
        let refresh_key = KeyType::RefreshToken.get_key(user_id);

        let mut p = redis::pipe();
        p.del(&access_key);
        p.del(&refresh_key);

        let _resp: Vec<Value> = self
            .with_timeout("invalidate", p.query_async(&mut conn))
            .await?;
        Ok(())
    }
}

//! JWT 토큰 서비스
//!
//! Access Token과 Refresh Token의 발급 및 검증을 담당합니다.
//! 상태를 갖지 않으며 어떤 스레드에서든 동기화 없이 호출할 수 있습니다.

use super::types::{Provider, TokenPair};
use crate::config::settings::AuthSettings;
use crate::tool::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// 토큰 종류
///
/// 발급 시 클레임에 새겨지며 이후 재해석될 수 없습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// 토큰 검증 실패 원인
///
/// 호출자는 원인별로 분기할 수 있지만, 클라이언트 응답 경계에서는
/// 단일한 인증 실패로 수렴시켜야 합니다.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("토큰이 만료되었습니다")]
    Expired,

    #[error("서명이 유효하지 않습니다")]
    InvalidSignature,

    #[error("토큰 형식이 잘못되었습니다")]
    Malformed,

    #[error("{expected} 토큰이 필요하지만 {actual} 토큰입니다")]
    WrongKind {
        expected: TokenKind,
        actual: TokenKind,
    },
}

/// JWT에 포함될 클레임 구조체
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 제공자가 발급한 외부 식별자 (subject)
    pub sub: String,
    /// 발급 제공자
    pub provider: Provider,
    /// 만료 시간 (Unix timestamp, 초 단위)
    pub exp: i64,
    /// 발급 시간
    pub iat: i64,
    /// 토큰 고유 식별자
    pub jti: String,
    /// 토큰 종류
    #[serde(rename = "type")]
    pub kind: TokenKind,
}

impl TokenClaims {
    /// 만료까지 남은 시간 (초). 이미 만료된 경우 음수.
    pub fn remaining_seconds(&self) -> i64 {
        self.exp - Utc::now().timestamp()
    }
}

/// JWT 토큰 발급 및 검증을 담당하는 서비스
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// 사용할 서명 알고리즘 (예: HS256)
    algorithm: Algorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// 새 TokenService 인스턴스를 생성합니다.
    ///
    /// 서명 키는 시작 시 한 번 로드된 설정에서 가져오며, 이후 변경되지
    /// 않습니다. 알고리즘 파싱 실패 시 `HS256`으로 대체됩니다.
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret_key.as_bytes()),
            algorithm: Algorithm::from_str(&settings.algorithm).unwrap_or(Algorithm::HS256),
            access_ttl: settings.access_ttl(),
            refresh_ttl: settings.refresh_ttl(),
        }
    }

    /// 주어진 TTL로 토큰을 발급합니다.
    ///
    /// 만료 시각은 현재 시각 + `ttl`의 절대 시각으로 새겨집니다.
    pub fn issue(
        &self,
        sub: &str,
        provider: Provider,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: sub.to_string(),
            provider,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            kind,
        };

        debug!(
            target: "security::auth",
            sub = %sub,
            provider = %provider,
            kind = %kind,
            "🔑 JWT 토큰 발급"
        );

        let header = Header::new(self.algorithm);
        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("토큰 발급 실패: {e}")))
    }

    /// 설정된 TTL로 access/refresh 토큰 쌍을 발급합니다.
    pub fn issue_pair(&self, sub: &str, provider: Provider) -> Result<TokenPair, AppError> {
        let access = self.issue(sub, provider, TokenKind::Access, self.access_ttl)?;
        let refresh = self.issue(sub, provider, TokenKind::Refresh, self.refresh_ttl)?;
        Ok(TokenPair::new(access, refresh))
    }

    /// 토큰을 검증하고 클레임을 반환합니다.
    ///
    /// 서명, 만료, 토큰 종류를 모두 확인하며 실패 원인별로 구분된
    /// `TokenError`를 반환합니다. 만료 판정에 유예 시간은 없습니다.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })?;

        let claims = token_data.claims;
        if claims.kind != expected {
            return Err(TokenError::WrongKind {
                expected,
                actual: claims.kind,
            });
        }

        Ok(claims)
    }
}

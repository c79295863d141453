//! 인증 게이트 서비스
//!
//! 요청 인증, 로그인 오케스트레이션, 토큰 갱신, 로그아웃을 담당합니다.
//! 요청 인증 중 access 토큰의 남은 유효 시간이 임계값 미만이면 저장된
//! refresh 토큰을 확인해 선제적으로 새 쌍을 발급합니다. 선제 갱신은
//! best-effort이며 실패해도 요청을 막지 않습니다.
//!
//! 같은 사용자의 동시 요청이 모두 갱신을 시도할 수 있습니다. 마지막
//! save가 이기고 다른 요청의 쌍은 조용히 무효화됩니다 (수용된 경합).

use super::social_auth::SocialAuthService;
use super::token::{TokenClaims, TokenError, TokenKind, TokenService};
use super::types::{Provider, SocialProfile, TokenPair};
use crate::model::User;
use crate::service::traits::{TokenStore, UserDirectory};
use crate::tool::error::AppError;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 요청 인증 결과
///
/// 선제 갱신이 일어난 경우 `rotated`에 새 토큰 쌍이 담기며, 응답
/// 계층은 이를 클라이언트에 전달해야 합니다.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: User,
    pub claims: TokenClaims,
    pub rotated: Option<TokenPair>,
}

/// 인증 게이트 서비스
#[derive(Clone)]
pub struct AuthService {
    social: Arc<SocialAuthService>,
    tokens: TokenService,
    store: Arc<dyn TokenStore>,
    directory: Arc<dyn UserDirectory>,
    preemptive_threshold_seconds: i64,
}

impl AuthService {
    pub fn new(
        social: Arc<SocialAuthService>,
        tokens: TokenService,
        store: Arc<dyn TokenStore>,
        directory: Arc<dyn UserDirectory>,
        preemptive_threshold: chrono::Duration,
    ) -> Self {
        Self {
            social,
            tokens,
            store,
            directory,
            preemptive_threshold_seconds: preemptive_threshold.num_seconds(),
        }
    }

    pub fn social(&self) -> &SocialAuthService {
        &self.social
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// 소셜 로그인 전체 플로우
    ///
    /// code 교환 → 사용자 조회/생성 → 토큰 쌍 발급 → 저장소 기록.
    /// Naver는 `state`를 함께 전달해야 합니다.
    pub async fn login(
        &self,
        provider: Provider,
        code: &str,
        state: Option<&str>,
    ) -> Result<(User, TokenPair), AppError> {
        let profile = self.social.exchange(provider, code, state).await?;
        self.complete_login(&profile).await
    }

    /// 교환 완료 이후의 로그인 처리
    ///
    /// (provider, social_id)로 사용자를 조회해 있으면 last_login을
    /// 갱신하고 없으면 생성합니다. 저장소 기록 실패는 로그인 실패로
    /// 처리합니다 (영속화 없이 토큰을 내보낼 수 없음).
    pub async fn complete_login(
        &self,
        profile: &SocialProfile,
    ) -> Result<(User, TokenPair), AppError> {
        let user = match self
            .directory
            .find_by_social_id(&profile.social_id, profile.provider)
            .await?
        {
            Some(user) => {
                self.directory.touch_last_login(&user.id).await?;
                user
            }
            None => self.directory.create_user(profile).await?,
        };

        let pair = self
            .tokens
            .issue_pair(&user.social_id, user.social_provider)?;
        self.store
            .save_token_pair(&user.id, &pair.access_token, &pair.refresh_token)
            .await?;

        info!(
            target: "security::auth",
            user_id = %user.id,
            provider = %user.social_provider,
            "✅ 소셜 로그인 성공"
        );

        Ok((user, pair))
    }

    /// 요청 인증
    ///
    /// 제시된 access 토큰을 검증하고 사용자를 해석합니다. 남은 유효
    /// 시간이 임계값 미만이면 저장된 refresh 토큰 존재 시 새 쌍으로
    /// 교체합니다. 어떤 하위 검증이 실패했는지는 호출자에게 구분해
    /// 노출하지 않아야 합니다 (응답 계층에서 단일 메시지로 수렴).
    pub async fn authenticate(&self, token: &str) -> Result<AuthOutcome, AppError> {
        // Step 1: 서명/만료/종류 검증
        let mut claims = self.tokens.verify(token, TokenKind::Access)?;

        // Step 2: (subject, provider)로 사용자 해석.
        // 토큰이 유효한데 사용자가 없으면 정합성 결함으로 취급.
        let user = self
            .directory
            .find_by_social_id(&claims.sub, claims.provider)
            .await?
            .ok_or_else(|| AppError::UnknownSubject(claims.sub.clone()))?;

        // Step 3: 임계값 미만이면 선제 갱신 시도
        let mut rotated = None;
        if claims.remaining_seconds() < self.preemptive_threshold_seconds {
            match self.try_rotate(&user).await {
                Ok(Some(pair)) => match self.tokens.verify(&pair.access_token, TokenKind::Access) {
                    Ok(new_claims) => {
                        info!(
                            target: "security::auth",
                            user_id = %user.id,
                            "🔄 access 토큰 선제 갱신 완료"
                        );
                        claims = new_claims;
                        rotated = Some(pair);
                    }
                    Err(e) => {
                        warn!(
                            target: "security::auth",
                            user_id = %user.id,
                            error = %e,
                            "선제 갱신 토큰 검증 실패 - 기존 토큰으로 계속"
                        );
                    }
                },
                Ok(None) => {
                    debug!(
                        target: "security::auth",
                        user_id = %user.id,
                        "갱신 생략 - 저장된 refresh 토큰 없음"
                    );
                }
                // 저장소 장애/타임아웃은 갱신 생략으로 강등, 요청은 계속
                Err(e) => {
                    warn!(
                        target: "security::auth",
                        user_id = %user.id,
                        error = %e,
                        "갱신 생략 - 토큰 저장소 접근 실패"
                    );
                }
            }
        }

        // Step 4: 교체 여부와 무관하게 만료/종류 최종 재검증
        if claims.remaining_seconds() <= 0 {
            return Err(TokenError::Expired.into());
        }
        if claims.kind != TokenKind::Access {
            return Err(TokenError::WrongKind {
                expected: TokenKind::Access,
                actual: claims.kind,
            }
            .into());
        }

        Ok(AuthOutcome {
            user,
            claims,
            rotated,
        })
    }

    /// 저장된 refresh 토큰이 있으면 새 쌍을 발급하고 기록합니다.
    async fn try_rotate(&self, user: &User) -> Result<Option<TokenPair>, AppError> {
        let (_, stored_refresh) = self.store.get_token_pair(&user.id).await?;
        if stored_refresh.is_none() {
            return Ok(None);
        }

        let pair = self
            .tokens
            .issue_pair(&user.social_id, user.social_provider)?;
        self.store
            .save_token_pair(&user.id, &pair.access_token, &pair.refresh_token)
            .await?;
        Ok(Some(pair))
    }

    /// refresh 토큰으로 새 쌍을 발급합니다.
    ///
    /// 제시된 토큰이 저장된 refresh 토큰과 정확히 일치해야 합니다.
    /// 저장 엔트리 부재(만료 포함)와 불일치는 동일한 실패입니다.
    pub async fn refresh(&self, refresh_token: &str) -> Result<(User, TokenPair), AppError> {
        let claims = self.tokens.verify(refresh_token, TokenKind::Refresh)?;

        let user = self
            .directory
            .find_by_social_id(&claims.sub, claims.provider)
            .await?
            .ok_or_else(|| AppError::UserNotFound(claims.sub.clone()))?;

        let (_, stored_refresh) = self.store.get_token_pair(&user.id).await?;
        match stored_refresh {
            Some(stored) if stored == refresh_token => {}
            _ => {
                warn!(
                    target: "security::auth_failure",
                    user_id = %user.id,
                    "❌ refresh 토큰 불일치 또는 부재"
                );
                return Err(AppError::RefreshTokenMismatch);
            }
        }

        let pair = self
            .tokens
            .issue_pair(&user.social_id, user.social_provider)?;
        self.store
            .save_token_pair(&user.id, &pair.access_token, &pair.refresh_token)
            .await?;

        info!(
            target: "security::auth",
            user_id = %user.id,
            "🔄 refresh 토큰으로 쌍 재발급"
        );

        Ok((user, pair))
    }

    /// 로그아웃: 저장된 쌍을 즉시 제거합니다. 엔트리 부재는 에러가
    /// 아니며 반복 호출해도 안전합니다.
    pub async fn logout(&self, user_id: &str) -> Result<(), AppError> {
        self.store.invalidate(user_id).await?;
        info!(target: "security::auth", user_id = %user_id, "로그아웃 처리 완료");
        Ok(())
    }
}

//! 로깅 시스템 초기화
//!
//! tracing 기반 구조화 로깅을 설정합니다. 레벨은 RUST_LOG 환경변수로
//! 제어하며 기본값은 info입니다. 인증 이벤트는 `security::auth` /
//! `security::auth_failure` 타깃으로 남습니다.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// 로깅 시스템을 초기화합니다.
///
/// 이미 초기화된 경우(테스트 등) 조용히 무시합니다.
pub fn init(service_name: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt().with_env_filter(filter).try_init();

    info!("📝 로깅 초기화 완료: {}", service_name);
    Ok(())
}

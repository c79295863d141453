//! 소셜 인증 공통 라이브러리
//!
//! Google, Kakao, Naver OAuth 로그인과 JWT 토큰 수명주기를 담당하는
//! 핵심 크레이트입니다. HTTP 서버 크레이트에서 공유합니다.
//!
//! # 구성
//! - `auth`: 소셜 로그인, 토큰 발급/검증, 요청 인증 게이트
//! - `service`: Redis 토큰 저장소, MySQL 사용자 디렉토리
//! - `config`: 환경변수 기반 설정 및 연결 풀
//! - `model`: 사용자 모델
//! - `tool`: 공통 에러 타입
//! - `logging`: tracing 기반 로깅 초기화

pub mod auth;
pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod tool;

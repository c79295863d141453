//! MariaDB Database Configuration
//!
//! 사용자 디렉토리를 위한 MariaDB 연결 설정입니다. .env 파일에서
//! 연결 정보를 읽어와 연결 풀을 관리합니다.

use dotenv::dotenv;
use sqlx::{Error as SqlxError, MySql, MySqlPool, Pool};
use std::env;
use tracing::{error, info, warn};

/// MariaDB 연결 풀 타입 별칭
pub type DbConnection = Pool<MySql>;

/// MariaDB 데이터베이스 설정 구조체
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub pool: DbConnection,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub database: String,
}

impl DbConfig {
    /// 새로운 데이터베이스 연결 풀을 생성합니다.
    ///
    /// .env 파일에서 연결 정보를 읽어오며 환경 변수가 없으면 기본값을
    /// 사용합니다.
    pub async fn new() -> Result<Self, SqlxError> {
        // .env 파일 로드 - workspace root에서 찾기
        let current_dir = std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
        let workspace_env = current_dir.join(".env");
        let parent_env = current_dir.parent().map(|p| p.join(".env"));

        let mut env_loaded = false;

        if workspace_env.exists() {
            dotenv::from_path(&workspace_env).ok();
            env_loaded = true;
            info!("환경 파일 로드: {:?}", workspace_env);
        } else if let Some(parent_env) = parent_env {
            if parent_env.exists() {
                dotenv::from_path(&parent_env).ok();
                env_loaded = true;
                info!("환경 파일 로드: {:?}", parent_env);
            }
        }

        if !env_loaded {
            dotenv().ok(); // 기본 .env 파일 시도
            warn!(".env 파일을 찾을 수 없어서 환경 변수를 직접 사용합니다.");
        }

        let host = env::var("db_host").unwrap_or_else(|_| {
            warn!("db_host 환경변수가 없어서 localhost를 사용합니다.");
            "localhost".to_string()
        });

        let port = env::var("db_port")
            .unwrap_or_else(|_| {
                warn!("db_port 환경변수가 없어서 3306을 사용합니다.");
                "3306".to_string()
            })
            .parse::<u16>()
            .map_err(|e| SqlxError::Configuration(format!("db_port 파싱 실패: {e}").into()))?;

        let user = env::var("db_id").unwrap_or_else(|_| {
            warn!("db_id 환경변수가 없어서 root를 사용합니다.");
            "root".to_string()
        });

        let password = env::var("db_password").unwrap_or_else(|_| {
            error!("db_password 환경변수가 필요합니다.");
            "".to_string()
        });

        let database = env::var("db_name").unwrap_or_else(|_| {
            warn!("db_name 환경변수가 없어서 auth를 사용합니다.");
            "auth".to_string()
        });

        // MariaDB 연결 URL 생성
        let database_url = format!(
            "mysql://{}:{}@{}:{}/{}",
            user, password, host, port, database
        );

        info!("데이터베이스 연결 시도: {}:{}@{}/{}", user, "***", host, database);

        let pool = MySqlPool::connect(&database_url).await?;

        info!("MariaDB 연결 풀 생성 완료: {}:{}", host, port);

        Ok(Self {
            pool,
            host,
            port,
            user,
            database,
        })
    }

    /// 연결 풀에서 연결을 가져옵니다.
    pub fn get_pool(&self) -> &DbConnection {
        &self.pool
    }

    /// 데이터베이스 연결 상태를 확인합니다.
    pub async fn health_check(&self) -> Result<bool, SqlxError> {
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => {
                info!("데이터베이스 연결 상태 양호");
                Ok(true)
            }
            Err(e) => {
                error!("데이터베이스 연결 실패: {}", e);
                Err(e)
            }
        }
    }
}

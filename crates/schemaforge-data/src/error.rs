//! 데이터 계층 에러 타입.

use schemaforge_core::MigrationError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DataError>;

/// 데이터 계층 에러
#[derive(Debug, Error)]
pub enum DataError {
    /// 필수 입력이 비어 있음
    #[error("{0} is required")]
    InvalidArgument(&'static str),

    /// 필수 설정(환경 변수) 누락
    #[error("Missing required env var: {0}")]
    MissingSetting(&'static str),

    /// 설정 해석 실패
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// 연결 문자열 생성 실패
    #[error("Invalid connection settings: {0}")]
    InvalidSettings(String),

    /// 생성하려는 데이터베이스가 이미 존재
    #[error("Database already exists: {0}. Drop it or choose another name.")]
    DatabaseExists(String),

    /// 데이터베이스 에러
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 스크립트 적용 실패
    #[error(transparent)]
    Migration(#[from] MigrationError),

    /// 메타데이터 파일 쓰기 실패
    #[error("Failed to write schema: {0}")]
    Export(#[from] std::io::Error),
}

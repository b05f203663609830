//! 스크립트 적용 에러 타입.

use std::path::PathBuf;

use thiserror::Error;

/// 스크립트 적용 결과 타입.
pub type Result<T> = std::result::Result<T, MigrationError>;

/// 스크립트 적용 에러.
///
/// 모든 에러는 실행을 중단시킵니다. 재시도나 건너뛰기는 없습니다.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// 필수 입력(디렉토리 경로, 연결 문자열 등)이 비어 있음
    #[error("{0} is required")]
    InvalidArgument(&'static str),

    /// 스크립트 디렉토리 없음
    #[error("Scripts directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// 디렉토리에 `*.sql` 파일이 하나도 없음
    #[error("No .sql files found in: {}", .0.display())]
    NoScriptsFound(PathBuf),

    /// 파일 읽기 실패
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 열려 있지 않은 연결에서 실행 시도
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    /// 데이터베이스 연결 실패
    #[error("Failed to open connection: {0}")]
    ConnectionFailed(String),

    /// 데이터베이스가 문장 또는 블록을 거부함
    #[error("Failed to execute script: {script}\n{message}")]
    ExecutionFailed {
        /// 실패한 스크립트 파일명
        script: String,
        /// 배치 내 실패한 문장 번호 (1-based, 단일 명령 실행이면 None)
        statement: Option<usize>,
        /// 드라이버 에러 메시지
        message: String,
    },
}

impl MigrationError {
    /// I/O 에러에 파일 경로를 붙여 변환.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// 연결 구현체가 돌려주는 드라이버 에러.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct DriverError {
    pub message: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

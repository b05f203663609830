//! 스크립트 실행기.
//!
//! 익명 실행 블록(`EXECUTE BLOCK`, `DO $$`)은 본문에 종결자를 포함하므로 배치 분리기가
//! 블록을 잘라 망가뜨립니다. 블록이 있는 스크립트는 전체를 하나의 명령으로 보내고,
//! 나머지는 문장 단위 배치로 순서대로 실행합니다.

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::error::{DriverError, MigrationError, Result};
use super::models::ExecutionUnit;
use super::splitter::split_statements;

/// 스크립트를 실행할 데이터베이스 연결.
///
/// 데이터베이스별로 이 trait를 구현합니다. 연결은 오케스트레이터가 단독으로 소유합니다.
#[async_trait]
pub trait ScriptConnection: Send {
    /// 연결이 열려 있는지 확인
    fn is_open(&self) -> bool;

    /// 텍스트 전체를 분리하지 않고 하나의 명령으로 실행
    async fn execute_command(&mut self, sql: &str) -> std::result::Result<(), DriverError>;

    /// 분리된 단일 문장 실행
    async fn execute_statement(&mut self, sql: &str) -> std::result::Result<(), DriverError>;

    /// 연결 종료. 종료 후 `is_open()`은 `false`.
    async fn close(&mut self) -> std::result::Result<(), DriverError>;
}

/// 익명 실행 블록 감지기 (대소문자 무시 부분 문자열 검색).
#[derive(Debug, Clone)]
pub struct BlockDetector {
    markers: Vec<String>,
}

impl Default for BlockDetector {
    fn default() -> Self {
        Self::with_markers(&["EXECUTE BLOCK", "DO $$"])
    }
}

impl BlockDetector {
    pub fn with_markers(markers: &[&str]) -> Self {
        Self {
            markers: markers.iter().map(|m| m.to_uppercase()).collect(),
        }
    }

    /// 블록 표지가 있는지 확인
    pub fn contains_block(&self, sql: &str) -> bool {
        let upper = sql.to_uppercase();
        self.markers.iter().any(|m| upper.contains(m.as_str()))
    }
}

/// 단일 스크립트 실행기
#[derive(Debug, Clone, Default)]
pub struct ScriptExecutor {
    detector: BlockDetector,
}

impl ScriptExecutor {
    pub fn new(detector: BlockDetector) -> Self {
        Self { detector }
    }

    /// 실행 방식 결정
    pub fn plan(&self, normalized: &str) -> ExecutionUnit {
        if self.detector.contains_block(normalized) {
            ExecutionUnit::SingleCommand
        } else {
            ExecutionUnit::Batch(split_statements(normalized))
        }
    }

    /// 전처리된 스크립트 실행.
    ///
    /// 배치는 첫 번째 실패한 문장에서 멈춥니다. 이미 실행된 문장은 되돌리지 않습니다.
    ///
    /// # Errors
    ///
    /// - `MigrationError::InvalidState`: 연결이 열려 있지 않음
    /// - `MigrationError::ExecutionFailed`: 데이터베이스가 문장 또는 블록을 거부함
    #[instrument(skip(self, connection, normalized), fields(script = %label))]
    pub async fn execute<C>(&self, connection: &mut C, normalized: &str, label: &str) -> Result<()>
    where
        C: ScriptConnection + ?Sized,
    {
        if !connection.is_open() {
            return Err(MigrationError::InvalidState(
                "connection must be open before executing scripts",
            ));
        }

        match self.plan(normalized) {
            ExecutionUnit::SingleCommand => {
                debug!("executing as a single command");
                connection
                    .execute_command(normalized)
                    .await
                    .map_err(|e| failed(label, None, e))
            }
            ExecutionUnit::Batch(statements) => {
                debug!(statements = statements.len(), "executing as a batch");
                for (idx, stmt) in statements.iter().enumerate() {
                    connection.execute_statement(&stmt.sql).await.map_err(|e| {
                        debug!(line = stmt.line_number, "statement failed");
                        failed(label, Some(idx + 1), e)
                    })?;
                }
                Ok(())
            }
        }
    }
}

fn failed(label: &str, statement: Option<usize>, error: DriverError) -> MigrationError {
    MigrationError::ExecutionFailed {
        script: label.to_string(),
        statement,
        message: error.message,
    }
}

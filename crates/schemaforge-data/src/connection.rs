//! PostgreSQL 스크립트 연결.
//!
//! 스크립트 본문은 준비된 문장이 아닌 단순 질의 프로토콜(`sqlx::raw_sql`)로 전송합니다.
//! `DO $$ ... $$` 블록과 여러 문장이 담긴 명령을 그대로 보낼 수 있습니다.

use async_trait::async_trait;
use schemaforge_core::migration::{DriverError, ScriptConnection, ScriptConnector};
use sqlx::postgres::PgConnection;
use sqlx::{Connection, Executor};
use tracing::{debug, instrument};

/// 드라이버 에러를 메시지로 변환. 서버 에러는 서버가 보낸 메시지를 그대로 사용.
pub(crate) fn driver_error(err: sqlx::Error) -> DriverError {
    match err.as_database_error() {
        Some(db) => match db.code() {
            Some(code) => DriverError::new(format!("{} (SQLSTATE {})", db.message(), code)),
            None => DriverError::new(db.message()),
        },
        None => DriverError::new(err.to_string()),
    }
}

/// 단일 PostgreSQL 연결
pub struct PgScriptConnection {
    conn: Option<PgConnection>,
}

impl PgScriptConnection {
    pub fn new(conn: PgConnection) -> Self {
        Self { conn: Some(conn) }
    }

    fn open_mut(&mut self) -> Result<&mut PgConnection, DriverError> {
        self.conn
            .as_mut()
            .ok_or_else(|| DriverError::new("connection is closed"))
    }
}

#[async_trait]
impl ScriptConnection for PgScriptConnection {
    fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    async fn execute_command(&mut self, sql: &str) -> Result<(), DriverError> {
        let conn = self.open_mut()?;
        let result = Executor::execute(conn, sqlx::raw_sql(sql))
            .await
            .map_err(driver_error)?;
        debug!(rows = result.rows_affected(), "command executed");
        Ok(())
    }

    async fn execute_statement(&mut self, sql: &str) -> Result<(), DriverError> {
        let conn = self.open_mut()?;
        let result = Executor::execute(conn, sqlx::raw_sql(sql))
            .await
            .map_err(driver_error)?;
        debug!(rows = result.rows_affected(), "statement executed");
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        match self.conn.take() {
            Some(conn) => conn.close().await.map_err(driver_error),
            None => Ok(()),
        }
    }
}

/// 연결 URL로 [`PgScriptConnection`]을 엽니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgScriptConnector;

#[async_trait]
impl ScriptConnector for PgScriptConnector {
    type Connection = PgScriptConnection;

    #[instrument(skip_all)]
    async fn connect(&self, connection_string: &str) -> Result<PgScriptConnection, DriverError> {
        let conn = PgConnection::connect(connection_string)
            .await
            .map_err(driver_error)?;
        debug!("connected");
        Ok(PgScriptConnection::new(conn))
    }
}

//! 새 데이터베이스 생성 후 스크립트 디렉토리 적용.
//!
//! 생성 이후 단계에서 실패하면 만든 데이터베이스를 삭제하고 원래 에러를 돌려줍니다.

use std::path::Path;

use schemaforge_core::migration::{MigrationError, ProgressSink, ScriptOrchestrator};
use sqlx::migrate::MigrateDatabase;
use sqlx::Postgres;
use tracing::{error, info, instrument, warn};

use crate::connection::PgScriptConnector;
use crate::error::{DataError, Result};
use crate::settings::ConnectionSettings;

/// 데이터베이스 빌더
#[derive(Debug, Clone)]
pub struct DatabaseBuilder {
    settings: ConnectionSettings,
}

impl DatabaseBuilder {
    pub fn new(settings: ConnectionSettings) -> Self {
        Self { settings }
    }

    /// 입력 검증 후 대상 데이터베이스의 연결 URL 반환
    fn prepare(&self, database_name: &str, scripts_dir: &Path) -> Result<String> {
        if database_name.trim().is_empty() {
            return Err(MigrationError::InvalidArgument("database name").into());
        }
        if scripts_dir.as_os_str().is_empty() {
            return Err(MigrationError::InvalidArgument("scripts directory").into());
        }
        if !scripts_dir.is_dir() {
            return Err(MigrationError::DirectoryNotFound(scripts_dir.to_path_buf()).into());
        }
        self.settings.connection_url(database_name)
    }

    /// 데이터베이스를 만들고 스크립트를 적용. 성공 시 새 데이터베이스의 연결 URL 반환.
    #[instrument(skip(self, scripts_dir, progress))]
    pub async fn build<P>(&self, database_name: &str, scripts_dir: &Path, progress: P) -> Result<String>
    where
        P: ProgressSink,
    {
        let url = self.prepare(database_name, scripts_dir)?;

        if Postgres::database_exists(&url).await? {
            return Err(DataError::DatabaseExists(database_name.trim().to_string()));
        }

        Postgres::create_database(&url).await?;
        info!(database = database_name, "database created");

        let mut orchestrator = ScriptOrchestrator::new(PgScriptConnector, progress);
        match orchestrator.run(&url, scripts_dir).await {
            Ok(()) => {
                info!(database = database_name, "database built");
                Ok(url)
            }
            Err(e) => {
                error!(database = database_name, error = %e, "build failed, dropping database");
                if let Err(drop_err) = Postgres::drop_database(&url).await {
                    warn!(database = database_name, error = %drop_err, "failed to drop database");
                }
                Err(e.into())
            }
        }
    }
}

//! 새 데이터베이스 생성 명령어.
//!
//! ```bash
//! DB_PASSWORD=secret schemaforge build --database shop --dir scripts
//! ```

use std::path::PathBuf;

use schemaforge_core::migration::ConsoleProgress;
use schemaforge_data::{ConnectionSettings, DataError, DatabaseBuilder};
use tracing::info;

use super::mask_url;

/// build 설정
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// 생성할 데이터베이스 이름
    pub database: String,
    /// 스크립트 디렉토리
    pub scripts_dir: PathBuf,
}

/// 데이터베이스 생성 후 스크립트 적용
pub async fn run_build(config: &BuildConfig) -> Result<(), DataError> {
    let settings = ConnectionSettings::from_env()?;
    let builder = DatabaseBuilder::new(settings);

    let url = builder
        .build(&config.database, &config.scripts_dir, ConsoleProgress::default())
        .await?;

    info!(url = %mask_url(&url), "build complete");
    println!("Database created: {}", config.database);
    Ok(())
}

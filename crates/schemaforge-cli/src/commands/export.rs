//! 카탈로그 메타데이터 내보내기 명령어.
//!
//! ```bash
//! schemaforge export --database shop --output export
//! ```

use std::path::PathBuf;

use schemaforge_core::schema::JsonSchemaWriter;
use schemaforge_data::{CatalogReader, DataError};
use tracing::info;

use super::{mask_url, ConnectionTarget};

/// export 설정
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// 출력 디렉토리
    pub output_dir: PathBuf,
    /// 연결 대상
    pub target: ConnectionTarget,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("export"),
            target: ConnectionTarget::default(),
        }
    }
}

/// 메타데이터를 읽어 `schema.json`으로 저장
pub async fn run_export(config: &ExportConfig) -> Result<(), DataError> {
    let url = config.target.resolve()?;
    info!(url = %mask_url(&url), "reading catalog");

    let schema = CatalogReader::new().read(&url).await?;
    let path = JsonSchemaWriter::new().write(&schema, &config.output_dir)?;

    println!("Schema exported: {}", path.display());
    println!("{}", schema.stats());
    Ok(())
}

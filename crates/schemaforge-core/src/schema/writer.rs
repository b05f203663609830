//! 메타데이터 문서 JSON 출력.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::DatabaseSchema;

/// 출력 파일명
pub const SCHEMA_FILE_NAME: &str = "schema.json";

/// 들여쓰기된 JSON으로 `schema.json`을 씁니다.
#[derive(Debug, Clone, Default)]
pub struct JsonSchemaWriter;

impl JsonSchemaWriter {
    pub fn new() -> Self {
        Self
    }

    /// 출력 디렉토리를 만들고 문서를 저장. 저장된 파일 경로 반환.
    pub fn write(&self, schema: &DatabaseSchema, output_dir: &Path) -> std::io::Result<PathBuf> {
        fs::create_dir_all(output_dir)?;

        let path = output_dir.join(SCHEMA_FILE_NAME);
        let json = serde_json::to_string_pretty(schema)?;
        fs::write(&path, json)?;

        info!(path = %path.display(), tables = schema.tables.len(), "schema written");
        Ok(path)
    }
}

//! SQL 스크립트 디렉토리 적용 및 카탈로그 메타데이터 모델.
//!
//! - [`migration`]: 스크립트 탐색, 카테고리 분류, 전처리, 실행, 오케스트레이션
//! - [`schema`]: 카탈로그에서 추출한 메타데이터 문서와 JSON 출력
//!
//! 데이터베이스 드라이버에는 의존하지 않습니다. 실제 연결은
//! [`migration::ScriptConnector`] / [`migration::ScriptConnection`] 구현체가 제공합니다.

pub mod migration;
pub mod schema;

pub use migration::{
    MigrationError, ProgressEvent, ProgressSink, ScriptCategory, ScriptConnection,
    ScriptConnector, ScriptFile, ScriptOrchestrator,
};
pub use schema::{DatabaseSchema, JsonSchemaWriter, MetadataStats};

//! SQL 스크립트 디렉토리 적용 도구.
//!
//! 디렉토리의 `*.sql` 파일을 찾아 내용 기반 카테고리(도메인 → 테이블 → 프로시저 → 기타)로
//! 정렬하고, 스키마 설계 도구가 내보낸 지시문을 제거한 뒤 하나의 연결에서 순차 실행합니다.
//!
//! # 사용 예시
//!
//! ```ignore
//! use schemaforge_core::migration::{ConsoleProgress, ScriptOrchestrator};
//!
//! let mut orchestrator = ScriptOrchestrator::new(connector, ConsoleProgress::default());
//! orchestrator.run("postgres://...", "scripts".as_ref()).await?;
//! ```

pub mod categorizer;
pub mod error;
pub mod executor;
pub mod locator;
pub mod models;
pub mod orchestrator;
pub mod preprocessor;
pub mod progress;
pub mod splitter;

pub use categorizer::{KeywordClassifier, ScriptClassifier};
pub use error::{DriverError, MigrationError, Result};
pub use executor::{BlockDetector, ScriptConnection, ScriptExecutor};
pub use locator::ScriptLocator;
pub use models::*;
pub use orchestrator::{read_script, ScriptConnector, ScriptOrchestrator};
pub use preprocessor::{LineFilter, PrefixRule, Preprocessor};
pub use progress::{ConsoleProgress, ProgressEvent, ProgressSink, TOOL_TAG};
pub use splitter::split_statements;

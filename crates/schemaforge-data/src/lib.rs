//! PostgreSQL 어댑터.
//!
//! - [`connection`]: `sqlx` 기반 [`ScriptConnection`](schemaforge_core::ScriptConnection) 구현
//! - [`settings`]: 환경 변수에서 접속 정보 해석
//! - [`catalog`]: 시스템 카탈로그에서 메타데이터 문서/개수 조회
//! - [`builder`]: 새 데이터베이스 생성 후 스크립트 적용

pub mod builder;
pub mod catalog;
pub mod connection;
pub mod error;
pub mod settings;

pub use builder::DatabaseBuilder;
pub use catalog::CatalogReader;
pub use connection::{PgScriptConnection, PgScriptConnector};
pub use error::{DataError, Result};
pub use settings::ConnectionSettings;

//! 카탈로그 메타데이터 문서.
//!
//! 도메인, 테이블(컬럼 포함), 프로시저 이름을 하나의 문서로 묶어 JSON으로 내보냅니다.
//! 카탈로그 조회 자체는 데이터베이스별 구현(`schemaforge-data`)이 담당합니다.

pub mod types;
pub mod writer;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use types::map_type;
pub use writer::{JsonSchemaWriter, SCHEMA_FILE_NAME};

/// 데이터베이스 메타데이터 문서
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSchema {
    /// 데이터베이스 이름
    pub database: String,
    /// 사용자 정의 도메인
    pub domains: Vec<DomainDef>,
    /// 기본 테이블 (뷰 제외)
    pub tables: Vec<TableDef>,
    /// 프로시저
    pub procedures: Vec<ProcedureDef>,
}

/// 도메인 정의
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainDef {
    pub name: String,
    /// 정규화된 타입 이름 (예: VARCHAR, DECIMAL)
    pub field_type: String,
    pub length: Option<i32>,
    pub precision: Option<i32>,
    /// 항상 0 이상
    pub scale: Option<i32>,
}

/// 테이블 정의
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDef {
    pub name: String,
    /// 컬럼 (정의 순서)
    pub columns: Vec<ColumnDef>,
}

/// 컬럼 정의.
///
/// 도메인을 쓰는 컬럼은 `domain`, 그렇지 않으면 `field_type`이 채워집니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub name: String,
    pub domain: Option<String>,
    pub field_type: Option<String>,
    pub not_null: bool,
}

impl ColumnDef {
    /// 도메인 이름이 있으면 도메인 컬럼, 없으면 타입 이름을 정규화해서 사용
    pub fn new(name: impl Into<String>, domain: Option<String>, raw_type: &str, not_null: bool) -> Self {
        let domain = domain.filter(|d| !d.trim().is_empty());
        let field_type = match domain {
            Some(_) => None,
            None => Some(map_type(raw_type)),
        };

        Self {
            name: name.into(),
            domain,
            field_type,
            not_null,
        }
    }
}

/// 프로시저 정의
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureDef {
    pub name: String,
}

/// 사용자 객체 개수 요약
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataStats {
    pub domains: i64,
    pub tables: i64,
    pub procedures: i64,
}

impl fmt::Display for MetadataStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "domains: {}, tables: {}, procedures: {}",
            self.domains, self.tables, self.procedures
        )
    }
}

impl DatabaseSchema {
    /// 문서에서 직접 계산한 개수 요약
    pub fn stats(&self) -> MetadataStats {
        MetadataStats {
            domains: self.domains.len() as i64,
            tables: self.tables.len() as i64,
            procedures: self.procedures.len() as i64,
        }
    }

    /// 이름으로 테이블 조회 (대소문자 무시)
    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_prefers_domain() {
        let col = ColumnDef::new("email", Some("dm_email".to_string()), "character varying", true);
        assert_eq!(col.domain.as_deref(), Some("dm_email"));
        assert_eq!(col.field_type, None);

        let col = ColumnDef::new("id", None, "integer", true);
        assert_eq!(col.domain, None);
        assert_eq!(col.field_type.as_deref(), Some("INTEGER"));
    }

    #[test]
    fn test_blank_domain_is_ignored() {
        let col = ColumnDef::new("id", Some("  ".to_string()), "bigint", false);
        assert_eq!(col.domain, None);
        assert_eq!(col.field_type.as_deref(), Some("BIGINT"));
    }

    #[test]
    fn test_serialized_sections() {
        let schema = DatabaseSchema {
            database: "shop".to_string(),
            domains: vec![DomainDef {
                name: "dm_amount".to_string(),
                field_type: "NUMERIC".to_string(),
                length: None,
                precision: Some(18),
                scale: Some(2),
            }],
            tables: vec![TableDef {
                name: "orders".to_string(),
                columns: vec![ColumnDef::new("amount", Some("dm_amount".to_string()), "", true)],
            }],
            procedures: vec![ProcedureDef {
                name: "close_day".to_string(),
            }],
        };

        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["database"], "shop");
        assert_eq!(json["domains"][0]["fieldType"], "NUMERIC");
        assert_eq!(json["domains"][0]["length"], serde_json::Value::Null);
        assert_eq!(json["tables"][0]["columns"][0]["notNull"], true);
        assert_eq!(json["procedures"][0]["name"], "close_day");
        assert_eq!(schema.stats(), MetadataStats { domains: 1, tables: 1, procedures: 1 });
        assert!(schema.table("ORDERS").is_some());
    }
}

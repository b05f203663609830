//! 시스템 카탈로그 조회.
//!
//! `information_schema`에서 사용자 객체(시스템 스키마 제외)만 읽어
//! [`DatabaseSchema`] 문서와 [`MetadataStats`] 개수 요약을 만듭니다.

use schemaforge_core::schema::{
    map_type, ColumnDef, DatabaseSchema, DomainDef, MetadataStats, ProcedureDef, TableDef,
};
use sqlx::postgres::PgConnection;
use sqlx::{Connection, FromRow};
use tracing::{debug, info, instrument, warn};

use crate::error::Result;

/// 사용자 스키마 조건 (시스템/TOAST 스키마 제외)
fn user_schema(col: &str) -> String {
    format!("{col} NOT IN ('pg_catalog', 'information_schema') AND {col} NOT LIKE 'pg_toast%'")
}

/// 도메인 레코드
#[derive(Debug, Clone, FromRow)]
pub struct DomainRecord {
    pub name: String,
    pub data_type: String,
    pub length: Option<i32>,
    pub precision: Option<i32>,
    pub scale: Option<i32>,
}

impl DomainRecord {
    pub fn into_def(self) -> DomainDef {
        DomainDef {
            name: self.name,
            field_type: map_type(&self.data_type),
            length: self.length,
            precision: self.precision,
            scale: self.scale.map(i32::abs),
        }
    }
}

/// 테이블 레코드
#[derive(Debug, Clone, FromRow)]
pub struct TableRecord {
    pub table_schema: String,
    pub table_name: String,
}

/// 컬럼 레코드 (테이블, 정의 순서로 정렬되어 조회됨)
#[derive(Debug, Clone, FromRow)]
pub struct ColumnRecord {
    pub table_schema: String,
    pub table_name: String,
    pub column_name: String,
    pub domain_name: Option<String>,
    pub data_type: String,
    pub not_null: bool,
}

/// 이름 레코드 (프로시저)
#[derive(Debug, Clone, FromRow)]
struct NameRecord {
    name: String,
}

/// 테이블 목록에 컬럼을 붙입니다. 컬럼은 조회된 순서를 유지합니다.
///
/// 스키마가 달라도 같은 이름의 테이블이 있을 수 있으므로 (스키마, 이름)으로 짝을 맞춥니다.
pub fn assemble_tables(records: Vec<TableRecord>, columns: Vec<ColumnRecord>) -> Vec<TableDef> {
    let keys: Vec<(String, String)> = records
        .into_iter()
        .map(|r| (r.table_schema, r.table_name))
        .collect();
    let mut tables: Vec<TableDef> = keys
        .iter()
        .map(|(_, name)| TableDef {
            name: name.clone(),
            columns: Vec::new(),
        })
        .collect();

    for col in columns {
        let slot = keys
            .iter()
            .position(|(schema, name)| *schema == col.table_schema && *name == col.table_name);
        match slot {
            Some(idx) => tables[idx].columns.push(ColumnDef::new(
                col.column_name,
                col.domain_name,
                &col.data_type,
                col.not_null,
            )),
            None => warn!(table = %col.table_name, column = %col.column_name, "column without table"),
        }
    }

    tables
}

/// 카탈로그 조회기
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogReader;

impl CatalogReader {
    pub fn new() -> Self {
        Self
    }

    /// 메타데이터 문서 조회
    #[instrument(skip_all)]
    pub async fn read(&self, connection_url: &str) -> Result<DatabaseSchema> {
        let mut conn = PgConnection::connect(connection_url).await?;
        let result = self.read_with(&mut conn).await;
        if let Err(e) = conn.close().await {
            warn!(error = %e, "failed to close catalog connection");
        }
        result
    }

    /// 열린 연결로 메타데이터 문서 조회
    pub async fn read_with(&self, conn: &mut PgConnection) -> Result<DatabaseSchema> {
        let database: String = sqlx::query_scalar("SELECT current_database()::text")
            .fetch_one(&mut *conn)
            .await?;

        let domains: Vec<DomainRecord> = sqlx::query_as(&format!(
            r#"
            SELECT domain_name::text AS name,
                   data_type::text AS data_type,
                   character_maximum_length::int4 AS length,
                   numeric_precision::int4 AS precision,
                   numeric_scale::int4 AS scale
            FROM information_schema.domains
            WHERE {}
            ORDER BY domain_name
            "#,
            user_schema("domain_schema")
        ))
        .fetch_all(&mut *conn)
        .await?;

        let tables: Vec<TableRecord> = sqlx::query_as(&format!(
            r#"
            SELECT table_schema::text AS table_schema,
                   table_name::text AS table_name
            FROM information_schema.tables
            WHERE table_type = 'BASE TABLE' AND {}
            ORDER BY table_name, table_schema
            "#,
            user_schema("table_schema")
        ))
        .fetch_all(&mut *conn)
        .await?;

        let columns: Vec<ColumnRecord> = sqlx::query_as(&format!(
            r#"
            SELECT c.table_schema::text AS table_schema,
                   c.table_name::text AS table_name,
                   c.column_name::text AS column_name,
                   c.domain_name::text AS domain_name,
                   CASE WHEN c.data_type = 'USER-DEFINED' THEN c.udt_name::text
                        ELSE c.data_type::text END AS data_type,
                   (c.is_nullable = 'NO') AS not_null
            FROM information_schema.columns c
            JOIN information_schema.tables t
              ON t.table_schema = c.table_schema AND t.table_name = c.table_name
            WHERE t.table_type = 'BASE TABLE' AND {}
            ORDER BY c.table_name, c.table_schema, c.ordinal_position
            "#,
            user_schema("c.table_schema")
        ))
        .fetch_all(&mut *conn)
        .await?;

        let procedures: Vec<NameRecord> = sqlx::query_as(&format!(
            r#"
            SELECT DISTINCT routine_name::text AS name
            FROM information_schema.routines
            WHERE routine_type IN ('PROCEDURE', 'FUNCTION') AND {}
            ORDER BY name
            "#,
            user_schema("routine_schema")
        ))
        .fetch_all(&mut *conn)
        .await?;

        debug!(
            domains = domains.len(),
            tables = tables.len(),
            columns = columns.len(),
            procedures = procedures.len(),
            "catalog read"
        );

        let schema = DatabaseSchema {
            database,
            domains: domains.into_iter().map(DomainRecord::into_def).collect(),
            tables: assemble_tables(tables, columns),
            procedures: procedures
                .into_iter()
                .map(|r| ProcedureDef { name: r.name })
                .collect(),
        };

        info!(database = %schema.database, stats = %schema.stats(), "metadata loaded");
        Ok(schema)
    }

    /// 사용자 객체 개수 조회
    #[instrument(skip_all)]
    pub async fn stats(&self, connection_url: &str) -> Result<MetadataStats> {
        let mut conn = PgConnection::connect(connection_url).await?;
        let result = self.stats_with(&mut conn).await;
        if let Err(e) = conn.close().await {
            warn!(error = %e, "failed to close catalog connection");
        }
        result
    }

    pub async fn stats_with(&self, conn: &mut PgConnection) -> Result<MetadataStats> {
        let domains: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM information_schema.domains WHERE {}",
            user_schema("domain_schema")
        ))
        .fetch_one(&mut *conn)
        .await?;

        let tables: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_type = 'BASE TABLE' AND {}",
            user_schema("table_schema")
        ))
        .fetch_one(&mut *conn)
        .await?;

        let procedures: i64 = sqlx::query_scalar(&format!(
            r#"
            SELECT COUNT(DISTINCT routine_name)
            FROM information_schema.routines
            WHERE routine_type IN ('PROCEDURE', 'FUNCTION') AND {}
            "#,
            user_schema("routine_schema")
        ))
        .fetch_one(&mut *conn)
        .await?;

        Ok(MetadataStats {
            domains,
            tables,
            procedures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(schema: &str, name: &str) -> TableRecord {
        TableRecord {
            table_schema: schema.to_string(),
            table_name: name.to_string(),
        }
    }

    fn column(table: &str, name: &str, domain: Option<&str>, data_type: &str) -> ColumnRecord {
        column_in("public", table, name, domain, data_type)
    }

    fn column_in(
        schema: &str,
        table: &str,
        name: &str,
        domain: Option<&str>,
        data_type: &str,
    ) -> ColumnRecord {
        ColumnRecord {
            table_schema: schema.to_string(),
            table_name: table.to_string(),
            column_name: name.to_string(),
            domain_name: domain.map(str::to_string),
            data_type: data_type.to_string(),
            not_null: false,
        }
    }

    #[test]
    fn test_user_schema_filter() {
        assert_eq!(
            user_schema("c.table_schema"),
            "c.table_schema NOT IN ('pg_catalog', 'information_schema') AND c.table_schema NOT LIKE 'pg_toast%'"
        );
    }

    #[test]
    fn test_domain_scale_is_absolute() {
        let def = DomainRecord {
            name: "dm_money".to_string(),
            data_type: "numeric".to_string(),
            length: None,
            precision: Some(18),
            scale: Some(-4),
        }
        .into_def();

        assert_eq!(def.field_type, "NUMERIC");
        assert_eq!(def.precision, Some(18));
        assert_eq!(def.scale, Some(4));
    }

    #[test]
    fn test_assemble_tables_keeps_column_order() {
        let tables = assemble_tables(
            vec![table("public", "orders"), table("public", "users")],
            vec![
                column("orders", "id", Some("dm_id"), "integer"),
                column("orders", "placed_at", None, "timestamp without time zone"),
                column("users", "name", None, "character varying"),
            ],
        );

        assert_eq!(tables.len(), 2);
        let orders = &tables[0];
        assert_eq!(orders.columns[0].name, "id");
        assert_eq!(orders.columns[0].domain.as_deref(), Some("dm_id"));
        assert_eq!(orders.columns[0].field_type, None);
        assert_eq!(orders.columns[1].field_type.as_deref(), Some("TIMESTAMP"));
        assert_eq!(tables[1].columns[0].field_type.as_deref(), Some("VARCHAR"));
    }

    #[test]
    fn test_assemble_tables_without_columns() {
        let tables = assemble_tables(vec![table("public", "empty")], Vec::new());
        assert_eq!(tables.len(), 1);
        assert!(tables[0].columns.is_empty());
    }

    #[test]
    fn test_same_table_name_in_two_schemas() {
        let tables = assemble_tables(
            vec![table("archive", "users"), table("public", "users")],
            vec![
                column_in("archive", "users", "legacy_id", None, "integer"),
                column_in("public", "users", "id", None, "bigint"),
                column_in("public", "users", "email", None, "text"),
            ],
        );

        assert_eq!(tables.len(), 2);
        let archive: Vec<&str> = tables[0].columns.iter().map(|c| c.name.as_str()).collect();
        let public: Vec<&str> = tables[1].columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(archive, vec!["legacy_id"]);
        assert_eq!(public, vec!["id", "email"]);
    }

    #[test]
    fn test_column_of_unknown_table_is_dropped() {
        let tables = assemble_tables(
            vec![table("public", "users")],
            vec![column_in("other", "users", "id", None, "integer")],
        );
        assert!(tables[0].columns.is_empty());
    }
}

//! 카탈로그 타입 이름 정규화.

/// 카탈로그의 타입 이름을 짧은 대문자 이름으로 변환.
///
/// 모르는 타입은 대문자로만 바꾸고, 비어 있으면 `UNKNOWN`.
pub fn map_type(raw: &str) -> String {
    let normalized = raw.trim().to_lowercase();

    let mapped = match normalized.as_str() {
        "" => "UNKNOWN",
        "smallint" | "int2" => "SMALLINT",
        "integer" | "int" | "int4" => "INTEGER",
        "bigint" | "int8" => "BIGINT",
        "real" | "float4" => "FLOAT",
        "double precision" | "float8" => "DOUBLE",
        "numeric" => "NUMERIC",
        "decimal" => "DECIMAL",
        "date" => "DATE",
        "time without time zone" | "time" => "TIME",
        "time with time zone" | "timetz" => "TIMETZ",
        "timestamp without time zone" | "timestamp" => "TIMESTAMP",
        "timestamp with time zone" | "timestamptz" => "TIMESTAMPTZ",
        "character" | "char" | "bpchar" => "CHAR",
        "character varying" | "varchar" => "VARCHAR",
        "text" => "TEXT",
        "boolean" | "bool" => "BOOLEAN",
        "bytea" => "BLOB",
        "user-defined" => "USER-DEFINED",
        other => return other.to_uppercase(),
    };

    mapped.to_string()
}

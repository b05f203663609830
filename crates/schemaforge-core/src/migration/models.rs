//! 스크립트 적용을 위한 데이터 모델.

use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

/// 스크립트 카테고리.
///
/// 선언 순서가 곧 실행 우선순위입니다 (Domains < Tables < Procedures < Other).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScriptCategory {
    /// CREATE/ALTER DOMAIN
    Domains,
    /// CREATE/ALTER TABLE
    Tables,
    /// CREATE/ALTER PROCEDURE
    Procedures,
    /// 기타 (데이터, 권한 등)
    Other,
}

impl fmt::Display for ScriptCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptCategory::Domains => write!(f, "domains"),
            ScriptCategory::Tables => write!(f, "tables"),
            ScriptCategory::Procedures => write!(f, "procedures"),
            ScriptCategory::Other => write!(f, "other"),
        }
    }
}

/// 실행 대상 스크립트 파일.
///
/// 한 번의 실행 동안만 존재하며 저장되지 않습니다.
#[derive(Debug, Clone)]
pub struct ScriptFile {
    /// 파일 경로
    pub path: PathBuf,
    /// 파일명 (확장자 포함, 로그/에러 표기용)
    pub name: String,
    /// 디스크에서 읽은 원본 내용
    pub content: String,
    /// 전처리된 내용
    pub normalized: String,
    /// 전처리된 내용에서 판별한 카테고리
    pub category: ScriptCategory,
}

impl ScriptFile {
    /// 새 스크립트 파일 생성.
    pub fn new(
        path: PathBuf,
        content: String,
        normalized: String,
        category: ScriptCategory,
    ) -> Self {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            path,
            name,
            content,
            normalized,
            category,
        }
    }

    /// 전처리 후 실행할 내용이 없는지 확인
    pub fn is_empty(&self) -> bool {
        self.normalized.trim().is_empty()
    }

    /// 실행 순서 비교: 카테고리, 대소문자 무시 파일명, 원본 파일명, 경로 순.
    ///
    /// 뒤의 두 키는 대소문자만 다르거나 UTF-8이 아닌 파일명끼리도 순서를 고정합니다.
    pub fn execution_order(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| {
                self.name
                    .to_uppercase()
                    .cmp(&other.name.to_uppercase())
            })
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.path.cmp(&other.path))
    }
}

/// 배치 실행용으로 분리된 SQL 문장
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlStatement {
    /// 종결자를 제외한 문장
    pub sql: String,
    /// 스크립트 내 시작 라인 번호 (1-based)
    pub line_number: usize,
}

impl SqlStatement {
    pub fn new(sql: impl Into<String>, line_number: usize) -> Self {
        Self {
            sql: sql.into(),
            line_number,
        }
    }
}

/// 스크립트 실행 방식.
///
/// 익명 실행 블록은 내부에 종결자를 포함하므로 분리하지 않고 통째로 보냅니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionUnit {
    /// 스크립트 전체를 하나의 명령으로 실행
    SingleCommand,
    /// 순서가 있는 문장 배치
    Batch(Vec<SqlStatement>),
}

impl ExecutionUnit {
    /// 실행할 명령 수
    pub fn command_count(&self) -> usize {
        match self {
            ExecutionUnit::SingleCommand => 1,
            ExecutionUnit::Batch(statements) => statements.len(),
        }
    }
}

//! 스크립트 카테고리 분류기.
//!
//! SQL을 파싱하지 않고 전처리된 내용에서 키워드만 찾습니다.
//! 테이블과 프로시저가 섞인 스크립트는 먼저 검사하는 키워드 쪽으로 분류되므로
//! 스크립트 하나에는 한 종류의 객체만 두는 것을 전제로 합니다.

use super::models::ScriptCategory;

/// 전처리된 스크립트 내용으로 카테고리를 정하는 전략.
///
/// 같은 입력에는 항상 같은 카테고리를 돌려줘야 하며 파일명이나 호출 순서에 의존하면 안 됩니다.
pub trait ScriptClassifier: Send + Sync {
    /// 카테고리 판별
    fn classify(&self, normalized: &str) -> ScriptCategory;
}

/// 키워드 기반 분류기.
///
/// 규칙을 등록 순서대로 검사해 처음 일치하는 카테고리를 반환합니다.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: Vec<(ScriptCategory, Vec<String>)>,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        let mut classifier = Self::empty();
        classifier
            .rule(ScriptCategory::Domains, &["CREATE DOMAIN", "ALTER DOMAIN"])
            .rule(ScriptCategory::Tables, &["CREATE TABLE", "ALTER TABLE"])
            .rule(
                ScriptCategory::Procedures,
                &["CREATE PROCEDURE", "ALTER PROCEDURE"],
            );
        classifier
    }
}

impl KeywordClassifier {
    /// 기본 규칙(도메인 → 테이블 → 프로시저)으로 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 규칙 없는 분류기. 모든 입력이 `Other`가 됩니다.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// 규칙 추가 (기존 규칙 뒤에 검사됨)
    pub fn rule(&mut self, category: ScriptCategory, keywords: &[&str]) -> &mut Self {
        self.rules.push((
            category,
            keywords.iter().map(|k| k.to_uppercase()).collect(),
        ));
        self
    }
}

impl ScriptClassifier for KeywordClassifier {
    fn classify(&self, normalized: &str) -> ScriptCategory {
        let upper = normalized.to_uppercase();

        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| upper.contains(k.as_str())))
            .map(|(category, _)| *category)
            .unwrap_or(ScriptCategory::Other)
    }
}

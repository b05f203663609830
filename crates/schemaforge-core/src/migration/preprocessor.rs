//! 스크립트 전처리기.
//!
//! IBExpert 같은 설계 도구가 내보낸 스크립트에서 이미 존재하는 데이터베이스에
//! 다시 실행하면 안 되는 줄(블록 주석, 세션 지시문, `CREATE DATABASE`, 접속 정보)을 제거합니다.
//!
//! 줄 시작 접두어만 검사하는 필터이며 SQL 파서가 아닙니다.
//! 문장 중간에 나오는 키워드는 걸러지지 않습니다.

/// 한 줄을 제거할지 결정하는 규칙
pub trait LineFilter: Send + Sync {
    /// 규칙 이름 (로그/테스트용)
    fn name(&self) -> &str;

    /// `true`면 해당 줄을 출력에서 제외
    fn drops(&self, line: &str) -> bool;
}

/// 앞쪽 공백을 제거한 줄이 접두어로 시작하면 제외하는 규칙 (ASCII 대소문자 무시).
#[derive(Debug, Clone)]
pub struct PrefixRule {
    name: String,
    prefix: String,
}

impl PrefixRule {
    pub fn new(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
        }
    }
}

impl LineFilter for PrefixRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn drops(&self, line: &str) -> bool {
        starts_with_ignore_case(line.trim_start(), &self.prefix)
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.is_char_boundary(prefix.len())
        && text[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// 줄 단위 전처리기.
///
/// 출력은 입력에 대해 멱등입니다: `process(process(x)) == process(x)`.
pub struct Preprocessor {
    rules: Vec<Box<dyn LineFilter>>,
}

impl Default for Preprocessor {
    fn default() -> Self {
        let mut preprocessor = Self::empty();

        // 도구가 만든 블록 주석은 배치 파서를 깨뜨림
        preprocessor
            .with_rule(PrefixRule::new("comment-open", "/*"))
            .with_rule(PrefixRule::new("comment-close", "*/"))
            .with_rule(PrefixRule::new("comment-continuation", "*"));

        // 기존 연결에서는 의미 없는 세션 지시문
        preprocessor
            .with_rule(PrefixRule::new("sql-dialect", "SET SQL DIALECT"))
            .with_rule(PrefixRule::new("names", "SET NAMES"))
            .with_rule(PrefixRule::new("clientlib", "SET CLIENTLIB"));

        // 기존 데이터베이스에 절대 실행하면 안 되는 부트스트랩 문장
        preprocessor
            .with_rule(PrefixRule::new("create-database", "CREATE DATABASE"))
            .with_rule(PrefixRule::new("connect", "CONNECT"));

        // USER 'SYSDBA' PASSWORD '...'
        preprocessor
            .with_rule(PrefixRule::new("user", "USER "))
            .with_rule(PrefixRule::new("password", "PASSWORD "));

        preprocessor
    }
}

impl std::fmt::Debug for Preprocessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preprocessor")
            .field(
                "rules",
                &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Preprocessor {
    /// 기본 규칙으로 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 규칙 없는 전처리기 (앞뒤 공백만 제거)
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// 규칙 추가
    pub fn with_rule(&mut self, rule: impl LineFilter + 'static) -> &mut Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// 이름으로 규칙 제거. 제거했으면 `true`.
    pub fn remove_rule(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.name() != name);
        self.rules.len() != before
    }

    /// 등록된 규칙 이름 목록
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// 스크립트 전처리.
    ///
    /// 규칙에 걸리지 않은 줄(빈 줄 포함)은 그대로 두고 결과 전체의 앞뒤 공백을 제거합니다.
    /// 맨 앞의 BOM(U+FEFF)은 첫 줄 검사 전에 제거됩니다.
    pub fn process(&self, raw: &str) -> String {
        let raw = raw.strip_prefix('\u{FEFF}').unwrap_or(raw);
        let mut out = String::with_capacity(raw.len());

        for line in raw.lines() {
            if self.rules.iter().any(|rule| rule.drops(line)) {
                continue;
            }
            out.push_str(line);
            out.push('\n');
        }

        out.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_block_comments() {
        let sql = "/* Generated by IBExpert\n * 2024-01-01\n */\nCREATE TABLE t (id INT);";
        assert_eq!(Preprocessor::new().process(sql), "CREATE TABLE t (id INT);");
    }

    #[test]
    fn test_strips_session_directives_case_insensitive() {
        let sql = "set sql dialect 3;\n  SET NAMES UTF8;\nSet ClientLib 'fbclient.dll';\nSELECT 1;";
        assert_eq!(Preprocessor::new().process(sql), "SELECT 1;");
    }

    #[test]
    fn test_strips_bootstrap_and_credentials() {
        let sql = "CREATE DATABASE 'localhost:/db/test.fdb'\nUSER 'SYSDBA' PASSWORD 'masterkey'\nPASSWORD 'x';\nCONNECT 'db';\nCREATE TABLE t (id INT);";
        assert_eq!(Preprocessor::new().process(sql), "CREATE TABLE t (id INT);");
    }

    #[test]
    fn test_keeps_inner_blank_lines() {
        let sql = "\n\nCREATE TABLE a (id INT);\n\n\nCREATE TABLE b (id INT);\n\n";
        assert_eq!(
            Preprocessor::new().process(sql),
            "CREATE TABLE a (id INT);\n\n\nCREATE TABLE b (id INT);"
        );
    }

    #[test]
    fn test_mid_line_keywords_are_kept() {
        let sql = "SELECT 'CREATE DATABASE' FROM t; /* inline */";
        assert_eq!(Preprocessor::new().process(sql), sql);
    }

    #[test]
    fn test_user_prefix_requires_space() {
        let sql = "USERS_BACKUP_NOTE;\nUSER 'x'";
        assert_eq!(Preprocessor::new().process(sql), "USERS_BACKUP_NOTE;");
    }

    #[test]
    fn test_comment_only_script_is_empty() {
        let sql = "/* header */\n/* another */\nSET SQL DIALECT 3;\n";
        assert!(Preprocessor::new().process(sql).is_empty());
    }

    #[test]
    fn test_leading_bom_does_not_hide_directive() {
        let sql = "\u{FEFF}SET SQL DIALECT 3;\nCREATE TABLE t (id INT);";
        assert_eq!(Preprocessor::new().process(sql), "CREATE TABLE t (id INT);");

        let header_only = "\u{FEFF}/* exported */\n";
        assert!(Preprocessor::new().process(header_only).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let sql = "  \n/* c */\n   CREATE TABLE t (\n  id INT\n);\n\nSET NAMES UTF8;\n";
        let pre = Preprocessor::new();
        let once = pre.process(sql);
        assert_eq!(pre.process(&once), once);
    }

    #[test]
    fn test_remove_rule() {
        let mut pre = Preprocessor::new();
        assert!(pre.remove_rule("connect"));
        assert!(!pre.remove_rule("connect"));
        assert!(!pre.rule_names().contains(&"connect"));
        assert_eq!(pre.process("CONNECT 'db';"), "CONNECT 'db';");
    }

    #[test]
    fn test_crlf_input() {
        let sql = "SET NAMES UTF8;\r\nCREATE TABLE t (id INT);\r\n";
        assert_eq!(Preprocessor::new().process(sql), "CREATE TABLE t (id INT);");
    }
}

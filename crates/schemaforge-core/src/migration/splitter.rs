//! 배치 실행을 위한 SQL 문장 분리기.
//!
//! 종결자(기본 `;`)로 문장을 나누되 문자열(`E'...'` 백슬래시 이스케이프 포함), 인용 식별자,
//! 주석, `$$`/`$tag$` 본문 안의 종결자는 무시합니다. Firebird 내보내기 스크립트의 `SET TERM ^ ;` 지시문으로
//! 종결자를 바꿀 수 있으며 지시문 자체는 문장으로 내보내지 않습니다.

use super::models::SqlStatement;

/// 스크립트를 실행 순서대로 문장 목록으로 분리.
///
/// 종결자는 제거되고, 주석만 남은 조각은 버립니다.
/// 마지막 문장에 종결자가 없어도 문장으로 취급합니다.
pub fn split_statements(script: &str) -> Vec<SqlStatement> {
    let mut splitter = Splitter::new();
    for (idx, line) in script.lines().enumerate() {
        splitter.feed_line(line, idx + 1);
    }
    splitter.finish()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanState {
    Code,
    SingleQuote,
    /// `E'...'`: 백슬래시 이스케이프 문자열
    EscapeQuote,
    DoubleQuote,
    BlockComment,
    Dollar(String),
}

struct Splitter {
    terminator: String,
    state: ScanState,
    current: String,
    start_line: usize,
    has_code: bool,
    statements: Vec<SqlStatement>,
}

impl Splitter {
    fn new() -> Self {
        Self {
            terminator: ";".to_string(),
            state: ScanState::Code,
            current: String::new(),
            start_line: 1,
            has_code: false,
            statements: Vec::new(),
        }
    }

    fn feed_line(&mut self, line: &str, line_number: usize) {
        if self.state == ScanState::Code && !self.has_code {
            if let Some(terminator) = parse_set_term(line, &self.terminator) {
                self.terminator = terminator;
                self.current.clear();
                return;
            }
        }

        let mut i = 0;
        while i < line.len() {
            let rest = &line[i..];
            let Some(c) = rest.chars().next() else {
                break;
            };

            match self.state.clone() {
                ScanState::Code => {
                    if rest.starts_with(self.terminator.as_str()) {
                        i += self.terminator.len();
                        self.emit();
                        continue;
                    }
                    if rest.starts_with("--") {
                        // 줄 끝까지 주석
                        self.current.push_str(rest);
                        break;
                    }
                    if rest.starts_with("/*") {
                        self.state = ScanState::BlockComment;
                        self.current.push_str("/*");
                        i += 2;
                        continue;
                    }
                    if (c == 'E' || c == 'e')
                        && rest[1..].starts_with('\'')
                        && !self.current.chars().last().is_some_and(is_ident_char)
                    {
                        self.mark_code(line_number);
                        self.current.push(c);
                        self.current.push('\'');
                        i += 2;
                        self.state = ScanState::EscapeQuote;
                        continue;
                    }
                    if c == '$' {
                        if let Some(tag) = dollar_tag(rest) {
                            self.mark_code(line_number);
                            self.current.push_str(tag);
                            i += tag.len();
                            self.state = ScanState::Dollar(tag.to_string());
                            continue;
                        }
                    }

                    match c {
                        '\'' => self.state = ScanState::SingleQuote,
                        '"' => self.state = ScanState::DoubleQuote,
                        _ => {}
                    }
                    if !c.is_whitespace() {
                        self.mark_code(line_number);
                    }
                    self.current.push(c);
                    i += c.len_utf8();
                }
                ScanState::SingleQuote | ScanState::DoubleQuote => {
                    let closing = if self.state == ScanState::SingleQuote {
                        '\''
                    } else {
                        '"'
                    };
                    // '' 이스케이프는 닫힘 직후 다시 열림으로 처리됨
                    if c == closing {
                        self.state = ScanState::Code;
                    }
                    self.current.push(c);
                    i += c.len_utf8();
                }
                ScanState::EscapeQuote => {
                    let mut chars = rest.chars();
                    chars.next();
                    let next = chars.next();

                    if c == '\\' || (c == '\'' && next == Some('\'')) {
                        // \x 또는 '' 는 문자열 안에 남음
                        self.current.push(c);
                        i += c.len_utf8();
                        if let Some(n) = next {
                            self.current.push(n);
                            i += n.len_utf8();
                        }
                        continue;
                    }
                    if c == '\'' {
                        self.state = ScanState::Code;
                    }
                    self.current.push(c);
                    i += c.len_utf8();
                }
                ScanState::BlockComment => {
                    if rest.starts_with("*/") {
                        self.current.push_str("*/");
                        self.state = ScanState::Code;
                        i += 2;
                    } else {
                        self.current.push(c);
                        i += c.len_utf8();
                    }
                }
                ScanState::Dollar(tag) => {
                    if rest.starts_with(tag.as_str()) {
                        self.current.push_str(&tag);
                        self.state = ScanState::Code;
                        i += tag.len();
                    } else {
                        self.current.push(c);
                        i += c.len_utf8();
                    }
                }
            }
        }

        self.current.push('\n');
    }

    fn mark_code(&mut self, line_number: usize) {
        if !self.has_code {
            self.has_code = true;
            self.start_line = line_number;
        }
    }

    fn emit(&mut self) {
        if self.has_code {
            self.statements
                .push(SqlStatement::new(self.current.trim(), self.start_line));
        }
        self.current.clear();
        self.has_code = false;
    }

    fn finish(mut self) -> Vec<SqlStatement> {
        self.emit();
        self.statements
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// `$$` 또는 `$tag$` 시작 태그 추출. `$1` 같은 위치 파라미터는 태그가 아님.
fn dollar_tag(rest: &str) -> Option<&str> {
    let body = rest.strip_prefix('$')?;
    let end = body.find('$')?;
    let ident = &body[..end];

    let valid = ident.is_empty()
        || (ident
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));

    valid.then(|| &rest[..end + 2])
}

/// `SET TERM <새 종결자> <현재 종결자>` 지시문이면 새 종결자 반환.
fn parse_set_term(line: &str, current: &str) -> Option<String> {
    let mut words = line.split_whitespace();
    let set = words.next()?;
    let term = words.next()?;
    if !set.eq_ignore_ascii_case("SET") || !term.eq_ignore_ascii_case("TERM") {
        return None;
    }

    let rest = words.collect::<Vec<_>>().join(" ");
    let rest = rest.strip_suffix(current).unwrap_or(&rest).trim();
    rest.split_whitespace().next().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqls(script: &str) -> Vec<String> {
        split_statements(script).into_iter().map(|s| s.sql).collect()
    }

    #[test]
    fn test_split_simple() {
        let script = "CREATE TABLE a (id INT);\nCREATE TABLE b (id INT);";
        assert_eq!(
            sqls(script),
            vec!["CREATE TABLE a (id INT)", "CREATE TABLE b (id INT)"]
        );
    }

    #[test]
    fn test_line_numbers() {
        let script = "\n\nCREATE TABLE a (\n  id INT\n);\n\nINSERT INTO a VALUES (1);";
        let stmts = split_statements(script);

        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].line_number, 3);
        assert_eq!(stmts[1].line_number, 7);
    }

    #[test]
    fn test_trailing_statement_without_terminator() {
        assert_eq!(sqls("SELECT 1;\nSELECT 2"), vec!["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn test_semicolon_in_string_literal() {
        let script = "INSERT INTO notes VALUES ('a; b', 'it''s; ok');\nSELECT 1;";
        assert_eq!(
            sqls(script),
            vec!["INSERT INTO notes VALUES ('a; b', 'it''s; ok')", "SELECT 1"]
        );
    }

    #[test]
    fn test_semicolon_in_comments() {
        let script = "-- first; comment\nSELECT 1; -- trailing; note\n/* block; \n comment; */ SELECT 2;";
        let stmts = sqls(script);

        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].ends_with("SELECT 1"));
        assert!(stmts[1].ends_with("SELECT 2"));
    }

    #[test]
    fn test_escape_string_literal() {
        let script = "INSERT INTO notes VALUES (E'it\\'s; x');\nSELECT 1;";
        assert_eq!(
            sqls(script),
            vec!["INSERT INTO notes VALUES (E'it\\'s; x')", "SELECT 1"]
        );
    }

    #[test]
    fn test_escape_string_backslash_and_doubled_quote() {
        let script = "SELECT e'a\\\\'; SELECT E'x''; y';\nSELECT 3;";
        assert_eq!(
            sqls(script),
            vec!["SELECT e'a\\\\'", "SELECT E'x''; y'", "SELECT 3"]
        );
    }

    #[test]
    fn test_identifier_ending_in_e_is_not_escape_prefix() {
        // type'...' 는 일반 문자열이므로 백슬래시가 이스케이프가 아님
        let script = "SELECT type'a\\'; SELECT 2;";
        assert_eq!(sqls(script), vec!["SELECT type'a\\'", "SELECT 2"]);
    }

    #[test]
    fn test_comment_only_tail_is_dropped() {
        assert_eq!(sqls("SELECT 1;\n-- the end\n"), vec!["SELECT 1"]);
    }

    #[test]
    fn test_dollar_quoted_body() {
        let script = "CREATE FUNCTION f() RETURNS INT AS $$\nBEGIN\n  PERFORM 1;\n  RETURN 1;\nEND;\n$$ LANGUAGE plpgsql;\nSELECT f();";
        let stmts = sqls(script);

        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].contains("RETURN 1;"));
        assert!(stmts[0].ends_with("LANGUAGE plpgsql"));
        assert_eq!(stmts[1], "SELECT f()");
    }

    #[test]
    fn test_tagged_dollar_quote() {
        let script = "CREATE PROCEDURE p() LANGUAGE sql AS $body$ INSERT INTO t VALUES (1); $body$;";
        assert_eq!(split_statements(script).len(), 1);
    }

    #[test]
    fn test_positional_parameter_is_not_dollar_quote() {
        let script = "PREPARE q AS SELECT $1;\nSELECT 2;";
        assert_eq!(sqls(script), vec!["PREPARE q AS SELECT $1", "SELECT 2"]);
    }

    #[test]
    fn test_set_term() {
        let script = "SET TERM ^ ;\nCREATE PROCEDURE p AS\nBEGIN\n  x = 1;\nEND^\nSET TERM ; ^\nCREATE TABLE t (id INT);";
        let stmts = split_statements(script);

        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].sql.starts_with("CREATE PROCEDURE p AS"));
        assert!(stmts[0].sql.ends_with("END"));
        assert_eq!(stmts[0].line_number, 2);
        assert_eq!(stmts[1].sql, "CREATE TABLE t (id INT)");
    }

    #[test]
    fn test_parse_set_term() {
        assert_eq!(parse_set_term("SET TERM ^ ;", ";"), Some("^".to_string()));
        assert_eq!(parse_set_term("set term ^;", ";"), Some("^".to_string()));
        assert_eq!(parse_set_term("SET TERM ; ^", "^"), Some(";".to_string()));
        assert_eq!(parse_set_term("SET NAMES UTF8;", ";"), None);
    }

    #[test]
    fn test_empty_script() {
        assert!(split_statements("").is_empty());
        assert!(split_statements(";;\n ; ").is_empty());
    }
}

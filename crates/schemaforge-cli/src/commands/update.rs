//! 스크립트 디렉토리 적용 명령어.
//!
//! # 사용법
//!
//! ```bash
//! # 적용 순서만 확인 (데이터베이스 접속 없음)
//! schemaforge update --dir scripts --dry-run
//!
//! # 기존 데이터베이스에 적용
//! schemaforge update --dir scripts --db-url "postgres://..."
//! schemaforge update --dir scripts --database shop
//! ```

use std::path::PathBuf;

use schemaforge_core::migration::{
    ConsoleProgress, ScriptCategory, ScriptFile, ScriptOrchestrator,
};
use schemaforge_data::{DataError, PgScriptConnector};
use tracing::info;

use super::{mask_url, ConnectionTarget};

/// update 설정
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    /// 스크립트 디렉토리
    pub scripts_dir: PathBuf,
    /// 연결 대상
    pub target: ConnectionTarget,
    /// 적용 순서만 출력
    pub dry_run: bool,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            scripts_dir: PathBuf::from("scripts"),
            target: ConnectionTarget::default(),
            dry_run: false,
        }
    }
}

/// 적용 계획 한 줄 (예: `  1. [tables] 010_tables.sql`)
fn plan_line(index: usize, file: &ScriptFile) -> String {
    let mut line = format!("{:>3}. [{}] {}", index + 1, file.category, file.name);
    if file.is_empty() {
        line.push_str(" (skipped: empty)");
    }
    line
}

/// 적용 계획 텍스트
pub fn format_plan(files: &[ScriptFile]) -> String {
    let mut output = String::from("Execution plan:\n");
    for (i, file) in files.iter().enumerate() {
        output.push_str(&plan_line(i, file));
        output.push('\n');
    }

    let runnable = files.iter().filter(|f| !f.is_empty()).count();
    let by_category = |c: ScriptCategory| files.iter().filter(|f| f.category == c).count();
    output.push_str(&format!(
        "{} script(s), {} to execute (domains: {}, tables: {}, procedures: {}, other: {})\n",
        files.len(),
        runnable,
        by_category(ScriptCategory::Domains),
        by_category(ScriptCategory::Tables),
        by_category(ScriptCategory::Procedures),
        by_category(ScriptCategory::Other),
    ));
    output
}

/// 스크립트 디렉토리 적용 (또는 dry-run 계획 출력)
pub async fn run_update(config: &UpdateConfig) -> Result<(), DataError> {
    let mut orchestrator = ScriptOrchestrator::new(PgScriptConnector, ConsoleProgress::default());

    if config.dry_run {
        let files = orchestrator.plan(&config.scripts_dir)?;
        print!("{}", format_plan(&files));
        return Ok(());
    }

    let url = config.target.resolve()?;
    info!(
        dir = %config.scripts_dir.display(),
        url = %mask_url(&url),
        "applying scripts"
    );

    orchestrator.run(&url, &config.scripts_dir).await?;
    Ok(())
}

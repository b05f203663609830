//! 스크립트 디렉토리 적용 오케스트레이터.
//!
//! 탐색 → 전처리 및 분류 → 정렬 → 연결 → 순차 실행 순서로 동작합니다.
//! 첫 번째 실패에서 멈추며, 이미 적용된 스크립트는 되돌리지 않습니다.

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use super::categorizer::{KeywordClassifier, ScriptClassifier};
use super::error::{DriverError, MigrationError, Result};
use super::executor::{ScriptConnection, ScriptExecutor};
use super::locator::ScriptLocator;
use super::models::ScriptFile;
use super::preprocessor::Preprocessor;
use super::progress::{ProgressEvent, ProgressSink};

/// 연결 문자열로 [`ScriptConnection`]을 여는 팩토리.
#[async_trait]
pub trait ScriptConnector: Send + Sync {
    type Connection: ScriptConnection;

    /// 연결 열기
    async fn connect(
        &self,
        connection_string: &str,
    ) -> std::result::Result<Self::Connection, DriverError>;
}

/// 스크립트 디렉토리 적용기.
///
/// 한 번의 실행 동안 연결 하나를 단독으로 소유하고, 성공/실패와 관계없이 종료 시 닫습니다.
pub struct ScriptOrchestrator<K, P> {
    connector: K,
    progress: P,
    locator: ScriptLocator,
    preprocessor: Preprocessor,
    classifier: Box<dyn ScriptClassifier>,
    executor: ScriptExecutor,
}

impl<K, P> ScriptOrchestrator<K, P>
where
    K: ScriptConnector,
    P: ProgressSink,
{
    /// 기본 탐색기/전처리기/키워드 분류기/실행기로 생성
    pub fn new(connector: K, progress: P) -> Self {
        Self {
            connector,
            progress,
            locator: ScriptLocator::new(),
            preprocessor: Preprocessor::new(),
            classifier: Box::new(KeywordClassifier::new()),
            executor: ScriptExecutor::default(),
        }
    }

    /// 분류 전략 교체
    pub fn with_classifier(mut self, classifier: impl ScriptClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// 전처리기 교체
    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// 실행기 교체
    pub fn with_executor(mut self, executor: ScriptExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn progress(&self) -> &P {
        &self.progress
    }

    pub fn into_progress(self) -> P {
        self.progress
    }

    /// 실행 계획: 데이터베이스에 연결하지 않고 정렬된 스크립트 목록만 만듭니다.
    ///
    /// 분류는 전처리된 내용으로 하므로 제거되는 지시문 줄은 결과에 영향을 주지 않습니다.
    pub fn plan(&self, scripts_dir: &Path) -> Result<Vec<ScriptFile>> {
        if is_blank(scripts_dir.as_os_str().to_string_lossy().as_ref()) {
            return Err(MigrationError::InvalidArgument("scripts directory"));
        }

        let paths = self.locator.locate(scripts_dir)?;

        let mut scripts = Vec::with_capacity(paths.len());
        for path in paths {
            let content = read_script(&path)?;
            let normalized = self.preprocessor.process(&content);
            let category = self.classifier.classify(&normalized);
            scripts.push(ScriptFile::new(path, content, normalized, category));
        }

        scripts.sort_by(ScriptFile::execution_order);

        for script in &scripts {
            debug!(script = %script.name, category = %script.category, "planned");
        }

        Ok(scripts)
    }

    /// 디렉토리의 스크립트를 모두 적용.
    ///
    /// # Errors
    ///
    /// - `MigrationError::InvalidArgument`: 연결 문자열 또는 디렉토리가 비어 있음
    /// - `MigrationError::DirectoryNotFound` / `NoScriptsFound`: 디렉토리 조건 불충족
    /// - `MigrationError::ConnectionFailed`: 연결 실패
    /// - `MigrationError::ExecutionFailed`: 스크립트 실행 실패 (이후 스크립트는 실행되지 않음)
    #[instrument(skip(self, connection_string, scripts_dir), fields(dir = %scripts_dir.display()))]
    pub async fn run(&mut self, connection_string: &str, scripts_dir: &Path) -> Result<()> {
        if is_blank(connection_string) {
            return Err(MigrationError::InvalidArgument("connection string"));
        }

        let scripts = self.plan(scripts_dir)?;
        info!(count = scripts.len(), "scripts ordered");

        let mut connection = self
            .connector
            .connect(connection_string)
            .await
            .map_err(|e| MigrationError::ConnectionFailed(e.message))?;

        let outcome = self.apply(&mut connection, &scripts).await;

        if let Err(e) = connection.close().await {
            warn!(error = %e, "failed to close connection");
        }

        outcome
    }

    async fn apply(&mut self, connection: &mut K::Connection, scripts: &[ScriptFile]) -> Result<()> {
        for script in scripts {
            if script.is_empty() {
                info!(script = %script.name, "skipping empty script");
                self.progress.report(ProgressEvent::Skipped {
                    script: script.name.clone(),
                });
                continue;
            }

            info!(script = %script.name, category = %script.category, "executing script");
            self.progress.report(ProgressEvent::Executing {
                script: script.name.clone(),
            });

            self.executor
                .execute(connection, &script.normalized, &script.name)
                .await?;
        }

        info!("update finished");
        self.progress.report(ProgressEvent::Finished);
        Ok(())
    }
}

/// 스크립트 파일을 텍스트로 읽습니다.
///
/// 잘못된 UTF-8 바이트는 U+FFFD로 바꾸고 계속 진행하며, 앞쪽 BOM은 제거합니다.
pub fn read_script(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| MigrationError::io(path, e))?;

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), "script is not valid UTF-8, invalid bytes replaced");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    Ok(match text.strip_prefix(BOM) {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

const BOM: char = '\u{FEFF}';

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

//! 진행 상황 출력.
//!
//! 오케스트레이터는 전역 stdout 대신 주입된 [`ProgressSink`]로 진행 상황을 보냅니다.
//! 출력은 관찰용이며 호출자가 결과 판단에 사용하면 안 됩니다.

use std::fmt;

/// 콘솔 출력 줄 앞에 붙는 도구 태그
pub const TOOL_TAG: &str = "[schemaforge]";

/// 진행 이벤트
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// 전처리 후 내용이 없어 건너뜀
    Skipped { script: String },
    /// 스크립트 실행 시작
    Executing { script: String },
    /// 모든 스크립트 실행 완료
    Finished,
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Skipped { script } => {
                write!(f, "Skipped empty/unsupported script: {}", script)
            }
            ProgressEvent::Executing { script } => write!(f, "Executing: {}", script),
            ProgressEvent::Finished => write!(f, "Update finished."),
        }
    }
}

/// 진행 이벤트 수신자
pub trait ProgressSink: Send {
    fn report(&mut self, event: ProgressEvent);
}

/// 테스트 등에서 이벤트를 모아두는 용도
impl ProgressSink for Vec<ProgressEvent> {
    fn report(&mut self, event: ProgressEvent) {
        self.push(event);
    }
}

/// 표준 출력으로 `[schemaforge] <메시지>` 형식의 줄을 씁니다.
#[derive(Debug, Clone)]
pub struct ConsoleProgress {
    tag: String,
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self {
            tag: TOOL_TAG.to_string(),
        }
    }
}

impl ConsoleProgress {
    pub fn with_tag(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    /// 출력될 한 줄
    pub fn format(&self, event: &ProgressEvent) -> String {
        format!("{} {}", self.tag, event)
    }
}

impl ProgressSink for ConsoleProgress {
    fn report(&mut self, event: ProgressEvent) {
        println!("{}", self.format(&event));
    }
}

use serde::{Deserialize, Serialize};

/// Carried state of the line classifier, threaded through the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Outside,
    InsideTraceback { start_line: usize },
}

/// One reported error block, `start_line..=end_line` (1-based, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracebackBlock {
    pub start_line: usize,
    pub end_line: usize,
}

/// Where a stack-frame line originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOrigin {
    Engine,
    Addon,
}

/// A stack-frame line inside a traceback block with resolved provenance.
/// `eol_column` is one past the last character, where inline hints attach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributedFrame {
    pub line: usize,
    pub origin: FrameOrigin,
    pub addon_dir: Option<String>,
    pub eol_column: usize,
}

/// Output of a full document scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub blocks: Vec<TracebackBlock>,
    pub frames: Vec<AttributedFrame>,
}

use super::patterns::{
    ADDON_SRC_RE, ENGINE_SRC_RE, FOREIGN_FN_RE, MAX_LINE_LEN, TAIL_CALL_RE, TIMESTAMP_RE,
    TRACEBACK_MARKER,
};
use super::types::{AttributedFrame, FrameOrigin, ScanState};

/// What a single line contributed to the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Nothing,
    OpenBlock { start_line: usize },
    CloseBlock { end_line: usize },
    Frame(AttributedFrame),
}

/// Classify one line and produce the state carried to the next line.
///
/// Oversized lines are state-preserving no-ops in every state, so a huge
/// single line can neither open, close nor attribute anything.
pub fn classify(line_no: usize, text: &str, state: ScanState) -> (Classification, ScanState) {
    if text.len() >= MAX_LINE_LEN {
        return (Classification::Nothing, state);
    }

    match state {
        ScanState::Outside => {
            if text.starts_with(TRACEBACK_MARKER) {
                (
                    Classification::OpenBlock { start_line: line_no },
                    ScanState::InsideTraceback { start_line: line_no },
                )
            } else {
                (Classification::Nothing, state)
            }
        }
        ScanState::InsideTraceback { .. } => {
            if TIMESTAMP_RE.is_match(text) {
                // The closing line itself is re-examined by the caller in
                // the Outside state; end is the previous line.
                return (
                    Classification::CloseBlock {
                        end_line: line_no.saturating_sub(1),
                    },
                    ScanState::Outside,
                );
            }
            (classify_frame(line_no, text), state)
        }
    }
}

/// Attribute one in-block line, or nothing for blank/context lines.
fn classify_frame(line_no: usize, text: &str) -> Classification {
    let trimmed = text.trim_start();
    if ENGINE_SRC_RE.is_match(trimmed)
        || FOREIGN_FN_RE.is_match(trimmed)
        || TAIL_CALL_RE.is_match(trimmed)
    {
        return Classification::Frame(AttributedFrame {
            line: line_no,
            origin: FrameOrigin::Engine,
            addon_dir: None,
            eol_column: eol_column(text),
        });
    }
    if let Some(m) = ADDON_SRC_RE.captures(trimmed) {
        return Classification::Frame(AttributedFrame {
            line: line_no,
            origin: FrameOrigin::Addon,
            addon_dir: m.get(1).map(|d| d.as_str().to_string()),
            eol_column: eol_column(text),
        });
    }
    Classification::Nothing
}

/// 1-based column one past the last character of the untrimmed line.
fn eol_column(text: &str) -> usize {
    text.chars().count() + 1
}

use super::classifier::{classify, Classification};
use super::types::{ScanResult, ScanState, TracebackBlock};

/// Scan the whole document in one pass, 1-based line numbers.
///
/// Carries `ScanState` forward line by line; a line matching no rule is
/// uninformative, never an error. Re-runnable: no state survives the call.
pub fn scan(lines: &[&str]) -> ScanResult {
    let mut result = ScanResult::default();
    let mut state = ScanState::Outside;

    for (i, text) in lines.iter().enumerate() {
        let line_no = i + 1;
        let before = state;
        let (classification, next) = classify(line_no, text, state);
        state = next;
        match classification {
            Classification::Nothing | Classification::OpenBlock { .. } => {}
            Classification::Frame(frame) => result.frames.push(frame),
            Classification::CloseBlock { end_line } => {
                if let ScanState::InsideTraceback { start_line } = before {
                    result.blocks.push(TracebackBlock {
                        start_line,
                        end_line,
                    });
                }
                // The closing line gets a fresh look in the Outside state;
                // it may itself open the next construct.
                let (reclassified, next) = classify(line_no, text, state);
                state = next;
                if let Classification::Frame(frame) = reclassified {
                    result.frames.push(frame);
                }
            }
        }
    }

    // A block still open at document end is reported, not discarded.
    if let ScanState::InsideTraceback { start_line } = state {
        result.blocks.push(TracebackBlock {
            start_line,
            end_line: lines.len(),
        });
    }

    result
}

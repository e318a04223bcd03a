use serde::{Deserialize, Serialize};

use super::addons::AddonRegistry;
use crate::scanner::{FrameOrigin, ScanResult, TracebackBlock};
use crate::view::{Clipboard, Notifier, NoticeLevel, TextView};

pub const COPY_ACTION_TITLE: &str = "Copy Error Messages";

/// Highlight style of a decoration range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationStyle {
    /// Gutter/margin emphasis spanning the whole block.
    TracebackBlock,
    /// Per-line inline emphasis for every line of a block.
    TracebackLine,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoration {
    pub start_line: usize,
    pub end_line: usize,
    pub style: DecorationStyle,
}

/// End-of-line label for one attributed stack frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlayHint {
    pub line: usize,
    pub column: usize,
    pub label: String,
}

/// "Copy block text" affordance for one traceback block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyBlockAction {
    pub start_line: usize,
    pub end_line: usize,
}

impl CopyBlockAction {
    pub fn for_block(block: &TracebackBlock) -> Self {
        Self {
            start_line: block.start_line,
            end_line: block.end_line,
        }
    }

    /// Raw block lines, `start_line..=end_line`, joined by newlines.
    pub fn block_text(&self, view: &dyn TextView) -> String {
        let mut lines = Vec::with_capacity(self.end_line.saturating_sub(self.start_line) + 1);
        for line_no in self.start_line..=self.end_line {
            lines.push(view.line(line_no).unwrap_or(""));
        }
        lines.join("\n")
    }

    /// Copy the block text and report the outcome as a one-shot notice.
    /// A failing clipboard never panics and never loses the block data.
    pub fn invoke(
        &self,
        view: &dyn TextView,
        clipboard: &mut dyn Clipboard,
        notifier: &mut dyn Notifier,
    ) {
        let text = self.block_text(view);
        match clipboard.set_text(&text) {
            Ok(()) => notifier.notify(
                NoticeLevel::Info,
                "Successfully copied error messages to clipboard.",
            ),
            Err(e) => {
                log::warn!("copy-block action failed: {e}");
                notifier.notify(NoticeLevel::Error, &format!("Copy failed: {e}"));
            }
        }
    }
}

/// Full overlay set for one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    pub decorations: Vec<Decoration>,
    pub hints: Vec<InlayHint>,
    pub actions: Vec<CopyBlockAction>,
}

/// Convert a scan into the three overlay sets consumed by the host view.
///
/// Recomputed wholesale on every call; nothing is patched incrementally.
pub fn aggregate(scan: &ScanResult, registry: &AddonRegistry) -> Annotations {
    let mut out = Annotations::default();

    for block in &scan.blocks {
        out.decorations.push(Decoration {
            start_line: block.start_line,
            end_line: block.end_line,
            style: DecorationStyle::TracebackBlock,
        });
        for line_no in block.start_line..=block.end_line {
            out.decorations.push(Decoration {
                start_line: line_no,
                end_line: line_no,
                style: DecorationStyle::TracebackLine,
            });
        }
        out.actions.push(CopyBlockAction::for_block(block));
    }

    for frame in &scan.frames {
        let label = match frame.origin {
            FrameOrigin::Engine => "In Game".to_string(),
            FrameOrigin::Addon => {
                let dir = frame.addon_dir.as_deref().unwrap_or("");
                format!("In Add-on: {}", registry.display_name(dir))
            }
        };
        out.hints.push(InlayHint {
            line: frame.line,
            column: frame.eol_column,
            label,
        });
    }

    out
}

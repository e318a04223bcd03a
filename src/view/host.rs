use serde::{Deserialize, Serialize};

use crate::error::Error;

/// 1-based line/column position inside the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Line-addressable text surface owned by the host view.
///
/// The search primitives are exact-substring, case-sensitive, and
/// direction-bounded: `find_next` only matches occurrences starting strictly
/// after `after`, `find_prev` strictly before `before`. Neither wraps.
pub trait TextView {
    fn line_count(&self) -> usize;

    /// Text of a 1-based line, `None` outside document bounds.
    fn line(&self, line_no: usize) -> Option<&str>;

    fn cursor(&self) -> Position;

    /// Move the cursor; implementations clamp to document bounds.
    fn set_cursor(&mut self, pos: Position);

    fn find_next(&self, needle: &str, after: Position) -> Option<Position>;

    fn find_prev(&self, needle: &str, before: Position) -> Option<Position>;
}

/// Host clipboard endpoint for the copy-block action.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One-shot user-visible notifications (toasts, status bar, dialog).
pub trait Notifier {
    fn notify(&mut self, level: NoticeLevel, message: &str);
}

/// Byte offset of a 1-based char column, saturating at end of line.
pub(crate) fn byte_of_column(text: &str, column: usize) -> usize {
    text.char_indices()
        .nth(column - 1)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

/// 1-based char column of a byte offset.
pub(crate) fn column_of_byte(text: &str, byte: usize) -> usize {
    text[..byte].chars().count() + 1
}

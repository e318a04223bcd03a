use super::host::{byte_of_column, column_of_byte, Position, TextView};

/// In-memory line-addressable document with a cursor.
///
/// This is the concrete text model used by the binary and the tests; the
/// engine itself only ever sees the `TextView` trait.
#[derive(Debug, Clone, Default)]
pub struct LogDocument {
    lines: Vec<String>,
    cursor: Position,
}

impl LogDocument {
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(|l| l.to_string()).collect(),
            cursor: Position::new(1, 1),
        }
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(|l| l.into()).collect(),
            cursor: Position::new(1, 1),
        }
    }

    fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.clamp(1, self.lines.len().max(1));
        let width = self
            .lines
            .get(line - 1)
            .map(|l| l.chars().count())
            .unwrap_or(0);
        Position::new(line, pos.column.clamp(1, width + 1))
    }
}

impl TextView for LogDocument {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, line_no: usize) -> Option<&str> {
        if line_no == 0 {
            return None;
        }
        self.lines.get(line_no - 1).map(|l| l.as_str())
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn set_cursor(&mut self, pos: Position) {
        self.cursor = self.clamp(pos);
    }

    fn find_next(&self, needle: &str, after: Position) -> Option<Position> {
        if needle.is_empty() {
            return None;
        }
        for line_no in after.line.max(1)..=self.line_count() {
            let text = self.line(line_no)?;
            let from = if line_no == after.line {
                // Strictly after: an occurrence at the cursor itself never
                // re-matches, so repeated navigation always makes progress.
                byte_of_column(text, after.column + 1)
            } else {
                0
            };
            if from > text.len() {
                continue;
            }
            if let Some(idx) = text[from..].find(needle) {
                return Some(Position::new(line_no, column_of_byte(text, from + idx)));
            }
        }
        None
    }

    fn find_prev(&self, needle: &str, before: Position) -> Option<Position> {
        if needle.is_empty() {
            return None;
        }
        for line_no in (1..=before.line.min(self.line_count())).rev() {
            let text = self.line(line_no)?;
            let limit = if line_no == before.line {
                byte_of_column(text, before.column)
            } else {
                text.len() + 1
            };
            let found = text
                .match_indices(needle)
                .map(|(b, _)| b)
                .take_while(|&b| b < limit)
                .last();
            if let Some(idx) = found {
                return Some(Position::new(line_no, column_of_byte(text, idx)));
            }
        }
        None
    }
}

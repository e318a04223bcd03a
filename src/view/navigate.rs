use serde::{Deserialize, Serialize};

use super::host::{Position, TextView};
use crate::scanner::patterns::{GAME_INSTANCE_MARKER, TRACEBACK_MARKER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Discrete navigation commands offered by the host's side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigateTarget {
    NextError,
    PrevError,
    NextInstance,
    PrevInstance,
}

impl NavigateTarget {
    pub fn marker(self) -> &'static str {
        match self {
            NavigateTarget::NextError | NavigateTarget::PrevError => TRACEBACK_MARKER,
            NavigateTarget::NextInstance | NavigateTarget::PrevInstance => GAME_INSTANCE_MARKER,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            NavigateTarget::NextError | NavigateTarget::NextInstance => Direction::Forward,
            NavigateTarget::PrevError | NavigateTarget::PrevInstance => Direction::Backward,
        }
    }
}

/// Nearest occurrence of `marker` from the cursor in `direction`.
///
/// Forward never re-matches the occurrence the cursor sits on, so repeated
/// calls always make progress; past the last occurrence every call returns
/// `None` (no wraparound). Does not move the cursor itself.
pub fn navigate(view: &dyn TextView, marker: &str, direction: Direction) -> Option<Position> {
    let cursor = view.cursor();
    match direction {
        Direction::Forward => view.find_next(marker, cursor),
        Direction::Backward => view.find_prev(marker, cursor),
    }
}

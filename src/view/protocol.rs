use serde::{Deserialize, Serialize};

use super::host::{NoticeLevel, Position};
use super::hover::HoverCard;
use crate::annotate::{Annotations, CopyBlockAction, Decoration, InlayHint, COPY_ACTION_TITLE};

/// One message pushed to the host view, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewMessage {
    pub seq: u64,
    #[serde(flatten)]
    pub event: ViewEvent,
}

/// Host-facing events. Each overlay push fully replaces the previous set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ViewEvent {
    Overlays {
        decorations: Vec<Decoration>,
        hints: Vec<InlayHint>,
        actions: Vec<ActionDescriptor>,
    },
    Hover {
        card: Option<HoverCard>,
    },
    CursorMoved {
        position: Position,
    },
    IconResolved {
        id: String,
        url: String,
    },
    Notice {
        level: NoticeLevel,
        message: String,
    },
}

/// Registration payload for one code action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub title: String,
    pub start_line: usize,
    pub end_line: usize,
}

impl From<&CopyBlockAction> for ActionDescriptor {
    fn from(action: &CopyBlockAction) -> Self {
        Self {
            title: COPY_ACTION_TITLE.to_string(),
            start_line: action.start_line,
            end_line: action.end_line,
        }
    }
}

/// Overlay replacement event for one aggregation pass.
pub fn overlays_event(annotations: &Annotations) -> ViewEvent {
    ViewEvent::Overlays {
        decorations: annotations.decorations.clone(),
        hints: annotations.hints.clone(),
        actions: annotations.actions.iter().map(Into::into).collect(),
    }
}

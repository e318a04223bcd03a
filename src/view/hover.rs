use serde::{Deserialize, Serialize};

use super::host::column_of_byte;
use crate::annotate::AddonRegistry;
use crate::icons::{IconCache, IconState};
use crate::scanner::patterns::{MAX_LINE_LEN, WORKSHOP_TOKEN_RE};

/// "More info" affordance carrying the reference id back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceAction {
    pub id: String,
}

/// Card shown for a reference token under the pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverCard {
    pub id: String,
    /// Absent while resolution is pending or permanently failed.
    pub icon_url: Option<String>,
    /// Absent when the registry does not know the id.
    pub display_name: Option<String>,
    /// Absent for ids outside the resolvable shape.
    pub more_info: Option<ReferenceAction>,
}

/// Card for the reference token spanning `column` of `line_text`, if any.
///
/// Never blocks: a still-pending icon is simply omitted from the card and
/// shows up on a later redisplay once the cache has pumped the completion.
pub fn hover_at(
    line_text: &str,
    column: usize,
    icons: &mut IconCache,
    registry: &AddonRegistry,
) -> Option<HoverCard> {
    if line_text.len() >= MAX_LINE_LEN {
        return None;
    }
    for captures in WORKSHOP_TOKEN_RE.captures_iter(line_text) {
        let token = captures.get(0)?;
        let start_column = column_of_byte(line_text, token.start());
        let width = token.as_str().chars().count();
        if column < start_column || column >= start_column + width {
            continue;
        }

        let id = captures.get(1)?.as_str().to_string();
        let state = icons.resolve(&id);
        let resolvable = state != IconState::NotAReference;
        let icon_url = match state {
            IconState::Ready(url) => Some(url),
            _ => None,
        };
        let display_name = if resolvable {
            registry
                .lookup_by_workshop_id(&id)
                .map(|info| info.display_name.clone())
        } else {
            None
        };
        let more_info = resolvable.then(|| ReferenceAction { id: id.clone() });

        return Some(HoverCard {
            id,
            icon_url,
            display_name,
            more_info,
        });
    }
    None
}

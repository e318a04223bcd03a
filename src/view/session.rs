use std::sync::Arc;

use super::host::{Clipboard, Notifier, Position, TextView};
use super::hover::{hover_at, HoverCard};
use super::navigate::{navigate, NavigateTarget};
use super::protocol::{overlays_event, ViewEvent, ViewMessage};
use crate::annotate::{aggregate, AddonRegistry, Annotations};
use crate::icons::{IconCache, IconFetcher, IconState};
use crate::scanner::{scan, ScanResult};

/// Facade tying the engine together for one host view.
///
/// Owns the add-on registry and the icon cache; the host owns the raw text
/// and passes its view into each call. Scan output is rebuilt wholesale on
/// every `load`, while the icon cache lives for the whole session.
pub struct AnnotationSession {
    registry: AddonRegistry,
    icons: IconCache,
    scan: ScanResult,
    annotations: Annotations,
    seq: u64,
}

impl AnnotationSession {
    pub fn new(registry: AddonRegistry, fetcher: Arc<dyn IconFetcher>) -> Self {
        Self {
            registry,
            icons: IconCache::new(fetcher),
            scan: ScanResult::default(),
            annotations: Annotations::default(),
            seq: 0,
        }
    }

    /// Scan the document and recompute every overlay set, in that order.
    /// Hover and navigation answers are valid for the loaded document only
    /// after this returns.
    pub fn load(&mut self, view: &dyn TextView) {
        let lines: Vec<&str> = (1..=view.line_count())
            .map(|n| view.line(n).unwrap_or(""))
            .collect();
        self.scan = scan(&lines);
        self.annotations = aggregate(&self.scan, &self.registry);
        log::info!(
            "scanned {} lines: {} blocks, {} frames",
            lines.len(),
            self.scan.blocks.len(),
            self.scan.frames.len()
        );
    }

    pub fn scan_result(&self) -> &ScanResult {
        &self.scan
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn registry(&self) -> &AddonRegistry {
        &self.registry
    }

    /// Overlay replacement message for the current document.
    pub fn overlay_message(&mut self) -> ViewMessage {
        let event = overlays_event(&self.annotations);
        self.message(event)
    }

    /// Card for the reference token under `position`, if any.
    pub fn hover(&mut self, view: &dyn TextView, position: Position) -> Option<HoverCard> {
        let text = view.line(position.line)?;
        hover_at(text, position.column, &mut self.icons, &self.registry)
    }

    /// Move the cursor to the nearest occurrence for `target`; `None`
    /// leaves the cursor untouched.
    pub fn navigate(&self, view: &mut dyn TextView, target: NavigateTarget) -> Option<Position> {
        let found = navigate(view, target.marker(), target.direction())?;
        view.set_cursor(found);
        Some(found)
    }

    /// Run the copy action with the given index against the host clipboard.
    /// Returns false when the index does not name a current action.
    pub fn invoke_copy_action(
        &self,
        index: usize,
        view: &dyn TextView,
        clipboard: &mut dyn Clipboard,
        notifier: &mut dyn Notifier,
    ) -> bool {
        match self.annotations.actions.get(index) {
            Some(action) => {
                action.invoke(view, clipboard, notifier);
                true
            }
            None => false,
        }
    }

    pub fn resolve_icon(&mut self, id: &str) -> IconState {
        self.icons.resolve(id)
    }

    /// Apply queued icon completions; cheap no-op when nothing changed.
    pub fn pump_icons(&mut self) -> usize {
        self.icons.pump()
    }

    pub fn icons_mut(&mut self) -> &mut IconCache {
        &mut self.icons
    }

    fn message(&mut self, event: ViewEvent) -> ViewMessage {
        self.seq += 1;
        ViewMessage {
            seq: self.seq,
            event,
        }
    }
}

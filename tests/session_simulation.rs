// Simulates the host-view side of a session: icon resolution, hover
// cards, navigation commands and overlay pushes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log_annotator::error::Error;
use log_annotator::icons::{IconCache, IconFetcher, IconState};

const PUMP_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetcher double resolving from a fixed table; anything else fails.
struct MapFetcher {
    urls: HashMap<String, String>,
    calls: AtomicUsize,
}

impl MapFetcher {
    fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            urls: entries
                .iter()
                .map(|(id, url)| (id.to_string(), url.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn empty() -> Self {
        Self::new(&[])
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IconFetcher for MapFetcher {
    fn fetch_icon_url(&self, id: &str) -> Result<String, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.get(id).cloned().ok_or_else(|| Error::Fetch {
            id: id.to_string(),
            reason: "no such item".to_string(),
        })
    }
}

#[cfg(test)]
mod icon_cache_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_invalid_ids_never_reach_the_fetcher() {
        let fetcher = Arc::new(MapFetcher::empty());
        let mut cache = IconCache::new(fetcher.clone());

        for id in ["12", "", "1234", "1234567890123456", "12a45"] {
            assert_eq!(cache.resolve(id), IconState::NotAReference);
        }
        assert_eq!(fetcher.calls(), 0, "No fetch for inert ids");
        assert_eq!(cache.failure_count("12"), 0, "No entry for inert ids");
    }

    #[test]
    fn test_resolution_success_is_terminal() {
        let fetcher = Arc::new(MapFetcher::new(&[("123456789", "https://example.com/icon.png")]));
        let mut cache = IconCache::new(fetcher.clone());

        assert_eq!(cache.resolve("123456789"), IconState::Pending);
        assert_eq!(cache.pump_blocking(PUMP_TIMEOUT), 1);
        assert_eq!(
            cache.resolve("123456789"),
            IconState::Ready("https://example.com/icon.png".to_string())
        );
        // Terminal: further resolves answer from cache.
        cache.resolve("123456789");
        assert_eq!(fetcher.calls(), 1);
    }

    #[test]
    fn test_at_most_one_fetch_in_flight() {
        let fetcher = Arc::new(MapFetcher::new(&[("123456789", "u")]));
        let mut cache = IconCache::new(fetcher.clone());

        assert_eq!(cache.resolve("123456789"), IconState::Pending);
        assert_eq!(cache.resolve("123456789"), IconState::Pending);
        assert_eq!(cache.resolve("123456789"), IconState::Pending);
        cache.pump_blocking(PUMP_TIMEOUT);
        assert_eq!(fetcher.calls(), 1, "Pending ids must not re-trigger");
    }

    #[test]
    fn test_six_failures_abandon_the_id() {
        let fetcher = Arc::new(MapFetcher::empty());
        let mut cache = IconCache::new(fetcher.clone());

        for attempt in 1..=6 {
            assert_eq!(
                cache.resolve("99999"),
                IconState::Pending,
                "attempt {} should still retry",
                attempt
            );
            assert_eq!(cache.pump_blocking(PUMP_TIMEOUT), 1);
            assert_eq!(cache.failure_count("99999"), attempt);
        }

        assert_eq!(cache.resolve("99999"), IconState::Unavailable);
        assert_eq!(cache.resolve("99999"), IconState::Unavailable);
        assert_eq!(fetcher.calls(), 6, "No fetch past the failure ceiling");
    }

    #[test]
    fn test_pump_is_a_cheap_noop_when_idle() {
        let fetcher = Arc::new(MapFetcher::empty());
        let mut cache = IconCache::new(fetcher);
        assert_eq!(cache.pump(), 0);
        assert_eq!(cache.pump(), 0);
    }

    #[test]
    fn test_subscriber_fires_on_resolution() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let fetcher = Arc::new(MapFetcher::new(&[("123456789", "https://example.com/i.png")]));
        let mut cache = IconCache::new(fetcher);

        let seen: Rc<RefCell<Vec<(String, String)>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        cache.subscribe(move |id, url| {
            sink.borrow_mut().push((id.to_string(), url.to_string()));
        });

        cache.resolve("123456789");
        cache.pump_blocking(PUMP_TIMEOUT);
        // A later resolve answers from cache and must not re-fire.
        cache.resolve("123456789");
        cache.pump();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1, "Listener fires exactly once per id");
        assert_eq!(seen[0].0, "123456789");
        assert_eq!(seen[0].1, "https://example.com/i.png");
    }
}

#[cfg(test)]
mod hover_tests {
    use super::*;
    use log_annotator::annotate::{AddonInfo, AddonRegistry};
    use log_annotator::view::hover_at;
    use pretty_assertions::assert_eq;

    fn registry_with_craft_pot() -> AddonRegistry {
        let mut registry = AddonRegistry::new();
        registry.insert(AddonInfo {
            dir: "workshop-123456789".to_string(),
            display_name: "Craft Pot".to_string(),
            version: None,
            workshop_id: Some("123456789".to_string()),
        });
        registry
    }

    #[test]
    fn test_card_for_token_under_pointer() {
        let fetcher = Arc::new(MapFetcher::new(&[("123456789", "https://example.com/i.png")]));
        let mut cache = IconCache::new(fetcher);
        let registry = registry_with_craft_pot();
        let line = "Loading workshop-123456789 now";

        // Token spans columns 9..27 (half-open).
        let card = hover_at(line, 9, &mut cache, &registry).expect("card at token start");
        assert_eq!(card.id, "123456789");
        assert_eq!(card.display_name.as_deref(), Some("Craft Pot"));
        assert!(card.more_info.is_some());
        assert_eq!(card.icon_url, None, "Icon still pending on first hover");

        assert!(hover_at(line, 26, &mut cache, &registry).is_some());
        assert!(hover_at(line, 27, &mut cache, &registry).is_none());
        assert!(hover_at(line, 8, &mut cache, &registry).is_none());
    }

    #[test]
    fn test_icon_appears_on_redisplay_after_resolution() {
        let fetcher = Arc::new(MapFetcher::new(&[("123456789", "https://example.com/i.png")]));
        let mut cache = IconCache::new(fetcher);
        let registry = registry_with_craft_pot();
        let line = "Loading workshop-123456789 now";

        assert!(hover_at(line, 10, &mut cache, &registry)
            .expect("card")
            .icon_url
            .is_none());
        cache.pump_blocking(PUMP_TIMEOUT);
        let card = hover_at(line, 10, &mut cache, &registry).expect("card");
        assert_eq!(card.icon_url.as_deref(), Some("https://example.com/i.png"));
    }

    #[test]
    fn test_short_ids_are_inert_but_still_carded() {
        let fetcher = Arc::new(MapFetcher::empty());
        let mut cache = IconCache::new(fetcher.clone());
        let registry = AddonRegistry::new();
        let line = "see workshop-12 there";

        let card = hover_at(line, 6, &mut cache, &registry).expect("card");
        assert_eq!(card.id, "12");
        assert_eq!(card.icon_url, None);
        assert_eq!(card.display_name, None);
        assert!(card.more_info.is_none(), "Inert ids offer no more-info");
        assert_eq!(fetcher.calls(), 0);
    }

    #[test]
    fn test_no_card_off_token() {
        let fetcher = Arc::new(MapFetcher::empty());
        let mut cache = IconCache::new(fetcher);
        let registry = AddonRegistry::new();
        assert!(hover_at("nothing to see here", 5, &mut cache, &registry).is_none());
    }
}

#[cfg(test)]
mod navigation_tests {
    use log_annotator::view::{navigate, Direction, LogDocument, Position, TextView};
    use pretty_assertions::assert_eq;

    const MARKER: &str = "LUA ERROR stack traceback:";

    fn sample_doc() -> LogDocument {
        LogDocument::from_lines([
            "[0:0:0]: Starting up",
            "cGame::StartPlaying",
            "LUA ERROR stack traceback:",
            "scripts/frontend.lua:10 in ()",
            "[0:0:5]: boot",
            "LUA ERROR stack traceback:",
            "done",
        ])
    }

    #[test]
    fn test_forward_navigation_makes_progress() {
        let mut doc = sample_doc();
        let first = navigate(&doc, MARKER, Direction::Forward).expect("first match");
        assert_eq!(first, Position::new(3, 1));
        doc.set_cursor(first);

        // From the matched occurrence, forward never re-matches it.
        let second = navigate(&doc, MARKER, Direction::Forward).expect("second match");
        assert_eq!(second, Position::new(6, 1));
    }

    #[test]
    fn test_forward_navigation_never_wraps() {
        let mut doc = sample_doc();
        doc.set_cursor(Position::new(6, 1));
        assert_eq!(navigate(&doc, MARKER, Direction::Forward), None);
        // Repeated calls keep refusing instead of looping to the start.
        assert_eq!(navigate(&doc, MARKER, Direction::Forward), None);
    }

    #[test]
    fn test_backward_navigation() {
        let mut doc = sample_doc();
        doc.set_cursor(Position::new(6, 1));
        assert_eq!(
            navigate(&doc, MARKER, Direction::Backward),
            Some(Position::new(3, 1))
        );

        doc.set_cursor(Position::new(3, 1));
        assert_eq!(
            navigate(&doc, MARKER, Direction::Backward),
            None,
            "The occurrence under the cursor is not strictly before it"
        );
    }

    #[test]
    fn test_instance_marker_navigation() {
        let mut doc = sample_doc();
        doc.set_cursor(Position::new(7, 1));
        assert_eq!(
            navigate(&doc, "cGame::StartPlaying", Direction::Backward),
            Some(Position::new(2, 1))
        );
    }

    #[test]
    fn test_matches_within_a_single_line() {
        let doc = LogDocument::from_lines(["workshop-111 and workshop-222"]);
        let next = doc.find_next("workshop-", Position::new(1, 1));
        assert_eq!(
            next,
            Some(Position::new(1, 18)),
            "The occurrence at the cursor itself is skipped"
        );
        let back = doc.find_prev("workshop-", Position::new(1, 18));
        assert_eq!(back, Some(Position::new(1, 1)));
    }

    #[test]
    fn test_cursor_stays_inside_bounds() {
        let mut doc = sample_doc();
        doc.set_cursor(Position::new(999, 999));
        let cursor = doc.cursor();
        assert!(cursor.line >= 1 && cursor.line <= doc.line_count());
        let width = doc.line(cursor.line).unwrap().chars().count();
        assert!(cursor.column >= 1 && cursor.column <= width + 1);
    }
}

#[cfg(test)]
mod session_tests {
    use super::*;
    use log_annotator::summary::LogSummary;
    use log_annotator::view::{
        AnnotationSession, LogDocument, NavigateTarget, Position, TextView, ViewEvent,
    };
    use pretty_assertions::assert_eq;

    const LOG: &str = "\
[00:00:00]: Don't Starve Together: 654321 WIN32_STEAM
[00:00:02]: Loading mod: workshop-123456789 (Craft Pot) Version:0.15.0
[00:00:03]: cGame::StartPlaying
LUA ERROR stack traceback:
scripts/main.lua:10 in (...)
../mods/workshop-123456789/modmain.lua:5
[00:00:09]: recovered";

    fn load_session() -> (LogDocument, AnnotationSession) {
        let lines: Vec<&str> = LOG.lines().collect();
        let registry = LogSummary::scan(&lines).addon_registry();
        let doc = LogDocument::from_text(LOG);
        let mut session = AnnotationSession::new(registry, Arc::new(MapFetcher::empty()));
        session.load(&doc);
        (doc, session)
    }

    #[test]
    fn test_load_produces_full_overlay_sets() {
        let (_doc, mut session) = load_session();
        assert_eq!(session.scan_result().blocks.len(), 1);

        let message = session.overlay_message();
        assert_eq!(message.seq, 1);
        match message.event {
            ViewEvent::Overlays {
                decorations,
                hints,
                actions,
            } => {
                assert_eq!(decorations.len(), 4, "1 block + 3 line decorations");
                assert_eq!(hints.len(), 2);
                assert_eq!(hints[1].label, "In Add-on: Craft Pot");
                assert_eq!(actions.len(), 1);
                assert_eq!(actions[0].title, "Copy Error Messages");
            }
            other => panic!("expected overlay event, got {:?}", other),
        }
    }

    #[test]
    fn test_reload_replaces_overlays_wholesale() {
        let (_doc, mut session) = load_session();
        let first = session.overlay_message();

        let empty = LogDocument::from_text("[00:00:00]: quiet session\n");
        session.load(&empty);
        let second = session.overlay_message();

        assert_eq!(second.seq, first.seq + 1);
        match second.event {
            ViewEvent::Overlays {
                decorations,
                hints,
                actions,
            } => {
                assert!(decorations.is_empty());
                assert!(hints.is_empty());
                assert!(actions.is_empty());
            }
            other => panic!("expected overlay event, got {:?}", other),
        }
    }

    #[test]
    fn test_navigation_moves_the_cursor() {
        let (mut doc, session) = load_session();
        let target = session
            .navigate(&mut doc, NavigateTarget::NextError)
            .expect("error marker present");
        assert_eq!(target, Position::new(4, 1));
        assert_eq!(doc.cursor(), target);

        assert_eq!(session.navigate(&mut doc, NavigateTarget::NextError), None);
        assert_eq!(doc.cursor(), target, "Failed navigation leaves the cursor");
    }

    #[test]
    fn test_hover_through_session() {
        let (doc, mut session) = load_session();
        // Line 6 contains the add-on source path with the workshop token.
        let card = session
            .hover(&doc, Position::new(6, 12))
            .expect("token under pointer");
        assert_eq!(card.id, "123456789");
        assert_eq!(card.display_name.as_deref(), Some("Craft Pot"));
    }
}

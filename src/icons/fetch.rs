use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use crate::error::Error;

/// External resolver mapping a workshop id to an icon URL.
///
/// Implementations may take arbitrarily long; they are always invoked on a
/// worker thread, never on the scan/render path.
pub trait IconFetcher: Send + Sync {
    fn fetch_icon_url(&self, id: &str) -> Result<String, Error>;
}

/// Fetcher used when no resolver is wired up; every id stays unresolved
/// and icon display degrades silently.
pub struct NullFetcher;

impl IconFetcher for NullFetcher {
    fn fetch_icon_url(&self, id: &str) -> Result<String, Error> {
        Err(Error::Fetch {
            id: id.to_string(),
            reason: "icon resolution disabled".to_string(),
        })
    }
}

/// Completion of one fetch attempt, delivered over the cache channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FetchOutcome {
    Resolved { id: String, url: String },
    Failed { id: String },
}

/// Run one fetch on a fresh worker thread, reporting through `tx`.
/// The receiver applies outcomes on its own thread; a dropped receiver
/// just discards the result.
pub(crate) fn spawn_fetch(fetcher: Arc<dyn IconFetcher>, id: String, tx: Sender<FetchOutcome>) {
    thread::spawn(move || {
        let outcome = match fetcher.fetch_icon_url(&id) {
            Ok(url) => FetchOutcome::Resolved { id, url },
            Err(e) => {
                log::debug!("icon fetch failed: {e}");
                FetchOutcome::Failed { id }
            }
        };
        let _ = tx.send(outcome);
    });
}

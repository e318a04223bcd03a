use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use super::fetch::{spawn_fetch, FetchOutcome, IconFetcher};
use crate::scanner::patterns::WORKSHOP_ID_RE;

/// Recorded failures above this count abandon the id for the session.
const FAILURE_CEILING: u32 = 5;

/// Answer of a single non-blocking `resolve` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconState {
    /// Terminal: cached for the life of the session.
    Ready(String),
    /// A fetch is in flight (or was just started); ask again later.
    Pending,
    /// Failed more than the ceiling allows; never retried this session.
    Unavailable,
    /// The id does not have the 5-15 digit shape; no entry was created.
    NotAReference,
}

/// Callback fired once per id when it transitions to resolved.
type ResolvedListener = Box<dyn Fn(&str, &str)>;

/// Pull-driven icon-resolution cache with bounded retries.
///
/// `resolve` never blocks: unresolved ids kick an asynchronous fetch and
/// report `Pending`. Completions come back over an mpsc channel and are
/// applied only by `pump`/`pump_blocking` on the owning thread, so all
/// cache state is mutated from a single place.
pub struct IconCache {
    fetcher: Arc<dyn IconFetcher>,
    resolved: HashMap<String, String>,
    failures: HashMap<String, u32>,
    pending: HashSet<String>,
    tx: Sender<FetchOutcome>,
    rx: Receiver<FetchOutcome>,
    listeners: Vec<ResolvedListener>,
}

impl IconCache {
    pub fn new(fetcher: Arc<dyn IconFetcher>) -> Self {
        let (tx, rx) = channel();
        Self {
            fetcher,
            resolved: HashMap::new(),
            failures: HashMap::new(),
            pending: HashSet::new(),
            tx,
            rx,
            listeners: Vec::new(),
        }
    }

    /// Current state of `id`, starting at most one fetch if it is untried
    /// or retry-eligible. Retries happen only on renewed calls; there is
    /// no timer.
    pub fn resolve(&mut self, id: &str) -> IconState {
        if !WORKSHOP_ID_RE.is_match(id) {
            return IconState::NotAReference;
        }
        if let Some(url) = self.resolved.get(id) {
            return IconState::Ready(url.clone());
        }
        if self.failures.get(id).copied().unwrap_or(0) > FAILURE_CEILING {
            return IconState::Unavailable;
        }
        if self.pending.contains(id) {
            return IconState::Pending;
        }
        self.pending.insert(id.to_string());
        spawn_fetch(self.fetcher.clone(), id.to_string(), self.tx.clone());
        IconState::Pending
    }

    /// Register a callback fired exactly once per id on the transition to
    /// resolved, with `(id, url)`. Replaces the host's polling refresh.
    pub fn subscribe(&mut self, listener: impl Fn(&str, &str) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply all queued completions; cheap no-op when nothing arrived.
    /// Returns the number of completions applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.rx.try_recv() {
            self.apply(outcome);
            applied += 1;
        }
        applied
    }

    /// Like `pump`, but waits up to `timeout` for the first completion.
    pub fn pump_blocking(&mut self, timeout: Duration) -> usize {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => {
                self.apply(outcome);
                1 + self.pump()
            }
            Err(_) => 0,
        }
    }

    /// Number of failed attempts recorded for `id`.
    pub fn failure_count(&self, id: &str) -> u32 {
        self.failures.get(id).copied().unwrap_or(0)
    }

    fn apply(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Resolved { id, url } => {
                self.pending.remove(&id);
                // A completion arriving after the id already reached a
                // terminal state must not overwrite it.
                if self.resolved.contains_key(&id)
                    || self.failures.get(&id).copied().unwrap_or(0) > FAILURE_CEILING
                {
                    return;
                }
                self.failures.remove(&id);
                self.resolved.insert(id.clone(), url.clone());
                log::debug!("icon resolved: {id}");
                for listener in &self.listeners {
                    listener(&id, &url);
                }
            }
            FetchOutcome::Failed { id } => {
                self.pending.remove(&id);
                if self.resolved.contains_key(&id) {
                    return;
                }
                let count = self.failures.entry(id.clone()).or_insert(0);
                *count += 1;
                if *count > FAILURE_CEILING {
                    log::debug!("icon resolution abandoned for {id}");
                }
            }
        }
    }
}

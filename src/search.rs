//! Incremental product search
//!
//! Turns keystrokes into live suggestions from the shop's search endpoint.
//! Requests run on background threads and report back over a channel; each
//! request carries a sequence number so a slow reply for an old query can
//! never overwrite the results of a newer one.
//!
//! The session is constructed with an explicit backend handle and torn
//! down with [`SearchSession::detach`], so several sessions can coexist.

use crate::api::ProductSummary;
use crate::error::Result;
use crate::logging;
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::Deserialize;
use std::sync::Arc;
use std::thread;

/// Behaviour knobs for one search box.
///
/// The defaults match the shop header search: queries of three or more
/// characters hit the server, at most five hits render, and an empty
/// result set falls back to a browse-the-catalog link.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Queries this short (after trimming) clear the dropdown instead of
    /// hitting the server
    pub min_query_length: usize,
    /// Maximum hits rendered
    pub max_results: usize,
    /// Route prefix for product links
    pub product_route: String,
    /// Fallback link target when nothing matches
    pub catalog_route: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_length: 2,
            max_results: 5,
            product_route: "/product/".to_string(),
            catalog_route: "/shop/".to_string(),
        }
    }
}

/// Where a search request is answered from
pub trait SearchBackend: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<ProductSummary>>;
}

/// One rendered suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub name: String,
    pub href: String,
}

/// Render target beneath the search input
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Dropdown {
    #[default]
    Hidden,
    Results(Vec<SearchHit>),
    /// Nothing matched; a single "browse all" link renders instead
    NoMatches {
        browse_all: String,
    },
}

impl Dropdown {
    pub fn is_hidden(&self) -> bool {
        matches!(self, Dropdown::Hidden)
    }

    /// Number of selectable rows rendered
    pub fn len(&self) -> usize {
        match self {
            Dropdown::Hidden => 0,
            Dropdown::Results(hits) => hits.len(),
            Dropdown::NoMatches { .. } => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Link target for the Enter key: the first rendered row
    pub fn first_link(&self) -> Option<&str> {
        match self {
            Dropdown::Hidden => None,
            Dropdown::Results(hits) => hits.first().map(|h| h.href.as_str()),
            Dropdown::NoMatches { browse_all } => Some(browse_all.as_str()),
        }
    }

    /// Link target for a highlighted row
    pub fn link_at(&self, index: usize) -> Option<&str> {
        match self {
            Dropdown::Hidden => None,
            Dropdown::Results(hits) => hits.get(index).map(|h| h.href.as_str()),
            Dropdown::NoMatches { browse_all } if index == 0 => Some(browse_all.as_str()),
            Dropdown::NoMatches { .. } => None,
        }
    }
}

struct Reply {
    seq: u64,
    query: String,
    outcome: Result<Vec<ProductSummary>>,
}

/// A live search box bound to one backend.
///
/// `submit` issues (or suppresses) a request for the current input text;
/// `poll` drains finished requests and updates the dropdown. Both are
/// called from the UI thread.
pub struct SearchSession {
    config: SearchConfig,
    backend: Arc<dyn SearchBackend>,
    seq: u64,
    tx: Sender<Reply>,
    rx: Receiver<Reply>,
    dropdown: Dropdown,
    stale_dropped: u64,
    detached: bool,
}

impl SearchSession {
    pub fn new(config: SearchConfig, backend: Arc<dyn SearchBackend>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            config,
            backend,
            seq: 0,
            tx,
            rx,
            dropdown: Dropdown::Hidden,
            stale_dropped: 0,
            detached: false,
        }
    }

    pub fn dropdown(&self) -> &Dropdown {
        &self.dropdown
    }

    /// Replies discarded because a newer query had been issued
    pub fn stale_dropped(&self) -> u64 {
        self.stale_dropped
    }

    /// Re-evaluate the input text after a keystroke.
    ///
    /// Short queries hide the dropdown without touching the network. The
    /// sequence number advances either way, so replies still in flight for
    /// the previous text are already stale.
    pub fn submit(&mut self, raw: &str) {
        if self.detached {
            return;
        }

        let query = raw.trim();
        self.seq += 1;

        if query.chars().count() <= self.config.min_query_length {
            self.dropdown = Dropdown::Hidden;
            return;
        }

        let seq = self.seq;
        let query = query.to_string();
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();

        thread::spawn(move || {
            let outcome = backend.search(&query);
            // Session may have been detached meanwhile
            let _ = tx.send(Reply { seq, query, outcome });
        });
    }

    /// Drain finished requests. Returns true if the dropdown changed.
    pub fn poll(&mut self) -> bool {
        if self.detached {
            return false;
        }

        let mut changed = false;
        let replies: Vec<Reply> = self.rx.try_iter().collect();

        for reply in replies {
            if reply.seq != self.seq {
                self.stale_dropped += 1;
                logging::debug(
                    "SEARCH",
                    &format!("dropped stale reply for '{}'", reply.query),
                );
                continue;
            }

            match reply.outcome {
                Ok(products) if products.is_empty() => {
                    self.dropdown = Dropdown::NoMatches {
                        browse_all: self.config.catalog_route.clone(),
                    };
                }
                Ok(products) => {
                    let hits = products
                        .into_iter()
                        .take(self.config.max_results)
                        .map(|p| SearchHit {
                            href: format!("{}{}", self.config.product_route, p.slug),
                            name: p.name,
                        })
                        .collect();
                    self.dropdown = Dropdown::Results(hits);
                }
                Err(e) => {
                    // Stale content must not outlive a failed refresh
                    logging::error(
                        "SEARCH",
                        &format!("search for '{}' failed: {}", reply.query, e),
                    );
                    self.dropdown = Dropdown::Hidden;
                }
            }
            changed = true;
        }

        changed
    }

    /// Tear the session down: pending and future replies are ignored and
    /// the dropdown is cleared.
    pub fn detach(&mut self) {
        self.detached = true;
        self.dropdown = Dropdown::Hidden;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TackleError;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    fn hit(name: &str, slug: &str) -> ProductSummary {
        ProductSummary {
            name: name.to_string(),
            slug: slug.to_string(),
        }
    }

    /// Backend that answers each expected query only when the test says so
    struct GatedBackend {
        gates: Mutex<HashMap<String, mpsc::Receiver<Result<Vec<ProductSummary>>>>>,
    }

    impl GatedBackend {
        fn new() -> (Arc<Self>, GateControl) {
            let backend = Arc::new(Self {
                gates: Mutex::new(HashMap::new()),
            });
            (Arc::clone(&backend), GateControl { backend })
        }
    }

    struct GateControl {
        backend: Arc<GatedBackend>,
    }

    impl GateControl {
        fn expect(&self, query: &str) -> mpsc::Sender<Result<Vec<ProductSummary>>> {
            let (tx, rx) = mpsc::channel();
            self.backend
                .gates
                .lock()
                .unwrap()
                .insert(query.to_string(), rx);
            tx
        }
    }

    impl SearchBackend for GatedBackend {
        fn search(&self, query: &str) -> Result<Vec<ProductSummary>> {
            let gate = self
                .gates
                .lock()
                .unwrap()
                .remove(query)
                .unwrap_or_else(|| panic!("unexpected query '{}'", query));
            gate.recv().unwrap()
        }
    }

    struct CountingBackend {
        calls: AtomicUsize,
    }

    impl SearchBackend for CountingBackend {
        fn search(&self, _query: &str) -> Result<Vec<ProductSummary>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![hit("Shimano Stradic", "shimano-stradic")])
        }
    }

    fn poll_until(session: &mut SearchSession, deadline: Duration, pred: impl Fn(&SearchSession) -> bool) {
        let start = Instant::now();
        while start.elapsed() < deadline {
            session.poll();
            if pred(session) {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("condition not reached within {:?}", deadline);
    }

    #[test]
    fn short_queries_never_hit_the_backend() {
        let backend = Arc::new(CountingBackend {
            calls: AtomicUsize::new(0),
        });
        let mut session = SearchSession::new(SearchConfig::default(), Arc::clone(&backend));

        session.submit("");
        session.submit("a");
        session.submit("ab");
        session.submit("  ab  ");

        assert!(session.dropdown().is_hidden());
        // Enter over a hidden dropdown has nothing to navigate to
        assert_eq!(session.dropdown().first_link(), None);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn results_render_as_product_links() {
        let (backend, control) = GatedBackend::new();
        let mut session = SearchSession::new(SearchConfig::default(), backend);

        let gate = control.expect("stradic");
        session.submit("stradic");
        gate.send(Ok(vec![
            hit("Shimano Stradic", "shimano-stradic"),
            hit("Stradic Spare Spool", "stradic-spare-spool"),
        ]))
        .unwrap();

        poll_until(&mut session, Duration::from_secs(2), |s| {
            !s.dropdown().is_hidden()
        });

        match session.dropdown() {
            Dropdown::Results(hits) => {
                assert_eq!(hits.len(), 2);
                assert_eq!(hits[0].href, "/product/shimano-stradic");
                assert_eq!(hits[1].href, "/product/stradic-spare-spool");
            }
            other => panic!("expected results, got {:?}", other),
        }
        assert_eq!(session.dropdown().first_link(), Some("/product/shimano-stradic"));
    }

    #[test]
    fn result_list_is_capped() {
        let (backend, control) = GatedBackend::new();
        let config = SearchConfig {
            max_results: 3,
            ..SearchConfig::default()
        };
        let mut session = SearchSession::new(config, backend);

        let gate = control.expect("rod");
        session.submit("rod");
        let many = (0..7).map(|i| hit(&format!("Rod {i}"), &format!("rod-{i}"))).collect();
        gate.send(Ok(many)).unwrap();

        poll_until(&mut session, Duration::from_secs(2), |s| {
            !s.dropdown().is_hidden()
        });
        assert_eq!(session.dropdown().len(), 3);
    }

    #[test]
    fn empty_results_fall_back_to_catalog_link() {
        let (backend, control) = GatedBackend::new();
        let mut session = SearchSession::new(SearchConfig::default(), backend);

        let gate = control.expect("xyzzy");
        session.submit("xyzzy");
        gate.send(Ok(vec![])).unwrap();

        poll_until(&mut session, Duration::from_secs(2), |s| {
            !s.dropdown().is_hidden()
        });

        assert_eq!(
            session.dropdown(),
            &Dropdown::NoMatches {
                browse_all: "/shop/".to_string()
            }
        );
        assert_eq!(session.dropdown().first_link(), Some("/shop/"));
    }

    #[test]
    fn late_reply_for_old_query_never_wins() {
        let (backend, control) = GatedBackend::new();
        let mut session = SearchSession::new(SearchConfig::default(), backend);

        let old_gate = control.expect("reel");
        let new_gate = control.expect("reels");

        session.submit("reel");
        session.submit("reels");

        // The newer query answers first
        new_gate.send(Ok(vec![hit("Reel B", "reel-b")])).unwrap();
        poll_until(&mut session, Duration::from_secs(2), |s| {
            !s.dropdown().is_hidden()
        });
        assert_eq!(session.dropdown().first_link(), Some("/product/reel-b"));

        // The older query answers late; its reply must be discarded
        old_gate.send(Ok(vec![hit("Reel A", "reel-a")])).unwrap();
        poll_until(&mut session, Duration::from_secs(2), |s| s.stale_dropped() == 1);
        assert_eq!(session.dropdown().first_link(), Some("/product/reel-b"));
    }

    #[test]
    fn clearing_the_input_invalidates_inflight_replies() {
        let (backend, control) = GatedBackend::new();
        let mut session = SearchSession::new(SearchConfig::default(), backend);

        let gate = control.expect("braid");
        session.submit("braid");
        session.submit(""); // user cleared the box before the reply landed

        assert!(session.dropdown().is_hidden());

        gate.send(Ok(vec![hit("Braid", "braid")])).unwrap();
        poll_until(&mut session, Duration::from_secs(2), |s| s.stale_dropped() == 1);
        assert!(session.dropdown().is_hidden());
    }

    #[test]
    fn failed_request_hides_stale_content() {
        let (backend, control) = GatedBackend::new();
        let mut session = SearchSession::new(SearchConfig::default(), backend);

        let gate = control.expect("lure");
        session.submit("lure");
        gate.send(Ok(vec![hit("Lure", "lure")])).unwrap();
        poll_until(&mut session, Duration::from_secs(2), |s| {
            !s.dropdown().is_hidden()
        });

        let gate = control.expect("lures");
        session.submit("lures");
        gate.send(Err(TackleError::Status {
            url: "http://shop.test/search/".to_string(),
            status: 502,
        }))
        .unwrap();

        poll_until(&mut session, Duration::from_secs(2), |s| {
            s.dropdown().is_hidden()
        });
    }

    #[test]
    fn detached_session_ignores_everything() {
        let backend = Arc::new(CountingBackend {
            calls: AtomicUsize::new(0),
        });
        let mut session = SearchSession::new(SearchConfig::default(), Arc::clone(&backend));

        session.detach();
        session.submit("stradic");
        assert!(!session.poll());
        assert!(session.dropdown().is_hidden());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }
}

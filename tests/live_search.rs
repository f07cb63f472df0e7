//! Live-search behaviour through the public API

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tacklefront::{ProductSummary, Result, SearchBackend, SearchConfig, SearchSession};

/// Backend that answers every query with one hit named after it
struct EchoBackend {
    calls: AtomicUsize,
}

impl SearchBackend for EchoBackend {
    fn search(&self, query: &str) -> Result<Vec<ProductSummary>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![ProductSummary {
            name: format!("Match for {}", query),
            slug: query.replace(' ', "-"),
        }])
    }
}

fn poll_until(session: &mut SearchSession, pred: impl Fn(&SearchSession) -> bool) {
    let start = Instant::now();
    while start.elapsed() < Duration::from_secs(2) {
        session.poll();
        if pred(session) {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("condition not reached");
}

#[test]
fn typing_a_query_settles_on_the_final_text() {
    let backend = Arc::new(EchoBackend {
        calls: AtomicUsize::new(0),
    });
    let mut session = SearchSession::new(SearchConfig::default(), Arc::clone(&backend));

    // Keystroke by keystroke: "s", "st", "str", "stra"
    for prefix in ["s", "st", "str", "stra"] {
        session.submit(prefix);
    }

    // Settles on the final text; the reply for "str" arrives but is stale
    poll_until(&mut session, |s| {
        s.stale_dropped() == 1 && s.dropdown().first_link() == Some("/product/stra")
    });

    // The two short prefixes never reached the backend
    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn deleting_back_below_the_threshold_clears_the_dropdown() {
    let backend = Arc::new(EchoBackend {
        calls: AtomicUsize::new(0),
    });
    let mut session = SearchSession::new(SearchConfig::default(), Arc::clone(&backend));

    // The user deletes back to "br" before the reply lands
    session.submit("braid");
    session.submit("br");
    assert!(session.dropdown().is_hidden());

    // The straggler reply for "braid" must not resurrect the dropdown
    poll_until(&mut session, |s| s.stale_dropped() == 1);
    assert!(session.dropdown().is_hidden());
}

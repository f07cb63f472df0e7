//! Autocomplete fields with inline validation warnings
//!
//! Brand and category inputs complete against the shop's suggestion
//! endpoints. A value that was typed rather than chosen from the
//! suggestions is cleared on commit and flagged with the field's warning,
//! so only known brands/categories ever reach the server.
//!
//! Replies carry the same sequence tagging as the product search: a slow
//! suggestion list for an old term never replaces a newer one.

use crate::error::Result;
use crate::logging;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::thread;

/// Which suggestion endpoint a field completes against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    Brands,
    Categories,
}

impl SuggestionKind {
    pub fn label(&self) -> &'static str {
        match self {
            SuggestionKind::Brands => "Brand",
            SuggestionKind::Categories => "Category",
        }
    }

    /// Inline warning shown when the field holds no chosen suggestion
    pub fn warning_text(&self) -> &'static str {
        match self {
            SuggestionKind::Brands => "Please pick a brand from the suggestions",
            SuggestionKind::Categories => "Please pick a category from the suggestions",
        }
    }
}

/// Where suggestion terms are answered from
pub trait SuggestionSource: Send + Sync {
    fn suggest(&self, kind: SuggestionKind, term: &str) -> Result<Vec<String>>;
}

struct Reply {
    seq: u64,
    term: String,
    outcome: Result<Vec<String>>,
}

/// One autocomplete input plus its warning element
pub struct AutocompleteField {
    kind: SuggestionKind,
    source: Arc<dyn SuggestionSource>,
    min_term_length: usize,
    value: String,
    suggestions: Vec<String>,
    warning: bool,
    seq: u64,
    tx: Sender<Reply>,
    rx: Receiver<Reply>,
}

impl AutocompleteField {
    pub fn new(kind: SuggestionKind, source: Arc<dyn SuggestionSource>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            kind,
            source,
            min_term_length: 1,
            value: String::new(),
            suggestions: Vec::new(),
            warning: false,
            seq: 0,
            tx,
            rx,
        }
    }

    pub fn kind(&self) -> SuggestionKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn warning_visible(&self) -> bool {
        self.warning
    }

    pub(crate) fn show_warning(&mut self) {
        self.warning = true;
    }

    /// Update the field text after a keystroke; fetches suggestions once
    /// the trimmed term is long enough
    pub fn input(&mut self, text: &str) {
        self.value = text.to_string();
        self.seq += 1;

        let term = text.trim();
        if term.chars().count() < self.min_term_length {
            self.suggestions.clear();
            return;
        }

        let seq = self.seq;
        let term = term.to_string();
        let kind = self.kind;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        thread::spawn(move || {
            let outcome = source.suggest(kind, &term);
            let _ = tx.send(Reply { seq, term, outcome });
        });
    }

    /// Drain finished suggestion requests. Returns true on change.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        let replies: Vec<Reply> = self.rx.try_iter().collect();

        for reply in replies {
            if reply.seq != self.seq {
                continue;
            }
            match reply.outcome {
                Ok(list) => self.suggestions = list,
                Err(e) => {
                    logging::error(
                        "FORMS",
                        &format!(
                            "{} suggestions for '{}' failed: {}",
                            self.kind.label(),
                            reply.term,
                            e
                        ),
                    );
                    self.suggestions.clear();
                }
            }
            changed = true;
        }

        changed
    }

    /// Adopt a suggestion; hides the warning
    pub fn select(&mut self, index: usize) {
        if let Some(choice) = self.suggestions.get(index) {
            self.value = choice.clone();
            self.warning = false;
        }
    }

    /// Blur-equivalent: typed text that matches no suggestion is cleared
    /// and the warning shown; a matching value hides it
    pub fn commit(&mut self) {
        if self.value.is_empty() {
            return;
        }
        if self.suggestions.iter().any(|s| s == &self.value) {
            self.warning = false;
        } else {
            self.value.clear();
            self.warning = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    struct CannedSource {
        calls: AtomicUsize,
        brands: Vec<String>,
    }

    impl CannedSource {
        fn new(brands: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                brands: brands.iter().map(|s| s.to_string()).collect(),
            })
        }
    }

    impl SuggestionSource for CannedSource {
        fn suggest(&self, _kind: SuggestionKind, term: &str) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let needle = term.to_lowercase();
            Ok(self
                .brands
                .iter()
                .filter(|b| b.to_lowercase().contains(&needle))
                .cloned()
                .collect())
        }
    }

    fn poll_until(field: &mut AutocompleteField, pred: impl Fn(&AutocompleteField) -> bool) {
        let start = Instant::now();
        while start.elapsed() < Duration::from_secs(2) {
            field.poll();
            if pred(field) {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("condition not reached");
    }

    #[test]
    fn empty_term_fetches_nothing() {
        let source = CannedSource::new(&["Shimano", "Daiwa"]);
        let mut field = AutocompleteField::new(SuggestionKind::Brands, Arc::clone(&source));

        field.input("");
        field.input("   ");

        assert!(field.suggestions().is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn single_character_term_fetches() {
        let source = CannedSource::new(&["Shimano", "Daiwa"]);
        let mut field = AutocompleteField::new(SuggestionKind::Brands, source);

        field.input("s");
        poll_until(&mut field, |f| !f.suggestions().is_empty());
        assert_eq!(field.suggestions(), &["Shimano".to_string()]);
    }

    #[test]
    fn selecting_a_suggestion_adopts_it() {
        let source = CannedSource::new(&["Shimano", "Daiwa"]);
        let mut field = AutocompleteField::new(SuggestionKind::Brands, source);

        field.input("a");
        poll_until(&mut field, |f| f.suggestions().len() == 2);

        field.select(1);
        assert_eq!(field.value(), "Daiwa");
        assert!(!field.warning_visible());
    }

    #[test]
    fn committing_unmatched_text_clears_and_warns() {
        let source = CannedSource::new(&["Shimano", "Daiwa"]);
        let mut field = AutocompleteField::new(SuggestionKind::Brands, source);

        field.input("Shi");
        poll_until(&mut field, |f| !f.suggestions().is_empty());

        field.input("Shimanoo");
        field.commit();

        assert_eq!(field.value(), "");
        assert!(field.warning_visible());
    }

    #[test]
    fn committing_a_matching_value_hides_the_warning() {
        let source = CannedSource::new(&["Shimano", "Daiwa"]);
        let mut field = AutocompleteField::new(SuggestionKind::Brands, source);

        field.input("Shimano");
        poll_until(&mut field, |f| !f.suggestions().is_empty());
        field.show_warning();
        field.commit();

        assert_eq!(field.value(), "Shimano");
        assert!(!field.warning_visible());
    }
}

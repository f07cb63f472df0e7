//! Tacklefront - terminal client for an angling-gear storefront
//!
//! Talks to the shop's HTTP endpoints the way the storefront pages do:
//! live product search as you type, brand/category autocomplete with
//! inline validation, and a checkout flow that hands card capture to an
//! opaque payment element and submits the tokenized order form.
//!
//! # Features
//!
//! - **Live search**: keystroke-driven product suggestions with stale
//!   replies sequenced out, so the dropdown always matches the latest query
//! - **Checkout**: tokenize, inject, POST, redirect; the submit button
//!   locks while an order is in flight and reverts on every failure
//! - **Autocomplete forms**: brand/category fields that only accept values
//!   chosen from the server's suggestions
//! - **Two frontends**: an interactive TUI and one-shot CLI commands
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tacklefront::{SearchSession, StoreClient, StoreConfig};
//!
//! fn main() -> tacklefront::Result<()> {
//!     let config = StoreConfig::default();
//!     let client = Arc::new(StoreClient::new(&config)?);
//!
//!     let mut session = SearchSession::new(config.search.clone(), client);
//!     session.submit("stradic");
//!
//!     // ...later, from the UI tick:
//!     if session.poll() {
//!         for i in 0..session.dropdown().len() {
//!             println!("{:?}", session.dropdown().link_at(i));
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod checkout;
pub mod error;
pub mod forms;
pub mod guard;
pub mod logging;
pub mod search;
pub mod tui;

// Re-export main types
pub use api::{OrderResponse, ProductSummary, StoreClient};
pub use checkout::{
    CheckoutController, CheckoutForm, ConfiguredPaymentMethod, PaymentElement, SubmitOutcome,
};
pub use error::{Result, TackleError};
pub use forms::{AutocompleteField, ProductListingForm, SignupForm, SuggestionKind};
pub use guard::SubmitGuard;
pub use search::{Dropdown, SearchBackend, SearchConfig, SearchHit, SearchSession};

use serde::Deserialize;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Shop root, e.g. `https://www.sellyourtackle.co.uk`
    pub base_url: String,
    /// CSRF token for authenticated POSTs, as rendered into the page
    pub csrf_token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Live-search behaviour
    pub search: SearchConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            csrf_token: None,
            timeout_secs: 10,
            search: SearchConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| TackleError::Config(format!("{}: {}", path.display(), e)))
    }
}

//! Terminal frontend for the storefront
//!
//! The browser pages become keyboard-driven screens: the shop with its
//! live search dropdown, the checkout form, the listing form and signup.

pub mod app;
pub mod colors;
pub mod input;
pub mod ui;

use crate::api::StoreClient;
use crate::StoreConfig;
use std::sync::Arc;

/// Entry point: take over the terminal and run the storefront screens
pub fn run(config: StoreConfig, payment_method: Option<String>) -> crate::Result<()> {
    crate::logging::separator(&format!("BROWSE SESSION: {}", config.base_url));

    let client = Arc::new(StoreClient::new(&config)?);
    let mut app = app::App::new(&config, client, payment_method);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}

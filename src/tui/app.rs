use crate::api::StoreClient;
use crate::checkout::{CheckoutController, CheckoutForm, ConfiguredPaymentMethod, SubmitOutcome};
use crate::forms::{ProductListingForm, SignupForm};
use crate::guard::SubmitGuard;
use crate::logging;
use crate::search::SearchSession;
use crate::tui::input::TextInput;
use crate::tui::ui;
use crate::StoreConfig;
use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Auto-dismiss delay for status line messages
const ALERT_TIMEOUT: Duration = Duration::from_secs(3);

/// Messages from background threads
pub enum BgMessage {
    CheckoutFinished(SubmitOutcome),
    SignupFinished(Result<(), String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Shop,
    Checkout,
    Listing,
    Signup,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Shop => " Shop ",
            Screen::Checkout => " Checkout ",
            Screen::Listing => " List Gear ",
            Screen::Signup => " Sign Up ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Good,
    Warn,
    Bad,
}

/// One navigable row of the checkout screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutRow {
    Field {
        key: &'static str,
        label: &'static str,
    },
    ShippingToggle,
    Submit,
}

const CONTACT_BILLING_FIELDS: &[(&str, &str)] = &[
    ("first_name", "First name"),
    ("last_name", "Last name"),
    ("email", "Email"),
    ("phone_number", "Phone number"),
    ("billing_address_line1", "Address line 1"),
    ("billing_address_line2", "Address line 2"),
    ("billing_city", "City"),
    ("billing_state", "County"),
    ("billing_postal_code", "Postcode"),
];

const SHIPPING_FIELDS: &[(&str, &str)] = &[
    ("shipping_first_name", "Shipping first name"),
    ("shipping_last_name", "Shipping last name"),
    ("shipping_address_line1", "Shipping address line 1"),
    ("shipping_address_line2", "Shipping address line 2"),
    ("shipping_city", "Shipping city"),
    ("shipping_state", "Shipping county"),
    ("shipping_postal_code", "Shipping postcode"),
];

const SIGNUP_FIELDS: &[(&str, &str)] = &[
    ("email", "Email"),
    ("first_name", "First name"),
    ("last_name", "Last name"),
    ("password1", "Password"),
    ("password2", "Repeat password"),
];

pub struct App {
    pub screen: Screen,
    pub client: Arc<StoreClient>,

    // Shop
    pub search_input: TextInput,
    pub search: SearchSession,
    pub dropdown_cursor: usize,

    // Checkout
    pub checkout_form: CheckoutForm,
    pub checkout: CheckoutController,
    pub checkout_cursor: usize,

    // Listing
    pub listing: ProductListingForm,
    pub listing_cursor: usize,

    // Signup
    pub signup_form: SignupForm,
    pub signup_guard: SubmitGuard,
    pub signup_cursor: usize,

    // Shared
    pub status_message: String,
    pub status_kind: StatusKind,
    status_expiry: Option<Instant>,
    bg_tx: Sender<BgMessage>,
    bg_rx: Receiver<BgMessage>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: &StoreConfig,
        client: Arc<StoreClient>,
        payment_method: Option<String>,
    ) -> Self {
        let search = SearchSession::new(config.search.clone(), Arc::clone(&client));
        let checkout = CheckoutController::new(
            Arc::new(ConfiguredPaymentMethod::new(payment_method)),
            Arc::clone(&client),
        );
        let listing = ProductListingForm::new(Arc::clone(&client));
        let (bg_tx, bg_rx) = unbounded();

        Self {
            screen: Screen::Shop,
            client,
            search_input: TextInput::new(),
            search,
            dropdown_cursor: 0,
            checkout_form: CheckoutForm::new(),
            checkout,
            checkout_cursor: 0,
            listing,
            listing_cursor: 0,
            signup_form: SignupForm::new(),
            signup_guard: SignupForm::guard(),
            signup_cursor: 0,
            status_message: "Ready".to_string(),
            status_kind: StatusKind::Info,
            status_expiry: None,
            bg_tx,
            bg_rx,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> crate::Result<()> {
        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout).unwrap_or(false) {
                if let Ok(Event::Key(key)) = event::read() {
                    self.handle_key(key);
                }
            }

            if last_tick.elapsed() >= tick_rate {
                self.process_messages();
                if self.search.poll() {
                    self.dropdown_cursor = 0;
                }
                self.listing.poll();
                if let Some(expiry) = self.status_expiry {
                    if Instant::now() >= expiry {
                        self.status_message.clear();
                        self.status_expiry = None;
                    }
                }
                last_tick = Instant::now();
            }

            if self.should_quit {
                self.search.detach();
                logging::flush();
                return Ok(());
            }
        }
    }

    /// Rows of the checkout screen for the current checkbox state; the
    /// shipping block only renders while the different-address toggle is on
    pub fn checkout_rows(&self) -> Vec<CheckoutRow> {
        let mut rows: Vec<CheckoutRow> = CONTACT_BILLING_FIELDS
            .iter()
            .map(|&(key, label)| CheckoutRow::Field { key, label })
            .collect();
        rows.push(CheckoutRow::ShippingToggle);
        if self.checkout_form.use_different_shipping_address {
            rows.extend(
                SHIPPING_FIELDS
                    .iter()
                    .map(|&(key, label)| CheckoutRow::Field { key, label }),
            );
        }
        rows.push(CheckoutRow::Submit);
        rows
    }

    pub fn signup_rows(&self) -> usize {
        SIGNUP_FIELDS.len() + 1
    }

    pub fn signup_field_at(&self, index: usize) -> Option<(&'static str, &'static str)> {
        SIGNUP_FIELDS.get(index).copied()
    }

    pub fn signup_value(&self, key: &str) -> &str {
        match key {
            "email" => &self.signup_form.email,
            "first_name" => &self.signup_form.first_name,
            "last_name" => &self.signup_form.last_name,
            "password1" => &self.signup_form.password1,
            "password2" => &self.signup_form.password2,
            _ => "",
        }
    }

    fn signup_value_mut(&mut self, key: &str) -> Option<&mut String> {
        Some(match key {
            "email" => &mut self.signup_form.email,
            "first_name" => &mut self.signup_form.first_name,
            "last_name" => &mut self.signup_form.last_name,
            "password1" => &mut self.signup_form.password1,
            "password2" => &mut self.signup_form.password2,
            _ => return None,
        })
    }

    fn set_status(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_kind = kind;
        self.status_expiry = Some(Instant::now() + ALERT_TIMEOUT);
    }

    fn process_messages(&mut self) {
        while let Ok(msg) = self.bg_rx.try_recv() {
            match msg {
                BgMessage::CheckoutFinished(outcome) => match outcome {
                    SubmitOutcome::Completed { redirect_url } => {
                        self.set_status(StatusKind::Good, "Order placed");
                        if let Some(url) = redirect_url {
                            self.open_link(&url);
                        }
                    }
                    SubmitOutcome::Rejected { error }
                    | SubmitOutcome::PaymentFailed { error }
                    | SubmitOutcome::TransportFailed { error } => {
                        self.set_status(StatusKind::Bad, error);
                    }
                    SubmitOutcome::Incomplete { field } => {
                        self.set_status(StatusKind::Warn, format!("{} is required", field));
                    }
                    // The in-flight submission owns the button
                    SubmitOutcome::AlreadyInFlight => {}
                },
                BgMessage::SignupFinished(result) => match result {
                    Ok(()) => {
                        self.set_status(StatusKind::Good, "Account created — check your inbox");
                    }
                    Err(e) => {
                        self.signup_guard.release();
                        self.set_status(StatusKind::Bad, e);
                    }
                },
            }
        }
    }

    fn open_link(&mut self, href: &str) {
        let url = if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else {
            self.client.url_for(href).to_string()
        };

        match open::that(&url) {
            Ok(()) => {
                logging::info("TUI", &format!("opening {}", url));
                self.set_status(StatusKind::Info, format!("Opening {}", url));
            }
            Err(e) => {
                logging::error("TUI", &format!("could not open {}: {}", url, e));
                self.set_status(StatusKind::Bad, format!("Could not open browser: {}", e));
            }
        }
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.should_quit = true;
                return;
            }
            KeyCode::F(2) => {
                self.screen = Screen::Shop;
                return;
            }
            KeyCode::F(3) => {
                self.screen = Screen::Checkout;
                return;
            }
            KeyCode::F(4) => {
                self.screen = Screen::Listing;
                return;
            }
            KeyCode::F(5) => {
                self.screen = Screen::Signup;
                return;
            }
            _ => {}
        }

        match self.screen {
            Screen::Shop => self.handle_shop_key(key),
            Screen::Checkout => self.handle_checkout_key(key),
            Screen::Listing => self.handle_listing_key(key),
            Screen::Signup => self.handle_signup_key(key),
        }
    }

    fn handle_shop_key(&mut self, key: KeyEvent) {
        let mut changed = false;

        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                changed = self.search_input.insert(c);
            }
            KeyCode::Backspace => changed = self.search_input.backspace(),
            KeyCode::Delete => changed = self.search_input.delete(),
            KeyCode::Left => self.search_input.left(),
            KeyCode::Right => self.search_input.right(),
            KeyCode::Home => self.search_input.home(),
            KeyCode::End => self.search_input.end(),
            KeyCode::Down => {
                let total = self.search.dropdown().len();
                if total > 0 {
                    self.dropdown_cursor = (self.dropdown_cursor + 1).min(total - 1);
                }
            }
            KeyCode::Up => {
                self.dropdown_cursor = self.dropdown_cursor.saturating_sub(1);
            }
            KeyCode::Enter => {
                let link = self
                    .search
                    .dropdown()
                    .link_at(self.dropdown_cursor)
                    .or_else(|| self.search.dropdown().first_link())
                    .map(|s| s.to_string());
                if let Some(link) = link {
                    self.open_link(&link);
                }
            }
            KeyCode::Esc => {
                if self.search_input.clear() {
                    changed = true;
                } else {
                    self.should_quit = true;
                }
            }
            _ => {}
        }

        if changed {
            let query = self.search_input.value.clone();
            self.search.submit(&query);
            self.dropdown_cursor = 0;
        }
    }

    fn handle_checkout_key(&mut self, key: KeyEvent) {
        let rows = self.checkout_rows();
        let total = rows.len();

        match key.code {
            KeyCode::Up => self.checkout_cursor = self.checkout_cursor.saturating_sub(1),
            KeyCode::Down => self.checkout_cursor = (self.checkout_cursor + 1).min(total - 1),
            KeyCode::Esc => self.screen = Screen::Shop,
            _ => match rows.get(self.checkout_cursor).copied() {
                Some(CheckoutRow::Field { key: field, .. }) => match key.code {
                    KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                        if let Some(value) = self.checkout_form.value_mut(field) {
                            value.push(c);
                        }
                    }
                    KeyCode::Backspace => {
                        if let Some(value) = self.checkout_form.value_mut(field) {
                            value.pop();
                        }
                    }
                    _ => {}
                },
                Some(CheckoutRow::ShippingToggle) => {
                    if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
                        self.checkout_form.use_different_shipping_address =
                            !self.checkout_form.use_different_shipping_address;
                        // Cursor may point past the end after the shipping
                        // block collapses
                        let total = self.checkout_rows().len();
                        self.checkout_cursor = self.checkout_cursor.min(total - 1);
                    }
                }
                Some(CheckoutRow::Submit) => {
                    if key.code == KeyCode::Enter {
                        self.submit_checkout();
                    }
                }
                None => {}
            },
        }
    }

    fn submit_checkout(&mut self) {
        let controller = self.checkout.clone();
        let mut form = self.checkout_form.clone();
        let tx = self.bg_tx.clone();

        thread::spawn(move || {
            let outcome = controller.submit(&mut form);
            let _ = tx.send(BgMessage::CheckoutFinished(outcome));
        });
    }

    fn handle_listing_key(&mut self, key: KeyEvent) {
        // Rows: 0 brand, 1 category, 2 submit
        match key.code {
            KeyCode::Up => {
                self.commit_listing_field();
                self.listing_cursor = self.listing_cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                self.commit_listing_field();
                self.listing_cursor = (self.listing_cursor + 1).min(2);
            }
            KeyCode::Esc => self.screen = Screen::Shop,
            KeyCode::Tab => {
                // Adopt the top suggestion, as clicking it would
                match self.listing_cursor {
                    0 => self.listing.brand.select(0),
                    1 => self.listing.category.select(0),
                    _ => {}
                }
            }
            KeyCode::Enter => {
                if self.listing_cursor == 2 {
                    if self.listing.try_submit() {
                        self.set_status(StatusKind::Good, "Brand and category confirmed");
                    } else {
                        self.set_status(
                            StatusKind::Warn,
                            "Choose a brand and category from the suggestions",
                        );
                    }
                } else {
                    self.commit_listing_field();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(field) = self.active_listing_field() {
                    let mut text = field.value().to_string();
                    text.push(c);
                    field.input(&text);
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.active_listing_field() {
                    let mut text = field.value().to_string();
                    text.pop();
                    field.input(&text);
                }
            }
            _ => {}
        }
    }

    fn active_listing_field(&mut self) -> Option<&mut crate::forms::AutocompleteField> {
        match self.listing_cursor {
            0 => Some(&mut self.listing.brand),
            1 => Some(&mut self.listing.category),
            _ => None,
        }
    }

    /// Blur-equivalent when leaving an autocomplete field
    fn commit_listing_field(&mut self) {
        match self.listing_cursor {
            0 => self.listing.brand.commit(),
            1 => self.listing.category.commit(),
            _ => {}
        }
    }

    fn handle_signup_key(&mut self, key: KeyEvent) {
        let total = self.signup_rows();

        match key.code {
            KeyCode::Up => self.signup_cursor = self.signup_cursor.saturating_sub(1),
            KeyCode::Down => self.signup_cursor = (self.signup_cursor + 1).min(total - 1),
            KeyCode::Esc => self.screen = Screen::Shop,
            KeyCode::Enter if self.signup_cursor == total - 1 => self.submit_signup(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some((field, _)) = self.signup_field_at(self.signup_cursor) {
                    if let Some(value) = self.signup_value_mut(field) {
                        value.push(c);
                    }
                }
            }
            KeyCode::Backspace => {
                if let Some((field, _)) = self.signup_field_at(self.signup_cursor) {
                    if let Some(value) = self.signup_value_mut(field) {
                        value.pop();
                    }
                }
            }
            _ => {}
        }
    }

    fn submit_signup(&mut self) {
        // Double-fire guard: a second Enter while signing up is dropped
        if !self.signup_guard.try_begin() {
            return;
        }

        if let Err(msg) = self.signup_form.validate() {
            self.signup_guard.release();
            self.set_status(StatusKind::Warn, msg);
            return;
        }

        let client = Arc::clone(&self.client);
        let pairs = self.signup_form.field_pairs();
        let tx = self.bg_tx.clone();

        thread::spawn(move || {
            let result = client
                .post_form(SignupForm::action(), &pairs)
                .map_err(|e| e.to_string());
            let _ = tx.send(BgMessage::SignupFinished(result));
        });
    }
}

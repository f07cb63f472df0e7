//! Blocking HTTP client for the storefront
//!
//! One client instance per shop, bound to a base URL. Carries the CSRF
//! token the order endpoint expects and a request timeout so a hung
//! request cannot leave the UI waiting forever.

use crate::checkout::CheckoutForm;
use crate::error::{Result, TackleError};
use crate::forms::{SuggestionKind, SuggestionSource};
use crate::logging;
use crate::search::SearchBackend;
use crate::{OrderResponse, ProductSummary, StoreConfig};
use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Header the order endpoint reads the CSRF token from
const CSRF_HEADER: &str = "X-CSRFToken";

pub struct StoreClient {
    base: Url,
    http: Client,
    csrf_token: Option<String>,
}

impl StoreClient {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|_| TackleError::InvalidBaseUrl(config.base_url.clone()))?;
        if base.cannot_be_a_base() {
            return Err(TackleError::InvalidBaseUrl(config.base_url.clone()));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TackleError::Config(e.to_string()))?;

        Ok(Self {
            base,
            http,
            csrf_token: config.csrf_token.clone(),
        })
    }

    /// Absolute URL for a path under the shop root (e.g. `/product/{slug}`)
    pub fn url_for(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        url.set_path(path);
        url.set_query(None);
        url
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.url_for(path);
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let display = url.to_string();
        let resp = self
            .http
            .get(url)
            .send()
            .map_err(|source| TackleError::Request {
                url: display.clone(),
                source,
            })?;
        read_json(display, resp)
    }

    /// Live product search: `GET /search/?search_text={query}`
    pub fn search_products(&self, query: &str) -> Result<Vec<ProductSummary>> {
        self.get_json(self.endpoint("/search/", &[("search_text", query)]))
    }

    /// Brand autocomplete: `GET /search_brands/?term={term}`
    pub fn suggest_brands(&self, term: &str) -> Result<Vec<String>> {
        self.get_json(self.endpoint("/search_brands/", &[("term", term)]))
    }

    /// Category autocomplete: `GET /search_categories/?term={term}`
    pub fn suggest_categories(&self, term: &str) -> Result<Vec<String>> {
        self.get_json(self.endpoint("/search_categories/", &[("term", term)]))
    }

    /// Submit the full checkout field set to the form's action URL.
    ///
    /// Form-encoded body with the tokenized `payment_method` included,
    /// CSRF header attached when a token is configured.
    pub fn place_order(&self, form: &CheckoutForm) -> Result<OrderResponse> {
        let url = self.url_for(&form.action);
        let display = url.to_string();
        logging::info("API", &format!("placing order via {}", display));

        let mut req = self.http.post(url).form(&form.field_pairs());
        if let Some(token) = &self.csrf_token {
            req = req.header(CSRF_HEADER, token);
        }

        let resp = req.send().map_err(|source| TackleError::Request {
            url: display.clone(),
            source,
        })?;
        read_json(display, resp)
    }

    /// Plain form POST for pages that navigate on success (signup).
    ///
    /// The server answers with a rendered page, not JSON; any 2xx counts
    /// as accepted and the body is not inspected.
    pub fn post_form(&self, path: &str, fields: &[(&'static str, String)]) -> Result<()> {
        let url = self.url_for(path);
        let display = url.to_string();

        let mut req = self.http.post(url).form(fields);
        if let Some(token) = &self.csrf_token {
            req = req.header(CSRF_HEADER, token);
        }

        let resp = req.send().map_err(|source| TackleError::Request {
            url: display.clone(),
            source,
        })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(TackleError::Status {
                url: display,
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(url: String, resp: Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        return Err(TackleError::Status {
            url,
            status: status.as_u16(),
        });
    }
    let body = resp.text().map_err(|source| TackleError::Request {
        url: url.clone(),
        source,
    })?;
    serde_json::from_str(&body).map_err(|source| TackleError::Decode { url, source })
}

impl SearchBackend for StoreClient {
    fn search(&self, query: &str) -> Result<Vec<ProductSummary>> {
        self.search_products(query)
    }
}

impl SuggestionSource for StoreClient {
    fn suggest(&self, kind: SuggestionKind, term: &str) -> Result<Vec<String>> {
        match kind {
            SuggestionKind::Brands => self.suggest_brands(term),
            SuggestionKind::Categories => self.suggest_categories(term),
        }
    }
}

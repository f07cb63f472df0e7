//! Payment element boundary
//!
//! The hosted card widget is an external collaborator: it captures card
//! details without ever exposing them to this client and hands back either
//! an error or an opaque payment-method token. Everything behind
//! [`PaymentElement::create_payment_method`] belongs to the payment
//! provider.

use thiserror::Error;

/// Opaque identifier for a tokenized card, safe to send to the shop server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethodId(String);

impl PaymentMethodId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Error object surfaced by the payment element
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PaymentError {
    pub message: String,
}

impl PaymentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The tokenization call the checkout controller delegates to
pub trait PaymentElement: Send + Sync {
    fn create_payment_method(&self) -> Result<PaymentMethodId, PaymentError>;
}

/// Terminal stand-in for the hosted card widget.
///
/// A terminal has no embedded card iframe, so the payment method is
/// tokenized out of band (provider dashboard, test token) and its id
/// supplied through configuration. Tokenization "fails" exactly when no
/// id was configured, which exercises the same revert path the browser
/// build hits on a declined card.
pub struct ConfiguredPaymentMethod {
    id: Option<String>,
}

impl ConfiguredPaymentMethod {
    pub fn new(id: Option<String>) -> Self {
        Self { id }
    }
}

impl PaymentElement for ConfiguredPaymentMethod {
    fn create_payment_method(&self) -> Result<PaymentMethodId, PaymentError> {
        match &self.id {
            Some(id) if !id.trim().is_empty() => Ok(PaymentMethodId::new(id.trim())),
            _ => Err(PaymentError::new(
                "no payment method configured; pass --payment-method or set it in the config file",
            )),
        }
    }
}

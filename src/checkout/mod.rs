//! Checkout flow
//!
//! Card capture is delegated to an opaque payment element; the controller
//! exchanges it for a token, injects the token into the form and submits
//! the order, driving the button through its processing states.

pub mod controller;
pub mod form;
pub mod payment;

pub use controller::{CheckoutController, OrderSubmitter, SubmitOutcome};
pub use form::CheckoutForm;
pub use payment::{ConfiguredPaymentMethod, PaymentElement, PaymentError, PaymentMethodId};

//! Checkout form controller
//!
//! Drives one submission attempt end to end: engage the submit lock, fill
//! in the shipping record, tokenize through the payment element, POST the
//! order, and either hand back a redirect or revert the button so the
//! user can retry.

use crate::api::OrderResponse;
use crate::checkout::form::CheckoutForm;
use crate::checkout::payment::PaymentElement;
use crate::error::Result;
use crate::guard::SubmitGuard;
use crate::logging;
use parking_lot::Mutex;
use std::sync::Arc;

/// Where the filled order form is POSTed
pub trait OrderSubmitter: Send + Sync {
    fn place_order(&self, form: &CheckoutForm) -> Result<OrderResponse>;
}

impl OrderSubmitter for crate::api::StoreClient {
    fn place_order(&self, form: &CheckoutForm) -> Result<OrderResponse> {
        crate::api::StoreClient::place_order(self, form)
    }
}

/// Terminal state of one submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Order accepted; navigate to the server-supplied URL
    Completed { redirect_url: Option<String> },
    /// Server looked at the order and said no
    Rejected { error: String },
    /// The payment element refused to tokenize
    PaymentFailed { error: String },
    /// The POST never produced a decodable reply
    TransportFailed { error: String },
    /// A required field is still blank
    Incomplete { field: &'static str },
    /// A submission is already in flight; this one was suppressed
    AlreadyInFlight,
}

#[derive(Clone)]
pub struct CheckoutController {
    element: Arc<dyn PaymentElement>,
    submitter: Arc<dyn OrderSubmitter>,
    guard: Arc<Mutex<SubmitGuard>>,
}

impl CheckoutController {
    pub fn new(element: Arc<dyn PaymentElement>, submitter: Arc<dyn OrderSubmitter>) -> Self {
        Self {
            element,
            submitter,
            guard: Arc::new(Mutex::new(SubmitGuard::new(
                "Place Order",
                "Processing Order...",
            ))),
        }
    }

    /// Label to render on the submit button right now
    pub fn button_label(&self) -> String {
        self.guard.lock().label().to_string()
    }

    pub fn is_busy(&self) -> bool {
        self.guard.lock().is_engaged()
    }

    /// Run one submission attempt to its terminal state.
    ///
    /// Safe to call from a worker thread; clones share the submit lock, so
    /// a second call while one is in flight returns `AlreadyInFlight`
    /// without touching the payment element. The lock stays engaged after
    /// `Completed` (navigation replaces the page) and is released on every
    /// failure outcome.
    pub fn submit(&self, form: &mut CheckoutForm) -> SubmitOutcome {
        if !self.guard.lock().try_begin() {
            return SubmitOutcome::AlreadyInFlight;
        }

        if !form.use_different_shipping_address {
            form.sync_shipping_from_billing();
        }

        if let Some(field) = form.first_missing_required() {
            self.guard.lock().release();
            return SubmitOutcome::Incomplete { field };
        }

        let token = match self.element.create_payment_method() {
            Ok(token) => token,
            Err(e) => {
                logging::error("CHECKOUT", &format!("tokenization failed: {}", e));
                self.guard.lock().release();
                return SubmitOutcome::PaymentFailed {
                    error: e.to_string(),
                };
            }
        };

        form.payment_method = Some(token.into_inner());

        match self.submitter.place_order(form) {
            Ok(resp) if resp.success => {
                logging::info(
                    "CHECKOUT",
                    &format!(
                        "order placed, redirecting to {}",
                        resp.redirect_url.as_deref().unwrap_or("(none)")
                    ),
                );
                SubmitOutcome::Completed {
                    redirect_url: resp.redirect_url,
                }
            }
            Ok(resp) => {
                let error = resp
                    .error
                    .unwrap_or_else(|| "order was not accepted".to_string());
                logging::error("CHECKOUT", &format!("order placement failed: {}", error));
                self.guard.lock().release();
                SubmitOutcome::Rejected { error }
            }
            Err(e) => {
                logging::error("CHECKOUT", &format!("error submitting the form: {}", e));
                self.guard.lock().release();
                SubmitOutcome::TransportFailed {
                    error: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::payment::{PaymentError, PaymentMethodId};
    use crate::error::TackleError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::{Duration, Instant};

    struct FakeElement {
        calls: AtomicUsize,
        fail: bool,
        // Blocks tokenization until the test releases it
        gate: Mutex<Option<mpsc::Receiver<()>>>,
    }

    impl FakeElement {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
                gate: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::ok()
            }
        }

        fn gated() -> (Self, mpsc::Sender<()>) {
            let (tx, rx) = mpsc::channel();
            let element = Self {
                gate: Mutex::new(Some(rx)),
                ..Self::ok()
            };
            (element, tx)
        }
    }

    impl PaymentElement for FakeElement {
        fn create_payment_method(&self) -> std::result::Result<PaymentMethodId, PaymentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(rx) = self.gate.lock().take() {
                rx.recv().ok();
            }
            if self.fail {
                Err(PaymentError::new("Your card was declined."))
            } else {
                Ok(PaymentMethodId::new("pm_test_123"))
            }
        }
    }

    struct FakeSubmitter {
        orders: Mutex<Vec<CheckoutForm>>,
        response: Mutex<Option<crate::error::Result<OrderResponse>>>,
    }

    impl FakeSubmitter {
        fn replying(response: crate::error::Result<OrderResponse>) -> Self {
            Self {
                orders: Mutex::new(Vec::new()),
                response: Mutex::new(Some(response)),
            }
        }

        fn order_count(&self) -> usize {
            self.orders.lock().len()
        }
    }

    impl OrderSubmitter for FakeSubmitter {
        fn place_order(&self, form: &CheckoutForm) -> crate::error::Result<OrderResponse> {
            self.orders.lock().push(form.clone());
            self.response
                .lock()
                .take()
                .expect("order endpoint hit more than once")
        }
    }

    fn filled_form() -> CheckoutForm {
        CheckoutForm {
            first_name: "Izaak".to_string(),
            last_name: "Walton".to_string(),
            email: "izaak@example.com".to_string(),
            billing_address_line1: "12 River Lane".to_string(),
            billing_city: "Winchester".to_string(),
            billing_state: "Hampshire".to_string(),
            billing_postal_code: "SO23 9LX".to_string(),
            ..CheckoutForm::default()
        }
    }

    fn accepted() -> OrderResponse {
        OrderResponse {
            success: true,
            redirect_url: Some("/".to_string()),
            error: None,
        }
    }

    #[test]
    fn happy_path_injects_token_and_redirects() {
        let submitter = Arc::new(FakeSubmitter::replying(Ok(accepted())));
        let controller =
            CheckoutController::new(Arc::new(FakeElement::ok()), Arc::clone(&submitter));

        let mut form = filled_form();
        let outcome = controller.submit(&mut form);

        assert_eq!(
            outcome,
            SubmitOutcome::Completed {
                redirect_url: Some("/".to_string())
            }
        );
        // Button stays locked; navigation supersedes it
        assert!(controller.is_busy());

        let submitted = submitter.orders.lock()[0].clone();
        assert_eq!(submitted.payment_method.as_deref(), Some("pm_test_123"));
        // Shipping record was filled from billing before the POST
        assert_eq!(submitted.shipping_city, "Winchester");
        assert_eq!(submitted.shipping_address_line2, "");
    }

    #[test]
    fn tokenization_failure_reverts_the_button() {
        let submitter = Arc::new(FakeSubmitter::replying(Ok(accepted())));
        let controller =
            CheckoutController::new(Arc::new(FakeElement::failing()), Arc::clone(&submitter));

        let outcome = controller.submit(&mut filled_form());

        assert!(matches!(outcome, SubmitOutcome::PaymentFailed { .. }));
        assert!(!controller.is_busy());
        assert_eq!(controller.button_label(), "Place Order");
        assert_eq!(submitter.order_count(), 0);
    }

    #[test]
    fn server_rejection_reverts_and_reports_the_error() {
        let submitter = Arc::new(FakeSubmitter::replying(Ok(OrderResponse {
            success: false,
            redirect_url: None,
            error: Some("item already sold".to_string()),
        })));
        let controller =
            CheckoutController::new(Arc::new(FakeElement::ok()), Arc::clone(&submitter));

        let outcome = controller.submit(&mut filled_form());

        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                error: "item already sold".to_string()
            }
        );
        assert!(!controller.is_busy());
    }

    #[test]
    fn transport_failure_reverts_the_button() {
        let submitter = Arc::new(FakeSubmitter::replying(Err(TackleError::Status {
            url: "http://shop.test/checkout/".to_string(),
            status: 502,
        })));
        let controller =
            CheckoutController::new(Arc::new(FakeElement::ok()), Arc::clone(&submitter));

        let outcome = controller.submit(&mut filled_form());

        assert!(matches!(outcome, SubmitOutcome::TransportFailed { .. }));
        assert!(!controller.is_busy());
    }

    #[test]
    fn blank_required_field_blocks_before_tokenization() {
        let element = Arc::new(FakeElement::ok());
        let submitter = Arc::new(FakeSubmitter::replying(Ok(accepted())));
        let controller = CheckoutController::new(Arc::clone(&element), Arc::clone(&submitter));

        let mut form = filled_form();
        form.email.clear();
        let outcome = controller.submit(&mut form);

        assert_eq!(outcome, SubmitOutcome::Incomplete { field: "email" });
        assert!(!controller.is_busy());
        assert_eq!(element.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn rapid_double_submit_tokenizes_exactly_once() {
        let (element, release) = FakeElement::gated();
        let element = Arc::new(element);
        let submitter = Arc::new(FakeSubmitter::replying(Ok(accepted())));
        let controller = CheckoutController::new(Arc::clone(&element), Arc::clone(&submitter));

        let worker = {
            let controller = controller.clone();
            thread::spawn(move || controller.submit(&mut filled_form()))
        };

        // Wait for the first submit to engage the lock
        let start = Instant::now();
        while !controller.is_busy() {
            assert!(start.elapsed() < Duration::from_secs(2), "lock never engaged");
            thread::sleep(Duration::from_millis(5));
        }

        // Second click while processing: suppressed outright
        assert_eq!(
            controller.submit(&mut filled_form()),
            SubmitOutcome::AlreadyInFlight
        );

        release.send(()).unwrap();
        let outcome = worker.join().unwrap();

        assert!(matches!(outcome, SubmitOutcome::Completed { .. }));
        assert_eq!(element.calls.load(Ordering::SeqCst), 1);
        assert_eq!(submitter.order_count(), 1);
    }
}

//! The checkout form's field set
//!
//! Mirrors the order form the shop server renders: contact details, a
//! billing address, an optional separate shipping address, and the hidden
//! `payment_method` value injected after tokenization.

/// Billing fields that must be filled before any submission
const BILLING_REQUIRED: &[&str] = &[
    "first_name",
    "last_name",
    "email",
    "billing_address_line1",
    "billing_city",
    "billing_state",
    "billing_postal_code",
];

/// Shipping fields that become required while the different-shipping
/// checkbox is set. Address line 2 is never on this list.
const SHIPPING_REQUIRED: &[&str] = &[
    "shipping_first_name",
    "shipping_last_name",
    "shipping_address_line1",
    "shipping_city",
    "shipping_state",
    "shipping_postal_code",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,

    pub billing_address_line1: String,
    pub billing_address_line2: String,
    pub billing_city: String,
    pub billing_state: String,
    pub billing_postal_code: String,

    pub shipping_first_name: String,
    pub shipping_last_name: String,
    pub shipping_address_line1: String,
    pub shipping_address_line2: String,
    pub shipping_city: String,
    pub shipping_state: String,
    pub shipping_postal_code: String,

    pub use_different_shipping_address: bool,
    /// Tokenized payment method, injected just before the POST
    pub payment_method: Option<String>,

    /// POST target for the filled form
    pub action: String,
}

impl Default for CheckoutForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone_number: String::new(),
            billing_address_line1: String::new(),
            billing_address_line2: String::new(),
            billing_city: String::new(),
            billing_state: String::new(),
            billing_postal_code: String::new(),
            shipping_first_name: String::new(),
            shipping_last_name: String::new(),
            shipping_address_line1: String::new(),
            shipping_address_line2: String::new(),
            shipping_city: String::new(),
            shipping_state: String::new(),
            shipping_postal_code: String::new(),
            use_different_shipping_address: false,
            payment_method: None,
            action: "/checkout/".to_string(),
        }
    }
}

impl CheckoutForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the billing address into the shipping mirrors verbatim.
    ///
    /// Runs before submission whenever the different-shipping checkbox is
    /// unchecked, so the payload always carries a complete shipping record.
    /// An absent billing line 2 leaves shipping line 2 as the empty string.
    pub fn sync_shipping_from_billing(&mut self) {
        self.shipping_first_name = self.first_name.clone();
        self.shipping_last_name = self.last_name.clone();
        self.shipping_address_line1 = self.billing_address_line1.clone();
        self.shipping_address_line2 = self.billing_address_line2.clone();
        self.shipping_city = self.billing_city.clone();
        self.shipping_state = self.billing_state.clone();
        self.shipping_postal_code = self.billing_postal_code.clone();
    }

    /// Fields that must be non-empty for the current checkbox state
    pub fn required_fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = BILLING_REQUIRED.to_vec();
        if self.use_different_shipping_address {
            fields.extend_from_slice(SHIPPING_REQUIRED);
        }
        fields
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required_fields().iter().any(|f| *f == field)
    }

    /// First required field still blank, if any
    pub fn first_missing_required(&self) -> Option<&'static str> {
        self.required_fields()
            .into_iter()
            .find(|f| self.value(f).trim().is_empty())
    }

    pub fn value(&self, field: &str) -> &str {
        match field {
            "first_name" => &self.first_name,
            "last_name" => &self.last_name,
            "email" => &self.email,
            "phone_number" => &self.phone_number,
            "billing_address_line1" => &self.billing_address_line1,
            "billing_address_line2" => &self.billing_address_line2,
            "billing_city" => &self.billing_city,
            "billing_state" => &self.billing_state,
            "billing_postal_code" => &self.billing_postal_code,
            "shipping_first_name" => &self.shipping_first_name,
            "shipping_last_name" => &self.shipping_last_name,
            "shipping_address_line1" => &self.shipping_address_line1,
            "shipping_address_line2" => &self.shipping_address_line2,
            "shipping_city" => &self.shipping_city,
            "shipping_state" => &self.shipping_state,
            "shipping_postal_code" => &self.shipping_postal_code,
            _ => "",
        }
    }

    pub fn value_mut(&mut self, field: &str) -> Option<&mut String> {
        Some(match field {
            "first_name" => &mut self.first_name,
            "last_name" => &mut self.last_name,
            "email" => &mut self.email,
            "phone_number" => &mut self.phone_number,
            "billing_address_line1" => &mut self.billing_address_line1,
            "billing_address_line2" => &mut self.billing_address_line2,
            "billing_city" => &mut self.billing_city,
            "billing_state" => &mut self.billing_state,
            "billing_postal_code" => &mut self.billing_postal_code,
            "shipping_first_name" => &mut self.shipping_first_name,
            "shipping_last_name" => &mut self.shipping_last_name,
            "shipping_address_line1" => &mut self.shipping_address_line1,
            "shipping_address_line2" => &mut self.shipping_address_line2,
            "shipping_city" => &mut self.shipping_city,
            "shipping_state" => &mut self.shipping_state,
            "shipping_postal_code" => &mut self.shipping_postal_code,
            _ => return None,
        })
    }

    /// Full field set for the form-encoded POST body.
    ///
    /// The checkbox appears only when set (browser form semantics); the
    /// payment method only once tokenization has injected it.
    pub fn field_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("first_name", self.first_name.clone()),
            ("last_name", self.last_name.clone()),
            ("email", self.email.clone()),
            ("phone_number", self.phone_number.clone()),
            ("billing_address_line1", self.billing_address_line1.clone()),
            ("billing_address_line2", self.billing_address_line2.clone()),
            ("billing_city", self.billing_city.clone()),
            ("billing_state", self.billing_state.clone()),
            ("billing_postal_code", self.billing_postal_code.clone()),
            ("shipping_first_name", self.shipping_first_name.clone()),
            ("shipping_last_name", self.shipping_last_name.clone()),
            (
                "shipping_address_line1",
                self.shipping_address_line1.clone(),
            ),
            (
                "shipping_address_line2",
                self.shipping_address_line2.clone(),
            ),
            ("shipping_city", self.shipping_city.clone()),
            ("shipping_state", self.shipping_state.clone()),
            ("shipping_postal_code", self.shipping_postal_code.clone()),
        ];

        if self.use_different_shipping_address {
            pairs.push(("use_different_shipping_address", "on".to_string()));
        }
        if let Some(token) = &self.payment_method {
            pairs.push(("payment_method", token.clone()));
        }

        pairs
    }
}

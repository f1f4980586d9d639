//! Form payloads and their validation rules.
//!
//! Forms are deserialized from `application/x-www-form-urlencoded` bodies. Every
//! field is optional at the deserialization step so that a missing field becomes a
//! validation message instead of an extractor rejection.

use serde::Deserialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::entities::{InvoiceStatus, InvoiceUpdate, NewInvoice};
use chrono::NaiveDate;

pub const CUSTOMER_MESSAGE: &str = "Please select a customer.";
pub const AMOUNT_MESSAGE: &str = "Please enter an amount greater than $0.";
pub const STATUS_MESSAGE: &str = "Please select an invoice status.";

/// Raw invoice form as submitted by the create and edit pages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceForm {
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
}

/// Validated invoice fields.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceInput {
    pub customer_id: String,
    /// Amount in whole cents, always at least one.
    pub amount_cents: i64,
    pub status: InvoiceStatus,
}

impl InvoiceInput {
    pub fn amount_in_cents(&self) -> i64 {
        self.amount_cents
    }

    pub fn into_new_invoice(self, date: NaiveDate) -> NewInvoice {
        NewInvoice {
            amount_cents: self.amount_in_cents(),
            customer_id: self.customer_id,
            status: self.status,
            date,
        }
    }

    pub fn into_update(self) -> InvoiceUpdate {
        InvoiceUpdate {
            amount_cents: self.amount_in_cents(),
            customer_id: self.customer_id,
            status: self.status,
        }
    }
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Coerces a raw amount the way a number input is read: surrounding whitespace is
/// ignored, an empty value reads as zero.
fn coerce_amount(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw.unwrap_or_default().trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Largest amount accepted, in cents.
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000_000_000;

/// Rounds an amount to the nearest cent. `None` unless the result lies in
/// `1..=MAX_AMOUNT_CENTS`.
fn to_cents(amount: f64) -> Option<i64> {
    let cents = (amount * 100.0).round();
    if cents >= 1.0 && cents <= MAX_AMOUNT_CENTS as f64 {
        Some(cents as i64)
    } else {
        None
    }
}

impl InvoiceForm {
    /// Validates the form and returns the typed fields.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its message.
    pub fn parse(&self) -> Result<InvoiceInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let customer_id = self.customer_id.as_deref().filter(|s| !s.is_empty());
        if customer_id.is_none() {
            errors.add("customerId", invalid("customer", CUSTOMER_MESSAGE));
        }

        let amount_cents = coerce_amount(self.amount.as_deref()).and_then(to_cents);
        if amount_cents.is_none() {
            errors.add("amount", invalid("amount", AMOUNT_MESSAGE));
        }

        let status = self
            .status
            .as_deref()
            .and_then(|s| s.parse::<InvoiceStatus>().ok());
        if status.is_none() {
            errors.add("status", invalid("status", STATUS_MESSAGE));
        }

        match (customer_id, amount_cents, status) {
            (Some(customer_id), Some(amount_cents), Some(status)) => Ok(InvoiceInput {
                customer_id: customer_id.to_string(),
                amount_cents,
                status,
            }),
            _ => Err(errors),
        }
    }
}

impl Validate for InvoiceForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.parse().map(|_| ())
    }
}

/// Body of the delete-by-form action.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteInvoiceForm {
    #[serde(rename = "invoiceId")]
    pub invoice_id: Option<String>,
}

/// Email and password submitted on the login page.
#[derive(Clone, Default, Deserialize, Validate)]
pub struct Credentials {
    #[serde(default)]
    #[validate(email)]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6))]
    pub password: String,

    /// Local path to continue to after signing in.
    #[serde(default, rename = "redirectTo")]
    pub redirect_to: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("redirect_to", &self.redirect_to)
            .finish()
    }
}

/// Result of a rejected form action, rendered back into the form.
///
/// Mirrors the shape `{ errors?: { field: [messages] }, message? }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub errors: BTreeMap<String, Vec<String>>,
    pub message: Option<String>,
}

impl FormState {
    /// State carrying only a summary message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            errors: BTreeMap::new(),
            message: Some(message.into()),
        }
    }

    /// Flattens validator errors into per-field message lists.
    pub fn from_validation(errors: &ValidationErrors, message: impl Into<String>) -> Self {
        let mut flattened: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (field, field_errors) in errors.field_errors() {
            let messages = field_errors
                .iter()
                .map(|e| match &e.message {
                    Some(m) => m.to_string(),
                    None => e.code.to_string(),
                })
                .collect::<Vec<_>>();
            flattened.entry(field.to_string()).or_default().extend(messages);
        }

        Self {
            errors: flattened,
            message: Some(message.into()),
        }
    }

    /// Messages for one field; empty when the field is valid.
    pub fn errors_for(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(customer_id: Option<&str>, amount: Option<&str>, status: Option<&str>) -> InvoiceForm {
        InvoiceForm {
            customer_id: customer_id.map(str::to_string),
            amount: amount.map(str::to_string),
            status: status.map(str::to_string),
        }
    }

    fn field_messages(form: &InvoiceForm) -> FormState {
        let errors = form.parse().unwrap_err();
        FormState::from_validation(&errors, "failed")
    }

    #[test]
    fn test_valid_form_parses() {
        let input = form(Some("c1"), Some("10.50"), Some("pending"))
            .parse()
            .unwrap();

        assert_eq!(input.customer_id, "c1");
        assert_eq!(input.status, InvoiceStatus::Pending);
        assert_eq!(input.amount_in_cents(), 1050);
    }

    #[test]
    fn test_amount_to_cents_rounds() {
        let cases = [
            ("0.01", 1),
            ("1", 100),
            ("19.99", 1999),
            (" 42.5 ", 4250),
            ("1e2", 10_000),
        ];

        for (raw, cents) in cases {
            let input = form(Some("c1"), Some(raw), Some("paid")).parse().unwrap();
            assert_eq!(input.amount_in_cents(), cents, "amount {raw:?}");
        }
    }

    #[test]
    fn test_non_positive_amounts_fail_with_amount_message() {
        for raw in ["0", "-1", "-0.01", "", "   ", "abc", "NaN", "inf", "1,000"] {
            let state = field_messages(&form(Some("c1"), Some(raw), Some("paid")));
            assert_eq!(state.errors_for("amount"), [AMOUNT_MESSAGE], "amount {raw:?}");
            assert!(state.errors_for("customerId").is_empty());
            assert!(state.errors_for("status").is_empty());
        }
    }

    #[test]
    fn test_amount_rounding_to_zero_cents_fails() {
        for raw in ["0.001", "0.004", "0.0049"] {
            let state = field_messages(&form(Some("c1"), Some(raw), Some("pending")));
            assert_eq!(state.errors_for("amount"), [AMOUNT_MESSAGE], "amount {raw:?}");
        }

        let input = form(Some("c1"), Some("0.006"), Some("pending"))
            .parse()
            .unwrap();
        assert_eq!(input.amount_in_cents(), 1);
    }

    #[test]
    fn test_oversized_amount_fails() {
        for raw in ["1e17", "1e300", "92233720368547758.07"] {
            let state = field_messages(&form(Some("c1"), Some(raw), Some("paid")));
            assert_eq!(state.errors_for("amount"), [AMOUNT_MESSAGE], "amount {raw:?}");
        }

        let input = form(Some("c1"), Some("10000000000000"), Some("paid"))
            .parse()
            .unwrap();
        assert_eq!(input.amount_in_cents(), MAX_AMOUNT_CENTS);
    }

    #[test]
    fn test_missing_amount_fails() {
        let state = field_messages(&form(Some("c1"), None, Some("paid")));
        assert_eq!(state.errors_for("amount"), [AMOUNT_MESSAGE]);
    }

    #[test]
    fn test_unknown_status_fails_with_status_message() {
        for status in [None, Some(""), Some("overdue"), Some("PAID")] {
            let state = field_messages(&form(Some("c1"), Some("5"), status));
            assert_eq!(state.errors_for("status"), [STATUS_MESSAGE], "status {status:?}");
        }
    }

    #[test]
    fn test_missing_or_empty_customer_fails_with_customer_message() {
        for customer in [None, Some("")] {
            let state = field_messages(&form(customer, Some("5"), Some("pending")));
            assert_eq!(state.errors_for("customerId"), [CUSTOMER_MESSAGE]);
        }
    }

    #[test]
    fn test_all_failures_reported_together() {
        let state = field_messages(&InvoiceForm::default());

        assert_eq!(state.errors.len(), 3);
        assert_eq!(state.errors_for("customerId"), [CUSTOMER_MESSAGE]);
        assert_eq!(state.errors_for("amount"), [AMOUNT_MESSAGE]);
        assert_eq!(state.errors_for("status"), [STATUS_MESSAGE]);
        assert_eq!(state.message.as_deref(), Some("failed"));
    }

    #[test]
    fn test_credentials_shape() {
        let ok = Credentials {
            email: "user@nextmail.com".to_string(),
            password: "123456".to_string(),
            redirect_to: None,
        };
        assert!(ok.validate().is_ok());

        let short = Credentials {
            password: "short".to_string(),
            ..ok.clone()
        };
        assert!(short.validate().is_err());

        let bad_email = Credentials {
            email: "not-an-email".to_string(),
            ..ok.clone()
        };
        assert!(bad_email.validate().is_err());

        assert!(Credentials::default().validate().is_err());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials {
            email: "a@b.com".to_string(),
            password: "hunter22".to_string(),
            redirect_to: None,
        };
        assert!(!format!("{:?}", creds).contains("hunter22"));
    }
}

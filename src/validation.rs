//! Field-level validation for the domain entities.
//!
//! Every rule is evaluated independently so that a response reports all
//! violated fields together rather than only the first one found.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::Error;

/// A mapping from field name to the human-readable messages describing why
/// the field was rejected.
///
/// Serializes as `{"field": ["message", ...]}`, which is the shape clients
/// receive in a 400 response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    /// Create an empty set of field errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Whether any field has been rejected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The messages recorded against `field`, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Convert into a `Result`, failing with [Error::Validation] if any
    /// field was rejected.
    pub fn into_result(self) -> Result<(), Error> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

/// Check the invariants for a transaction before it is persisted.
pub fn validate_transaction(
    name: &str,
    avatar: &str,
    category: &str,
    amount: i64,
) -> Result<(), Error> {
    let mut errors = FieldErrors::new();

    if name.is_empty() {
        errors.add("name", "Please enter a name");
    }

    if avatar.is_empty() {
        errors.add("avatar", "Please select an avatar");
    }

    if category.is_empty() {
        errors.add("category", "Please select a category");
    }

    if amount == 0 {
        errors.add("amount", "Please enter an amount");
    }

    errors.into_result()
}

/// Check the invariants for a budget before it is persisted.
pub fn validate_budget(category: &str, maximum: i64, theme: &str) -> Result<(), Error> {
    let mut errors = FieldErrors::new();

    if category.is_empty() {
        errors.add("category", "Please select a category");
    }

    if maximum < 0 {
        errors.add("maximum", "Maximum can't be negative");
    }

    if theme.is_empty() {
        errors.add("theme", "Please select a theme");
    }

    errors.into_result()
}

/// Check the invariants for a pot before any write is committed.
///
/// A total exceeding the target attaches its message to the synthetic
/// `value` field so clients can tell "exceeds target" apart from "negative
/// total".
pub fn validate_pot(target: i64, total: i64) -> Result<(), Error> {
    let mut errors = FieldErrors::new();

    if target < 0 {
        errors.add("target", "Target can't be negative");
    }

    if total < 0 {
        errors.add("total", "Total can't be negative");
    }

    if total > target {
        errors.add("value", "Total can't be higher than target");
    }

    errors.into_result()
}

//! Field-level input validation.
//!
//! Checks are synchronous and run before any store call. All failing fields are
//! reported together.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// One failing input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field-level failure found for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Returns the message for `field`, if it failed.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid input:")?;
        for error in &self.0 {
            write!(f, " {}: {};", error.field, error.message)?;
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

/// Inputs that can be checked before being sent to the store.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Accumulates field errors; the last message for a field wins.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, field: &'static str, message: impl Into<String>) -> &mut Self {
        let message = message.into();
        match self.errors.iter_mut().find(|error| error.field == field) {
            Some(existing) => existing.message = message,
            None => self.errors.push(FieldError { field, message }),
        }
        self
    }

    pub fn require_text(&mut self, field: &'static str, value: &str, message: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, message);
        }
        self
    }

    pub fn require_present<T>(
        &mut self,
        field: &'static str,
        value: Option<&T>,
        message: &str,
    ) -> &mut Self {
        if value.is_none() {
            self.fail(field, message);
        }
        self
    }

    pub fn require_positive(&mut self, field: &'static str, value: f64, message: &str) -> &mut Self {
        if !(value.is_finite() && value > 0.0) {
            self.fail(field, message);
        }
        self
    }

    pub fn require_non_negative(
        &mut self,
        field: &'static str,
        value: f64,
        message: &str,
    ) -> &mut Self {
        if !(value.is_finite() && value >= 0.0) {
            self.fail(field, message);
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(std::mem::take(&mut self.errors)))
        }
    }
}

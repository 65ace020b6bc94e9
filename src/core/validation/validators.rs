//! Field validators
//!
//! A [`FieldValidator`] collects every failure of a payload so the caller
//! gets the full list in one response instead of fixing fields one by one.

use super::filters::clean_text;
use crate::core::error::{FieldValidationError, RepairResult};
use rust_decimal::Decimal;

/// Exclusive upper bound of a money amount (`NUMERIC(10,2)`)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

#[derive(Debug, Default)]
pub struct FieldValidator {
    errors: Vec<FieldValidationError>,
}

impl FieldValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`
    pub fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldValidationError::new(field, message));
    }

    /// Record a failure unless `condition` holds
    pub fn check(&mut self, condition: bool, field: &str, message: impl Into<String>) {
        if !condition {
            self.fail(field, message);
        }
    }

    /// Required non-blank text; returns the trimmed value
    pub fn required_text(&mut self, field: &str, value: Option<String>) -> Option<String> {
        let cleaned = clean_text(value);
        if cleaned.is_none() {
            self.fail(field, "is required");
        }
        cleaned
    }

    /// Required money amount
    ///
    /// Non-negative, at most two decimal places and below [`MAX_AMOUNT`], so
    /// every backend stores it unchanged.
    pub fn money(&mut self, field: &str, value: Option<Decimal>) -> Option<Decimal> {
        match value {
            None => {
                self.fail(field, "is required");
                None
            }
            Some(amount) if amount < Decimal::ZERO => {
                self.fail(field, format!("must not be negative (got {})", amount));
                None
            }
            Some(amount) if amount.normalize().scale() > 2 => {
                self.fail(field, format!("must have at most 2 decimal places (got {})", amount));
                None
            }
            Some(amount) if amount >= MAX_AMOUNT => {
                self.fail(field, format!("must be below {} (got {})", MAX_AMOUNT, amount));
                None
            }
            Some(amount) => Some(amount),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Finish validation, failing with every collected error
    pub fn finish(self) -> RepairResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors.into())
        }
    }
}

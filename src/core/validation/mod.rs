//! Input validation and normalization
//!
//! Payloads are normalized (trimmed, blank text dropped) by [`filters`],
//! checked field by field with a [`FieldValidator`], and decoded from request
//! bodies with the [`ValidJson`] extractor.

pub mod extractor;
pub mod filters;
pub mod validators;

pub use extractor::{MAX_BODY_BYTES, ValidJson};
pub use filters::{clean_text, clean_update};
pub use validators::{FieldValidator, MAX_AMOUNT};

//! Normalization applied to free-text input before validation

/// Trim a text value and turn a blank one into `None`
pub fn clean_text(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Normalize a field of a partial update
///
/// `None` (absent) stays `None` so the stored value is left alone; a present
/// value becomes `Some(cleaned)`, where `null` or a blank string clears the
/// field.
pub fn clean_update(value: Option<Option<String>>) -> Option<Option<String>> {
    value.map(clean_text)
}

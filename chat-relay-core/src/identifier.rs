//! ID generation utilities.
//!
//! Span and citation ids are opaque to the client; they only need to be unique
//! within one response stream. UUID v4 strings are used for all of them.

use uuid::Uuid;

/// Generate an id for a newly opened text or reasoning span.
///
/// # Example
///
/// ```rust
/// use chat_relay_core::identifier::generate_span_id;
///
/// let id = generate_span_id();
/// assert_eq!(id.len(), 36);
/// ```
#[must_use]
pub fn generate_span_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generate an id for a `data-citation` part.
#[must_use]
pub fn generate_citation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a file id for an attachment that arrived without a filename.
#[must_use]
pub fn generate_file_id() -> String {
    format!("file-{}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_ids_are_unique() {
        let a = generate_span_id();
        let b = generate_span_id();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn test_generate_file_id() {
        assert!(generate_file_id().starts_with("file-"));
    }
}

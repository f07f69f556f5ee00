// Shared text field rules

use crate::domain::error::{DomainError, Result};

/// Trim `raw` and check it holds between 1 and `max` characters.
pub(crate) fn bounded_text(field: &'static str, raw: &str, max: usize) -> Result<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(DomainError::EmptyField(field));
    }
    if value.chars().count() > max {
        return Err(DomainError::TooLong { field, max });
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(bounded_text("Name", "  abc \n", 5).unwrap(), "abc");
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert_eq!(
            bounded_text("Name", "   ", 5),
            Err(DomainError::EmptyField("Name"))
        );
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        // 5 chars, 10 bytes
        assert!(bounded_text("Name", "ééééé", 5).is_ok());
        assert_eq!(
            bounded_text("Name", "éééééé", 5),
            Err(DomainError::TooLong {
                field: "Name",
                max: 5
            })
        );
    }
}

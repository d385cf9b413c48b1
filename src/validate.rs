//! Query validation, re-evaluated on every input change

pub const MIN_QUERY_LEN: usize = 3;
pub const TOO_SHORT_MESSAGE: &str = "Search must be at least 3 characters long.";

/// Outcome of checking raw input text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryCheck {
    /// Field was emptied; the panel should be cleared
    Empty,
    /// Too short to search; carries the message to show
    TooShort(&'static str),
    Accepted,
}

/// Length is counted in characters, not bytes.
pub fn validate_query(raw: &str) -> QueryCheck {
    match raw.chars().count() {
        0 => QueryCheck::Empty,
        n if n < MIN_QUERY_LEN => QueryCheck::TooShort(TOO_SHORT_MESSAGE),
        _ => QueryCheck::Accepted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_clears() {
        assert_eq!(validate_query(""), QueryCheck::Empty);
    }

    #[test]
    fn one_or_two_chars_are_too_short() {
        assert_eq!(validate_query("P"), QueryCheck::TooShort(TOO_SHORT_MESSAGE));
        assert_eq!(validate_query("Pa"), QueryCheck::TooShort(TOO_SHORT_MESSAGE));
    }

    #[test]
    fn three_chars_are_accepted() {
        assert_eq!(validate_query("Par"), QueryCheck::Accepted);
        assert_eq!(validate_query("Paris"), QueryCheck::Accepted);
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(validate_query("Åö"), QueryCheck::TooShort(TOO_SHORT_MESSAGE));
        assert_eq!(validate_query("Łód"), QueryCheck::Accepted);
    }
}

//! Identifier format validators
//!
//! Pure predicates, no side effects. Patterns are compiled once.

use once_cell::sync::Lazy;
use regex::Regex;

static CATALOG_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{10}$|^\d{13}$").expect("valid pattern"));

static CONTACT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid pattern")
});

/// A catalog identifier is exactly 10 or exactly 13 decimal digits.
pub fn valid_catalog_id(id: &str) -> bool {
    CATALOG_ID.is_match(id)
}

/// A contact address is `local@domain.tld` with a final label of at least
/// two alphabetic characters.
pub fn valid_contact(address: &str) -> bool {
    CONTACT.is_match(address)
}

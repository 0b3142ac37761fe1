//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Normalized comparison key for a display name (NFKC + lowercase).
///
/// The key backs the per-organization uniqueness checks and the
/// `name_norm` column, so equality survives case and width differences.
pub(crate) fn name_key(value: &str) -> String {
    value.trim().nfkc().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_key_is_case_insensitive() {
        assert_eq!(name_key("Sharma Wedding"), name_key("sharma wedding"));
        assert_eq!(name_key("  Sharma Wedding "), "sharma wedding");
    }

    #[test]
    fn name_key_normalizes_width() {
        // fullwidth latin letters fold to ascii under NFKC
        assert_eq!(name_key("Ｓｈａｒｍａ"), "sharma");
    }
}

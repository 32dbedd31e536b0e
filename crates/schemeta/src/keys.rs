//! Index key comparison.

pub use schemeta_sql::ast::UNSPECIFIED_LENGTH;

/// Returns the prefix length recorded at `index`.
fn effective_length(length: &[i64], index: usize) -> i64 {
    length.get(index).copied().unwrap_or(UNSPECIFIED_LENGTH)
}

/// Returns true if two key lists index the same keys with the same prefix
/// lengths.
///
/// A length list may be shorter than its key list; missing entries count as
/// [`UNSPECIFIED_LENGTH`].
#[must_use]
pub fn equal_keys(a: &[String], a_length: &[i64], b: &[String], b_length: &[i64]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).enumerate().all(|(i, (key_a, key_b))| {
            key_a == key_b && effective_length(a_length, i) == effective_length(b_length, i)
        })
}

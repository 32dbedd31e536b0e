//! Column default values.
//!
//! AUTO_INCREMENT and AUTO_RANDOM are stored in the same slot as an explicit
//! default, as [`DefaultValue::Expression`] values carrying the keyword text.
//! A column can therefore hold at most one of the three. The
//! `is_auto_*` helpers recover which one by text matching.

use schemeta_sql::ast::UNSPECIFIED_LENGTH;

/// Keyword stored for AUTO_INCREMENT columns.
pub const AUTO_INCREMENT_SYMBOL: &str = "AUTO_INCREMENT";

/// Keyword stored (with optional bit counts) for AUTO_RANDOM columns.
pub const AUTO_RANDOM_SYMBOL: &str = "AUTO_RANDOM";

/// Default value of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// DEFAULT NULL.
    Null,
    /// A string literal, unescaped.
    String(String),
    /// Raw SQL expression text (e.g., "CURRENT_TIMESTAMP", "0").
    Expression(String),
}

impl DefaultValue {
    /// Classifies default text restored with single-quoted strings.
    ///
    /// `NULL` in any case becomes [`Self::Null`], a `'...'` literal becomes
    /// [`Self::String`] with doubled quotes collapsed, anything else is kept
    /// as an expression.
    #[must_use]
    pub fn from_restored(text: &str) -> Self {
        if text.eq_ignore_ascii_case("NULL") {
            return Self::Null;
        }
        match text
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
        {
            Some(inner) => Self::String(inner.replace("''", "'")),
            None => Self::Expression(text.to_string()),
        }
    }

    /// The AUTO_INCREMENT marker.
    #[must_use]
    pub fn auto_increment() -> Self {
        Self::Expression(AUTO_INCREMENT_SYMBOL.to_string())
    }

    /// The AUTO_RANDOM marker; bit counts equal to
    /// [`UNSPECIFIED_LENGTH`] are left out.
    #[must_use]
    pub fn auto_random(shard_bits: i64, range_bits: i64) -> Self {
        let text = if shard_bits == UNSPECIFIED_LENGTH {
            AUTO_RANDOM_SYMBOL.to_string()
        } else if range_bits == UNSPECIFIED_LENGTH {
            format!("{AUTO_RANDOM_SYMBOL}({shard_bits})")
        } else {
            format!("{AUTO_RANDOM_SYMBOL}({shard_bits}, {range_bits})")
        };
        Self::Expression(text)
    }

    /// Returns true if this is the AUTO_INCREMENT marker.
    #[must_use]
    pub fn is_auto_increment(&self) -> bool {
        matches!(self, Self::Expression(text) if text.eq_ignore_ascii_case(AUTO_INCREMENT_SYMBOL))
    }

    /// Returns true if this is an AUTO_RANDOM marker.
    #[must_use]
    pub fn is_auto_random(&self) -> bool {
        matches!(self, Self::Expression(text) if text.to_ascii_uppercase().contains(AUTO_RANDOM_SYMBOL))
    }

    /// Returns the SQL text of this default value.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::String(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Expression(expr) => expr.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_restored() {
        assert_eq!(DefaultValue::from_restored("null"), DefaultValue::Null);
        assert_eq!(DefaultValue::from_restored("NULL"), DefaultValue::Null);
        assert_eq!(
            DefaultValue::from_restored("'it''s'"),
            DefaultValue::String("it's".to_string())
        );
        assert_eq!(
            DefaultValue::from_restored("''"),
            DefaultValue::String(String::new())
        );
        assert_eq!(
            DefaultValue::from_restored("CURRENT_TIMESTAMP"),
            DefaultValue::Expression("CURRENT_TIMESTAMP".to_string())
        );
        assert_eq!(
            DefaultValue::from_restored("'"),
            DefaultValue::Expression("'".to_string())
        );
    }

    #[test]
    fn test_auto_random_text() {
        assert_eq!(
            DefaultValue::auto_random(-1, -1),
            DefaultValue::Expression("AUTO_RANDOM".to_string())
        );
        assert_eq!(
            DefaultValue::auto_random(5, -1),
            DefaultValue::Expression("AUTO_RANDOM(5)".to_string())
        );
        assert_eq!(
            DefaultValue::auto_random(5, 54),
            DefaultValue::Expression("AUTO_RANDOM(5, 54)".to_string())
        );
    }

    #[test]
    fn test_marker_detection() {
        assert!(DefaultValue::auto_increment().is_auto_increment());
        assert!(DefaultValue::Expression("auto_increment".to_string()).is_auto_increment());
        assert!(!DefaultValue::auto_increment().is_auto_random());

        assert!(DefaultValue::auto_random(5, -1).is_auto_random());
        assert!(DefaultValue::Expression("auto_random(3)".to_string()).is_auto_random());
        assert!(!DefaultValue::auto_random(5, -1).is_auto_increment());

        // Only expressions are markers.
        assert!(!DefaultValue::String("AUTO_INCREMENT".to_string()).is_auto_increment());
        assert!(!DefaultValue::Null.is_auto_random());
    }

    #[test]
    fn test_to_sql() {
        assert_eq!(DefaultValue::Null.to_sql(), "NULL");
        assert_eq!(DefaultValue::String("a'b".to_string()).to_sql(), "'a''b'");
        assert_eq!(
            DefaultValue::Expression("now()".to_string()).to_sql(),
            "now()"
        );
    }
}

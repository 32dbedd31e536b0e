//! Byte ranges into the DDL source.

/// A half-open byte range `start..end` of the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns a span running from the start of `self` to the end of `other`.
    #[must_use]
    pub const fn to(self, other: Self) -> Self {
        Self {
            start: self.start,
            end: other.end,
        }
    }

    /// Returns the covered slice of `source`, or an empty string when the span
    /// does not fall on character boundaries of `source`.
    #[must_use]
    pub fn slice(self, source: &str) -> &str {
        source.get(self.start..self.end).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_to() {
        let create = Span::new(0, 6);
        let semicolon = Span::new(40, 41);
        assert_eq!(create.to(semicolon), Span::new(0, 41));
    }

    #[test]
    fn test_span_slice() {
        let source = "CREATE TABLE t";
        assert_eq!(Span::new(7, 12).slice(source), "TABLE");
        assert_eq!(Span::new(10, 99).slice(source), "");
    }
}

//! Restoring AST nodes to SQL text.
//!
//! The output shape is controlled by [`RestoreFlags`]: how strings are quoted,
//! whether charset introducers survive, how reserved words are cased and
//! whether names are back-quoted.

use std::fmt::{self, Write as _};
use std::ops::BitOr;

use crate::ast::{Expr, FunctionCall, IndexPartSpec, Literal, UnaryOp};

/// Errors raised while restoring a node.
#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    /// The node has no SQL text form.
    #[error("cannot restore {0}")]
    Unsupported(String),

    /// Writing to the output buffer failed.
    #[error("formatting error: {0}")]
    Fmt(#[from] fmt::Error),
}

/// Output options for [`Restore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RestoreFlags(u32);

impl RestoreFlags {
    /// Wrap strings in `'...'`, doubling embedded single quotes.
    pub const STRING_SINGLE_QUOTES: Self = Self(1);
    /// Wrap strings in `"..."`, doubling embedded double quotes.
    pub const STRING_DOUBLE_QUOTES: Self = Self(1 << 1);
    /// Drop charset introducers such as `_utf8mb4`.
    pub const STRING_WITHOUT_CHARSET: Self = Self(1 << 2);
    /// Upper-case reserved words and function names.
    pub const KEYWORD_UPPERCASE: Self = Self(1 << 3);
    /// Lower-case reserved words and function names.
    pub const KEYWORD_LOWERCASE: Self = Self(1 << 4);
    /// Wrap names in back-quotes, doubling embedded back-quotes.
    pub const NAME_BACK_QUOTES: Self = Self(1 << 5);

    /// Single-quoted strings, upper-case keywords, back-quoted names.
    pub const DEFAULT: Self = Self::STRING_SINGLE_QUOTES
        .union(Self::KEYWORD_UPPERCASE)
        .union(Self::NAME_BACK_QUOTES);

    /// No flags: strings and names are written raw, keywords as spelled.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns true if every flag of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the flags set in either `self` or `other`.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for RestoreFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Output buffer plus the flags that shape it.
pub struct RestoreCtx<'a> {
    flags: RestoreFlags,
    out: &'a mut String,
}

impl<'a> RestoreCtx<'a> {
    /// Creates a context that appends to `out`.
    #[must_use]
    pub fn new(flags: RestoreFlags, out: &'a mut String) -> Self {
        Self { flags, out }
    }

    /// Returns the active flags.
    #[must_use]
    pub const fn flags(&self) -> RestoreFlags {
        self.flags
    }

    /// Writes text verbatim.
    pub fn write_plain(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Writes any displayable value verbatim.
    pub fn write_display(&mut self, value: impl fmt::Display) -> Result<(), RestoreError> {
        write!(self.out, "{value}")?;
        Ok(())
    }

    /// Writes a reserved word or function name with the configured casing.
    pub fn write_keyword(&mut self, keyword: &str) {
        if self.flags.contains(RestoreFlags::KEYWORD_UPPERCASE) {
            self.out.push_str(&keyword.to_ascii_uppercase());
        } else if self.flags.contains(RestoreFlags::KEYWORD_LOWERCASE) {
            self.out.push_str(&keyword.to_ascii_lowercase());
        } else {
            self.out.push_str(keyword);
        }
    }

    /// Writes an identifier.
    pub fn write_name(&mut self, name: &str) {
        if self.flags.contains(RestoreFlags::NAME_BACK_QUOTES) {
            self.out.push('`');
            self.out.push_str(&name.replace('`', "``"));
            self.out.push('`');
        } else {
            self.out.push_str(name);
        }
    }

    /// Writes a string value, quoted only when a quote flag is set.
    pub fn write_string(&mut self, value: &str) {
        let quote = if self.flags.contains(RestoreFlags::STRING_SINGLE_QUOTES) {
            '\''
        } else if self.flags.contains(RestoreFlags::STRING_DOUBLE_QUOTES) {
            '"'
        } else {
            self.out.push_str(value);
            return;
        };
        self.out.push(quote);
        self.out.push_str(&value.replace(quote, &format!("{quote}{quote}")));
        self.out.push(quote);
    }
}

/// A node that can be written back as SQL text.
pub trait Restore {
    /// Appends the node's SQL text to `ctx`.
    fn restore(&self, ctx: &mut RestoreCtx<'_>) -> Result<(), RestoreError>;
}

/// Restores `node` into a fresh string.
pub fn restore_to_string<T: Restore + ?Sized>(
    node: &T,
    flags: RestoreFlags,
) -> Result<String, RestoreError> {
    let mut out = String::new();
    node.restore(&mut RestoreCtx::new(flags, &mut out))?;
    Ok(out)
}

impl Restore for Literal {
    fn restore(&self, ctx: &mut RestoreCtx<'_>) -> Result<(), RestoreError> {
        match self {
            Self::Integer(n) => ctx.write_display(n)?,
            Self::Decimal(text) => ctx.write_plain(text),
            Self::String { value, charset } => {
                if let Some(charset) = charset {
                    if !ctx.flags().contains(RestoreFlags::STRING_WITHOUT_CHARSET) {
                        ctx.write_plain("_");
                        ctx.write_plain(charset);
                    }
                }
                ctx.write_string(value);
            }
            Self::Hex(digits) => ctx.write_display(format_args!("x'{digits}'"))?,
            Self::Bit(digits) => ctx.write_display(format_args!("b'{digits}'"))?,
            Self::Boolean(true) => ctx.write_keyword("TRUE"),
            Self::Boolean(false) => ctx.write_keyword("FALSE"),
            Self::Null => ctx.write_keyword("NULL"),
        }
        Ok(())
    }
}

impl Restore for FunctionCall {
    fn restore(&self, ctx: &mut RestoreCtx<'_>) -> Result<(), RestoreError> {
        ctx.write_keyword(&self.name);
        if self.bare {
            return Ok(());
        }
        ctx.write_plain("(");
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                ctx.write_plain(", ");
            }
            arg.restore(ctx)?;
        }
        ctx.write_plain(")");
        Ok(())
    }
}

impl Restore for Expr {
    fn restore(&self, ctx: &mut RestoreCtx<'_>) -> Result<(), RestoreError> {
        match self {
            Self::Literal(literal) => literal.restore(ctx)?,
            Self::Column { table, name } => {
                if let Some(table) = table {
                    ctx.write_name(table);
                    ctx.write_plain(".");
                }
                ctx.write_name(name);
            }
            Self::Binary { left, op, right } => {
                left.restore(ctx)?;
                ctx.write_plain(" ");
                if op.is_word() {
                    ctx.write_keyword(op.as_str());
                } else {
                    ctx.write_plain(op.as_str());
                }
                ctx.write_plain(" ");
                right.restore(ctx)?;
            }
            Self::Unary { op, operand } => {
                match op {
                    UnaryOp::Neg => ctx.write_plain("-"),
                    UnaryOp::BitNot => ctx.write_plain("~"),
                    UnaryOp::Not => {
                        ctx.write_keyword("NOT");
                        ctx.write_plain(" ");
                    }
                }
                operand.restore(ctx)?;
            }
            Self::Function(call) => call.restore(ctx)?,
            Self::IsNull { expr, negated } => {
                expr.restore(ctx)?;
                ctx.write_plain(" ");
                ctx.write_keyword(if *negated { "IS NOT NULL" } else { "IS NULL" });
            }
            Self::Paren(inner) => {
                ctx.write_plain("(");
                inner.restore(ctx)?;
                ctx.write_plain(")");
            }
            Self::Parameter { position } => {
                return Err(RestoreError::Unsupported(format!(
                    "parameter marker #{position}"
                )));
            }
        }
        Ok(())
    }
}

impl Restore for IndexPartSpec {
    fn restore(&self, ctx: &mut RestoreCtx<'_>) -> Result<(), RestoreError> {
        if let Some(expr) = &self.expr {
            ctx.write_plain("(");
            expr.restore(ctx)?;
            ctx.write_plain(")");
        } else if let Some(column) = &self.column {
            ctx.write_name(column);
            if let Some(length) = self.length {
                ctx.write_display(format_args!("({length})"))?;
            }
        }
        if self.desc {
            ctx.write_plain(" ");
            ctx.write_keyword("DESC");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOp;

    fn restore(node: &impl Restore, flags: RestoreFlags) -> String {
        restore_to_string(node, flags).unwrap_or_else(|e| panic!("restore failed: {e}"))
    }

    #[test]
    fn test_string_quoting_follows_flags() {
        let s = Expr::string("it's");
        assert_eq!(restore(&s, RestoreFlags::STRING_SINGLE_QUOTES), "'it''s'");
        assert_eq!(restore(&s, RestoreFlags::STRING_DOUBLE_QUOTES), "\"it's\"");
        assert_eq!(restore(&s, RestoreFlags::empty()), "it's");
    }

    #[test]
    fn test_charset_introducer() {
        let s = Expr::Literal(Literal::String {
            value: "a".to_string(),
            charset: Some("utf8mb4".to_string()),
        });
        assert_eq!(restore(&s, RestoreFlags::STRING_SINGLE_QUOTES), "_utf8mb4'a'");
        assert_eq!(
            restore(
                &s,
                RestoreFlags::STRING_SINGLE_QUOTES | RestoreFlags::STRING_WITHOUT_CHARSET
            ),
            "'a'"
        );
    }

    #[test]
    fn test_keyword_casing() {
        let expr = Expr::call("Lower", vec![Expr::column("Name")]);
        assert_eq!(restore(&expr, RestoreFlags::DEFAULT), "LOWER(`Name`)");
        assert_eq!(
            restore(
                &expr,
                RestoreFlags::KEYWORD_LOWERCASE | RestoreFlags::NAME_BACK_QUOTES
            ),
            "lower(`Name`)"
        );
        assert_eq!(restore(&expr, RestoreFlags::empty()), "Lower(Name)");
    }

    #[test]
    fn test_binary_and_is_null() {
        let expr = Expr::IsNull {
            expr: Box::new(Expr::binary(
                Expr::column("a"),
                BinaryOp::And,
                Expr::Literal(Literal::Boolean(true)),
            )),
            negated: true,
        };
        assert_eq!(
            restore(&expr, RestoreFlags::KEYWORD_LOWERCASE),
            "a and true is not null"
        );
    }

    #[test]
    fn test_parameter_cannot_be_restored() {
        let err = restore_to_string(&Expr::Parameter { position: 1 }, RestoreFlags::DEFAULT);
        assert!(matches!(err, Err(RestoreError::Unsupported(_))));
    }

    #[test]
    fn test_index_part() {
        let mut part = IndexPartSpec::column("name");
        part.length = Some(10);
        assert_eq!(restore(&part, RestoreFlags::DEFAULT), "`name`(10)");

        let mut part = IndexPartSpec::expression(Expr::call("lower", vec![Expr::column("a")]));
        part.desc = true;
        assert_eq!(
            restore(
                &part,
                RestoreFlags::KEYWORD_LOWERCASE | RestoreFlags::NAME_BACK_QUOTES
            ),
            "(lower(`a`)) desc"
        );
    }
}

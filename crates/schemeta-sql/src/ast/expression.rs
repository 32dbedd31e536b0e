//! Expression AST types.

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Integer literal.
    Integer(i64),
    /// Non-integer or out-of-range numeric literal, as written.
    Decimal(String),
    /// String literal with an optional charset introducer (`_utf8mb4'x'`).
    String {
        /// Unescaped value.
        value: String,
        /// Charset named by the introducer, without the leading underscore.
        charset: Option<String>,
    },
    /// Hexadecimal literal digits.
    Hex(String),
    /// Bit literal digits.
    Bit(String),
    /// TRUE / FALSE.
    Boolean(bool),
    /// NULL.
    Null,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Mod,

    // Comparison
    Eq,
    NotEq,
    NullSafeEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,

    // Logical
    And,
    Or,
    Xor,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,
}

impl BinaryOp {
    /// Returns the SQL spelling of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::IntDiv => "DIV",
            Self::Mod => "%",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::NullSafeEq => "<=>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Like => "LIKE",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Xor => "XOR",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
        }
    }

    /// Whether the operator is spelled as a word, and therefore subject to
    /// keyword casing when restored.
    #[must_use]
    pub const fn is_word(&self) -> bool {
        matches!(
            self,
            Self::IntDiv | Self::Like | Self::And | Self::Or | Self::Xor
        )
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Logical NOT (also `!`)
    Not,
    /// Bitwise NOT (~)
    BitNot,
}

/// A function call such as `now()` or the niladic `CURRENT_TIMESTAMP`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    /// The function name as written.
    pub name: String,
    /// The arguments.
    pub args: Vec<Expr>,
    /// True when written without parentheses.
    pub bare: bool,
}

/// A DDL expression (defaults, generated columns, checks, functional keys).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A column reference (optionally qualified with table name).
    Column {
        /// Table qualifier (optional).
        table: Option<String>,
        /// Column name.
        name: String,
    },

    /// A binary expression.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },

    /// A unary expression.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },

    /// A function call.
    Function(FunctionCall),

    /// IS [NOT] NULL.
    IsNull {
        /// The expression to check.
        expr: Box<Expr>,
        /// Whether this is IS NOT NULL.
        negated: bool,
    },

    /// Parenthesized expression.
    Paren(Box<Expr>),

    /// A `?` placeholder; it has no DDL text form.
    Parameter {
        /// 1-based position in the script.
        position: usize,
    },
}

impl Expr {
    /// Creates an unqualified column reference.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column {
            table: None,
            name: name.into(),
        }
    }

    /// Creates a plain string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String {
            value: value.into(),
            charset: None,
        })
    }

    /// Creates a function call with parenthesised arguments.
    #[must_use]
    pub fn call(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::Function(FunctionCall {
            name: name.into(),
            args,
            bare: false,
        })
    }

    /// Creates a binary expression.
    #[must_use]
    pub fn binary(left: Self, op: BinaryOp, right: Self) -> Self {
        Self::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Returns the string value when this is a string literal.
    #[must_use]
    pub fn as_str_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(Literal::String { value, .. }) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_operators() {
        assert!(BinaryOp::And.is_word());
        assert!(BinaryOp::IntDiv.is_word());
        assert!(!BinaryOp::Add.is_word());
        assert_eq!(BinaryOp::NullSafeEq.as_str(), "<=>");
    }

    #[test]
    fn test_as_str_literal() {
        assert_eq!(Expr::string("x").as_str_literal(), Some("x"));
        assert_eq!(Expr::column("x").as_str_literal(), None);
    }
}

//! Operator binding powers for Pratt expression parsing.

use crate::ast::{BinaryOp, UnaryOp};
use crate::lexer::{Keyword, TokenKind};

/// Binding power of the operand of a unary operator.
pub const UNARY_BINDING_POWER: u8 = 23;

/// Returns the binding power used for the operand of a prefix operator.
///
/// `NOT` binds looser than comparisons, so `NOT a = b` negates the whole
/// comparison.
#[must_use]
pub const fn prefix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Minus | TokenKind::Plus | TokenKind::BitNot | TokenKind::Bang => {
            Some(UNARY_BINDING_POWER)
        }
        TokenKind::Keyword(Keyword::Not) => Some(7),
        _ => None,
    }
}

/// Returns `(left_bp, right_bp)` for an infix operator, or `None` if the
/// token does not continue an expression.
///
/// All binary operators are left associative.
#[must_use]
pub const fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    match kind {
        TokenKind::Keyword(Keyword::Or) | TokenKind::LogicalOr => Some((1, 2)),
        TokenKind::Keyword(Keyword::Xor) => Some((3, 4)),
        TokenKind::Keyword(Keyword::And) | TokenKind::LogicalAnd => Some((5, 6)),
        TokenKind::Eq
        | TokenKind::NotEq
        | TokenKind::NullSafeEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq
        | TokenKind::Keyword(Keyword::Is | Keyword::Like) => Some((9, 10)),
        TokenKind::BitOr => Some((11, 12)),
        TokenKind::BitAnd => Some((13, 14)),
        TokenKind::LeftShift | TokenKind::RightShift => Some((15, 16)),
        TokenKind::Plus | TokenKind::Minus => Some((17, 18)),
        TokenKind::Star
        | TokenKind::Slash
        | TokenKind::Percent
        | TokenKind::Keyword(Keyword::Div | Keyword::Mod) => Some((19, 20)),
        TokenKind::BitXor => Some((21, 22)),
        _ => None,
    }
}

/// Converts a token to a binary operator.
#[must_use]
pub const fn token_to_binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Keyword(Keyword::Div) => Some(BinaryOp::IntDiv),
        TokenKind::Percent | TokenKind::Keyword(Keyword::Mod) => Some(BinaryOp::Mod),
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::NullSafeEq => Some(BinaryOp::NullSafeEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        TokenKind::Keyword(Keyword::Like) => Some(BinaryOp::Like),
        TokenKind::Keyword(Keyword::And) | TokenKind::LogicalAnd => Some(BinaryOp::And),
        TokenKind::Keyword(Keyword::Or) | TokenKind::LogicalOr => Some(BinaryOp::Or),
        TokenKind::Keyword(Keyword::Xor) => Some(BinaryOp::Xor),
        TokenKind::BitAnd => Some(BinaryOp::BitAnd),
        TokenKind::BitOr => Some(BinaryOp::BitOr),
        TokenKind::BitXor => Some(BinaryOp::BitXor),
        TokenKind::LeftShift => Some(BinaryOp::LeftShift),
        TokenKind::RightShift => Some(BinaryOp::RightShift),
        _ => None,
    }
}

/// Converts a token to a unary operator. Unary `+` has no operator: the
/// parser drops it.
#[must_use]
pub const fn token_to_unary_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Minus => Some(UnaryOp::Neg),
        TokenKind::Keyword(Keyword::Not) | TokenKind::Bang => Some(UnaryOp::Not),
        TokenKind::BitNot => Some(UnaryOp::BitNot),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplicative_binds_tighter_than_additive() {
        let (add_l, _) = infix_binding_power(&TokenKind::Plus).unwrap_or_default();
        let (mul_l, _) = infix_binding_power(&TokenKind::Star).unwrap_or_default();
        assert!(mul_l > add_l);
    }

    #[test]
    fn test_not_binds_looser_than_comparison() {
        let not_bp = prefix_binding_power(&TokenKind::Keyword(Keyword::Not));
        let (eq_l, _) = infix_binding_power(&TokenKind::Eq).unwrap_or_default();
        assert!(not_bp.is_some_and(|bp| bp < eq_l));
    }

    #[test]
    fn test_word_operators() {
        assert_eq!(
            token_to_binary_op(&TokenKind::Keyword(Keyword::Div)),
            Some(BinaryOp::IntDiv)
        );
        assert_eq!(token_to_binary_op(&TokenKind::LogicalOr), Some(BinaryOp::Or));
        assert_eq!(token_to_unary_op(&TokenKind::Bang), Some(UnaryOp::Not));
        assert_eq!(token_to_unary_op(&TokenKind::Plus), None);
    }
}

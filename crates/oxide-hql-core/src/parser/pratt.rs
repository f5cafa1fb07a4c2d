//! Pratt expression parser for operator precedence.

use crate::ast::{BinaryOp, ComparisonOp, UnaryOp};
use crate::lexer::TokenKind;
use crate::tree::NodeKind;

/// Left binding power of the duration postfixes (`expr day`,
/// `expr by day`), which sit at the additive level.
pub const DURATION_BINDING_POWER: u8 = 3;

/// Returns the prefix binding power for a sign token.
///
/// Returns `None` if the token is not a sign.
#[must_use]
pub const fn prefix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Plus | TokenKind::Minus => Some(7),
        _ => None,
    }
}

/// Returns the infix binding power for a token.
///
/// Returns `(left_bp, right_bp)` where:
/// - Higher binding power = binds tighter
/// - Left associative: left_bp < right_bp
///
/// Returns `None` if the token is not an infix operator.
#[must_use]
pub const fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    match kind {
        // String concatenation (lowest precedence)
        TokenKind::Concat => Some((1, 2)),

        // Additive
        TokenKind::Plus | TokenKind::Minus => Some((3, 4)),

        // Multiplicative
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some((5, 6)),

        _ => None,
    }
}

/// Returns the parse-tree node an infix operator produces.
#[must_use]
pub const fn infix_node_kind(kind: &TokenKind) -> Option<NodeKind> {
    match kind {
        TokenKind::Concat => Some(NodeKind::ConcatenationExpression),
        TokenKind::Plus | TokenKind::Minus => Some(NodeKind::AdditionExpression),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => {
            Some(NodeKind::MultiplicationExpression)
        }
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
        TokenKind::Percent => Some(BinaryOp::Mod),
        TokenKind::Concat => Some(BinaryOp::Concat),
        _ => None,
    }
}

/// Converts a token to a unary operator.
#[must_use]
pub const fn token_to_unary_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Plus => Some(UnaryOp::Plus),
        TokenKind::Minus => Some(UnaryOp::Neg),
        _ => None,
    }
}

/// Converts a token to a relational comparison operator.
#[must_use]
pub const fn token_to_comparison_op(kind: &TokenKind) -> Option<ComparisonOp> {
    match kind {
        TokenKind::Eq => Some(ComparisonOp::Eq),
        TokenKind::NotEq => Some(ComparisonOp::NotEq),
        TokenKind::Lt => Some(ComparisonOp::Lt),
        TokenKind::LtEq => Some(ComparisonOp::LtEq),
        TokenKind::Gt => Some(ComparisonOp::Gt),
        TokenKind::GtEq => Some(ComparisonOp::GtEq),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        // Multiplication should bind tighter than addition
        let add_bp = infix_binding_power(&TokenKind::Plus).unwrap();
        let mul_bp = infix_binding_power(&TokenKind::Star).unwrap();
        assert!(mul_bp.0 > add_bp.0);

        // Addition should bind tighter than concatenation
        let concat_bp = infix_binding_power(&TokenKind::Concat).unwrap();
        assert!(add_bp.0 > concat_bp.0);

        // Signs bind tighter than every infix operator
        assert!(prefix_binding_power(&TokenKind::Minus).unwrap() > mul_bp.1);
    }

    #[test]
    fn test_left_associativity() {
        let (left, right) = infix_binding_power(&TokenKind::Plus).unwrap();
        assert!(left < right);
    }

    #[test]
    fn test_duration_sits_at_additive_level() {
        let add_bp = infix_binding_power(&TokenKind::Plus).unwrap();
        assert_eq!(DURATION_BINDING_POWER, add_bp.0);
    }

    #[test]
    fn test_token_to_binary_op() {
        assert_eq!(token_to_binary_op(&TokenKind::Plus), Some(BinaryOp::Add));
        assert_eq!(token_to_binary_op(&TokenKind::Concat), Some(BinaryOp::Concat));
        assert_eq!(token_to_binary_op(&TokenKind::Eq), None);
    }

    #[test]
    fn test_token_to_comparison_op() {
        assert_eq!(token_to_comparison_op(&TokenKind::NotEq), Some(ComparisonOp::NotEq));
        assert_eq!(token_to_comparison_op(&TokenKind::Plus), None);
    }

    #[test]
    fn test_token_to_unary_op() {
        assert_eq!(token_to_unary_op(&TokenKind::Minus), Some(UnaryOp::Neg));
        assert_eq!(token_to_unary_op(&TokenKind::Star), None);
    }
}

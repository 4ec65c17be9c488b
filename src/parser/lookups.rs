use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::lexer::tokens::TokenKind;

lazy_static! {
    /// Operators grouped by precedence, lowest first.
    ///
    /// Comparisons are non-associative; other binary operators associate to
    /// the left. Unary `+` and `-` bind tighter than all of these and are
    /// handled in primary parsing.
    pub static ref PREC_LEVELS: Vec<Vec<TokenKind>> = vec![
        vec![TokenKind::Or],
        vec![TokenKind::And],
        vec![TokenKind::Not],
        vec![
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::In,
            TokenKind::NotIn,
        ],
        vec![TokenKind::Pipe],
        vec![TokenKind::Amp],
        vec![TokenKind::Minus, TokenKind::Plus],
        vec![TokenKind::Star, TokenKind::Percent, TokenKind::Slash, TokenKind::SlashSlash],
    ];

    pub static ref PRECEDENCE_LOOKUP: HashMap<TokenKind, usize> = {
        let mut map = HashMap::new();
        for (level, kinds) in PREC_LEVELS.iter().enumerate() {
            for kind in kinds {
                map.insert(*kind, level);
            }
        }
        map
    };
}

/// Precedence of a binary operator, or `None` for any other token.
pub fn precedence(kind: TokenKind) -> Option<usize> {
    PRECEDENCE_LOOKUP.get(&kind).copied()
}

/// Number of precedence levels.
pub fn level_count() -> usize {
    PREC_LEVELS.len()
}

/// Level of `not` as a prefix operator.
pub fn not_level() -> usize {
    precedence(TokenKind::Not).unwrap_or(2)
}

/// Level shared by the non-associative comparison operators.
pub fn comparison_level() -> usize {
    precedence(TokenKind::Equals).unwrap_or(3)
}

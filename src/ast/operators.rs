use crate::ast::TokenKind;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterEqual,
}

impl Comparator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Eq => Some(Comparator::Equal),
            TokenKind::Ne => Some(Comparator::NotEqual),
            TokenKind::Lt => Some(Comparator::LessThan),
            TokenKind::Lte => Some(Comparator::LessEqual),
            TokenKind::Gt => Some(Comparator::GreaterThan),
            TokenKind::Gte => Some(Comparator::GreaterEqual),
            _ => None,
        }
    }

    /// Whether this operator needs two numbers to produce a result.
    pub fn is_ordering(self) -> bool {
        !matches!(self, Comparator::Equal | Comparator::NotEqual)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Equal => "==",
            Comparator::NotEqual => "!=",
            Comparator::LessThan => "<",
            Comparator::LessEqual => "<=",
            Comparator::GreaterThan => ">",
            Comparator::GreaterEqual => ">=",
        }
    }
}

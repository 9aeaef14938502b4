use thiserror::Error;

use crate::{evaluator::EvalError, lexer::LexError, parser::ParseError};

/// Any error produced while compiling or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JmesPathError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl From<crate::functions::FunctionError> for JmesPathError {
    fn from(err: crate::functions::FunctionError) -> Self {
        JmesPathError::Eval(err.into())
    }
}

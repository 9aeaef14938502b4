//! # jmespath-engine
//!
//! A JMESPath query engine for `serde_json` documents.
//!
//! ```
//! use serde_json::json;
//!
//! let data = json!({"locations": [
//!     {"name": "Seattle", "state": "WA"},
//!     {"name": "New York", "state": "NY"},
//!     {"name": "Olympia", "state": "WA"}
//! ]});
//!
//! let result = jmespath_engine::search(
//!     "locations[?state == 'WA'].name | sort(@) | {WashingtonCities: join(', ', @)}",
//!     &data,
//! )
//! .unwrap();
//! assert_eq!(result, json!({"WashingtonCities": "Olympia, Seattle"}));
//! ```
//!
//! Expressions are compiled by [`lexer`] and [`parser`] into an [`ast::Ast`]
//! and evaluated by [`evaluator::Evaluator`], which dispatches function
//! calls through a [`functions::FunctionRegistry`]. A [`Runtime`] bundles a
//! registry with a cache of compiled expressions.
pub mod ast;
pub mod cli;
pub mod envelopes;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod value;

use serde_json::Value;

pub use ast::{Ast, Comparator, Token, TokenKind};
pub use error::JmesPathError;
pub use evaluator::{EvalError, Evaluator};
pub use functions::{FunctionError, FunctionRegistry};
pub use lexer::{LexError, Lexer, tokenize};
pub use parser::{ParseError, Parser, parse};
pub use runtime::{CompiledExpression, Runtime, RuntimeBuilder};
pub use value::JmesValue;

/// Evaluate `expression` against `data` with the built-in functions.
pub fn search(expression: &str, data: &Value) -> Result<Value, JmesPathError> {
    Runtime::global().search(expression, data)
}

/// Compile `expression` for repeated evaluation.
pub fn compile(expression: &str) -> Result<CompiledExpression, JmesPathError> {
    Runtime::global().compile(expression)
}

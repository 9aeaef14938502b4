//! # Function Registry
//!
//! JMESPath functions are looked up by name in a [`FunctionRegistry`]. Each
//! entry pairs a [`Signature`] with an implementation. Arity and argument
//! types are validated against the signature before the implementation
//! runs, so implementations only see arguments of the declared types.
//!
//! ## Built-in Functions
//!
//! | Function | Signature |
//! |---|---|
//! | `abs` | `(number)` |
//! | `avg` | `(array-number)` |
//! | `ceil` / `floor` | `(number)` |
//! | `contains` | `(array\|string, any)` |
//! | `ends_with` / `starts_with` | `(string, string)` |
//! | `join` | `(string, array-string)` |
//! | `keys` / `values` | `(object)` |
//! | `length` | `(string\|array\|object)` |
//! | `map` | `(expression, array)` |
//! | `max` / `min` / `sort` | `(array-number\|array-string)` |
//! | `max_by` / `min_by` / `sort_by` | `(array, expression)` |
//! | `merge` | `(object, ...)` |
//! | `not_null` | `(any, ...)` |
//! | `reverse` | `(array\|string)` |
//! | `sum` | `(array-number)` |
//! | `to_array` / `to_number` / `to_string` / `type` | `(any)` |
//!
//! ## Extension Functions
//!
//! [`FunctionRegistry::with_powertools`] adds `powertools_json`,
//! `powertools_base64` and `powertools_base64_gzip`, used by the
//! [`envelopes`](crate::envelopes) module to unwrap serverless event payloads.
//!
//! ## Custom Functions
//!
//! ```
//! use jmespath_engine::functions::{ArgSpec, ArgType, Argument, Signature};
//! use jmespath_engine::Runtime;
//! use serde_json::{json, Value};
//!
//! let runtime = Runtime::builder()
//!     .register(
//!         "double",
//!         Signature::new(vec![ArgSpec::new([ArgType::Number])]),
//!         |args, _| {
//!             let n = args[0].as_value().and_then(Value::as_i64).unwrap_or(0);
//!             Ok(json!(n * 2))
//!         },
//!     )
//!     .build();
//!
//! assert_eq!(runtime.search("double(a)", &json!({"a": 21})).unwrap(), json!(42));
//! ```
mod builtins;
mod powertools;
pub mod signature;

use std::{collections::HashMap, fmt, sync::Arc};

use serde_json::Value;
use thiserror::Error;
use tracing::trace;

use crate::{
    ast::Ast,
    evaluator::{EvalError, Evaluator},
    value::JmesValue,
};

pub use signature::{ArgSpec, ArgType, Signature, TypeMismatch};

/// Errors raised while resolving or calling a function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionError {
    #[error("Unknown function {name}")]
    UnknownFunction { name: String },

    #[error("Invalid arity for function {name}: expected {expected}, received {actual}")]
    InvalidArity {
        name: String,
        expected: String,
        actual: usize,
    },

    /// `position` is 1-based.
    #[error(
        "Invalid type for argument {position} to function {name}: expected one of {}, received \"{actual}\"",
        quote_all(.expected)
    )]
    InvalidType {
        name: String,
        position: usize,
        expected: Vec<&'static str>,
        actual: &'static str,
    },

    #[error("Invalid value for function {name}: {message}")]
    InvalidValue { name: String, message: String },
}

fn quote_all(types: &[&'static str]) -> String {
    types
        .iter()
        .map(|t| format!("\"{}\"", t))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A function argument: an evaluated value or an expression reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument<'a> {
    Value(Value),
    Expression(&'a Ast),
}

impl<'a> Argument<'a> {
    pub fn type_name(&self) -> &'static str {
        match self {
            Argument::Value(value) => value.type_name(),
            Argument::Expression(_) => "expression",
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Argument::Value(value) => Some(value),
            Argument::Expression(_) => None,
        }
    }

    pub fn as_expression(&self) -> Option<&'a Ast> {
        match self {
            Argument::Expression(ast) => Some(ast),
            Argument::Value(_) => None,
        }
    }
}

/// Function implementation. Receives the validated arguments and the
/// evaluator, which expression arguments are evaluated with.
pub type FunctionImpl =
    Arc<dyn Fn(&[Argument<'_>], &Evaluator<'_>) -> Result<Value, EvalError> + Send + Sync>;

#[derive(Clone)]
pub struct FunctionEntry {
    pub signature: Signature,
    implementation: FunctionImpl,
}

/// Name to function table used for dispatch.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionEntry>,
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the standard JMESPath functions.
    pub fn builtins() -> Self {
        let mut registry = Self::new();
        builtins::register_all(&mut registry);
        registry
    }

    /// Add the `powertools_*` extension functions.
    pub fn with_powertools(mut self) -> Self {
        powertools::register_all(&mut self);
        self
    }

    /// Register `name`, replacing any existing function of that name.
    pub fn register<F>(&mut self, name: impl Into<String>, signature: Signature, implementation: F)
    where
        F: Fn(&[Argument<'_>], &Evaluator<'_>) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        self.functions.insert(
            name.into(),
            FunctionEntry {
                signature,
                implementation: Arc::new(implementation),
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&FunctionEntry> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names with their signatures, sorted by name.
    pub fn signatures(&self) -> Vec<(&str, &Signature)> {
        let mut entries: Vec<(&str, &Signature)> = self
            .functions
            .iter()
            .map(|(name, entry)| (name.as_str(), &entry.signature))
            .collect();
        entries.sort_by_key(|(name, _)| *name);
        entries
    }

    /// Validate `args` against the signature of `name` and call it.
    pub fn call(
        &self,
        name: &str,
        args: &[Argument<'_>],
        evaluator: &Evaluator<'_>,
    ) -> Result<Value, EvalError> {
        let entry = self
            .functions
            .get(name)
            .ok_or_else(|| FunctionError::UnknownFunction {
                name: name.to_string(),
            })?;

        trace!(function = name, args = args.len(), "dispatching function");
        validate(name, &entry.signature, args)?;
        (entry.implementation)(args, evaluator)
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.signatures().into_iter().map(|(n, _)| n).collect();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

fn validate(name: &str, signature: &Signature, args: &[Argument<'_>]) -> Result<(), FunctionError> {
    if let Some(expected) = signature.arity_mismatch(args.len()) {
        return Err(FunctionError::InvalidArity {
            name: name.to_string(),
            expected,
            actual: args.len(),
        });
    }

    for (index, arg) in args.iter().enumerate() {
        let Some(spec) = signature.spec_at(index) else {
            continue;
        };
        spec.check(arg)
            .map_err(|mismatch| FunctionError::InvalidType {
                name: name.to_string(),
                position: index + 1,
                expected: mismatch.expected,
                actual: mismatch.actual,
            })?;
    }
    Ok(())
}

//! Engine configuration: which functions are available and how compiled
//! expressions are cached.

use std::{num::NonZeroUsize, sync::Arc};

use lru::LruCache;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::{
    ast::Ast,
    error::JmesPathError,
    evaluator::{EvalError, Evaluator},
    functions::{Argument, FunctionRegistry, Signature},
    lexer::Lexer,
    parser::Parser,
};

/// Number of compiled expressions kept by a default runtime.
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

static DEFAULT_RUNTIME: Lazy<Runtime> = Lazy::new(Runtime::new);

/// A parsed expression, ready to be evaluated against any number of
/// documents. Clones share the same tree.
#[derive(Debug, Clone)]
pub struct CompiledExpression {
    expression: Arc<str>,
    ast: Arc<Ast>,
    functions: Arc<FunctionRegistry>,
}

impl CompiledExpression {
    /// The source text this expression was compiled from.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Evaluate against `data` with the functions of the compiling runtime.
    pub fn search(&self, data: &Value) -> Result<Value, JmesPathError> {
        Ok(Evaluator::new(&self.functions).evaluate(&self.ast, data)?)
    }
}

/// The engine configuration object.
///
/// # Examples
///
/// ```
/// use jmespath_engine::Runtime;
/// use serde_json::json;
///
/// let runtime = Runtime::builder()
///     .with_powertools_functions()
///     .cache_capacity(16)
///     .build();
///
/// let event = json!({"body": "{\"id\": 7}"});
/// assert_eq!(runtime.search("powertools_json(body).id", &event).unwrap(), json!(7));
/// ```
#[derive(Debug)]
pub struct Runtime {
    functions: Arc<FunctionRegistry>,
    cache: Option<Mutex<LruCache<String, CompiledExpression>>>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// A runtime with the built-in functions and the default cache.
    pub fn new() -> Self {
        RuntimeBuilder::default().build()
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::default()
    }

    /// The process-wide runtime behind [`crate::search`] and [`crate::compile`].
    pub fn global() -> &'static Runtime {
        &DEFAULT_RUNTIME
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Number of cached expressions.
    pub fn cached(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.lock().len())
    }

    /// Parse `expression`, reusing a cached tree when one is available.
    pub fn compile(&self, expression: &str) -> Result<CompiledExpression, JmesPathError> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.lock().get(expression).cloned() {
                debug!(expression, "expression cache hit");
                return Ok(hit);
            }
            debug!(expression, "expression cache miss");
        }

        let mut parser = Parser::new(Lexer::new(expression))?;
        let tokens = parser.token_count();
        let ast = parser.parse()?;
        debug!(expression, tokens, "compiled expression");

        let compiled = CompiledExpression {
            expression: Arc::from(expression),
            ast: Arc::new(ast),
            functions: Arc::clone(&self.functions),
        };
        if let Some(cache) = &self.cache {
            cache.lock().put(expression.to_string(), compiled.clone());
        }
        Ok(compiled)
    }

    /// Compile `expression` and evaluate it against `data`.
    pub fn search(&self, expression: &str, data: &Value) -> Result<Value, JmesPathError> {
        self.compile(expression)?.search(data)
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    functions: FunctionRegistry,
    cache_capacity: usize,
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        RuntimeBuilder {
            functions: FunctionRegistry::builtins(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl RuntimeBuilder {
    /// Add `powertools_json`, `powertools_base64` and `powertools_base64_gzip`.
    pub fn with_powertools_functions(mut self) -> Self {
        self.functions = self.functions.with_powertools();
        self
    }

    /// Register a custom function, replacing any function of the same name.
    pub fn register<F>(mut self, name: impl Into<String>, signature: Signature, implementation: F) -> Self
    where
        F: Fn(&[Argument<'_>], &Evaluator<'_>) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        self.functions.register(name, signature, implementation);
        self
    }

    /// Maximum number of compiled expressions to keep. `0` disables caching.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn build(self) -> Runtime {
        Runtime {
            functions: Arc::new(self.functions),
            cache: NonZeroUsize::new(self.cache_capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }
}

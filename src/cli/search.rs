//! Execute JMESPath expressions against JSON input

use serde_json::Value;

use super::CliError;
use crate::{Lexer, Parser, Runtime};

/// Options for the search command
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// The JMESPath expression to evaluate
    pub expression: String,
    /// JSON input string
    pub input: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
    /// Enable the `powertools_*` extension functions
    pub powertools: bool,
}

/// Result of a search operation
#[derive(Debug, PartialEq)]
pub enum SearchResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Expression evaluated successfully
    Success(Value),
}

impl SearchOptions {
    fn runtime(&self) -> Runtime {
        let builder = Runtime::builder().cache_capacity(0);
        if self.powertools {
            builder.with_powertools_functions().build()
        } else {
            builder.build()
        }
    }
}

/// Execute a search operation
pub fn execute_search(options: &SearchOptions) -> Result<SearchResult, CliError> {
    if options.syntax_only {
        let mut parser = Parser::new(Lexer::new(&options.expression)).map_err(crate::JmesPathError::from)?;
        parser.parse().map_err(crate::JmesPathError::from)?;
        return Ok(SearchResult::SyntaxValid);
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let document: Value = serde_json::from_str(json_str)?;

    let result = options.runtime().search(&options.expression, &document)?;
    Ok(SearchResult::Success(result))
}

/// Render a result the way the `search` command prints it.
pub fn render(value: &Value, pretty: bool) -> Result<String, CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

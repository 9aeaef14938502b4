use std::fmt;

use serde_json::Value;

use crate::{functions::Argument, value::JmesValue};

/// Argument types a function signature can accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    Any,
    Array,
    ArrayNumber,
    ArrayString,
    String,
    Number,
    Object,
    Boolean,
    Null,
    Expression,
}

impl ArgType {
    pub fn name(self) -> &'static str {
        match self {
            ArgType::Any => "any",
            ArgType::Array => "array",
            ArgType::ArrayNumber => "array-number",
            ArgType::ArrayString => "array-string",
            ArgType::String => "string",
            ArgType::Number => "number",
            ArgType::Object => "object",
            ArgType::Boolean => "boolean",
            ArgType::Null => "null",
            ArgType::Expression => "expression",
        }
    }

    /// Element type of a typed array.
    fn element(self) -> Option<&'static str> {
        match self {
            ArgType::ArrayNumber => Some("number"),
            ArgType::ArrayString => Some("string"),
            _ => None,
        }
    }

    fn accepts(self, arg: &Argument<'_>) -> bool {
        let value = match arg {
            Argument::Expression(_) => return self == ArgType::Expression,
            Argument::Value(value) => value,
        };
        match self {
            ArgType::Any => true,
            ArgType::Expression => false,
            ArgType::Array => value.is_array(),
            ArgType::ArrayNumber | ArgType::ArrayString => {
                let element = self.element();
                value
                    .as_array()
                    .is_some_and(|items| items.iter().all(|v| Some(v.type_name()) == element))
            }
            ArgType::String => value.is_string(),
            ArgType::Number => value.is_number(),
            ArgType::Object => value.is_object(),
            ArgType::Boolean => value.is_boolean(),
            ArgType::Null => value.is_null(),
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The union of types accepted at one argument position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSpec {
    types: Vec<ArgType>,
}

/// Why an argument did not match its [`ArgSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    pub expected: Vec<&'static str>,
    pub actual: &'static str,
}

impl ArgSpec {
    pub fn new(types: impl Into<Vec<ArgType>>) -> Self {
        ArgSpec {
            types: types.into(),
        }
    }

    pub fn types(&self) -> &[ArgType] {
        &self.types
    }

    pub fn check(&self, arg: &Argument<'_>) -> Result<(), TypeMismatch> {
        if self.types.iter().any(|t| t.accepts(arg)) {
            return Ok(());
        }

        // An array offered to a typed-array union is reported at the first
        // element that breaks the type chosen by the leading element.
        if let Argument::Value(Value::Array(items)) = arg {
            let elements: Vec<&'static str> =
                self.types.iter().filter_map(|t| t.element()).collect();
            if let Some(first) = items.first() {
                let wanted = elements
                    .iter()
                    .find(|e| **e == first.type_name())
                    .or(elements.first());
                if let Some(wanted) = wanted {
                    if let Some(bad) = items.iter().find(|v| v.type_name() != *wanted) {
                        return Err(TypeMismatch {
                            expected: vec![*wanted],
                            actual: bad.type_name(),
                        });
                    }
                }
            }
        }

        Err(TypeMismatch {
            expected: self.types.iter().map(|t| t.name()).collect(),
            actual: arg.type_name(),
        })
    }
}

impl fmt::Display for ArgSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.types.iter().map(|t| t.name()).collect();
        f.write_str(&names.join("|"))
    }
}

/// Declared arguments of a function.
///
/// A variadic signature repeats its last [`ArgSpec`] for any number of
/// extra arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    args: Vec<ArgSpec>,
    variadic: bool,
}

impl Signature {
    pub fn new(args: Vec<ArgSpec>) -> Self {
        Signature {
            args,
            variadic: false,
        }
    }

    pub fn variadic(args: Vec<ArgSpec>) -> Self {
        Signature {
            args,
            variadic: true,
        }
    }

    pub fn args(&self) -> &[ArgSpec] {
        &self.args
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn min_arity(&self) -> usize {
        self.args.len()
    }

    /// `None` when the function is variadic.
    pub fn max_arity(&self) -> Option<usize> {
        if self.variadic {
            None
        } else {
            Some(self.args.len())
        }
    }

    /// Spec for the argument at `index`, repeating the tail when variadic.
    pub fn spec_at(&self, index: usize) -> Option<&ArgSpec> {
        match self.args.get(index) {
            Some(spec) => Some(spec),
            None if self.variadic => self.args.last(),
            None => None,
        }
    }

    /// Describe the expected arity when `actual` arguments do not fit.
    pub fn arity_mismatch(&self, actual: usize) -> Option<String> {
        let min = self.min_arity();
        let noun = if min == 1 { "argument" } else { "arguments" };
        match self.max_arity() {
            _ if actual < min && self.variadic => Some(format!("at least {} {}", min, noun)),
            Some(max) if actual < min || actual > max => {
                let bound = if actual < min { "at least" } else { "at most" };
                Some(format!("{} {} {}", bound, max, noun))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
        if self.variadic {
            parts.push("...".to_string());
        }
        write!(f, "({})", parts.join(", "))
    }
}

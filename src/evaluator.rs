use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    ast::{Ast, Comparator},
    functions::{Argument, FunctionError, FunctionRegistry},
    value::JmesValue,
};

/// Errors that can occur during expression evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Unknown function, wrong arity, wrong argument type or a payload an
    /// extension function could not decode
    #[error(transparent)]
    Function(#[from] FunctionError),

    /// A slice was evaluated with a step of zero
    #[error("Invalid slice, step cannot be 0")]
    InvalidSliceStep,
}

/// Tree-walking evaluator.
///
/// Evaluation never mutates the document: every node reads its input by
/// reference and produces a fresh value.
pub struct Evaluator<'r> {
    functions: &'r FunctionRegistry,
}

impl<'r> Evaluator<'r> {
    /// Creates an evaluator dispatching function calls to `functions`.
    pub fn new(functions: &'r FunctionRegistry) -> Self {
        Evaluator { functions }
    }

    /// Evaluates `ast` against `document`.
    ///
    /// # Examples
    ///
    /// ```
    /// use jmespath_engine::evaluator::Evaluator;
    /// use jmespath_engine::functions::FunctionRegistry;
    /// use jmespath_engine::parser::parse;
    /// use serde_json::json;
    ///
    /// let registry = FunctionRegistry::builtins();
    /// let ast = parse("people[?age > `30`].name").unwrap();
    /// let doc = json!({"people": [{"name": "a", "age": 31}, {"name": "b", "age": 20}]});
    ///
    /// let result = Evaluator::new(&registry).evaluate(&ast, &doc).unwrap();
    /// assert_eq!(result, json!(["a"]));
    /// ```
    pub fn evaluate(&self, ast: &Ast, document: &Value) -> Result<Value, EvalError> {
        self.eval_expr(ast, document)
    }

    fn eval_expr(&self, expr: &Ast, current: &Value) -> Result<Value, EvalError> {
        match expr {
            Ast::Identity | Ast::CurrentNode => Ok(current.clone()),
            Ast::Field(name) => Ok(current.get(name).cloned().unwrap_or(Value::Null)),
            Ast::Index(index) => Ok(current
                .as_array()
                .and_then(|items| resolve_index(items.len(), *index).map(|i| items[i].clone()))
                .unwrap_or(Value::Null)),
            Ast::Slice { start, stop, step } => {
                if *step == Some(0) {
                    return Err(EvalError::InvalidSliceStep);
                }
                match current {
                    Value::Array(items) => Ok(Value::Array(slice(items, *start, *stop, *step)?)),
                    _ => Ok(Value::Null),
                }
            }
            Ast::Subexpression { left, right } => {
                let base = self.eval_expr(left, current)?;
                self.eval_expr(right, &base)
            }
            Ast::Pipe { left, right } => {
                let base = self.eval_expr(left, current)?;
                self.eval_expr(right, &base)
            }
            Ast::IndexProjection(child) => match current {
                Value::Array(items) => self.project(items.iter(), child),
                _ => Ok(Value::Null),
            },
            Ast::ValueProjection(child) => match current {
                Value::Object(map) => self.project(map.values(), child),
                _ => Ok(Value::Null),
            },
            Ast::FlattenProjection(child) => match current {
                Value::Array(items) => {
                    let flattened = flatten(items);
                    self.project(flattened.iter(), child)
                }
                _ => Ok(Value::Null),
            },
            Ast::FilterProjection { predicate, child } => {
                let items = match current {
                    Value::Array(items) => items,
                    _ => return Ok(Value::Null),
                };
                let mut results = Vec::new();
                for item in items {
                    if !self.eval_expr(predicate, item)?.is_truthy() {
                        continue;
                    }
                    let value = self.eval_expr(child, item)?;
                    if !value.is_null() {
                        results.push(value);
                    }
                }
                Ok(Value::Array(results))
            }
            Ast::Or { left, right } => {
                let left_val = self.eval_expr(left, current)?;
                if left_val.is_truthy() {
                    Ok(left_val)
                } else {
                    self.eval_expr(right, current)
                }
            }
            Ast::And { left, right } => {
                let left_val = self.eval_expr(left, current)?;
                if left_val.is_truthy() {
                    self.eval_expr(right, current)
                } else {
                    Ok(left_val)
                }
            }
            Ast::Not(child) => Ok(Value::Bool(!self.eval_expr(child, current)?.is_truthy())),
            Ast::Comparison { op, left, right } => {
                let left_val = self.eval_expr(left, current)?;
                let right_val = self.eval_expr(right, current)?;
                Ok(compare(*op, &left_val, &right_val))
            }
            Ast::Literal(value) => Ok(value.clone()),
            Ast::MultiSelectList(items) => {
                if current.is_null() {
                    return Ok(Value::Null);
                }
                let mut results = Vec::with_capacity(items.len());
                for item in items {
                    results.push(self.eval_expr(item, current)?);
                }
                Ok(Value::Array(results))
            }
            Ast::MultiSelectHash(entries) => {
                if current.is_null() {
                    return Ok(Value::Null);
                }
                let mut map = Map::new();
                for (key, expr) in entries {
                    map.insert(key.clone(), self.eval_expr(expr, current)?);
                }
                Ok(Value::Object(map))
            }
            Ast::Function { name, args } => {
                let mut resolved = Vec::with_capacity(args.len());
                for arg in args {
                    resolved.push(match arg {
                        Ast::ExpressionRef(inner) => Argument::Expression(inner.as_ref()),
                        other => Argument::Value(self.eval_expr(other, current)?),
                    });
                }
                self.functions.call(name, &resolved, self)
            }
            // Only meaningful as a function argument
            Ast::ExpressionRef(_) => Ok(Value::Null),
        }
    }

    /// Apply `child` to every element, dropping null results.
    fn project<'v>(
        &self,
        items: impl Iterator<Item = &'v Value>,
        child: &Ast,
    ) -> Result<Value, EvalError> {
        let mut results = Vec::new();
        for item in items {
            let value = self.eval_expr(child, item)?;
            if !value.is_null() {
                results.push(value);
            }
        }
        Ok(Value::Array(results))
    }
}

fn resolve_index(len: usize, index: i64) -> Option<usize> {
    let len = len as i64;
    let resolved = if index < 0 { len + index } else { index };
    if (0..len).contains(&resolved) {
        Some(resolved as usize)
    } else {
        None
    }
}

/// Merge nested arrays one level deep, keeping other elements as they are.
fn flatten(items: &[Value]) -> Vec<Value> {
    let mut flattened = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Array(inner) => flattened.extend(inner.iter().cloned()),
            other => flattened.push(other.clone()),
        }
    }
    flattened
}

/// Clamp a slice bound into the array, following Python slice rules.
fn cap_slice_bound(len: i64, bound: i64, step: i64) -> i64 {
    if bound < 0 {
        let bound = bound + len;
        if bound < 0 {
            if step < 0 { -1 } else { 0 }
        } else {
            bound
        }
    } else if bound >= len {
        if step < 0 { len - 1 } else { len }
    } else {
        bound
    }
}

fn slice(
    items: &[Value],
    start: Option<i64>,
    stop: Option<i64>,
    step: Option<i64>,
) -> Result<Vec<Value>, EvalError> {
    let step = step.unwrap_or(1);
    if step == 0 {
        return Err(EvalError::InvalidSliceStep);
    }
    let len = items.len() as i64;
    let start = match start {
        Some(bound) => cap_slice_bound(len, bound, step),
        None if step < 0 => len - 1,
        None => 0,
    };
    let stop = match stop {
        Some(bound) => cap_slice_bound(len, bound, step),
        None if step < 0 => -1,
        None => len,
    };

    let mut result = Vec::new();
    let mut i = start;
    while (step > 0 && i < stop) || (step < 0 && i > stop) {
        result.push(items[i as usize].clone());
        match i.checked_add(step) {
            Some(next) => i = next,
            None => break,
        }
    }
    Ok(result)
}

/// Equality is structural for any pair of values. Ordering is only defined
/// between two numbers; any other pairing yields `null`.
fn compare(op: Comparator, left: &Value, right: &Value) -> Value {
    match op {
        Comparator::Equal => Value::Bool(left.structurally_equals(right)),
        Comparator::NotEqual => Value::Bool(!left.structurally_equals(right)),
        _ => {
            let (Some(a), Some(b)) = (left.number_value(), right.number_value()) else {
                return Value::Null;
            };
            Value::Bool(match op {
                Comparator::LessThan => a < b,
                Comparator::LessEqual => a <= b,
                Comparator::GreaterThan => a > b,
                _ => a >= b,
            })
        }
    }
}

use std::cmp::Ordering;

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use serde_json::{Map, Number, Value};

use crate::{
    ast::Ast,
    evaluator::{EvalError, Evaluator},
    functions::{ArgSpec, ArgType, Argument, FunctionError, FunctionRegistry, Signature},
    value::{JmesValue, float_value, integral_value},
};

macro_rules! signature {
    ($([$($ty:ident)|+]),* $(,)?) => {
        Signature::new(vec![$(ArgSpec::new([$(ArgType::$ty),+])),*])
    };
}

pub(super) fn register_all(registry: &mut FunctionRegistry) {
    registry.register("abs", signature![[Number]], abs);
    registry.register("avg", signature![[ArrayNumber]], avg);
    registry.register("ceil", signature![[Number]], ceil);
    registry.register("contains", signature![[Array | String], [Any]], contains);
    registry.register("ends_with", signature![[String], [String]], ends_with);
    registry.register("floor", signature![[Number]], floor);
    registry.register("join", signature![[String], [ArrayString]], join);
    registry.register("keys", signature![[Object]], keys);
    registry.register("length", signature![[String | Array | Object]], length);
    registry.register("map", signature![[Expression], [Array]], map);
    registry.register("max", signature![[ArrayNumber | ArrayString]], max);
    registry.register("max_by", signature![[Array], [Expression]], max_by);
    registry.register(
        "merge",
        Signature::variadic(vec![ArgSpec::new([ArgType::Object])]),
        merge,
    );
    registry.register("min", signature![[ArrayNumber | ArrayString]], min);
    registry.register("min_by", signature![[Array], [Expression]], min_by);
    registry.register(
        "not_null",
        Signature::variadic(vec![ArgSpec::new([ArgType::Any])]),
        not_null,
    );
    registry.register("reverse", signature![[Array | String]], reverse);
    registry.register("sort", signature![[ArrayNumber | ArrayString]], sort);
    registry.register("sort_by", signature![[Array], [Expression]], sort_by);
    registry.register("starts_with", signature![[String], [String]], starts_with);
    registry.register("sum", signature![[ArrayNumber]], sum);
    registry.register("to_array", signature![[Any]], to_array);
    registry.register("to_number", signature![[Any]], to_number);
    registry.register("to_string", signature![[Any]], to_string);
    registry.register("type", signature![[Any]], type_of);
    registry.register("values", signature![[Object]], values);
}

/// Typed access to validated arguments.
///
/// The registry checks arguments before dispatch, so a mismatch here means
/// a function was registered with a signature that does not fit its body.
struct Args<'a, 'b> {
    name: &'static str,
    args: &'a [Argument<'b>],
}

impl<'a, 'b> Args<'a, 'b> {
    fn new(name: &'static str, args: &'a [Argument<'b>]) -> Self {
        Args { name, args }
    }

    fn mismatch(&self, index: usize, expected: &'static str) -> EvalError {
        FunctionError::InvalidType {
            name: self.name.to_string(),
            position: index + 1,
            expected: vec![expected],
            actual: self.args.get(index).map_or("null", |a| a.type_name()),
        }
        .into()
    }

    fn value(&self, index: usize) -> Result<&'a Value, EvalError> {
        self.args
            .get(index)
            .and_then(|a| a.as_value())
            .ok_or_else(|| self.mismatch(index, "any"))
    }

    fn number(&self, index: usize) -> Result<&'a Number, EvalError> {
        match self.value(index)? {
            Value::Number(n) => Ok(n),
            _ => Err(self.mismatch(index, "number")),
        }
    }

    fn string(&self, index: usize) -> Result<&'a str, EvalError> {
        self.value(index)?
            .as_str()
            .ok_or_else(|| self.mismatch(index, "string"))
    }

    fn array(&self, index: usize) -> Result<&'a Vec<Value>, EvalError> {
        self.value(index)?
            .as_array()
            .ok_or_else(|| self.mismatch(index, "array"))
    }

    fn object(&self, index: usize) -> Result<&'a Map<String, Value>, EvalError> {
        self.value(index)?
            .as_object()
            .ok_or_else(|| self.mismatch(index, "object"))
    }

    fn expression(&self, index: usize) -> Result<&'b Ast, EvalError> {
        self.args
            .get(index)
            .and_then(|a| a.as_expression())
            .ok_or_else(|| self.mismatch(index, "expression"))
    }
}

fn abs(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let n = Args::new("abs", args).number(0)?;
    if n.is_u64() {
        return Ok(Value::Number(n.clone()));
    }
    match n.as_i64().and_then(i64::checked_abs) {
        Some(i) => Ok(Value::from(i)),
        None => Ok(float_value(n.as_f64().unwrap_or_default().abs())),
    }
}

fn decimal_sum(items: &[Value]) -> Option<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |acc, item| {
        let n = match item {
            Value::Number(n) => n,
            _ => return None,
        };
        let d = match n.as_i64() {
            Some(i) => Decimal::from(i),
            None => Decimal::from_f64(n.as_f64()?)?,
        };
        acc.checked_add(d)
    })
}

fn float_sum(items: &[Value]) -> f64 {
    items.iter().filter_map(|v| v.number_value()).sum()
}

fn avg(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let items = Args::new("avg", args).array(0)?;
    if items.is_empty() {
        return Ok(Value::Null);
    }
    let mean = decimal_sum(items)
        .and_then(|total| total.checked_div(Decimal::from(items.len())))
        .and_then(|mean| mean.to_f64())
        .unwrap_or_else(|| float_sum(items) / items.len() as f64);
    Ok(float_value(mean))
}

fn sum(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let items = Args::new("sum", args).array(0)?;
    let integers = items
        .iter()
        .try_fold(0i64, |acc, v| v.as_i64().and_then(|i| acc.checked_add(i)));
    if let Some(total) = integers {
        return Ok(Value::from(total));
    }
    let total = decimal_sum(items)
        .and_then(|total| total.to_f64())
        .unwrap_or_else(|| float_sum(items));
    Ok(float_value(total))
}

fn ceil(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let n = Args::new("ceil", args).number(0)?;
    if n.is_i64() || n.is_u64() {
        return Ok(Value::Number(n.clone()));
    }
    Ok(integral_value(n.as_f64().unwrap_or_default().ceil()))
}

fn floor(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let n = Args::new("floor", args).number(0)?;
    if n.is_i64() || n.is_u64() {
        return Ok(Value::Number(n.clone()));
    }
    Ok(integral_value(n.as_f64().unwrap_or_default().floor()))
}

fn contains(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let args = Args::new("contains", args);
    let needle = args.value(1)?;
    let found = match args.value(0)? {
        Value::Array(items) => items.iter().any(|item| item.structurally_equals(needle)),
        Value::String(subject) => needle.as_str().is_some_and(|n| subject.contains(n)),
        _ => false,
    };
    Ok(Value::Bool(found))
}

fn ends_with(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let args = Args::new("ends_with", args);
    Ok(Value::Bool(args.string(0)?.ends_with(args.string(1)?)))
}

fn starts_with(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let args = Args::new("starts_with", args);
    Ok(Value::Bool(args.string(0)?.starts_with(args.string(1)?)))
}

fn join(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let args = Args::new("join", args);
    let glue = args.string(0)?;
    let parts: Vec<&str> = args.array(1)?.iter().filter_map(Value::as_str).collect();
    Ok(Value::String(parts.join(glue)))
}

fn keys(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let object = Args::new("keys", args).object(0)?;
    Ok(Value::Array(
        object.keys().map(|k| Value::String(k.clone())).collect(),
    ))
}

fn values(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let object = Args::new("values", args).object(0)?;
    Ok(Value::Array(object.values().cloned().collect()))
}

fn length(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let len = match Args::new("length", args).value(0)? {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Object(object) => object.len(),
        _ => 0,
    };
    Ok(Value::from(len))
}

fn map(args: &[Argument<'_>], evaluator: &Evaluator<'_>) -> Result<Value, EvalError> {
    let args = Args::new("map", args);
    let expression = args.expression(0)?;
    let mapped = args
        .array(1)?
        .iter()
        .map(|item| evaluator.evaluate(expression, item))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(mapped))
}

/// First element that wins against every later one, `None` when empty.
fn extreme<'v>(items: impl IntoIterator<Item = &'v Value>, wanted: Ordering) -> Option<&'v Value> {
    items.into_iter().fold(None, |best, item| match best {
        Some(current) if item.compare(current) != Some(wanted) => Some(current),
        _ => Some(item),
    })
}

fn max(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let items = Args::new("max", args).array(0)?;
    Ok(extreme(items, Ordering::Greater).cloned().unwrap_or(Value::Null))
}

fn min(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let items = Args::new("min", args).array(0)?;
    Ok(extreme(items, Ordering::Less).cloned().unwrap_or(Value::Null))
}

/// Evaluate the key expression for every element. Keys must all be numbers
/// or all be strings.
fn sort_keys(
    args: &Args<'_, '_>,
    items: &[Value],
    expression: &Ast,
    evaluator: &Evaluator<'_>,
) -> Result<Vec<Value>, EvalError> {
    let keys = items
        .iter()
        .map(|item| evaluator.evaluate(expression, item))
        .collect::<Result<Vec<_>, _>>()?;

    let first = keys.first().map(|k| k.type_name());
    for key in &keys {
        let expected = match first {
            Some(kind @ ("number" | "string")) if key.type_name() != kind => vec![kind],
            Some("number" | "string") => continue,
            _ => vec!["number", "string"],
        };
        return Err(FunctionError::InvalidType {
            name: args.name.to_string(),
            position: 2,
            expected,
            actual: key.type_name(),
        }
        .into());
    }
    Ok(keys)
}

fn extreme_by(
    name: &'static str,
    args: &[Argument<'_>],
    evaluator: &Evaluator<'_>,
    wanted: Ordering,
) -> Result<Value, EvalError> {
    let args = Args::new(name, args);
    let items = args.array(0)?;
    let keys = sort_keys(&args, items, args.expression(1)?, evaluator)?;
    let best = extreme(&keys, wanted)
        .and_then(|key| keys.iter().position(|k| std::ptr::eq(k, key)))
        .and_then(|index| items.get(index));
    Ok(best.cloned().unwrap_or(Value::Null))
}

fn max_by(args: &[Argument<'_>], evaluator: &Evaluator<'_>) -> Result<Value, EvalError> {
    extreme_by("max_by", args, evaluator, Ordering::Greater)
}

fn min_by(args: &[Argument<'_>], evaluator: &Evaluator<'_>) -> Result<Value, EvalError> {
    extreme_by("min_by", args, evaluator, Ordering::Less)
}

fn sort(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let mut items = Args::new("sort", args).array(0)?.clone();
    items.sort_by(|a, b| a.compare(b).unwrap_or(Ordering::Equal));
    Ok(Value::Array(items))
}

fn sort_by(args: &[Argument<'_>], evaluator: &Evaluator<'_>) -> Result<Value, EvalError> {
    let args = Args::new("sort_by", args);
    let items = args.array(0)?;
    let keys = sort_keys(&args, items, args.expression(1)?, evaluator)?;

    let mut paired: Vec<(&Value, &Value)> = keys.iter().zip(items.iter()).collect();
    paired.sort_by(|(a, _), (b, _)| a.compare(b).unwrap_or(Ordering::Equal));
    Ok(Value::Array(
        paired.into_iter().map(|(_, item)| item.clone()).collect(),
    ))
}

fn merge(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let typed = Args::new("merge", args);
    let mut merged = Map::new();
    for index in 0..args.len() {
        for (key, value) in typed.object(index)? {
            merged.insert(key.clone(), value.clone());
        }
    }
    Ok(Value::Object(merged))
}

fn not_null(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    Ok(args
        .iter()
        .filter_map(Argument::as_value)
        .find(|v| !v.is_null())
        .cloned()
        .unwrap_or(Value::Null))
}

fn reverse(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    match Args::new("reverse", args).value(0)? {
        Value::String(s) => Ok(Value::String(s.chars().rev().collect())),
        Value::Array(items) => Ok(Value::Array(items.iter().rev().cloned().collect())),
        other => Ok(other.clone()),
    }
}

fn to_array(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    match Args::new("to_array", args).value(0)? {
        Value::Array(items) => Ok(Value::Array(items.clone())),
        other => Ok(Value::Array(vec![other.clone()])),
    }
}

fn to_number(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    match Args::new("to_number", args).value(0)? {
        Value::Number(n) => Ok(Value::Number(n.clone())),
        Value::String(s) => Ok(parse_number(s.trim())),
        _ => Ok(Value::Null),
    }
}

fn parse_number(text: &str) -> Value {
    if let Ok(i) = text.parse::<i64>() {
        return Value::from(i);
    }
    match text.parse::<f64>() {
        Ok(f) if f.is_finite() => float_value(f),
        _ => Value::Null,
    }
}

fn to_string(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    match Args::new("to_string", args).value(0)? {
        Value::String(s) => Ok(Value::String(s.clone())),
        other => Ok(Value::String(other.to_string())),
    }
}

fn type_of(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let value = Args::new("type", args).value(0)?;
    Ok(Value::String(value.type_name().to_string()))
}

// tests/function_tests.rs

use jmespath_engine::functions::{ArgSpec, ArgType, FunctionRegistry, Signature};
use jmespath_engine::{JmesPathError, Runtime, search};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

fn data() -> Value {
    json!({
        "foo": -1,
        "zero": 0,
        "numbers": [-1, 3, 4, 5],
        "array": [-1, 3, 4, 5, "a", "100"],
        "strings": ["a", "b", "c"],
        "decimals": [1.01, 1.2, -1.5],
        "str": "Str",
        "false": false,
        "empty_list": [],
        "empty_hash": {},
        "objects": {"foo": "bar", "bar": "baz"},
        "null_key": null,
        "people": [
            {"name": "b", "age": 30},
            {"name": "a", "age": 50},
            {"name": "c", "age": 40},
            {"name": "d", "age": 50}
        ]
    })
}

fn run(expression: &str) -> Value {
    search(expression, &data()).unwrap_or_else(|e| panic!("{} failed: {}", expression, e))
}

fn error(expression: &str) -> String {
    match search(expression, &data()) {
        Ok(value) => panic!("{} should fail, got {}", expression, value),
        Err(err) => err.to_string(),
    }
}

// ============================================================================
// Numeric Functions
// ============================================================================

#[rstest]
#[case("abs(foo)", json!(1))]
#[case("abs(`-24`)", json!(24))]
#[case("abs(`-1.5`)", json!(1.5))]
#[case("avg(numbers)", json!(2.75))]
#[case("avg(empty_list)", json!(null))]
#[case("ceil(`1.2`)", json!(2))]
#[case("ceil(decimals[0])", json!(2))]
#[case("floor(`1.9`)", json!(1))]
#[case("floor(decimals[2])", json!(-2))]
#[case("floor(`3`)", json!(3))]
#[case("sum(numbers)", json!(11))]
#[case("sum(empty_list)", json!(0))]
#[case("sum(decimals)", json!(0.71))]
#[case("sum(`[0.1, 0.2]`)", json!(0.3))]
#[case("avg(`[1, 2]`)", json!(1.5))]
#[case("max(numbers)", json!(5))]
#[case("min(numbers)", json!(-1))]
#[case("max(strings)", json!("c"))]
#[case("min(strings)", json!("a"))]
#[case("max(empty_list)", json!(null))]
fn test_numeric_functions(#[case] expression: &str, #[case] expected: Value) {
    assert_eq!(run(expression), expected);
}

// ============================================================================
// String and Collection Functions
// ============================================================================

#[rstest]
#[case("contains(strings, 'a')", json!(true))]
#[case("contains(numbers, `3.0`)", json!(true))]
#[case("contains(str, 'St')", json!(true))]
#[case("contains(str, 'x')", json!(false))]
#[case("contains(numbers, 'a')", json!(false))]
#[case("starts_with(str, 'S')", json!(true))]
#[case("ends_with(str, 'r')", json!(true))]
#[case("ends_with(str, 'S')", json!(false))]
#[case("join(', ', strings)", json!("a, b, c"))]
#[case("join('|', decimals[].to_string(@))", json!("1.01|1.2|-1.5"))]
#[case("join('', empty_list)", json!(""))]
#[case("length('abc')", json!(3))]
#[case("length('✓✓')", json!(2))]
#[case("length(strings)", json!(3))]
#[case("length(objects)", json!(2))]
#[case("keys(objects)", json!(["foo", "bar"]))]
#[case("values(objects)", json!(["bar", "baz"]))]
#[case("keys(empty_hash)", json!([]))]
#[case("reverse(numbers)", json!([5, 4, 3, -1]))]
#[case("reverse('hello world')", json!("dlrow olleh"))]
#[case("reverse(empty_list)", json!([]))]
#[case("sort(numbers)", json!([-1, 3, 4, 5]))]
#[case("sort(`[\"c\", \"a\", \"b\"]`)", json!(["a", "b", "c"]))]
#[case("sort(empty_list)", json!([]))]
fn test_collection_functions(#[case] expression: &str, #[case] expected: Value) {
    assert_eq!(run(expression), expected);
}

#[test]
fn test_merge() {
    assert_eq!(run("merge(`{}`)"), json!({}));
    assert_eq!(run("merge(`{}`, `{}`)"), json!({}));
    assert_eq!(run("merge(`{\"a\": 1}`, `{\"b\": 2}`)"), json!({"a": 1, "b": 2}));
    assert_eq!(run("merge(`{\"a\": 1}`, `{\"a\": 2}`)"), json!({"a": 2}));
    assert_eq!(
        run("merge(`{\"a\": 1, \"b\": 2}`, `{\"a\": 2, \"c\": 3}`, `{\"d\": 4}`)"),
        json!({"a": 2, "b": 2, "c": 3, "d": 4})
    );
}

#[test]
fn test_not_null() {
    assert_eq!(run("not_null(unknown_key, str)"), json!("Str"));
    assert_eq!(run("not_null(unknown_key, foo.bar, empty_list, str)"), json!([]));
    assert_eq!(run("not_null(unknown_key, null_key, empty_list, str)"), json!([]));
    assert_eq!(run("not_null(all, expressions, are_null)"), json!(null));
}

// ============================================================================
// Conversion Functions
// ============================================================================

#[rstest]
#[case("to_array('foo')", json!(["foo"]))]
#[case("to_array(`0`)", json!([0]))]
#[case("to_array(objects)", json!([{"foo": "bar", "bar": "baz"}]))]
#[case("to_array(`[1, 2, 3]`)", json!([1, 2, 3]))]
#[case("to_array(false)", json!([false]))]
#[case("to_string('foo')", json!("foo"))]
#[case("to_string(`1.2`)", json!("1.2"))]
#[case("to_string(`[0, 1]`)", json!("[0,1]"))]
#[case("to_number('1.0')", json!(1.0))]
#[case("to_number('1.1')", json!(1.1))]
#[case("to_number('4')", json!(4))]
#[case("to_number(' 7 ')", json!(7))]
#[case("to_number('notanumber')", json!(null))]
#[case("to_number(false)", json!(null))]
#[case("to_number(null)", json!(null))]
#[case("to_number(`[0]`)", json!(null))]
#[case("to_number(`{\"foo\": 0}`)", json!(null))]
#[case("array[].to_number(@)", json!([-1, 3, 4, 5, 100]))]
#[case("sum(array[].to_number(@))", json!(111))]
#[case("type('abc')", json!("string"))]
#[case("type(`1.0`)", json!("number"))]
#[case("type(`2`)", json!("number"))]
#[case("type(`true`)", json!("boolean"))]
#[case("type(`false`)", json!("boolean"))]
#[case("type(`null`)", json!("null"))]
#[case("type(`[0]`)", json!("array"))]
#[case("type(`{\"a\": \"b\"}`)", json!("object"))]
#[case("type(@)", json!("object"))]
fn test_conversion_functions(#[case] expression: &str, #[case] expected: Value) {
    assert_eq!(run(expression), expected);
}

// ============================================================================
// Expression Arguments
// ============================================================================

#[test]
fn test_sort_by() {
    assert_eq!(
        run("sort_by(people, &age)[].name"),
        json!(["b", "c", "a", "d"])
    );
    assert_eq!(
        run("sort_by(people, &name)[].age"),
        json!([50, 30, 40, 50])
    );
    assert_eq!(run("sort_by(empty_list, &age)"), json!([]));
}

#[test]
fn test_max_by_and_min_by() {
    assert_eq!(run("max_by(people, &age).name"), json!("a"));
    assert_eq!(run("min_by(people, &age).name"), json!("b"));
    assert_eq!(run("max_by(people, &name).name"), json!("d"));
    assert_eq!(run("max_by(empty_list, &age)"), json!(null));
}

#[test]
fn test_map() {
    assert_eq!(run("map(&name, people)"), json!(["b", "a", "c", "d"]));
    assert_eq!(run("map(&missing, people)"), json!([null, null, null, null]));
    assert_eq!(run("map(&[], `[[1, 2], 3, [4]]`)"), json!([[1, 2], null, [4]]));
    assert_eq!(run("map(&to_string(@), numbers)"), json!(["-1", "3", "4", "5"]));
}

#[test]
fn test_sort_by_requires_consistent_keys() {
    let data = json!({"items": [{"k": 1}, {"k": "a"}]});
    let err = search("sort_by(items, &k)", &data).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid type for argument 2 to function sort_by: expected one of \"number\", received \"string\""
    );

    let data = json!({"items": [{"k": true}]});
    let err = search("max_by(items, &k)", &data).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid type for argument 2 to function max_by: expected one of \"number\", \"string\", received \"boolean\""
    );
}

// ============================================================================
// Validation Errors
// ============================================================================

#[rstest]
#[case("abs(str)", "Invalid type for argument 1 to function abs: expected one of \"number\", received \"string\"")]
#[case("avg(strings)", "Invalid type for argument 1 to function avg: expected one of \"number\", received \"string\"")]
#[case("length(`1`)", "Invalid type for argument 1 to function length: expected one of \"string\", \"array\", \"object\", received \"number\"")]
#[case("join(',', numbers)", "Invalid type for argument 2 to function join: expected one of \"string\", received \"number\"")]
#[case("merge(`{}`, `[]`)", "Invalid type for argument 2 to function merge: expected one of \"object\", received \"array\"")]
#[case("sort_by(people, name)", "Invalid type for argument 2 to function sort_by: expected one of \"expression\", received \"null\"")]
#[case("map(name, people)", "Invalid type for argument 1 to function map: expected one of \"expression\", received \"null\"")]
#[case("keys(&foo)", "Invalid type for argument 1 to function keys: expected one of \"object\", received \"expression\"")]
#[case("to_string(&foo)", "Invalid type for argument 1 to function to_string: expected one of \"any\", received \"expression\"")]
fn test_type_errors(#[case] expression: &str, #[case] message: &str) {
    assert_eq!(error(expression), message);
}

#[rstest]
#[case("abs()", "Invalid arity for function abs: expected at least 1 argument, received 0")]
#[case("abs(`1`, `2`)", "Invalid arity for function abs: expected at most 1 argument, received 2")]
#[case("starts_with('a')", "Invalid arity for function starts_with: expected at least 2 arguments, received 1")]
#[case("not_null()", "Invalid arity for function not_null: expected at least 1 argument, received 0")]
fn test_arity_errors(#[case] expression: &str, #[case] message: &str) {
    assert_eq!(error(expression), message);
}

#[test]
fn test_unknown_function() {
    assert_eq!(error("unknown_function(`1`)"), "Unknown function unknown_function");
}

#[test]
fn test_function_errors_are_eval_errors() {
    let err = search("abs(str)", &data()).unwrap_err();
    assert!(matches!(err, JmesPathError::Eval(_)));
}

#[test]
fn test_extension_functions_need_opt_in() {
    assert_eq!(
        error("powertools_json('{}')"),
        "Unknown function powertools_json"
    );
}

// ============================================================================
// Custom Functions
// ============================================================================

#[test]
fn test_custom_function_with_expression_argument() {
    let runtime = Runtime::builder()
        .register(
            "count_where",
            Signature::new(vec![
                ArgSpec::new([ArgType::Array]),
                ArgSpec::new([ArgType::Expression]),
            ]),
            |args, evaluator| {
                let items = args[0].as_value().and_then(Value::as_array);
                let predicate = args[1].as_expression();
                let (Some(items), Some(predicate)) = (items, predicate) else {
                    return Ok(Value::Null);
                };
                let mut count = 0;
                for item in items {
                    if evaluator.evaluate(predicate, item)? == json!(true) {
                        count += 1;
                    }
                }
                Ok(json!(count))
            },
        )
        .build();

    let result = runtime
        .search("count_where(people, &age > `35`)", &data())
        .unwrap();
    assert_eq!(result, json!(3));
}

#[test]
fn test_custom_signature_is_validated() {
    let runtime = Runtime::builder()
        .register(
            "shout",
            Signature::new(vec![ArgSpec::new([ArgType::String])]),
            |args, _| {
                let text = args[0].as_value().and_then(Value::as_str).unwrap_or_default();
                Ok(json!(text.to_uppercase()))
            },
        )
        .build();

    assert_eq!(runtime.search("shout(str)", &data()).unwrap(), json!("STR"));
    let err = runtime.search("shout(foo)", &data()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid type for argument 1 to function shout: expected one of \"string\", received \"number\""
    );
}

#[test]
fn test_registry_signatures_are_sorted() {
    let registry = FunctionRegistry::builtins();
    let names: Vec<&str> = registry.signatures().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names.len(), 26);
    assert_eq!(names.first(), Some(&"abs"));
    assert_eq!(names.last(), Some(&"values"));
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

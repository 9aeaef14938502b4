use std::io::Read;

use base64::{Engine, engine::general_purpose::STANDARD};
use flate2::read::GzDecoder;
use serde_json::Value;

use crate::{
    evaluator::{EvalError, Evaluator},
    functions::{ArgSpec, ArgType, Argument, FunctionError, FunctionRegistry, Signature},
};

pub(super) fn register_all(registry: &mut FunctionRegistry) {
    let one_string = || Signature::new(vec![ArgSpec::new([ArgType::String])]);
    registry.register("powertools_json", one_string(), powertools_json);
    registry.register("powertools_base64", one_string(), powertools_base64);
    registry.register("powertools_base64_gzip", one_string(), powertools_base64_gzip);
}

fn invalid(name: &str, message: impl ToString) -> EvalError {
    FunctionError::InvalidValue {
        name: name.to_string(),
        message: message.to_string(),
    }
    .into()
}

fn string_arg<'a>(name: &str, args: &'a [Argument<'_>]) -> Result<&'a str, EvalError> {
    args.first()
        .and_then(|a| a.as_value())
        .and_then(Value::as_str)
        .ok_or_else(|| {
            FunctionError::InvalidType {
                name: name.to_string(),
                position: 1,
                expected: vec!["string"],
                actual: args.first().map_or("null", |a| a.type_name()),
            }
            .into()
        })
}

fn decode_base64(name: &str, encoded: &str) -> Result<Vec<u8>, EvalError> {
    STANDARD.decode(encoded).map_err(|e| invalid(name, e))
}

fn powertools_json(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let text = string_arg("powertools_json", args)?;
    serde_json::from_str(text).map_err(|e| invalid("powertools_json", e))
}

fn powertools_base64(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let name = "powertools_base64";
    let bytes = decode_base64(name, string_arg(name, args)?)?;
    let text = String::from_utf8(bytes).map_err(|e| invalid(name, e))?;
    Ok(Value::String(text))
}

fn powertools_base64_gzip(args: &[Argument<'_>], _: &Evaluator<'_>) -> Result<Value, EvalError> {
    let name = "powertools_base64_gzip";
    let compressed = decode_base64(name, string_arg(name, args)?)?;
    let mut text = String::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_string(&mut text)
        .map_err(|e| invalid(name, e))?;
    Ok(Value::String(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{Compression, write::GzEncoder};
    use serde_json::json;
    use std::io::Write;

    fn call(name: &str, arg: Value) -> Result<Value, EvalError> {
        let registry = FunctionRegistry::new().with_powertools();
        let evaluator = Evaluator::new(&registry);
        registry.call(name, &[Argument::Value(arg)], &evaluator)
    }

    #[test]
    fn test_json_decodes_nested_document() {
        let result = call("powertools_json", json!("{\"a\": [1, 2]}")).unwrap();
        assert_eq!(result, json!({"a": [1, 2]}));
    }

    #[test]
    fn test_base64_gzip_round_trip() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"hello logs").unwrap();
        let encoded = STANDARD.encode(encoder.finish().unwrap());

        let result = call("powertools_base64_gzip", json!(encoded)).unwrap();
        assert_eq!(result, json!("hello logs"));
    }

    #[test]
    fn test_invalid_base64_is_value_error() {
        let err = call("powertools_base64", json!("not base64!")).unwrap_err();
        assert!(err.to_string().starts_with("Invalid value for function powertools_base64"));
    }
}

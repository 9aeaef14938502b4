//! Expressions that unwrap the payload of common serverless event sources.
//!
//! Each constant is a JMESPath expression built on the `powertools_*`
//! extension functions, for use with [`extract_data_from_envelope`].
//!
//! ```
//! use jmespath_engine::envelopes::{extract_data_from_envelope, SQS};
//! use serde_json::json;
//!
//! let event = json!({
//!     "Records": [
//!         {"body": "{\"customerId\": \"1\"}"},
//!         {"body": "{\"customerId\": \"2\"}"}
//!     ]
//! });
//! let payloads = extract_data_from_envelope(&event, SQS).unwrap();
//! assert_eq!(payloads, json!([{"customerId": "1"}, {"customerId": "2"}]));
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::{error::JmesPathError, runtime::Runtime};

pub const API_GATEWAY_REST: &str = "powertools_json(body)";
pub const API_GATEWAY_HTTP: &str = "powertools_json(body)";
pub const SQS: &str = "Records[*].powertools_json(body)";
pub const SNS: &str = "Records[0].Sns.Message | powertools_json(@)";
pub const EVENTBRIDGE: &str = "detail";
pub const CLOUDWATCH_EVENTS_SCHEDULED: &str = "detail";
pub const KINESIS_DATA_STREAM: &str = "Records[*].kinesis.powertools_json(powertools_base64(data))";
pub const CLOUDWATCH_LOGS: &str =
    "awslogs.powertools_base64_gzip(data) | powertools_json(@).logEvents[*]";
pub const S3_SNS_SQS: &str =
    "Records[*].powertools_json(body).powertools_json(Message).Records[0]";
pub const S3_SQS: &str = "Records[*].powertools_json(body).Records[0]";
pub const S3_SNS_KINESIS_FIREHOSE: &str =
    "records[*].powertools_json(powertools_base64(data)).powertools_json(Message).Records[0]";
pub const S3_KINESIS_FIREHOSE: &str =
    "records[*].powertools_json(powertools_base64(data)).Records[0]";
pub const S3_EVENTBRIDGE_SQS: &str = "Records[*].powertools_json(body).detail";

static ENVELOPE_RUNTIME: Lazy<Runtime> =
    Lazy::new(|| Runtime::builder().with_powertools_functions().build());

/// Evaluate `envelope` against `data` with the extension functions enabled.
pub fn extract_data_from_envelope(data: &Value, envelope: &str) -> Result<Value, JmesPathError> {
    ENVELOPE_RUNTIME.search(envelope, data)
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A function-call directive as emitted by the model.
///
/// `arguments` is the raw serialized JSON object exactly as the model wrote it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

/// Entry of the `functions` array attached to a request.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

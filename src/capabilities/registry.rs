use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Map, Value};

use super::arguments::{apply_parameters, parse_arguments};
use super::builtins;
use crate::error::{FncallError, Result};
use crate::models::{FunctionCall, FunctionSpec};

/// Result of running a capability, sent back to the model serialized.
pub type FunctionResult = Map<String, Value>;

/// Every local function the model can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    CurrentDatetime,
    TodoList,
}

impl Capability {
    pub fn name(&self) -> &'static str {
        match self {
            Capability::CurrentDatetime => "get_current_datetime",
            Capability::TodoList => "generate_todo_list",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParamKind,
    pub description: String,
    pub required: bool,
    pub default: Option<Value>,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
}

impl ParameterSpec {
    pub fn required(name: &str, kind: ParamKind, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            description: description.to_string(),
            required: true,
            default: None,
            minimum: None,
            maximum: None,
        }
    }

    pub fn optional(name: &str, kind: ParamKind, description: &str, default: Value) -> Self {
        Self {
            required: false,
            default: Some(default),
            ..Self::required(name, kind, description)
        }
    }

    pub fn with_range(mut self, minimum: i64, maximum: i64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    fn to_schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!(self.kind.as_str()));
        if !self.description.is_empty() {
            schema.insert("description".to_string(), json!(self.description));
        }
        if let Some(default) = &self.default {
            schema.insert("default".to_string(), default.clone());
        }
        if let Some(minimum) = self.minimum {
            schema.insert("minimum".to_string(), json!(minimum));
        }
        if let Some(maximum) = self.maximum {
            schema.insert("maximum".to_string(), json!(maximum));
        }
        Value::Object(schema)
    }
}

#[derive(Debug, Clone)]
pub struct CapabilityDescriptor {
    pub capability: Capability,
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
}

impl CapabilityDescriptor {
    pub fn new(capability: Capability, description: &str, parameters: Vec<ParameterSpec>) -> Self {
        Self {
            capability,
            name: capability.name().to_string(),
            description: description.to_string(),
            parameters,
        }
    }

    /// JSON Schema of the argument object.
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.to_schema()))
            .collect();

        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }

    pub fn to_function_spec(&self) -> FunctionSpec {
        FunctionSpec {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.input_schema(),
        }
    }
}

pub struct CapabilityRegistry {
    descriptors: Vec<CapabilityDescriptor>,
}

impl CapabilityRegistry {
    /// The fixed set of local functions, in the order they are offered.
    pub fn builtin() -> Self {
        Self {
            descriptors: vec![
                CapabilityDescriptor::new(
                    Capability::CurrentDatetime,
                    "Returns the current date and time.",
                    Vec::new(),
                ),
                CapabilityDescriptor::new(
                    Capability::TodoList,
                    "Generates a list of tasks for a given topic.",
                    vec![
                        ParameterSpec::required(
                            "topic",
                            ParamKind::String,
                            "The subject the tasks are about",
                        ),
                        ParameterSpec::optional(
                            "num_items",
                            ParamKind::Integer,
                            "How many tasks to generate",
                            json!(builtins::DEFAULT_TODO_ITEMS),
                        )
                        .with_range(0, builtins::MAX_TODO_ITEMS as i64),
                    ],
                ),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&CapabilityDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn list(&self) -> &[CapabilityDescriptor] {
        &self.descriptors
    }

    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn to_function_specs(&self) -> Vec<FunctionSpec> {
        self.descriptors
            .iter()
            .map(CapabilityDescriptor::to_function_spec)
            .collect()
    }

    fn resolve(&self, name: &str) -> Result<&CapabilityDescriptor> {
        self.get(name)
            .ok_or_else(|| FncallError::UnknownCapability(name.to_string()))
    }

    /// Fill defaults, coerce, and validate `arguments` against the
    /// capability's schema.
    pub fn prepare_arguments(&self, name: &str, arguments: &Value) -> Result<Value> {
        let descriptor = self.resolve(name)?;
        let prepared = apply_parameters(name, &descriptor.parameters, arguments)?;

        let input_schema = descriptor.input_schema();
        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&input_schema)
            .map_err(|e| FncallError::Other(format!("Invalid schema for '{}': {}", name, e)))?;

        if let Err(errors) = schema.validate(&prepared) {
            let error_messages: Vec<String> = errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{}: {}", path, e)
                    }
                })
                .collect();
            return Err(FncallError::invalid_arguments(name, error_messages.join("; ")));
        }

        Ok(prepared)
    }

    /// Run the function the model asked for.
    pub fn dispatch(&self, call: &FunctionCall) -> Result<FunctionResult> {
        let descriptor = self.resolve(&call.name)?;
        let raw = parse_arguments(&call.name, &call.arguments)?;
        let arguments = self.prepare_arguments(&call.name, &raw)?;
        builtins::execute(descriptor.capability, arguments)
    }
}

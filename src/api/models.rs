use serde::{Deserialize, Serialize};

use crate::models::{FunctionSpec, Message};

/// How the model may pick a function.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FunctionCallMode {
    Auto,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<FunctionSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCallMode>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            functions: None,
            function_call: None,
        }
    }

    /// Offer `functions` and let the model decide whether to call one.
    pub fn with_functions(mut self, functions: Vec<FunctionSpec>) -> Self {
        if !functions.is_empty() {
            self.functions = Some(functions);
            self.function_call = Some(FunctionCallMode::Auto);
        }
        self
    }
}

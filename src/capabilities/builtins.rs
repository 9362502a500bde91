use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::registry::{Capability, FunctionResult};
use crate::error::{FncallError, Result};

pub const DEFAULT_TODO_ITEMS: u32 = 5;
pub const MAX_TODO_ITEMS: u32 = 100;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CurrentDatetime {
    pub date: String,
    pub time: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TodoList {
    pub topic: String,
    pub items: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TodoListInput {
    topic: String,
    #[serde(default = "default_todo_items")]
    num_items: u32,
}

fn default_todo_items() -> u32 {
    DEFAULT_TODO_ITEMS
}

pub fn get_current_datetime() -> CurrentDatetime {
    current_datetime_at(&Local::now())
}

pub fn current_datetime_at<Tz>(now: &DateTime<Tz>) -> CurrentDatetime
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    CurrentDatetime {
        date: now.format("%Y-%m-%d").to_string(),
        time: now.format("%H:%M:%S").to_string(),
    }
}

pub fn generate_todo_list(topic: &str, num_items: u32) -> TodoList {
    TodoList {
        topic: topic.to_string(),
        items: (1..=num_items)
            .map(|i| format!("Task {} for {}", i, topic))
            .collect(),
    }
}

/// Run `capability` with arguments already prepared by the registry.
pub(crate) fn execute(capability: Capability, arguments: Value) -> Result<FunctionResult> {
    match capability {
        Capability::CurrentDatetime => to_result(capability, &get_current_datetime()),
        Capability::TodoList => {
            let input: TodoListInput = serde_json::from_value(arguments)
                .map_err(|e| FncallError::invalid_arguments(capability.name(), e.to_string()))?;

            if input.topic.trim().is_empty() {
                return Err(FncallError::invalid_arguments(
                    capability.name(),
                    "topic must not be empty",
                ));
            }

            to_result(
                capability,
                &generate_todo_list(&input.topic, input.num_items),
            )
        }
    }
}

fn to_result<T: Serialize>(capability: Capability, output: &T) -> Result<FunctionResult> {
    match serde_json::to_value(output)? {
        Value::Object(map) => Ok(map),
        other => Err(FncallError::Other(format!(
            "'{}' produced a non-object result: {}",
            capability.name(),
            other
        ))),
    }
}

use crate::error::{FncallError, Result};
use crate::models::Message;
use serde_json::Value;

/// Pull the first choice's message out of a chat-completions response.
pub fn first_message(response_json: &Value) -> Result<Message> {
    let choices = response_json
        .get("choices")
        .and_then(|c| c.as_array())
        .ok_or_else(|| FncallError::malformed("No choices in response"))?;

    let first_choice = choices
        .first()
        .ok_or_else(|| FncallError::malformed("Empty choices array"))?;

    let message = first_choice
        .get("message")
        .ok_or_else(|| FncallError::malformed("No message in response"))?;

    serde_json::from_value(message.clone())
        .map_err(|e| FncallError::malformed(format!("Unexpected message shape: {}", e)))
}

use crate::api::response::first_message;
use crate::api::{ChatRequest, ChatTransport, RetryPolicy};
use crate::capabilities::{CapabilityRegistry, FunctionResult};
use crate::config::Config;
use crate::error::{FncallError, Result};
use crate::models::{FunctionSpec, Message};
use crate::ui::{
    display_function_call, display_function_error, display_function_result, log_verbose,
};
use serde_json::Value;

pub struct OrchestratorContext<'a> {
    pub transport: &'a dyn ChatTransport,
    pub registry: &'a CapabilityRegistry,
    pub model: String,
    /// How many function calls the model may chain before we stop offering functions.
    pub max_call_depth: usize,
    pub retry: RetryPolicy,
    pub verbose: bool,
}

impl<'a> OrchestratorContext<'a> {
    pub fn new(
        transport: &'a dyn ChatTransport,
        registry: &'a CapabilityRegistry,
        config: &Config,
    ) -> Self {
        Self {
            transport,
            registry,
            model: config.model.clone(),
            max_call_depth: config.max_call_depth,
            retry: config.retry.clone(),
            verbose: config.verbose,
        }
    }
}

/// A function the model asked for and we ran.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedCall {
    pub name: String,
    pub arguments: String,
    pub result: FunctionResult,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub answer: String,
    pub calls: Vec<ExecutedCall>,
}

/// Run one conversation turn: ask, execute any requested function, hand the
/// result back, and return the model's final reply.
pub async fn run(context: &OrchestratorContext<'_>, prompt: &str) -> Result<DispatchOutcome> {
    let function_specs = context.registry.to_function_specs();
    let max_call_depth = context.max_call_depth.max(1);

    log_verbose(
        context.verbose,
        "fncall",
        &format!("Using model: {}", context.model),
    );
    log_verbose(
        context.verbose,
        "tools",
        &format!("Available functions: {}", context.registry.names().join(", ")),
    );

    let mut messages = vec![Message::user(prompt)];
    let mut calls: Vec<ExecutedCall> = Vec::new();
    let mut request = ChatRequest::new(context.model.clone(), messages.clone())
        .with_functions(function_specs.clone());

    loop {
        let response_json = send(context, &request).await?;
        let message = first_message(&response_json)?;

        let call = match message.function_call.clone() {
            Some(call) => call,
            None => {
                let answer = message.content.ok_or_else(|| {
                    FncallError::malformed("message has neither content nor a function call")
                })?;
                log_verbose(
                    context.verbose,
                    "fncall",
                    &format!("Final answer after {} function call(s)", calls.len()),
                );
                return Ok(DispatchOutcome { answer, calls });
            }
        };

        if calls.len() >= max_call_depth {
            return Err(FncallError::CallDepthExceeded(calls.len()));
        }

        log_verbose(
            context.verbose,
            "tools",
            &format!(
                "Selected function: '{}' with args: {}",
                call.name,
                preview(&call.arguments)
            ),
        );
        display_function_call(&call.name);

        let result = match context.registry.dispatch(&call) {
            Ok(result) => result,
            Err(e) => {
                display_function_error(&call.name, &e.to_string());
                return Err(e);
            }
        };
        display_function_result(&call.name, &Value::Object(result.clone()));

        messages.push(message);
        messages.push(Message::function_result(
            &call.name,
            serde_json::to_string(&result)?,
        ));
        calls.push(ExecutedCall {
            name: call.name,
            arguments: call.arguments,
            result,
        });

        request = next_request(
            context,
            &messages,
            &function_specs,
            calls.len() < max_call_depth,
        );
    }
}

fn next_request(
    context: &OrchestratorContext<'_>,
    messages: &[Message],
    function_specs: &[FunctionSpec],
    offer_functions: bool,
) -> ChatRequest {
    let request = ChatRequest::new(context.model.clone(), messages.to_vec());
    if offer_functions {
        request.with_functions(function_specs.to_vec())
    } else {
        request
    }
}

async fn send(context: &OrchestratorContext<'_>, request: &ChatRequest) -> Result<Value> {
    log_verbose(
        context.verbose,
        "fncall",
        &format!(
            "Making API request ({} message(s), functions {})",
            request.messages.len(),
            if request.functions.is_some() {
                "offered"
            } else {
                "withheld"
            }
        ),
    );

    context
        .retry
        .run(context.verbose, || context.transport.complete(request))
        .await
}

fn preview(arguments: &str) -> String {
    if arguments.chars().count() > 100 {
        format!("{}...", arguments.chars().take(100).collect::<String>())
    } else {
        arguments.to_string()
    }
}

pub mod client;
pub mod models;
pub mod response;
pub mod retry;

pub use client::{ChatTransport, HttpChatClient};
pub use models::{ChatRequest, FunctionCallMode};
pub use retry::RetryPolicy;

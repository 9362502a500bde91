mod function;
mod message;

pub use function::{FunctionCall, FunctionSpec};
pub use message::{Message, Role};

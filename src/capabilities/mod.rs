mod arguments;
pub mod builtins;
mod registry;

pub use arguments::{apply_parameters, parse_arguments};
pub use builtins::{
    current_datetime_at, generate_todo_list, get_current_datetime, CurrentDatetime, TodoList,
    DEFAULT_TODO_ITEMS, MAX_TODO_ITEMS,
};
pub use registry::{
    Capability, CapabilityDescriptor, CapabilityRegistry, FunctionResult, ParamKind,
    ParameterSpec,
};

mod output;

pub use output::{
    display_answer, display_function_call, display_function_error, display_function_result,
    log_verbose,
};

use colored::*;
use serde_json::Value;

/// Diagnostic line on stderr, only when verbose output is on.
pub fn log_verbose(verbose: bool, tag: &str, message: &str) {
    if verbose {
        eprintln!("{}", format!("[{}] {}", tag, message).dimmed());
    }
}

pub fn display_function_call(name: &str) {
    println!("{}", format!("Calling function: {}...", name).cyan());
}

/// Display a function result in a boxed format
pub fn display_function_result(name: &str, result: &Value) {
    let body = serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string());
    println!("{}", format!("┌─[{}]", name).dimmed());
    for line in body.lines() {
        println!("{} {}", "│".dimmed(), line);
    }
    println!("{}", "└──────────────────────────────────────────".dimmed());
}

pub fn display_function_error(name: &str, error: &str) {
    eprintln!("{}", format!("Function '{}' failed: {}", name, error).red());
}

pub fn display_answer(content: &str) {
    println!("{}", content.trim_end());
}

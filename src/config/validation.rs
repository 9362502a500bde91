use regex::Regex;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

/// Expand environment variables in a string using ${VAR_NAME} syntax
pub fn expand_env_var_in_string(value: &str) -> String {
    let mut result = value.to_string();

    for cap in env_var_pattern().captures_iter(value) {
        let var_name = &cap[1];
        let replacement = env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name));
        result = result.replace(&cap[0], &replacement);
    }

    result
}

/// Expand `${VAR}` references and a leading `~/` in a configured path.
pub fn expand_path(value: &str) -> PathBuf {
    let expanded = expand_env_var_in_string(value);
    match expanded.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(&expanded)),
        None => PathBuf::from(expanded),
    }
}

pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

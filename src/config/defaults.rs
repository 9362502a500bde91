pub const DEFAULT_API_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

pub const DEFAULT_MODEL: &str = "gpt-4o";

pub fn default_timeout_secs() -> u64 {
    60
}

pub fn default_max_retries() -> u32 {
    2
}

pub fn default_retry_base_delay_ms() -> u64 {
    500
}

pub fn default_retry_max_delay_secs() -> u64 {
    8
}

pub fn default_max_call_depth() -> usize {
    3
}

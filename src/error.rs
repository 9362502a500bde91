use std::fmt;

#[derive(Debug)]
pub enum FncallError {
    /// Transport-level failure talking to the chat API.
    NetworkFailure(reqwest::Error),
    Timeout,
    ApiError {
        status: u16,
        message: String,
    },
    UnknownCapability(String),
    InvalidArguments {
        capability: String,
        message: String,
    },
    MalformedResponse(String),
    CallDepthExceeded(usize),
    ConfigError(String),
    CredentialError(String),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    YamlError(serde_yaml::Error),
    Other(String),
}

impl FncallError {
    pub fn invalid_arguments(capability: impl Into<String>, message: impl Into<String>) -> Self {
        FncallError::InvalidArguments {
            capability: capability.into(),
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        FncallError::MalformedResponse(message.into())
    }

    /// Whether another attempt at the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FncallError::NetworkFailure(_) | FncallError::Timeout => true,
            FncallError::ApiError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            FncallError::NetworkFailure(_)
            | FncallError::Timeout
            | FncallError::ApiError { .. } => 3,
            FncallError::UnknownCapability(_) | FncallError::InvalidArguments { .. } => 4,
            FncallError::MalformedResponse(_) | FncallError::CallDepthExceeded(_) => 5,
            _ => 1,
        }
    }
}

impl fmt::Display for FncallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FncallError::NetworkFailure(e) => write!(f, "Network error: {}", e),
            FncallError::Timeout => write!(f, "Request timeout"),
            FncallError::ApiError { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            FncallError::UnknownCapability(name) => {
                write!(f, "Model requested unknown function '{}'", name)
            }
            FncallError::InvalidArguments {
                capability,
                message,
            } => write!(f, "Invalid arguments for '{}': {}", capability, message),
            FncallError::MalformedResponse(msg) => write!(f, "Malformed API response: {}", msg),
            FncallError::CallDepthExceeded(depth) => write!(
                f,
                "Model kept requesting functions after {} call(s); giving up",
                depth
            ),
            FncallError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            FncallError::CredentialError(msg) => write!(f, "Credential error: {}", msg),
            FncallError::IoError(e) => write!(f, "IO error: {}", e),
            FncallError::JsonError(e) => write!(f, "JSON error: {}", e),
            FncallError::YamlError(e) => write!(f, "YAML error: {}", e),
            FncallError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FncallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FncallError::NetworkFailure(e) => Some(e),
            FncallError::IoError(e) => Some(e),
            FncallError::JsonError(e) => Some(e),
            FncallError::YamlError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FncallError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FncallError::Timeout
        } else {
            FncallError::NetworkFailure(err)
        }
    }
}

impl From<std::io::Error> for FncallError {
    fn from(err: std::io::Error) -> Self {
        FncallError::IoError(err)
    }
}

impl From<serde_json::Error> for FncallError {
    fn from(err: serde_json::Error) -> Self {
        FncallError::JsonError(err)
    }
}

impl From<serde_yaml::Error> for FncallError {
    fn from(err: serde_yaml::Error) -> Self {
        FncallError::YamlError(err)
    }
}

impl From<anyhow::Error> for FncallError {
    fn from(err: anyhow::Error) -> Self {
        FncallError::ConfigError(format!("{:#}", err))
    }
}

impl From<String> for FncallError {
    fn from(msg: String) -> Self {
        FncallError::Other(msg)
    }
}

impl From<&str> for FncallError {
    fn from(msg: &str) -> Self {
        FncallError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FncallError>;

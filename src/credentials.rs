//! Where the API key comes from.
//!
//! The key is read once per process and only ever lives in memory. Nothing in
//! this module writes it anywhere, and [`ApiKey`] never prints its contents.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::error::{FncallError, Result};

pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(FncallError::CredentialError("API key is empty".to_string()));
        }
        Ok(Self(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CredentialSource {
    /// Environment variable if set, then the key file, then an interactive prompt.
    #[default]
    Auto,
    Env,
    File,
    Prompt,
}

pub trait CredentialProvider {
    fn api_key(&self) -> Result<ApiKey>;

    /// Human-readable origin, for verbose output. Never includes the key.
    fn describe(&self) -> String;
}

pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    fn is_available(&self) -> bool {
        env::var(&self.var).map(|v| !v.trim().is_empty()).unwrap_or(false)
    }
}

impl CredentialProvider for EnvCredentials {
    fn api_key(&self) -> Result<ApiKey> {
        let value = env::var(&self.var).map_err(|_| {
            FncallError::CredentialError(format!("{} environment variable not set", self.var))
        })?;
        ApiKey::new(value)
    }

    fn describe(&self) -> String {
        format!("environment variable {}", self.var)
    }
}

/// Key stored in a file, e.g. one managed by a secret store.
pub struct FileCredentials {
    path: PathBuf,
}

impl FileCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialProvider for FileCredentials {
    fn api_key(&self) -> Result<ApiKey> {
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            FncallError::CredentialError(format!(
                "Failed to read key file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        ApiKey::new(contents)
    }

    fn describe(&self) -> String {
        format!("key file {}", self.path.display())
    }
}

pub struct PromptCredentials {
    prompt: String,
}

impl PromptCredentials {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

impl Default for PromptCredentials {
    fn default() -> Self {
        Self::new("Enter your OpenAI API key: ")
    }
}

impl CredentialProvider for PromptCredentials {
    fn api_key(&self) -> Result<ApiKey> {
        let key = rpassword::prompt_password(&self.prompt).map_err(|e| {
            FncallError::CredentialError(format!("Failed to read API key from terminal: {}", e))
        })?;
        ApiKey::new(key)
    }

    fn describe(&self) -> String {
        "interactive prompt".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSettings {
    pub source: CredentialSource,
    pub env_var: String,
    pub key_file: Option<PathBuf>,
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            source: CredentialSource::Auto,
            env_var: DEFAULT_API_KEY_ENV.to_string(),
            key_file: None,
        }
    }
}

/// Pick the provider described by `settings`.
pub fn provider_for(settings: &CredentialSettings) -> Result<Box<dyn CredentialProvider>> {
    match settings.source {
        CredentialSource::Env => Ok(Box::new(EnvCredentials::new(&settings.env_var))),
        CredentialSource::File => {
            let path = settings.key_file.clone().ok_or_else(|| {
                FncallError::ConfigError(
                    "credential source 'file' requires a key file path".to_string(),
                )
            })?;
            Ok(Box::new(FileCredentials::new(path)))
        }
        CredentialSource::Prompt => Ok(Box::new(PromptCredentials::default())),
        CredentialSource::Auto => {
            let env_provider = EnvCredentials::new(&settings.env_var);
            if env_provider.is_available() {
                return Ok(Box::new(env_provider));
            }
            if let Some(path) = settings.key_file.as_ref().filter(|p| p.is_file()) {
                return Ok(Box::new(FileCredentials::new(path.clone())));
            }
            Ok(Box::new(PromptCredentials::default()))
        }
    }
}

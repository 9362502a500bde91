mod api;
mod defaults;
mod validation;

use crate::api::RetryPolicy;
use crate::cli::Args;
use crate::credentials::{CredentialSettings, CredentialSource, DEFAULT_API_KEY_ENV};
use crate::error::{FncallError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub use api::{normalize_endpoint, ApiConfig};
pub use defaults::{DEFAULT_API_ENDPOINT, DEFAULT_MODEL};
pub use validation::{expand_env_var_in_string, expand_path, parse_flag};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub default_model: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DispatchConfig {
    #[serde(default)]
    pub max_call_depth: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub source: Option<CredentialSource>,
    #[serde(default)]
    pub env_var: Option<String>,
    #[serde(default)]
    pub key_file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
}

/// Contents of a `.fncall.yaml` / `.fncall.json` file. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Fully resolved runtime settings. Holds no secrets.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_endpoint: String,
    pub model: String,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub max_call_depth: usize,
    pub verbose: bool,
    pub credentials: CredentialSettings,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = match &args.config {
            Some(path) => FileConfig::load_from(path)?,
            None => FileConfig::load()?,
        };
        Self::resolve(args, &file_config, |name| env::var(name).ok())
    }

    /// Merge CLI args > environment > config file > defaults.
    pub fn resolve<F>(args: &Args, file_config: &FileConfig, env_lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| env_lookup("FNCALL_API_ENDPOINT"))
            .or_else(|| file_config.api.endpoint.clone())
            .map(|endpoint| normalize_endpoint(&endpoint))
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());

        let model = args
            .model
            .clone()
            .or_else(|| env_lookup("FNCALL_MODEL"))
            .or_else(|| file_config.model.default_model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let timeout_secs = args
            .timeout
            .or(env_number(&env_lookup, "FNCALL_TIMEOUT")?)
            .or(file_config.api.timeout_secs)
            .unwrap_or_else(defaults::default_timeout_secs);
        if timeout_secs == 0 {
            return Err(FncallError::ConfigError(
                "request timeout must be at least 1 second".to_string(),
            ));
        }

        let max_retries = args
            .max_retries
            .or(env_number(&env_lookup, "FNCALL_MAX_RETRIES")?)
            .or(file_config.api.max_retries)
            .unwrap_or_else(defaults::default_max_retries);

        let base_delay_ms = file_config
            .api
            .retry_base_delay_ms
            .unwrap_or_else(defaults::default_retry_base_delay_ms);

        let max_call_depth = args
            .max_call_depth
            .or(env_number(&env_lookup, "FNCALL_MAX_CALL_DEPTH")?)
            .or(file_config.dispatch.max_call_depth)
            .unwrap_or_else(defaults::default_max_call_depth);
        if max_call_depth == 0 {
            return Err(FncallError::ConfigError(
                "max call depth must be at least 1".to_string(),
            ));
        }

        let verbose = args.verbose
            || env_lookup("FNCALL_VERBOSE")
                .map(|v| parse_flag(&v))
                .or(file_config.output.verbose)
                .unwrap_or(false);

        let env_source = env_lookup("FNCALL_CREDENTIAL_SOURCE")
            .map(|s| parse_credential_source(&s))
            .transpose()?;
        let credentials = CredentialSettings {
            source: args
                .credential_source
                .or(env_source)
                .or(file_config.credentials.source)
                .unwrap_or_default(),
            env_var: file_config
                .credentials
                .env_var
                .clone()
                .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string()),
            key_file: args.key_file.clone().or_else(|| {
                file_config
                    .credentials
                    .key_file
                    .as_deref()
                    .map(expand_path)
            }),
        };

        Ok(Config {
            api_endpoint,
            model,
            request_timeout: Duration::from_secs(timeout_secs),
            retry: RetryPolicy {
                max_attempts: max_retries.saturating_add(1),
                base_delay: Duration::from_millis(base_delay_ms),
                max_delay: Duration::from_secs(defaults::default_retry_max_delay_secs()),
            },
            max_call_depth,
            verbose,
            credentials,
        })
    }
}

/// A numeric setting from the environment. Unset is `None`; anything that
/// doesn't parse is a config error rather than a silent fallback.
fn env_number<T, F>(env_lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|value| {
            value.trim().parse::<T>().map_err(|_| {
                FncallError::ConfigError(format!("invalid {} '{}'", name, value))
            })
        })
        .transpose()
}

fn parse_credential_source(value: &str) -> Result<CredentialSource> {
    match value.trim().to_lowercase().as_str() {
        "auto" => Ok(CredentialSource::Auto),
        "env" => Ok(CredentialSource::Env),
        "file" => Ok(CredentialSource::File),
        "prompt" => Ok(CredentialSource::Prompt),
        other => Err(FncallError::ConfigError(format!(
            "unknown credential source '{}' (expected auto, env, file or prompt)",
            other
        ))),
    }
}

impl FileConfig {
    /// First config file found in the search path, or defaults.
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        // No config file found, return default
        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );

        let config: FileConfig = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".fncall.yaml"),
            PathBuf::from(".fncall.yml"),
            PathBuf::from(".fncall.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let config_dir = config_dir.join("fncall");
            paths.push(config_dir.join("fncall.yaml"));
            paths.push(config_dir.join("fncall.yml"));
            paths.push(config_dir.join("fncall.json"));
        }

        paths
    }
}

use clap::Parser;
use std::path::PathBuf;

use crate::credentials::CredentialSource;

#[derive(Parser, Debug, Default)]
#[command(name = "fncall")]
#[command(
    about = "Ask a chat model a question and let it call local functions (date/time, to-do lists)",
    long_about = None
)]
pub struct Args {
    #[arg(long = "model", help = "Model identifier (default: gpt-4o)")]
    pub model: Option<String>,

    #[arg(
        long = "api-endpoint",
        help = "Custom API base URL (e.g., http://localhost:11434/v1)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(long = "timeout", help = "Per-request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(
        long = "max-retries",
        help = "Retries for network failures, timeouts and 5xx/429 responses"
    )]
    pub max_retries: Option<u32>,

    #[arg(
        long = "max-call-depth",
        help = "Maximum number of function calls the model may chain in one turn"
    )]
    pub max_call_depth: Option<usize>,

    #[arg(
        long = "credential-source",
        value_enum,
        help = "Where to read the API key from"
    )]
    pub credential_source: Option<CredentialSource>,

    #[arg(long = "key-file", help = "File containing the API key")]
    pub key_file: Option<PathBuf>,

    #[arg(long = "config", help = "Read settings from this YAML or JSON file")]
    pub config: Option<PathBuf>,

    #[arg(long = "readme", help = "Write a README describing this assistant to PATH")]
    pub readme: Option<PathBuf>,

    #[arg(
        long = "list-capabilities",
        help = "Print the functions offered to the model and exit"
    )]
    pub list_capabilities: bool,

    #[arg(short = 'v', long = "verbose", help = "Print diagnostics to stderr")]
    pub verbose: bool,

    #[arg(help = "Prompt to send to the model")]
    pub prompt: Vec<String>,
}

impl Args {
    /// No prompt and nothing else to do: print usage instead of running.
    pub fn needs_usage(&self) -> bool {
        self.prompt.is_empty() && !self.list_capabilities && self.readme.is_none()
    }
}

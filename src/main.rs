use clap::Parser;
use colored::*;
use std::process;

use fncall::api::HttpChatClient;
use fncall::capabilities::CapabilityRegistry;
use fncall::cli::Args;
use fncall::config::Config;
use fncall::credentials::provider_for;
use fncall::error::Result;
use fncall::orchestrator::{self, OrchestratorContext};
use fncall::readme::write_readme;
use fncall::ui::{display_answer, log_verbose};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.needs_usage() {
        print_usage();
        process::exit(2);
    }

    if let Err(e) = run(args).await {
        eprintln!("{} {}", "Error:".red(), e);
        process::exit(e.exit_code());
    }
}

async fn run(args: Args) -> Result<()> {
    let registry = CapabilityRegistry::builtin();

    if args.list_capabilities {
        let specs = registry.to_function_specs();
        println!("{}", serde_json::to_string_pretty(&specs)?);
        return Ok(());
    }

    let config = Config::from_env_and_args(&args)?;

    if let Some(path) = &args.readme {
        write_readme(&registry, path)?;
        log_verbose(
            config.verbose,
            "fncall",
            &format!("Wrote README to {}", path.display()),
        );
    }

    if args.prompt.is_empty() {
        return Ok(());
    }
    let prompt = args.prompt.join(" ");

    let provider = provider_for(&config.credentials)?;
    log_verbose(
        config.verbose,
        "fncall",
        &format!("Reading API key from {}", provider.describe()),
    );
    let api_key = provider.api_key()?;

    let client = HttpChatClient::new(&api_key, &config.api_endpoint, config.request_timeout)?;
    log_verbose(
        config.verbose,
        "fncall",
        &format!("Endpoint: {}", client.endpoint()),
    );

    let context = OrchestratorContext::new(&client, &registry, &config);
    let outcome = orchestrator::run(&context, &prompt).await?;

    display_answer(&outcome.answer);
    Ok(())
}

fn print_usage() {
    eprintln!("{}", "Usage: fncall [OPTIONS] <prompt>".red());
    eprintln!(
        "{}",
        "  e.g. fncall \"Can I have a to-do list to learn about the stock market?\"".dimmed()
    );
    eprintln!("{}", "  Run `fncall --help` for all options.".dimmed());
}

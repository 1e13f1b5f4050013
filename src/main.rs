//! gemini - send a prompt to the Google Gemini API and print the answer.
//!
//! Piped standard input is prepended to the prompt argument. The answer is
//! reformatted for the terminal; `--complete` shows a spinner while waiting.

mod app;
mod config;
mod display;
mod error;
mod llm;
mod prompt;
mod protocol;

use anyhow::{Context, Result};
use app::RunOptions;
use atty::Stream;
use clap::Parser;
use config::Config;
use display::Formatter;
use error::GeminiError;
use llm::gemini::GeminiClient;
use llm::retry::RetryingGenerator;
use std::io::Read;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gemini")]
#[command(author, version, about = "Send prompts to the Google Gemini API")]
#[command(long_about = "Send prompts to the Google Gemini API.\n\nIf stdin is piped, it is prepended to the prompt, separated by a blank line.\nThe API key is read from the GEMINI_API_KEY environment variable.")]
struct Cli {
    /// Prompt for the model. If stdin is piped, it will be prepended.
    #[arg(value_name = "PROMPT", required_unless_present = "init_config")]
    prompt: Option<String>,

    /// Show spinner while waiting for response
    #[arg(long)]
    complete: bool,

    /// Override the configured model
    #[arg(short = 'm', long, value_name = "MODEL")]
    model: Option<String>,

    /// Print the answer without ANSI styling
    #[arg(long)]
    no_color: bool,

    /// Debug logging on stderr
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Write a default config file if none exists, then exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("[ERROR] {:#}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<GeminiError>() {
            Some(GeminiError::Interrupted) => {
                eprintln!("\n[INFO] Interrupted by user.");
            }
            Some(err) => {
                eprintln!("[ERROR] {}", err);
                std::process::exit(1);
            }
            None => {
                eprintln!("[ERROR] {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

/// Logs go to stderr; stdout carries only the answer.
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("gemini={}", level).parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    if cli.init_config {
        return handle_init_config();
    }

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(model) = cli.model {
        config.model = model;
    }
    debug!("Using model {} at {}", config.model, config.host);

    let stdin = read_piped_stdin()?;
    let prompt = prompt::compose(stdin.as_deref(), cli.prompt.as_deref().unwrap_or_default());

    let client = GeminiClient::new(&config, config.resolve_api_key())?;
    let generator = RetryingGenerator::new(client, config.retry_policy());

    let options = RunOptions {
        max_tokens: config.max_tokens,
        formatter: Formatter::new(!cli.no_color && atty::is(Stream::Stdout)),
    };
    let progress = cli.complete.then(std::io::stderr);
    let mut stdout = std::io::stdout();

    app::run(
        &generator,
        &prompt,
        &options,
        progress,
        interrupted(),
        &mut stdout,
    )
    .await?;
    Ok(())
}

/// Read all of stdin when it is piped; `None` when it is a terminal.
fn read_piped_stdin() -> Result<Option<String>> {
    if atty::is(Stream::Stdin) {
        return Ok(None);
    }
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read standard input")?;
    Ok(Some(input))
}

/// Resolves on Ctrl+C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Handle the --init-config flag.
fn handle_init_config() -> Result<()> {
    let config_path = Config::config_path()?;

    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
    } else {
        Config::default().save()?;
        println!("Created default config at {}", config_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_prompt_and_flags() {
        let cli = Cli::try_parse_from(["gemini", "--complete", "-m", "gemini-1.5-pro", "what is rust"]).unwrap();
        assert_eq!(cli.prompt.as_deref(), Some("what is rust"));
        assert!(cli.complete);
        assert_eq!(cli.model.as_deref(), Some("gemini-1.5-pro"));
        assert!(!cli.init_config);
    }

    #[test]
    fn test_cli_requires_prompt() {
        assert!(Cli::try_parse_from(["gemini"]).is_err());
        assert!(Cli::try_parse_from(["gemini", "one", "two"]).is_err());
    }

    #[test]
    fn test_cli_init_config_without_prompt() {
        let cli = Cli::try_parse_from(["gemini", "--init-config"]).unwrap();
        assert!(cli.init_config);
        assert!(cli.prompt.is_none());
    }
}

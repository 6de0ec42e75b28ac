//! Triage CLI - triage GitHub issues with schema-constrained LLM extraction.

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use triage_cli::{Cli, CliError, Config, Credentials, Formatter};
use triage_extractor::Pipeline;
use triage_github::GitHubClient;
use triage_llm::OpenAiProvider;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing (log to stderr)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> triage_cli::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.extractor.validate().map_err(CliError::Config)?;

    let credentials = Credentials::from_env()?;
    debug!("Loaded credentials: {:?}", credentials);

    let system_template = config.extractor.load_system_prompt()?;

    let mut source = GitHubClient::new(credentials.github_token.clone())?;
    if let Some(base_url) = &config.endpoints.github_api {
        source = source.with_base_url(base_url);
    }

    let mut provider = OpenAiProvider::new(credentials.openai_api_key.clone())?;
    if let Some(endpoint) = credentials
        .openai_base_url
        .as_ref()
        .or(config.endpoints.openai_api.as_ref())
    {
        provider = provider.with_endpoint(endpoint);
    }

    let formatter = Formatter::new(config.settings.format, config.settings.color);
    let pipeline = Pipeline::new(source, provider, config.extractor, system_template);

    let report = pipeline.run(&cli.repo_url).await?;
    println!("{}", formatter.format_report(&report)?);

    Ok(())
}

//! CLI entry point - the composition root.
//!
//! This is the ONLY place where settings, logging and the studio are wired
//! together. Command dispatch routes to handlers which talk to the studio
//! through `CliContext`.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use voxforge_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    // Bootstrap the CLI context (composition root)
    let config = CliConfig::from_sources(cli.config.as_deref(), cli.latency_ms)?;
    let ctx = bootstrap(config)?;

    match command {
        Commands::Voices { kind, search, json } => {
            handlers::voices::execute(&ctx, kind, search, json).await?;
        }
        Commands::Speak(args) => {
            handlers::speak::execute(&ctx, args).await?;
        }
        Commands::Clone { name, sample } => {
            handlers::clone::execute(&ctx, name, sample).await?;
        }
        Commands::Studio { voice } => {
            handlers::studio::execute(&ctx, voice).await?;
        }
        Commands::Config { command } => {
            handlers::config::execute(&ctx, command)?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables before clap reads VOXFORGE_* fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        eprintln!("Error: {err}");
        std::process::exit(code);
    }
}

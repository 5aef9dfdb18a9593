use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use wayfinder_cli::cli::{Cli, Commands};
use wayfinder_cli::commands::{
    Context, cmd_clear_cache, cmd_clear_storage, cmd_config, cmd_locate, cmd_locations,
    cmd_refresh, cmd_services, cmd_settings,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "wayfinder", &mut io::stdout());
        return Ok(());
    }

    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let ctx = Context::new(cli.service_url.as_deref(), cli.quiet);

    match cli.command {
        Commands::Locations {
            search,
            service_type,
            position,
            format,
        } => cmd_locations(&ctx, &search, service_type.into(), &position, format).await,
        Commands::Services {
            service_type,
            format,
        } => cmd_services(&ctx, service_type.map(Into::into), format).await,
        Commands::Settings { action } => cmd_settings(&ctx, action),
        Commands::Locate { position, clear } => cmd_locate(&ctx, &position, clear).await,
        Commands::Refresh => cmd_refresh(&ctx).await,
        Commands::ClearCache => cmd_clear_cache(&ctx).await,
        Commands::ClearStorage => cmd_clear_storage(&ctx),
        Commands::Config { action } => cmd_config(&ctx, action),
        Commands::Completions { .. } => Ok(()),
    }
}

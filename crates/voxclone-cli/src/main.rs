//! CLI entry point - the composition root.
//!
//! Infrastructure is wired together only via bootstrap. Command dispatch
//! routes to handlers which drive the session.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use voxclone_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command.as_ref() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = CliConfig::from_cli(&cli)?;
    let reference_file = match command {
        Commands::Clone { file, .. } | Commands::Speak { file, .. } => Some(file.clone()),
        _ => None,
    };
    let ctx = bootstrap(config, reference_file).await?;

    match command {
        Commands::Voices => handlers::voices::execute(&ctx).await?,
        Commands::Clone { name, submit, .. } => {
            handlers::clone::execute(&ctx, name.as_deref(), *submit).await?;
        }
        Commands::Speak {
            text, name, out, ..
        } => {
            handlers::speak::execute(&ctx, text, name.as_deref(), out.as_deref()).await?;
        }
        Commands::Say { voice, text, out } => {
            handlers::say::execute(&ctx, voice, text, out.as_deref()).await?;
        }
        Commands::Delete { id, yes } => {
            handlers::delete::execute(&ctx, *id, *yes).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before parsing so env-backed flags see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

//! Cardgen - birthday card generator CLI and web form.

use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cardgen::cli::{CardArgs, Cli, Command, ServeArgs};
use cardgen::config::{self, Config};
use cardgen::server::{self, AppState};
use cardgen::{build_prompt, generate_card, CardError, CardOptions, ServiceContext};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over the verbosity flag.
fn init_tracing(verbose: bool) {
    let default = if verbose { "cardgen=debug" } else { "cardgen=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> Result<(), CardError> {
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(CardError::Config)?;
    tracing::debug!(path = %config_path.display(), "config loaded");

    match cli.command {
        Command::Prompt(args) => {
            println!("{}", build_prompt(&args.to_attributes())?);
            Ok(())
        }
        Command::Card(args) => card(&config, &args).await,
        Command::Serve(args) => serve(&config, args).await,
    }
}

async fn card(config: &Config, args: &CardArgs) -> Result<(), CardError> {
    let attributes = args.attributes.to_attributes();
    // Reject bad input before a provider client is even built.
    build_prompt(&attributes)?;

    let (ctx, recording_session) = ServiceContext::from_env(config)?;

    let options = CardOptions {
        archive_dir: args.archive_dir.clone().or_else(|| config.output.archive_dir.clone()),
        scratch_dir: config.scratch_dir(),
        ..CardOptions::new(args.layout.into(), args.output_path())
    };

    let result = generate_card(&ctx, &attributes, &options).await;
    drop(ctx);

    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    let path = result?;
    eprintln!("Saved: {}", path.display());
    Ok(())
}

async fn serve(config: &Config, args: ServeArgs) -> Result<(), CardError> {
    let (ctx, recording_session) = ServiceContext::from_env(config)?;
    if recording_session.is_some() {
        tracing::warn!("recording is not saved while serving; use `card` to record a cassette");
    }

    let state = AppState {
        ctx: Arc::new(ctx),
        output_dir: args.output_dir.unwrap_or_else(|| config.server.output_dir.clone()),
        archive_dir: args.archive_dir.or_else(|| config.output.archive_dir.clone()),
        scratch_dir: config.scratch_dir(),
    };
    let addr = args.bind.unwrap_or(config.server.bind);

    let (local, serving) = server::bind(server::build_router(state), addr).await?;
    eprintln!("Listening on http://{local}");
    serving.await.map_err(CardError::Io)
}

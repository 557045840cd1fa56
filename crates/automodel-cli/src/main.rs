use automodel::Config;
use clap::Parser;
use owo_colors::{OwoColorize, Stream};
use std::process::ExitCode;
use tracing::info;

mod args;

use args::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!(
                "{} {err}",
                "[ERROR]".if_supports_color(Stream::Stdout, |text| text.red())
            );
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> automodel::Result<()> {
    let config = Config::from_options(cli.into_options())?;
    let formatter = config.formatter.build();

    let written = automodel::generate(&config, formatter.as_ref()).await?;
    info!(
        files = written.len(),
        dir = %config.output.dir,
        "generation complete"
    );
    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the default level.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("automodel=info,auto_model=info"));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

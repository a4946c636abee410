use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use voxlist::app::{run_check_command, run_repl_command, run_transcribe_command};
use voxlist::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Check) => run_check_command().await?,
        Some(Commands::Transcribe { file, speaker }) => {
            run_transcribe_command(&file, &speaker).await?;
        }
        Some(Commands::Repl {
            prefix,
            wake_prefix,
        }) => run_repl_command(&prefix, &wake_prefix).await?,
        None => run_repl_command("!", "voxlist").await?,
    }

    Ok(())
}

/// RUST_LOG wins when set; otherwise the verbosity flags pick the level.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "voxlist=info",
        1 => "voxlist=debug",
        _ => "voxlist=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

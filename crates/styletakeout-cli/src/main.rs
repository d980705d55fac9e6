//! styletakeout: extract css and injectGlobal styles at build time.

mod cli;
mod config;
mod error;
mod run;

use camino::Utf8PathBuf;
use clap::Parser;
use cli::Args;
use error::CliError;
use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let cwd = std::env::current_dir().map_err(|source| CliError::Read {
        path: Utf8PathBuf::from("."),
        source,
    })?;
    let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(|path| CliError::NonUtf8Path { path })?;

    let summary = run::run(&args, &cwd)?;
    tracing::info!(
        files = summary.files,
        replacements = summary.replacements,
        stylesheet = %summary.stylesheet,
        "done"
    );
    Ok(())
}

/// Logs go to stderr so transformed modules can be piped from stdout.
/// `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::Parser;

/// Extract css and injectGlobal styles from JavaScript and TypeScript modules.
#[derive(Debug, Parser)]
#[command(name = "styletakeout")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Files or directories to transform
    #[arg(required = true)]
    pub inputs: Vec<Utf8PathBuf>,

    /// Path to the configuration file [default: styletakeout.config.json]
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Write transformed modules here instead of printing them
    #[arg(long = "out-dir")]
    pub out_dir: Option<Utf8PathBuf>,

    /// Glob patterns to ignore
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Where to write the stylesheet, overriding the configured outputFile
    #[arg(long = "output-file")]
    pub output_file: Option<Utf8PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

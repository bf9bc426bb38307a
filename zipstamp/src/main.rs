mod output;

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use output::{BackupOutput, OutputWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Environment variable naming the default output directory.
const OUTPUT_DIR_ENV: &str = "ZIPSTAMP_OUTPUT_DIR";

/// Zipstamp - timestamped zip backups
///
/// Creates a timestamped zip backup of the file or directory given by `-i`
/// in the directory given by `-o`.
#[derive(Parser, Debug)]
#[command(name = "zipstamp")]
#[command(about = "Create a timestamped zip backup of a file or directory", long_about = None)]
#[command(version)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// File or directory to back up
    #[arg(short, long)]
    input: PathBuf,

    /// Directory for the archive (defaults to ZIPSTAMP_OUTPUT_DIR env var or the input's parent)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return argument_error(err),
    };

    init_logging(cli.verbose);

    let output = OutputWriter::new(cli.json);
    match run(&cli, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.write_error(&err, 1);
            ExitCode::FAILURE
        }
    }
}

/// Report a command-line problem and pick the exit code.
///
/// Help and version requests succeed; anything else, including a bare
/// invocation with no arguments, exits with status 1.
fn argument_error(err: clap::Error) -> ExitCode {
    let _ = err.print();
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

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

fn run(cli: &Cli, output: &OutputWriter) -> Result<()> {
    // Determine output dir: CLI arg > ZIPSTAMP_OUTPUT_DIR env var > input's parent
    let output_dir = resolve_output_dir(cli.output.clone(), std::env::var_os(OUTPUT_DIR_ENV));
    tracing::debug!(
        input = %cli.input.display(),
        output_dir = ?output_dir,
        "resolved backup target"
    );

    output.progress(&format!(
        "Backing up {} to {}...",
        cli.input.display(),
        describe_output_dir(output_dir.as_deref())
    ))?;

    let artifact = zipstamp_core::backup(&cli.input, output_dir.as_deref())
        .with_context(|| format!("Failed to back up {}", cli.input.display()))?;

    output.progress("Complete.")?;

    let archive = artifact.archive.clone();
    output.write(&BackupOutput::from(artifact), || {
        archive.display().to_string()
    })
}

fn resolve_output_dir(arg: Option<PathBuf>, env: Option<std::ffi::OsString>) -> Option<PathBuf> {
    arg.or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
}

fn describe_output_dir(dir: Option<&Path>) -> String {
    match dir {
        Some(dir) => dir.display().to_string(),
        None => "its parent directory".to_string(),
    }
}

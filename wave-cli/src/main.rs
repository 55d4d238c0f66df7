mod input;
mod output;

use clap::Parser;
use output::{MetaWriter, OutputSink, SinkError, TextWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use wave_core::{ConfigError, RunError};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Parameter file: c tau x1 x2 runtime dx outtime outfilename
    param_file: PathBuf,

    /// Also write a JSON-lines index of the snapshots (one row per snapshot)
    #[arg(long)]
    meta: Option<PathBuf>,

    /// Do not print where the results were written
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Input(#[from] input::InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Output(#[from] SinkError),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Input(input::InputError::NotFound { .. }) => 2,
            CliError::Input(e) if e.is_value_error() => 4,
            CliError::Input(_) => 3,
            CliError::Config(_) => 4,
            CliError::Output(_) => 5,
        }
    }
}

fn main() -> ExitCode {
    env_logger::builder().format_timestamp_secs().init();

    let args = Args::parse();

    match simulate(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn simulate(args: &Args) -> Result<(), CliError> {
    let params = input::read_params(&args.param_file)?;

    // Reject degenerate grids before the output file gets truncated.
    params.derive()?;

    let mut sink = open_outputs(Path::new(&params.outfilename), args.meta.as_deref())?;

    let summary = wave_core::run(&params, &mut sink).map_err(|e| match e {
        RunError::Config(e) => CliError::Config(e),
        RunError::Sink(e) => CliError::Output(e),
    })?;

    log::info!(
        "t={} max|rho|={} after {} step(s)",
        summary.final_time,
        summary.final_max_abs,
        summary.steps
    );

    if !args.quiet {
        println!("Results written to '{}'.", params.outfilename);
    }
    Ok(())
}

/// The index is opened first so a bad `--meta` path leaves the text output
/// untouched.
fn open_outputs(
    text_path: &Path,
    meta_path: Option<&Path>,
) -> Result<OutputSink<BufWriter<File>, BufWriter<File>>, SinkError> {
    let meta = match meta_path {
        Some(path) => Some((
            path.to_path_buf(),
            MetaWriter::new(BufWriter::new(create(path)?)),
        )),
        None => None,
    };
    let text = TextWriter::new(BufWriter::new(create(text_path)?));
    Ok(OutputSink::new((text_path.to_path_buf(), text), meta))
}

fn create(path: &Path) -> Result<File, SinkError> {
    File::create(path).map_err(|e| SinkError {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rewind", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a recap card image from user statistics.
    Recap(RecapArgs),
    /// Convert every PNG in a directory to WEBP and delete the originals.
    Convert(ConvertArgs),
}

#[derive(Parser, Debug)]
struct RecapArgs {
    /// Path to a JSON file, or the JSON document itself.
    input: String,

    /// Output image path; the format follows the extension.
    output: PathBuf,

    /// Asset root holding `public/` (fonts, logo, achievement icons).
    #[arg(long, default_value = ".")]
    root: PathBuf,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Directory to convert.
    #[arg(long, default_value = rewind::DEFAULT_DEVLOG_DIR)]
    dir: PathBuf,
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Recap(args) => cmd_recap(args),
        Command::Convert(args) => cmd_convert(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_target(false)
        .try_init();
}

fn cmd_recap(args: RecapArgs) -> anyhow::Result<ExitCode> {
    let input = match rewind::RecapInput::from_arg(&args.input) {
        Ok(input) => input,
        Err(e) => {
            println!("Error parsing input: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let opts = rewind::RecapOpts::from_env(&args.root);
    rewind::render_recap_to_file(&input, &args.output, &opts)
        .with_context(|| format!("render recap card to '{}'", args.output.display()))?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<ExitCode> {
    let report = rewind::convert_dir(&args.dir)
        .with_context(|| format!("convert directory '{}'", args.dir.display()))?;
    if !report.is_clean() {
        tracing::warn!(
            converted = report.converted.len(),
            failed = report.failed.len(),
            "some files were not converted"
        );
    }
    Ok(ExitCode::SUCCESS)
}

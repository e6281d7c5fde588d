use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, warn, Level};

use vgm_xtractor::{ExtractionResult, ExtractorConfig, NullSink, VgmExtractor, VgmResult};

#[derive(Parser)]
#[command(
    name = "vgm-xtractor",
    version,
    about = "Extract embedded data blocks (PCM samples, ROM/RAM images) from VGM/VGZ files"
)]
struct Cli {
    /// VGM or VGZ files to extract
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Directory receiving block_<index>.raw files
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Stop after this many blocks per file
    #[arg(long, default_value_t = ExtractorConfig::default().max_blocks)]
    max_blocks: usize,

    /// Keep going when a block cannot be written
    #[arg(long)]
    keep_going: bool,

    /// Treat files starting with the gzip magic as VGZ whatever their extension
    #[arg(long)]
    sniff: bool,

    /// Only list the blocks, write nothing
    #[arg(long)]
    list: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Set the logging level
    #[arg(short, long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Output directory of every input, in input order.
///
/// A single input writes straight into `base`. Several inputs get one
/// sub-directory each, named after the file stem, or `<position>_<stem>` for
/// all of them when two inputs share a stem.
fn output_dirs(base: &Path, inputs: &[PathBuf]) -> Vec<PathBuf> {
    if inputs.len() <= 1 {
        return inputs.iter().map(|_| base.to_path_buf()).collect();
    }
    let stems: Vec<String> = inputs
        .iter()
        .map(|input| {
            input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "vgm".to_string())
        })
        .collect();
    let mut seen = HashSet::new();
    let stems_repeat = !stems.iter().all(|stem| seen.insert(stem.as_str()));

    stems
        .iter()
        .enumerate()
        .map(|(position, stem)| {
            if stems_repeat {
                base.join(format!("{}_{}", position, stem))
            } else {
                base.join(stem)
            }
        })
        .collect()
}

fn run_one(
    cli: &Cli,
    extractor: &VgmExtractor,
    input: &Path,
    out_dir: &Path,
) -> VgmResult<ExtractionResult> {
    if cli.list {
        let source = extractor.default_source();
        return extractor.extract_path(input, &source, &mut NullSink);
    }
    extractor.extract_file(input, out_dir)
}

fn print_text(input: &Path, result: &ExtractionResult) {
    println!("{}", input.display());
    if result.blocks.is_empty() {
        println!("  no blocks found");
    } else {
        println!(
            "  {} blocks, {} payload bytes",
            result.block_count(),
            result.total_payload_bytes()
        );
    }
    for line in result.listing() {
        println!("  {}", line);
    }
    for failure in &result.sink_failures {
        println!("  block_{}.raw: not saved ({})", failure.index, failure.message);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ExtractorConfig::default()
        .with_max_blocks(cli.max_blocks)
        .with_continue_on_sink_error(cli.keep_going)
        .with_sniff_gzip_magic(cli.sniff);
    let extractor = match VgmExtractor::with_config(config) {
        Ok(extractor) => extractor,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        },
    };

    let mut results = Vec::new();
    let mut failed = false;
    let out_dirs = output_dirs(&cli.output, &cli.files);
    for (input, out_dir) in cli.files.iter().zip(&out_dirs) {
        match run_one(&cli, &extractor, input, out_dir) {
            Ok(result) => {
                if result.is_truncated() {
                    warn!(
                        "{}: reserved block count exhausted after {} blocks",
                        input.display(),
                        result.block_count()
                    );
                }
                if cli.format == OutputFormat::Text {
                    print_text(input, &result);
                }
                results.push(result);
            },
            Err(e) => {
                failed = true;
                error!("{}: {} ({})", input.display(), e, e.suggested_action());
                if !e.is_recoverable() {
                    break;
                }
            },
        }
    }

    if cli.format == OutputFormat::Json {
        match serde_json::to_string_pretty(&results) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("failed to encode results: {}", e);
                failed = true;
            },
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

use crate::motif::InitStrategy;
use chrono::Datelike;
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

type Result<T> = std::result::Result<T, String>;

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    )
});

#[derive(Parser)]
#[command(name="gibbsmotif",
          version=&**FULL_VERSION,
          about="Motif discovery by Gibbs sampling",
          long_about = None,
          disable_help_subcommand = true,
          after_help = format!("Copyright (C) {}
This program comes with ABSOLUTELY NO WARRANTY.", chrono::Utc::now().year()),
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(global = true)]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Find a shared motif in a set of sequences")]
    Discover(DiscoverArgs),
    #[clap(about = "Check a sequence set before sampling")]
    Validate(ValidateArgs),
    #[clap(about = "Generate sequences with a planted motif")]
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("discover")))]
#[command(arg_required_else_help(true))]
pub struct DiscoverArgs {
    #[clap(required = true)]
    #[clap(short = 'f')]
    #[clap(long = "fasta")]
    #[clap(help = "FASTA file with the input sequences (optionally gzipped)")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_file_exists)]
    pub fasta_path: PathBuf,

    #[clap(short = 'k')]
    #[clap(long = "motif-len")]
    #[clap(help = "Length of the motif to find")]
    #[clap(value_name = "K")]
    #[clap(default_value = "10")]
    #[arg(value_parser = at_least_one)]
    pub motif_len: usize,

    #[clap(short = 'e')]
    #[clap(long = "pseudocount")]
    #[clap(help = "Pseudocount added to every cell of the count matrix")]
    #[clap(value_name = "EPSILON")]
    #[clap(default_value = "0.5")]
    #[arg(value_parser = ensure_positive_float)]
    pub pseudocount: f64,

    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(help = "Output report path [default: stdout]")]
    #[clap(value_name = "OUTPUT")]
    #[arg(value_parser = check_prefix_path)]
    pub output_path: Option<PathBuf>,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,

    #[clap(help_heading("Sampling"))]
    #[clap(long = "seed")]
    #[clap(value_name = "SEED")]
    #[clap(help = "Seed of the random number generator")]
    #[clap(default_value = "2950")]
    pub seed: u64,

    #[clap(help_heading("Sampling"))]
    #[clap(long = "restarts")]
    #[clap(value_name = "RESTARTS")]
    #[clap(help = "Number of independent sampler runs")]
    #[clap(default_value = "1")]
    #[arg(value_parser = at_least_one)]
    pub restarts: usize,

    #[clap(help_heading("Sampling"))]
    #[clap(long = "init")]
    #[clap(value_name = "INIT")]
    #[clap(help = "Initial motif starts (random or zero)")]
    #[clap(default_value = "random")]
    pub init: InitStrategy,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "stall-limit")]
    #[clap(value_name = "SWEEPS")]
    #[clap(help = "Stop after this many sweeps without improvement")]
    #[clap(default_value = "100")]
    #[arg(value_parser = at_least_one)]
    pub stall_limit: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "max-sweeps")]
    #[clap(value_name = "SWEEPS")]
    #[clap(help = "Hard cap on the number of sweeps per restart")]
    #[arg(value_parser = at_least_one)]
    pub max_sweeps: Option<usize>,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("validate")))]
#[command(arg_required_else_help(true))]
pub struct ValidateArgs {
    #[clap(required = true)]
    #[clap(short = 'f')]
    #[clap(long = "fasta")]
    #[clap(help = "FASTA file with the input sequences (optionally gzipped)")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_file_exists)]
    pub fasta_path: PathBuf,

    #[clap(short = 'k')]
    #[clap(long = "motif-len")]
    #[clap(help = "Length of the motif to find")]
    #[clap(value_name = "K")]
    #[clap(default_value = "10")]
    #[arg(value_parser = at_least_one)]
    pub motif_len: usize,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("simulate")))]
#[command(arg_required_else_help(true))]
pub struct SimulateArgs {
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(help = "Output FASTA path")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_prefix_path)]
    pub output_path: PathBuf,

    #[clap(short = 'n')]
    #[clap(long = "num-sequences")]
    #[clap(help = "Number of sequences")]
    #[clap(value_name = "N")]
    #[clap(default_value = "10")]
    #[arg(value_parser = at_least_one)]
    pub num_sequences: usize,

    #[clap(short = 'l')]
    #[clap(long = "sequence-len")]
    #[clap(help = "Length of every sequence")]
    #[clap(value_name = "LEN")]
    #[clap(default_value = "1000")]
    #[arg(value_parser = at_least_one)]
    pub sequence_len: usize,

    #[clap(short = 'k')]
    #[clap(long = "motif-len")]
    #[clap(help = "Length of the planted motif")]
    #[clap(value_name = "K")]
    #[clap(default_value = "10")]
    #[arg(value_parser = at_least_one)]
    pub motif_len: usize,

    #[clap(long = "mutation-rate")]
    #[clap(value_name = "RATE")]
    #[clap(help = "Probability of substituting each planted base")]
    #[clap(default_value = "0.0")]
    #[arg(value_parser = ensure_unit_float)]
    pub mutation_rate: f64,

    #[clap(long = "seed")]
    #[clap(value_name = "SEED")]
    #[clap(help = "Seed of the random number generator")]
    #[clap(default_value = "2950")]
    pub seed: u64,
}

/// `-v` shows per-restart progress, `-vv` also every improving sweep.
fn verbosity_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Green,
        Level::Debug => Color::Blue,
        Level::Trace => Color::Cyan,
    }
}

pub fn init_verbose(args: &Cli) {
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let mut style = buf.style();
            style.set_color(level_color(record.level()));
            writeln!(
                buf,
                "{} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(record.level()),
                std::thread::current().name().unwrap_or("main"),
                record.args()
            )
        })
        .filter_level(verbosity_filter(args.verbosity))
        .init();
}

fn check_prefix_path(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(path.to_path_buf())
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn at_least_one(s: &str) -> Result<usize> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid positive integer", s))?;
    if value >= 1 {
        Ok(value)
    } else {
        Err("The value must be at least 1".into())
    }
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn ensure_positive_float(s: &str) -> Result<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("The value must be a positive number, got: {}", value))
    }
}

fn ensure_unit_float(s: &str) -> Result<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "The value must be between 0.0 and 1.0, got: {}",
            value
        ))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive_float() {
        assert_eq!(ensure_positive_float("0.5"), Ok(0.5));
        assert!(ensure_positive_float("0").is_err());
        assert!(ensure_positive_float("-1.0").is_err());
        assert!(ensure_positive_float("inf").is_err());
        assert!(ensure_positive_float("abc").is_err());
    }

    #[test]
    fn test_verbosity_filter() {
        assert_eq!(verbosity_filter(0), LevelFilter::Warn);
        assert_eq!(verbosity_filter(1), LevelFilter::Info);
        assert_eq!(verbosity_filter(2), LevelFilter::Debug);
        assert_eq!(verbosity_filter(5), LevelFilter::Trace);
    }

    #[test]
    fn test_at_least_one() {
        assert_eq!(at_least_one("5"), Ok(5));
        assert!(at_least_one("0").is_err());
        assert!(at_least_one("-3").is_err());
    }

    #[test]
    fn test_ensure_unit_float() {
        assert_eq!(ensure_unit_float("0.25"), Ok(0.25));
        assert!(ensure_unit_float("1.5").is_err());
    }

    #[test]
    fn test_parse_discover_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["gibbsmotif", "discover", "-f", path]).unwrap();
        match cli.command {
            Command::Discover(args) => {
                assert_eq!(args.motif_len, 10);
                assert_eq!(args.pseudocount, 0.5);
                assert_eq!(args.seed, 2950);
                assert_eq!(args.restarts, 1);
                assert_eq!(args.stall_limit, 100);
                assert_eq!(args.max_sweeps, None);
                assert_eq!(args.init, InitStrategy::Random);
                assert!(args.output_path.is_none());
            }
            _ => panic!("expected discover"),
        }
    }

    #[test]
    fn test_parse_rejects_missing_fasta() {
        let result = Cli::try_parse_from(["gibbsmotif", "discover", "-f", "/nonexistent/x.fa"]);
        assert!(result.is_err());
    }
}

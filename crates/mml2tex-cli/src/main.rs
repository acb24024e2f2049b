use std::{
    fs,
    io::{IsTerminal, Read, Write},
    path::{Path, PathBuf},
};

use clap::Parser;
use log::{LevelFilter, debug, info};

use mml2tex::{Converter, LookupOrder};

mod config_file;
mod pipeline;

use config_file::{Config, OutputFormat, Wrap, load_config_file};
use pipeline::{Pipeline, PipelineError, read_back};

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum LookupOrderArg {
    ElementFirst,
    CodepointFirst,
}

impl From<LookupOrderArg> for LookupOrder {
    fn from(arg: LookupOrderArg) -> Self {
        match arg {
            LookupOrderArg::ElementFirst => LookupOrder::ElementFirst,
            LookupOrderArg::CodepointFirst => LookupOrder::CodepointFirst,
        }
    }
}

/// Converts MathML formulas to TeX
#[derive(Parser, Debug)]
#[command(version, about = "Converts MathML formulas to TeX", long_about = None)]
struct Args {
    /// MathML files to convert; `-` reads from stdin
    #[arg(conflicts_with = "formula", value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Specifies a single MathML formula
    #[arg(short, long, conflicts_with = "files")]
    formula: Option<String>,

    /// Reads the converter configuration from a TOML file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format; overrides the config file
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Math delimiters around the output; overrides the config file
    #[arg(short, long, value_enum)]
    wrap: Option<Wrap>,

    /// Whether element tables or the character table win on lookup; overrides the config file
    #[arg(long, value_enum)]
    lookup_order: Option<LookupOrderArg>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    log_level: String,

    /// If true, the program continues with the next file when an error occurs
    #[arg(long, conflicts_with = "formula")]
    continue_on_error: bool,

    /// Print the TeX stored in `<?mml2tex?>` processing instructions instead of converting
    #[arg(long)]
    extract: bool,
}

fn main() {
    let args = Args::parse();
    setup_logging(&args.log_level);

    let mut config = match args.config {
        Some(ref path) => load_config_file(path).unwrap_or_else(|e| exit_config_error(e, path)),
        None => Config::default(),
    };
    if let Some(order) = args.lookup_order {
        config.converter.lookup_order = order.into();
    }
    let output = args.output.unwrap_or(config.output);
    let wrap = args.wrap.unwrap_or(config.wrap);

    if args.extract {
        for (name, source) in inputs(&args) {
            match read_back(&source) {
                Ok(Some(tex)) => println!("{tex}"),
                Ok(None) => info!("no processing instruction in {name}"),
                Err(e) => exit_pipeline_error(&PipelineError::Read(e), &name, &source),
            }
        }
        return;
    }

    let converter = Converter::new(config.converter).unwrap_or_else(|e| {
        eprintln!("Invalid symbol configuration: {e}");
        std::process::exit(1);
    });
    let pipeline = Pipeline::new(converter, output, wrap);

    let mut failed = 0usize;
    for (name, source) in inputs(&args) {
        debug!("converting {name}");
        match pipeline.run(&source) {
            Ok(tex) => println!("{tex}"),
            Err(e) if args.continue_on_error => {
                report_pipeline_error(&e, &name, &source);
                failed += 1;
            }
            Err(e) => exit_pipeline_error(&e, &name, &source),
        }
    }
    if failed > 0 {
        eprintln!("{failed} input(s) failed to convert");
        std::process::exit(2);
    }
}

/// Set up logging based on the log level argument.
fn setup_logging(level: &str) {
    let filter = match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Warn,
    };

    env_logger::Builder::new()
        .filter_level(filter)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

/// The documents to process, each with a name for diagnostics.
fn inputs(args: &Args) -> Vec<(String, String)> {
    if let Some(ref formula) = args.formula {
        return vec![("<formula>".to_string(), formula.clone())];
    }
    if args.files.is_empty() {
        return vec![("<stdin>".to_string(), read_stdin())];
    }
    args.files
        .iter()
        .map(|path| {
            if path == Path::new("-") {
                ("<stdin>".to_string(), read_stdin())
            } else {
                let source = fs::read_to_string(path).unwrap_or_else(|e| exit_io_error(e, path));
                (path.display().to_string(), source)
            }
        })
        .collect()
}

fn read_stdin() -> String {
    let mut buffer = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut buffer) {
        exit_io_error(e, Path::new("<stdin>"));
    }
    buffer
}

fn report_pipeline_error(e: &PipelineError, name: &str, source: &str) {
    match e {
        PipelineError::Convert(e) => {
            let color = std::io::stderr().is_terminal();
            let report = e.to_report(name, color);
            if report.eprint((name, ariadne::Source::from(source))).is_err() {
                eprintln!("Conversion error in '{name}': {e}");
            }
        }
        PipelineError::Read(_) | PipelineError::UnterminablePi => {
            eprintln!("Error in '{name}': {e}");
        }
    }
}

fn exit_pipeline_error(e: &PipelineError, name: &str, source: &str) -> ! {
    report_pipeline_error(e, name, source);
    std::process::exit(2);
}

fn exit_config_error<E: std::error::Error>(e: E, path: &Path) -> ! {
    eprintln!("Could not load config '{}': {}", path.display(), e);
    std::process::exit(1);
}

fn exit_io_error(e: std::io::Error, path: &Path) -> ! {
    eprintln!("IO Error in '{}': {}", path.display(), e);
    std::process::exit(1);
}

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{ArgAction, Parser};
use log::{LevelFilter, Metadata, Record};

use mlang::ast::AstNode;
use mlang::parser::parse_program;
use mlang::types::{TypeEnvironment, TypeRegistry, default_environment, determine_type};

#[derive(Parser)]
#[command(name = "mlang")]
#[command(about = "Parse and type-check expressions of the mlang language")]
#[command(version)]
struct Cli {
    /// Source file with `;` separated statements
    #[arg(required_unless_present = "expr", conflicts_with = "expr")]
    source: Option<PathBuf>,

    /// Parse this text instead of a file
    #[arg(short, long)]
    expr: Option<String>,

    /// Print the debug form of every parsed node
    #[arg(long)]
    ast: bool,

    /// Start from an empty environment instead of the builtins
    #[arg(long)]
    no_builtins: bool,

    /// Also resolve every type against the registered data types
    #[arg(long)]
    resolve: bool,

    /// Show parser log output on stderr, repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Writes log records of the library to stderr.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Without `-v` the level comes from `LOG_LEVEL`, defaulting to warnings.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|level| level.parse().ok())
            .unwrap_or(LevelFilter::Warn),
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let input = match (&cli.expr, &cli.source) {
        (Some(expr), _) => expr.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => bail!("nothing to parse"),
    };

    let mut env = if cli.no_builtins {
        TypeEnvironment::empty()
    } else {
        default_environment()
    };

    let nodes = match parse_program(&input, &mut env) {
        Ok(nodes) => nodes,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    let registry = TypeRegistry::with_builtins();
    let mut failed = false;
    for node in &nodes {
        if cli.ast {
            println!("{:#?}", node);
        }

        if let AstNode::Invalid(invalid) = node {
            eprintln!("invalid: {} ({}: {})", invalid.text, invalid.fragment, invalid.reason);
            failed = true;
            continue;
        }

        match determine_type(node, &env) {
            Ok(ty) => {
                println!("{} : {}", node, ty);
                if cli.resolve {
                    match registry.resolve(&ty, &HashMap::new()) {
                        Ok(resolved) => println!("  resolved: {}", resolved),
                        Err(err) => {
                            eprintln!("{}", err);
                            failed = true;
                        }
                    }
                }
            }
            Err(err) => {
                eprintln!("{}", err);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

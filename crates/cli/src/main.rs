mod schema_file;

use anyhow::{Context, Result};
use clap::Parser;
use parseargs::{ParseConfig, ParsedArgs};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable consulted when no trailing arguments are given.
const ARGS_ENV: &str = "PARSEARGS_ARGS";

#[derive(Parser)]
#[command(name = "parseargs")]
#[command(
    version,
    about = "Parse an argument list against a JSON option schema",
    long_about = None
)]
struct Cli {
    /// JSON file mapping option names to declarations (default: ./parseargs.json)
    #[arg(short, long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Accept unknown options and misused values
    #[arg(long)]
    lenient: bool,

    /// Accept positional arguments in strict mode
    #[arg(long, conflicts_with = "no_positionals")]
    allow_positionals: bool,

    /// Reject positional arguments in strict mode
    #[arg(long)]
    no_positionals: bool,

    /// Treat `--no-NAME` as `NAME=false` for boolean options
    #[arg(long)]
    allow_negative: bool,

    /// Include the token trace in the output
    #[arg(long)]
    tokens: bool,

    /// Report parse errors as JSON on stdout
    #[arg(long)]
    json_errors: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Arguments to parse
    #[arg(last = true, value_name = "ARGS")]
    args: Vec<String>,
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let options = schema_file::load_schema(cli.schema.as_deref())?;
    let args = if cli.args.is_empty() {
        args_from_env()
    } else {
        cli.args.clone()
    };

    let mut config = ParseConfig::new(args)
        .strict(!cli.lenient)
        .allow_negative(cli.allow_negative)
        .options(options)
        .tokens(cli.tokens);
    if cli.allow_positionals {
        config = config.allow_positionals(true);
    } else if cli.no_positionals {
        config = config.allow_positionals(false);
    }

    match parseargs::parse(&config) {
        Ok(parsed) => {
            print_parsed(&parsed, cli.pretty)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::debug!(kind = %err.kind(), "parse failed");
            if cli.json_errors {
                let report = serde_json::json!({
                    "code": err.kind().code(),
                    "message": err.to_string(),
                    "index": err.index(),
                });
                println!("{}", render(&report, cli.pretty)?);
            } else {
                eprintln!("error: {err}");
            }
            Ok(ExitCode::from(2))
        }
    }
}

fn args_from_env() -> Vec<String> {
    std::env::var(ARGS_ENV)
        .map(|raw| split_env_args(&raw))
        .unwrap_or_default()
}

/// Split `PARSEARGS_ARGS` on whitespace.
///
/// There is no quoting or escaping: `"a b"` yields `"a` and `b"`, and empty
/// arguments cannot be expressed. Pass such arguments after `--` instead.
fn split_env_args(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

fn print_parsed(parsed: &ParsedArgs, pretty: bool) -> Result<()> {
    println!("{}", render(parsed, pretty)?);
    Ok(())
}

fn render<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    text.context("failed to encode JSON")
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

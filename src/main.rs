// growth-points CLI
// Parse one utterance and print the JSON result

use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use growth_points::{ChildRegistry, CommandParser, ParseResponse, ParserConfig};

const USAGE: &str = "Usage: growth-points [--registry FILE] [--config FILE] <utterance...>";

#[derive(Debug, PartialEq)]
struct CliArgs {
    registry: Option<PathBuf>,
    config: Option<PathBuf>,
    utterance: String,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return Ok(ExitCode::SUCCESS);
    }

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("   {}", USAGE);
            return Ok(ExitCode::from(1));
        }
    };

    let response = run(&cli)?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if response.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}

fn run(cli: &CliArgs) -> Result<ParseResponse> {
    let registry = match &cli.registry {
        Some(path) => ChildRegistry::from_file(path)?,
        None => ChildRegistry::with_defaults(),
    };

    let config = match &cli.config {
        Some(path) => ParserConfig::from_file(path)?,
        None => ParserConfig::default(),
    };

    tracing::debug!(children = registry.count(), utterance = %cli.utterance, "parsing");

    let parser = CommandParser::with_config(config);
    Ok(parser.parse(&cli.utterance, registry.children()).into())
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut registry = None;
    let mut config = None;
    let mut words = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--registry" => {
                let path = iter.next().context("--registry needs a file path")?;
                registry = Some(PathBuf::from(path));
            }
            "--config" => {
                let path = iter.next().context("--config needs a file path")?;
                config = Some(PathBuf::from(path));
            }
            _ => words.push(arg.as_str()),
        }
    }

    if words.is_empty() {
        bail!("missing utterance");
    }

    Ok(CliArgs {
        registry,
        config,
        utterance: words.join(" "),
    })
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use curl2req_core::{FlagSchema, FlagSpec};
use curl2req_request::{
    ClientOptions, RequestDescription, SUPPORTED_FLAGS, TranslateConfig, translate_with,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// CLI output format.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "curl2req")]
#[command(about = "Translate curl command lines into HTTP request descriptions")]
#[command(version)]
struct Cli {
    /// Log translation steps to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Translate a curl command line and print the request description.
    Translate(TranslateArgs),
    /// List the flags of the embedded curl grammar.
    Flags(FlagsArgs),
}

#[derive(Debug, Args)]
struct TranslateArgs {
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// YAML file with translation settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fixed multipart boundary (overrides the config file).
    #[arg(long)]
    boundary: Option<String>,
    /// The curl command line, e.g. `-- curl -d a=b example.com`.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    argv: Vec<String>,
}

#[derive(Debug, Args)]
struct FlagsArgs {
    /// Only list flags with a request translation.
    #[arg(long)]
    supported: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Serialize)]
struct HeaderEntry {
    name: String,
    value: String,
}

/// Printable view of a [`RequestDescription`]; the body is read eagerly.
#[derive(Debug, Serialize)]
struct RequestSummary {
    method: String,
    url: String,
    host: Option<String>,
    headers: Vec<HeaderEntry>,
    body: Option<String>,
    client: ClientOptions,
}

impl RequestSummary {
    fn from_description(request: RequestDescription) -> Result<Self, String> {
        let body = match request.body {
            Some(body) => {
                let bytes = body
                    .read_to_vec()
                    .map_err(|err| format!("Failed to read request body: {err}"))?;
                Some(String::from_utf8_lossy(&bytes).into_owned())
            }
            None => None,
        };

        Ok(Self {
            method: request.method,
            url: request.url.to_string(),
            host: request.host,
            headers: request
                .headers
                .into_iter()
                .map(|(name, value)| HeaderEntry { name, value })
                .collect(),
            body,
            client: request.client,
        })
    }
}

#[derive(Debug, Serialize)]
struct FlagEntry<'a> {
    #[serde(flatten)]
    spec: &'a FlagSpec,
    supported: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Translate(args) => run_translate(args),
        Command::Flags(args) => run_flags(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_translate(args: TranslateArgs) -> Result<(), String> {
    let mut config = match &args.config {
        Some(path) => TranslateConfig::load(path).map_err(|err| err.to_string())?,
        None => TranslateConfig::default(),
    };
    if let Some(boundary) = args.boundary {
        config.multipart_boundary = Some(boundary);
    }

    debug!(args = args.argv.len(), "translating curl command line");
    let request = translate_with(FlagSchema::embedded(), &config, args.argv.as_slice())
        .map_err(|err| err.to_string())?;
    let summary = RequestSummary::from_description(request)?;
    print_output(&summary, args.format)
}

fn run_flags(args: FlagsArgs) -> Result<(), String> {
    let entries: Vec<FlagEntry<'_>> = FlagSchema::embedded()
        .flags()
        .iter()
        .map(|spec| FlagEntry {
            spec,
            supported: is_supported(spec),
        })
        .filter(|entry| !args.supported || entry.supported)
        .collect();
    print_output(&entries, args.format)
}

fn is_supported(spec: &FlagSpec) -> bool {
    [spec.short_alias(), spec.long_alias()]
        .into_iter()
        .flatten()
        .all(|alias| SUPPORTED_FLAGS.contains(&alias.as_str()))
}

fn print_output<T: Serialize>(value: &T, format: CliOutputFormat) -> Result<(), String> {
    let rendered = match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|err| format!("Failed to serialize output: {err}"))?,
        CliOutputFormat::Yaml => serde_yaml::to_string(value)
            .map_err(|err| format!("Failed to serialize output: {err}"))?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

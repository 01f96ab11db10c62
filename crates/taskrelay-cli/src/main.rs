use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use serde::Serialize;
use serde_json::{Map, Value};
use taskrelay_core::domain::{ErrorKind, ImplementationKind, VALID_FIELDS};
use taskrelay_core::impls::{DryRunExecutor, LocatorChain, StaticConnection};
use taskrelay_core::{
    CoreConfig, CoreError, RegistryManifest, ResultEnvelope, RuntimeBuilder, TaskContext,
};
use tracing_subscriber::EnvFilter;

mod actions;

/// Run one task descriptor through the dispatch core and print the result.
///
/// Generic units are not executed; they are reported by a dry-run executor.
#[derive(Debug, Parser)]
#[command(name = "taskrelay", version)]
struct Cli {
    /// Task descriptor: JSON object with `name`, `args`, `register`, `when`.
    #[arg(long)]
    task: PathBuf,

    /// Task variables (JSON object).
    #[arg(long)]
    vars: Option<PathBuf>,

    /// Registry manifest (TOML).
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Core configuration (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Collections searched for short names, in order.
    #[arg(long, value_delimiter = ',')]
    collections: Vec<String>,

    /// Implementation kinds, most preferred first.
    #[arg(long = "kind", value_delimiter = ',', default_value = "module")]
    kinds: Vec<String>,

    /// Run asynchronously with this timeout (0 = synchronous).
    #[arg(long, default_value_t = 0)]
    async_seconds: u64,

    /// The channel supports async execution natively.
    #[arg(long)]
    native_async: bool,

    /// Used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// stdout に出力する JSON
#[derive(Debug, Serialize)]
struct Report<'a> {
    invocation: String,
    result: &'a ResultEnvelope,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            exit_code(&err)
        }
    }
}

fn init_tracing(fallback_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout は JSON 専用
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    let code = match err.downcast_ref::<CoreError>().map(CoreError::kind) {
        Some(ErrorKind::Validation) => 2,
        Some(ErrorKind::Resolution) => 3,
        Some(ErrorKind::Unsupported) => 4,
        Some(ErrorKind::Dispatch) => 5,
        Some(ErrorKind::Evaluation) => 6,
        Some(ErrorKind::Execution) => 7,
        None => 1,
    };
    ExitCode::from(code)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => CoreConfig::from_toml_str(&read(path)?)
            .with_context(|| format!("loading {}", path.display()))?,
        None => CoreConfig::default(),
    };
    let manifest = match &cli.registry {
        Some(path) => RegistryManifest::from_toml_str(&read(path)?)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RegistryManifest::default(),
    };

    let raw = read_object(&cli.task)?;
    check_surface(&raw)?;
    let vars = match &cli.vars {
        Some(path) => read_object(path)?,
        None => Map::new(),
    };

    let kinds = cli.kinds.iter().map(ImplementationKind::new).collect();
    let locator = LocatorChain::from_manifest(&manifest, &config.builtin_collection);
    let runtime = RuntimeBuilder::new()
        .config(config)
        .locator(Arc::new(locator))
        .loader(Arc::new(actions::handler_table(&manifest)))
        .executor(Arc::new(DryRunExecutor::new()))
        .connection(Arc::new(StaticConnection::new(kinds, cli.native_async)))
        .build()?;

    let mut task = TaskContext::new(raw)
        .with_vars(vars)
        .with_collections(cli.collections)
        .with_async(cli.async_seconds);
    let envelope = runtime.execute(&mut task).await?;

    let report = Report {
        invocation: task.invocation_id().to_string(),
        result: &envelope,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_object(path: &Path) -> anyhow::Result<Map<String, Value>> {
    match serde_json::from_str(&read(path)?)
        .with_context(|| format!("parsing {}", path.display()))?
    {
        Value::Object(map) => Ok(map),
        _ => bail!("{} must contain a JSON object", path.display()),
    }
}

/// descriptor のキー検査は core ではなく呼び出し側（ここ）で行う
fn check_surface(raw: &Map<String, Value>) -> anyhow::Result<()> {
    let mut unknown: Vec<&str> = raw
        .keys()
        .map(String::as_str)
        .filter(|k| !VALID_FIELDS.contains(k))
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    unknown.sort_unstable();
    bail!(
        "Invalid options for task: {}. Supported parameters are: {}",
        unknown.join(", "),
        VALID_FIELDS.join(", ")
    )
}

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use wbduck::config::{DEFAULT_BASE_URL, DEFAULT_PER_PAGE};
use wbduck::{ApiConfig, Client, DownloadConfig, Refresh, Warehouse, listing, run_download};

#[derive(Parser, Debug)]
#[command(
    name = "wbduck",
    version,
    about = "Download World Bank indicators into DuckDB and export them as CSV or Parquet"
)]
struct Cli {
    /// World Bank API base URL.
    #[arg(long, global = true, env = "WBDUCK_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,
    /// Request timeout in seconds (no timeout by default).
    #[arg(long, global = true)]
    timeout: Option<u64>,
    /// Log each request and statement.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download an indicator into a DuckDB table (and optionally export it).
    #[command(name = "dl", visible_alias = "download")]
    Download(DownloadArgs),
    /// List the available sources.
    Sources,
    /// List the indicators of a source.
    Indicators(IndicatorsArgs),
}

#[derive(Args, Debug)]
struct DownloadArgs {
    /// Indicator code to download (e.g., NY.GDP.MKTP.CD)
    #[arg(short, long)]
    indicator: String,
    /// Timeframe to download (e.g., 2023:2010)
    #[arg(short, long)]
    timeframe: String,
    /// DuckDB database file. If omitted, an in-memory database is used.
    #[arg(short, long)]
    database: Option<PathBuf>,
    /// Name of the table to store. Defaults to the indicator code with '.' replaced by '_'.
    #[arg(short = 'n', long)]
    table: Option<String>,
    /// Records requested per page.
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    per_page: u32,
    /// Download and rebuild the table even if it already exists.
    #[arg(short, long, default_value_t = false)]
    force: bool,
    /// CSV output file.
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Parquet output file.
    #[arg(long)]
    parquet: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct IndicatorsArgs {
    /// Source ID (see `wbduck sources`)
    #[arg(short, long)]
    source: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let api = ApiConfig {
        base_url: cli.api_url,
        timeout: cli.timeout.map(Duration::from_secs),
        ..ApiConfig::default()
    };
    match cli.cmd {
        Command::Download(args) => cmd_download(api, args),
        Command::Sources => cmd_sources(&api),
        Command::Indicators(args) => cmd_indicators(&api, args),
    }
}

fn cmd_download(api: ApiConfig, args: DownloadArgs) -> Result<()> {
    let api = ApiConfig {
        per_page: args.per_page,
        ..api
    };
    let config = DownloadConfig {
        indicator: args.indicator,
        timeframe: args.timeframe,
        table: args.table,
        database: args.database,
        force: args.force,
        csv: args.csv,
        parquet: args.parquet,
    };

    let client = Client::new(&api).context("build http client")?;
    let mut warehouse = Warehouse::open(config.database.as_deref()).with_context(|| {
        match &config.database {
            Some(p) => format!("open database {}", p.display()),
            None => "open in-memory database".to_string(),
        }
    })?;
    let report = run_download(&client, &mut warehouse, &config)
        .with_context(|| format!("download {}", config.indicator))?;

    match report.refresh {
        Refresh::Skipped => eprintln!("Table {} already exists, kept as is", report.table),
        Refresh::Loaded { records } => {
            eprintln!("Loaded {records} records into {}", report.table)
        }
    }
    for (format, path) in &report.exports {
        eprintln!("Wrote {format} to {}", path.display());
    }
    Ok(())
}

fn cmd_sources(api: &ApiConfig) -> Result<()> {
    let client = Client::new(api).context("build http client")?;
    let sources = client.list_sources().context("fetch sources")?;
    println!("{}", listing::sources_table(&sources));
    Ok(())
}

fn cmd_indicators(api: &ApiConfig, args: IndicatorsArgs) -> Result<()> {
    let client = Client::new(api).context("build http client")?;
    let indicators = client
        .list_indicators(args.source)
        .with_context(|| format!("fetch indicators of source {}", args.source))?;
    println!("{}", listing::indicators_table(&indicators));
    Ok(())
}

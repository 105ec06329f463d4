use clap::Parser;
use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;

use summit_loader::config::{load_config, LoaderConfig};
use summit_loader::errors::{LoaderError, Result};
use summit_loader::resolution::Resolver;
use summit_loader::scrape::HttpPageFetcher;
use summit_loader::search::search_by_name;
use summit_loader::sink::{open_sink, SinkKind};
use summit_loader::sparql::{describe_properties, SparqlClient};

/// Loads mountain records from DBpedia into a sink.
#[derive(Parser)]
#[command(
    name = "summit-loader",
    version,
    about = "Load mountain records from DBpedia into a sink"
)]
struct Cli {
    /// Name of mountain to search for and insert
    #[arg(long, conflicts_with_all = ["uri", "resume_after", "properties"])]
    name: Option<String>,
    /// URI of mountain to insert (-n is ignored if this is specified)
    #[arg(long, conflicts_with_all = ["resume_after", "properties"])]
    uri: Option<String>,
    /// Number of mountains to retrieve (anything less than 0 retrieves all)
    #[arg(short = 'n', default_value_t = 1, allow_negative_numbers = true)]
    n: i64,
    /// Max number of mountain URIs to retrieve at once
    #[arg(long)]
    page_size: Option<usize>,
    /// Skip ahead to this URI before loading
    #[arg(long)]
    resume_after: Option<String>,
    /// Where resolved mountains are written
    #[arg(long, value_enum)]
    sink: Option<SinkKind>,
    /// SQLite database used by the sqlite sink
    #[arg(long)]
    sqlite_path: Option<PathBuf>,
    /// Program and arguments of the process fed by the subprocess sink
    #[arg(long, num_args = 1..)]
    command: Option<Vec<String>>,
    /// With the log sink, include the raw triples of each record
    #[arg(long)]
    log_raw_parsed: bool,
    /// SPARQL endpoint to query
    #[arg(long)]
    endpoint: Option<String>,
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Print the predicates of a URI as JSON and exit
    #[arg(long, conflicts_with = "resume_after")]
    properties: Option<String>,
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Applies command-line overrides on top of the file configuration.
fn build_config(cli: &Cli) -> Result<LoaderConfig> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(endpoint) = &cli.endpoint {
        config.sparql_endpoint = endpoint.clone();
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    if let Some(kind) = cli.sink {
        config.sink.kind = kind;
    }
    if let Some(path) = &cli.sqlite_path {
        config.sink.sqlite_path = path.clone();
    }
    if let Some(command) = &cli.command {
        config.sink.command = command.clone();
    }
    if cli.log_raw_parsed {
        config.sink.log_raw_parsed = true;
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;
    let store = SparqlClient::new(&config);

    if let Some(uri) = &cli.properties {
        let properties = describe_properties(&store, uri)?;
        println!("{}", serde_json::to_string_pretty(&properties)?);
        return Ok(());
    }

    let fetcher = HttpPageFetcher::new(&config);
    let resolver = Resolver::new(&store, &fetcher, &config);
    let mut sink = open_sink(&config.sink)?;

    if let Some(name) = &cli.name {
        let candidates = search_by_name(&store, &config.entity_class, name)?;
        let uri = choose_candidate(candidates, name)?;
        sink.insert_mountain(&resolver.get_mountain(&uri)?)?;
    } else if let Some(uri) = &cli.uri {
        sink.insert_mountain(&resolver.get_mountain(uri)?)?;
    } else {
        let total_wanted = usize::try_from(cli.n).ok();
        let mut inserted = 0usize;
        for record in resolver.enumerate(total_wanted, config.page_size, cli.resume_after.clone()) {
            sink.insert_mountain(&record?)?;
            inserted += 1;
        }
        tracing::info!(
            "Inserted {} mountains into the {} sink",
            inserted,
            config.sink.kind.as_str()
        );
    }

    sink.finish()
}

/// Picks one URI, asking interactively when the search was ambiguous.
fn choose_candidate(candidates: Vec<String>, name: &str) -> Result<String> {
    if candidates.len() == 1 {
        return Ok(candidates.into_iter().next().unwrap_or_default());
    }

    let selection = dialoguer::Select::new()
        .with_prompt("Which one?")
        .items(&candidates)
        .default(0)
        .interact()
        .map_err(|e| LoaderError::Search {
            message: format!("selection failed: {e}"),
            name: name.to_string(),
        })?;

    Ok(candidates[selection].clone())
}

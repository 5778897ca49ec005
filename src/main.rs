use anyhow::Result;
use clap::Parser;
use pubmed_papers::config::{find_config_file, get_config, load_config, Config};
use pubmed_papers::{Pipeline, PubMedClient, SearchQuery, TableWriter};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fetch PubMed papers for a query and export their metadata to CSV, flagging company-affiliated authors
#[derive(Parser, Debug)]
#[command(name = "pubmed-papers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search PubMed and export paper metadata to CSV", long_about = None)]
struct Cli {
    /// PubMed query (full PubMed query syntax is supported)
    query: String,

    /// Output CSV file ("-" writes to standard output) [default: papers.csv]
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Maximum number of papers to retrieve [default: 100]
    #[arg(long, short)]
    max_results: Option<usize>,

    /// Print debug information during execution
    #[arg(long, short)]
    debug: bool,

    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// NCBI API key (overrides NCBI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Contact e-mail sent to NCBI (overrides NCBI_EMAIL)
    #[arg(long)]
    email: Option<String>,
}

impl Cli {
    /// Level for this crate's logs when RUST_LOG is unset
    fn log_level<'a>(&self, config: &'a Config) -> &'a str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "trace"
        } else if self.debug || self.verbose == 1 {
            "debug"
        } else {
            config.logging.level.as_str()
        }
    }

    /// Fold command-line overrides into the loaded configuration
    fn apply_to(&self, config: &mut Config) {
        if let Some(timeout) = self.timeout {
            config.http.timeout_secs = timeout;
        }
        if let Some(api_key) = &self.api_key {
            config.eutils.api_key = Some(api_key.clone());
        }
        if let Some(email) = &self.email {
            config.eutils.email = Some(email.clone());
        }
        if let Some(max_results) = self.max_results {
            config.output.max_results = max_results;
        }
        if let Some(file) = &self.file {
            config.output.default_file = file.clone();
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = match &config_path {
        Some(path) => load_config(path)?,
        None => get_config()?,
    };
    cli.apply_to(&mut config);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("pubmed_papers={}", cli.log_level(&config))),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(path) = &config_path {
        tracing::debug!("Using config file: {}", path.display());
    }

    let query = SearchQuery::new(&cli.query).max_results(config.output.max_results);
    query.validate()?;

    let client = PubMedClient::from_config(&config)?;
    let destination = config.output.default_file.clone();

    // Empty results are not failures; only a write error ends up here
    Pipeline::new(&client, TableWriter::new())
        .run(&query, &destination)
        .await?;

    Ok(())
}

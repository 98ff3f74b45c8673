use std::{
    io::Read,
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mcsinfo::{
    command,
    config::{DEFAULT_JAR, DEFAULT_JAVA, DEFAULT_TIMEOUT_SECS},
    format_server_info, query, Backend, QueryConfig, Report,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Query Minecraft servers and print their status
#[derive(Parser)]
#[command(name = "mcsinfo", version, about, long_about = None)]
struct Cli {
    /// How status payloads are fetched
    #[arg(long, global = true, value_enum, env = "MCSINFO_BACKEND", default_value_t = Backend::Jar)]
    backend: Backend,

    /// Path to the MCServerInfo jar
    #[arg(long, global = true, env = "MCSINFO_JAR", default_value = DEFAULT_JAR)]
    jar: PathBuf,

    /// Java executable used to run the jar
    #[arg(long, global = true, env = "MCSINFO_JAVA", default_value = DEFAULT_JAVA)]
    java: String,

    /// Give up on a query after this many seconds
    #[arg(long, global = true, env = "MCSINFO_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query a server and print its report
    Query {
        /// Server address, `host[:port]`
        address: String,
    },

    /// Format a status payload read from a file or stdin
    Format {
        /// JSON payload file (stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Answer chat commands read line by line from stdin
    Chat,
}

impl Cli {
    fn query_config(&self) -> QueryConfig {
        QueryConfig {
            backend: self.backend,
            jar_path: self.jar.clone(),
            java: self.java.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.query_config();

    match cli.command {
        Commands::Query { address } => {
            let payload = query::query(&address, &config)
                .await
                .with_context(|| format!("failed to query {address}"))?;
            println!("{}", Report::from_payload(&payload));
        }
        Commands::Format { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut text = String::new();
                    std::io::stdin()
                        .read_to_string(&mut text)
                        .context("failed to read payload from stdin")?;
                    text
                }
            };
            let report = format_server_info(text).context("failed to format status payload")?;
            println!("{report}");
        }
        Commands::Chat => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
                if let Some(reply) = command::respond(&line, &config).await {
                    println!("{reply}");
                }
            }
        }
    }

    Ok(())
}

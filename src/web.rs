#![cfg(not(tarpaulin_include))]

use bug_report::app::{self, ServerConfig};
use clap::Parser;

/// Serve the bug report form over HTTP
#[derive(Parser, Debug)]
#[command(name = "website", version)]
struct Args {
    /// Address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Start with an empty bug list instead of the sample entry
    #[arg(long)]
    no_seed: bool,
}

/// Main entry point for the web application
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        seed: !args.no_seed,
    };

    app::run(config).await
}

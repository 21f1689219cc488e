use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Parser)]
#[command(name = "metricgen", version, about = "Deterministic synthetic metric series over HTTP")]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(flatten)]
    pub serve: ServeArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print one series as JSON
    Generate(GenerateArgs),
    /// List known metric ids
    Metrics,
}

/// Server flags. Global, so they are accepted before or after `serve`.
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[arg(long, global = true, env = "METRICGEN_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Reject ranges longer than this many days
    #[arg(long, global = true, env = "METRICGEN_MAX_RANGE_DAYS")]
    pub max_range_days: Option<u32>,
}

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    pub metric: String,

    /// First day, YYYY-MM-DD
    #[arg(long)]
    pub from: String,

    /// Last day (inclusive), YYYY-MM-DD
    #[arg(long)]
    pub to: String,

    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    /// Without a subcommand the server runs.
    pub fn selected(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

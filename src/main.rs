use clap::Parser;
use metricgen::config::{Cli, Command, GenerateArgs, ServeArgs};
use metricgen::error::Result;
use metricgen::registry::MetricRegistry;
use metricgen::server::{self, AppState};
use std::io::Write;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let registry = MetricRegistry::default();
    match cli.selected() {
        Command::Serve => serve(registry, cli.serve).await,
        Command::Generate(args) => generate(registry, args),
        Command::Metrics => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for id in registry.ids() {
                writeln!(out, "{}", id)?;
            }
            Ok(())
        }
    }
}

async fn serve(registry: MetricRegistry, args: ServeArgs) -> Result<()> {
    info!(
        metrics = registry.len(),
        max_range_days = ?args.max_range_days,
        "starting metricgen"
    );
    let state = Arc::new(AppState::new(registry, args.max_range_days));
    server::serve(args.bind, state).await
}

fn generate(registry: MetricRegistry, args: GenerateArgs) -> Result<()> {
    let state = AppState::new(registry, None);
    let series = state.series(&args.metric, &args.from, &args.to)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.pretty {
        serde_json::to_writer_pretty(&mut out, &series)?;
    } else {
        serde_json::to_writer(&mut out, &series)?;
    }
    writeln!(out)?;
    Ok(())
}

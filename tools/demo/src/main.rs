use anyhow::Context;
use clap::Parser;
use serial_pipeline::{SerializedPipeline, sink_fn};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Demonstrates concurrent production with strictly ordered consumption:
/// later items are produced faster than earlier ones, yet the output file
/// receives them in submission order.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// File the serialized sink appends to.
    #[arg(short, long, default_value = "pipeline.out")]
    output: PathBuf,

    /// Number of items to submit.
    #[arg(short, long, default_value_t = 8)]
    items: usize,

    /// Delay step in milliseconds; item i is delayed by (items - 1 - i) steps,
    /// so the last submitted item finishes producing first.
    #[arg(long, default_value_t = 40)]
    delay_step_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    run(Cli::parse()).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut file = std::fs::File::create(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;

    let mut pipeline = SerializedPipeline::new();
    for index in 0..cli.items {
        let delay = Duration::from_millis(cli.delay_step_ms * (cli.items - 1 - index) as u64);
        pipeline.produce(async move {
            tokio::time::sleep(delay).await;
            tracing::info!(index, ?delay, "produced");
            Ok(format!("item {index} (delayed {delay:?})"))
        });
    }

    let consumed = pipeline
        .deliver(sink_fn(move |line: String| {
            writeln!(file, "{line}")?;
            Ok(())
        }))
        .await?;

    tracing::info!(
        consumed,
        output = %cli.output.display(),
        "all items appended in submission order"
    );
    Ok(())
}

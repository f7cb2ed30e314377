use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use exchange_feed::export;
use exchange_feed::recover::backfill;
use exchange_feed::session::SessionClient;
use exchange_feed::store::PacketStore;

#[derive(Debug, Parser)]
#[command(version, about = "Pull the full packet stream from the exchange, backfill gaps, export JSON")]
struct Args {
    /// Exchange server host
    #[arg(long, env = "SERVER_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Exchange server port
    #[arg(long, env = "SERVER_PORT", default_value_t = 3000)]
    port: u16,

    /// Output file path for the sorted packet set
    #[arg(long, env = "OUT_FILE", default_value = "stock_packet.json")]
    out: PathBuf,

    /// Per-read deadline in seconds; unset means block indefinitely
    #[arg(long, env = "READ_TIMEOUT_SECS")]
    read_timeout_secs: Option<u64>,
}

fn main() -> Result<()> {
    let _ = dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let client = SessionClient::new(&args.host, args.port)
        .with_read_timeout(args.read_timeout_secs.map(Duration::from_secs));
    let mut store = PacketStore::new();

    let stream_result = client.stream_all(&mut store);
    match &stream_result {
        Ok(()) => {
            let summary = backfill(&client, &mut store);
            if summary.unrecovered.is_empty() {
                info!(recovered = summary.recovered, "backfill complete");
            } else {
                info!(
                    recovered = summary.recovered,
                    unrecovered = ?summary.unrecovered,
                    "backfill complete with permanently missing packets"
                );
            }
        }
        // Export whatever was collected before the failure; no backfill.
        Err(e) => error!(error = %e, "initial stream failed, exporting partial data"),
    }

    let packets = store.into_sorted();
    export::write_json(&args.out, &packets).with_context(|| format!("write {:?}", args.out))?;
    info!(packets = packets.len(), out = ?args.out, "export complete");

    stream_result.context("initial stream")?;
    Ok(())
}

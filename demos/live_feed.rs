//! # Example: live_feed
//!
//! Runs a feed with short intervals so that scheduled updates, a simulated
//! drop and the automatic reconnect all show up within a few seconds.
//!
//! Shows how to:
//! - Tune [`FeedConfig`] for a fast simulation.
//! - Attach the built-in [`LogWriter`] plus a closure subscriber.
//! - Follow connectivity through [`UpdateFeed::status_changes`].
//! - Trigger a manual refresh.
//!
//! ## Run
//! ```bash
//! RUST_LOG=feedvisor=debug cargo run --example live_feed --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use feedvisor::{
    ConnectionOdds, EmissionInterval, EmissionOdds, FeedConfig, LogWriter, Subscribe, Update,
    UpdateFeed, UpdateKind,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("feedvisor=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cfg = FeedConfig {
        max_updates: 10,
        interval: EmissionInterval::new(Duration::from_millis(200), Duration::from_millis(600)),
        emission: EmissionOdds {
            emit: 0.8,
            escalate: 0.2,
        },
        check_interval: Duration::from_millis(500),
        reconnect_delay: Duration::from_secs(1),
        connection: ConnectionOdds {
            disconnect: 0.15,
            poor: 0.05,
            degrade: 0.1,
        },
        ..FeedConfig::default()
    };

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let feed = UpdateFeed::builder(cfg).with_subscribers(subs).build()?;

    feed.subscribe_to_updates(|u: &Update| {
        if u.is_manual() {
            println!("[view] manual refresh: {}", u.message);
        }
    });

    let mut status = feed.status_changes();
    tokio::spawn(async move {
        while let Ok(change) = status.recv().await {
            println!(
                "[indicator] connected={} quality={:?}",
                change.connected, change.quality
            );
        }
    });

    feed.start()?;
    tokio::time::sleep(Duration::from_secs(3)).await;
    let payload = serde_json::json!({ "source": "demo" });
    feed.trigger_manual_update(UpdateKind::Compliance, Some(payload)).await;
    tokio::time::sleep(Duration::from_secs(3)).await;
    feed.stop();

    println!("retained {} updates (newest first):", feed.updates().len());
    for u in feed.updates() {
        println!("  #{:<4} {:<10} {:?} {}", u.seq, u.kind, u.severity, u.title);
    }
    Ok(())
}

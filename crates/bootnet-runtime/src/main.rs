//! # bootnet
//!
//! Bootstraps a private single-node devnet in the working directory:
//!
//! 1. Create `bootnet/private-chain/`
//! 2. Load `bootnet/boot.key`, generating it on first run
//! 3. Start the discovery listener on UDP 30301 and print its enode URL
//! 4. Create a funded account, print its address and password, then print
//!    the genesis document
//!
//! Logs go to stderr (`RUST_LOG` filters them). Stdout carries only the
//! three result lines, or one diagnostic line on failure. The exit status is
//! zero either way.

use anyhow::Result;
use bootnet_runtime::{BootstrapConfig, Bootstrapper};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Non-cryptographic generator seeded from the current time.
fn time_seeded_rng() -> StdRng {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    StdRng::seed_from_u64(seed)
}

fn init_logging() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = init_logging() {
        eprintln!("could not initialise logging: {}", e);
    }

    let mut rng = time_seeded_rng();
    let bootstrapper = Bootstrapper::new(BootstrapConfig::default());
    let mut stdout = std::io::stdout();

    match bootstrapper.run(&mut rng, &mut stdout).await {
        Ok(report) => {
            report.listener.shutdown().await;
            info!("Bootstrap complete");
        }
        Err(e) => {
            error!("Bootstrap failed at {} stage", e.stage());
            println!("{}", e);
        }
    }
}

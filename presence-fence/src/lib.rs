use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Interval, MissedTickBehavior};

use crate::error::FenceError;
use crate::settings::Settings;
use crate::watcher::Watcher;

pub mod client;
pub mod error;
pub mod settings;
pub mod watcher;

pub async fn run(settings: &Arc<Settings>) -> Result<(), FenceError> {
    let watcher = Watcher::new(settings)?;

    tracing::info!("starting");

    let mut interval = ticker(watcher.loop_time());
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                watcher.tick().await;
            }
            _ = &mut shutdown => {
                tracing::info!("shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// A slow tick pushes the next one back instead of firing the missed ones
/// back to back against the gateway.
fn ticker(period: Duration) -> Interval {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    interval
}

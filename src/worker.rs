// Background polling scheduler: one collection cycle per tick.

use crate::collector::SnapshotCollector;
use crate::runtime::ContainerRuntime;
use crate::sysinfo_repo::HostStatsSource;
use std::sync::Arc;
use tokio::time::{Duration, interval};

pub struct WorkerConfig {
    pub poll_interval_secs: u64,
}

/// Spawns the periodic collection task. Missed ticks are skipped rather than
/// queued, and the collector's own cycle lock drops a tick that fires while a
/// cycle is still in flight, so slow daemon calls never pile up.
pub fn spawn<R: ContainerRuntime + 'static, H: HostStatsSource + 'static>(
    collector: Arc<SnapshotCollector<R, H>>,
    config: WorkerConfig,
    mut shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(config.poll_interval_secs));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    collector.collect().await;
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Scheduler shutting down");
                    break;
                }
            }
        }
    })
}

// Host CPU/RAM stats via sysinfo

use crate::metrics::HostStats;
use std::sync::Arc;
use std::time::Instant;
use sysinfo::System;
use tracing::instrument;

/// Source of host-wide stats for a cycle. Implemented by [`SysinfoRepo`];
/// collector tests substitute a double that can fail on demand.
pub trait HostStatsSource: Send + Sync {
    fn get_host_stats(
        &self,
    ) -> impl std::future::Future<Output = anyhow::Result<HostStats>> + Send;
}

pub struct SysinfoRepo {
    sys: Arc<std::sync::Mutex<System>>,
    last_cpu_refresh: Arc<std::sync::Mutex<Option<(Instant, f64)>>>,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoRepo {
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        Self {
            sys: Arc::new(std::sync::Mutex::new(sys)),
            last_cpu_refresh: Arc::new(std::sync::Mutex::new(None)),
        }
    }

    /// Host-wide CPU %, RAM %, and total RAM for one cycle.
    ///
    /// CPU usage needs two reads spaced by sysinfo's minimum update interval;
    /// the last reading is cached and returned when a cycle fires sooner.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_host_stats"))]
    pub async fn get_host_stats(&self) -> anyhow::Result<HostStats> {
        let sys = self.sys.clone();
        let last_cpu_refresh = self.last_cpu_refresh.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;

            let now = Instant::now();
            let cpu_percent = {
                let mut guard = last_cpu_refresh
                    .lock()
                    .map_err(|e| anyhow::anyhow!("sysinfo cpu cache lock poisoned: {}", e))?;
                match *guard {
                    Some((prev_ts, prev_usage)) => {
                        if now.duration_since(prev_ts) >= sysinfo::MINIMUM_CPU_UPDATE_INTERVAL {
                            sys.refresh_cpu_all();
                            let usage = sys.global_cpu_usage() as f64;
                            *guard = Some((now, usage));
                            usage
                        } else {
                            prev_usage
                        }
                    }
                    None => {
                        // First call establishes the baseline
                        sys.refresh_cpu_all();
                        *guard = Some((now, 0.0));
                        0.0
                    }
                }
            };

            sys.refresh_memory();
            let total = sys.total_memory();
            let available = sys.available_memory();
            let used = total.saturating_sub(available);
            let ram_percent = if total > 0 {
                (used as f64 / total as f64) * 100.0
            } else {
                0.0
            };

            Ok(HostStats {
                cpu_percent: cpu_percent.clamp(0.0, 100.0),
                ram_percent,
                total_ram_bytes: total,
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }
}

impl HostStatsSource for SysinfoRepo {
    async fn get_host_stats(&self) -> anyhow::Result<HostStats> {
        SysinfoRepo::get_host_stats(self).await
    }
}

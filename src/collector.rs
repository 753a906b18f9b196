// One polling cycle: list containers, sample usage, resolve display names,
// aggregate, publish. At most one cycle runs at a time.

use crate::metrics::{self, ResolvedSample};
use crate::models::{SharedSnapshot, Snapshot, shared_snapshot};
use crate::name_store::NameStore;
use crate::runtime::ContainerRuntime;
use crate::sysinfo_repo::HostStatsSource;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub struct SnapshotCollector<R, H> {
    runtime: Arc<R>,
    name_store: Arc<NameStore>,
    host_stats: Arc<H>,
    published: SharedSnapshot,
    cycle_lock: Mutex<()>,
}

impl<R: ContainerRuntime, H: HostStatsSource> SnapshotCollector<R, H> {
    pub fn new(runtime: Arc<R>, name_store: Arc<NameStore>, host_stats: Arc<H>) -> Self {
        Self {
            runtime,
            name_store,
            host_stats,
            published: shared_snapshot(),
            cycle_lock: Mutex::new(()),
        }
    }

    /// Handle to the published snapshot for the HTTP layer.
    pub fn published(&self) -> SharedSnapshot {
        self.published.clone()
    }

    /// The currently published snapshot.
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        self.published.read().await.clone()
    }

    /// Run one collection cycle.
    ///
    /// If the previous cycle is still running the trigger is dropped (the
    /// next tick retries), so concurrent daemon polling is bounded to one in
    /// flight. A failed container list or host-stat read aborts the cycle and
    /// leaves the previous snapshot published; a single container failing
    /// mid-poll is skipped and the cycle continues.
    pub async fn collect(&self) {
        let Ok(_guard) = self.cycle_lock.try_lock() else {
            debug!(
                operation = "collect",
                "previous cycle still running; dropping tick"
            );
            return;
        };

        let handles = match self.runtime.list_running().await {
            Ok(h) => h,
            Err(e) => {
                warn!(
                    error = %e,
                    operation = "list_containers",
                    "container list failed; keeping previous snapshot"
                );
                return;
            }
        };

        let mut resolved = Vec::with_capacity(handles.len());
        for handle in handles {
            let usage = match self.runtime.sample_usage(&handle).await {
                Ok(u) => u,
                Err(e) => {
                    warn!(
                        error = %e,
                        container = %handle.name,
                        operation = "sample_usage",
                        "stats fetch failed; skipping container"
                    );
                    continue;
                }
            };
            let limits = match self.runtime.inspect(&handle).await {
                Ok(l) => l,
                Err(e) => {
                    warn!(
                        error = %e,
                        container = %handle.name,
                        operation = "inspect",
                        "inspect failed; skipping container"
                    );
                    continue;
                }
            };
            let group_key = metrics::group_key(&handle.name).to_string();
            let display_name = self.name_store.resolve(&group_key).await;
            resolved.push(ResolvedSample {
                name: handle.name,
                group_key,
                display_name,
                usage,
                limits,
            });
        }

        let host = match self.host_stats.get_host_stats().await {
            Ok(h) => h,
            Err(e) => {
                warn!(
                    error = %e,
                    operation = "get_host_stats",
                    "host stats failed; keeping previous snapshot"
                );
                return;
            }
        };

        let snapshot = Arc::new(metrics::build_snapshot(&resolved, &host));
        let containers = snapshot.stats.len();
        let groups = snapshot.groups.len();
        // Single swap: readers see either the old or the new snapshot, whole.
        *self.published.write().await = snapshot;
        debug!(containers, groups, operation = "collect", "snapshot published");
    }
}

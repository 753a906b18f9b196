// Wire model: the published snapshot and its pieces

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Per-container metrics for one polling cycle. Display values are rounded
/// to 2 decimals at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerMetrics {
    pub cpu_percent: f64,
    /// Configured CPU limit in cores (HostConfig.NanoCpus), when set.
    pub cpu_limit: Option<f64>,
    pub memory_percent: f64,
    pub memory_usage_mb: f64,
    /// Configured memory limit (HostConfig.Memory), when set.
    pub memory_limit_mb: Option<f64>,
}

/// Aggregate over all containers sharing a group key. Rebuilt from scratch
/// every cycle; totals never carry over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMetrics {
    pub containers: Vec<String>,
    pub total_cpu: f64,
    pub total_memory_mb: f64,
    /// The derived group key before any rename was applied.
    pub original_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub cpu_percent: f64,
    pub ram_percent: f64,
    /// Total host RAM in GB.
    pub total_ram: f64,
    /// Sum of all monitored containers' CPU percents.
    pub docker_cpu_percent: f64,
    /// All monitored containers' memory usage as a share of host RAM.
    pub docker_ram_percent: f64,
}

/// The complete, immutable result of one polling cycle.
///
/// `stats` is keyed by container name, `groups` by display name. The default
/// value (empty maps, zeroed system metrics) is what `/api/stats` serves until
/// the first cycle succeeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub stats: BTreeMap<String, ContainerMetrics>,
    pub groups: BTreeMap<String, GroupMetrics>,
    pub system_stats: SystemMetrics,
}

/// Handle to the currently published snapshot. The collector replaces the
/// inner `Arc` wholesale; readers clone it and never observe a partial update.
pub type SharedSnapshot = Arc<RwLock<Arc<Snapshot>>>;

pub fn shared_snapshot() -> SharedSnapshot {
    Arc::new(RwLock::new(Arc::new(Snapshot::default())))
}

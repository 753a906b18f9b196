// Container runtime seam: what the collector needs from Docker (or a test double)

/// A running container as returned by the runtime's list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    pub id: String,
    /// Container name with the leading `/` stripped.
    pub name: String,
}

/// Point-in-time usage sample. The runtime supplies both the current and the
/// immediately-preceding cumulative counters in a single call, so the
/// collector keeps no state between cycles to compute deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageSample {
    pub cpu_usage: u64,
    pub precpu_usage: u64,
    pub system_cpu_usage: u64,
    pub presystem_cpu_usage: u64,
    pub memory_usage_bytes: u64,
    /// Cgroup memory limit as reported by the stats endpoint; 0 when the
    /// runtime reports none.
    pub memory_limit_bytes: u64,
}

/// Configured resource limits from container inspect metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContainerLimits {
    /// CPU limit in cores, when one is configured.
    pub cpu_cores: Option<f64>,
    /// Memory limit in bytes, when one is configured.
    pub memory_bytes: Option<u64>,
}

/// Abstraction over the container runtime. Implemented by
/// [`crate::docker_repo::DockerRepo`]; collector tests substitute a mock.
pub trait ContainerRuntime: Send + Sync {
    fn list_running(
        &self,
    ) -> impl std::future::Future<Output = anyhow::Result<Vec<ContainerHandle>>> + Send;

    fn inspect(
        &self,
        handle: &ContainerHandle,
    ) -> impl std::future::Future<Output = anyhow::Result<ContainerLimits>> + Send;

    fn sample_usage(
        &self,
        handle: &ContainerHandle,
    ) -> impl std::future::Future<Output = anyhow::Result<UsageSample>> + Send;
}

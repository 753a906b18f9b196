// Extract raw usage counters from a Docker stats API response.

use crate::runtime::UsageSample;
use bollard::models::ContainerStatsResponse;

/// Pull the cumulative CPU counters and memory figures out of a raw stats
/// response. Returns None when either CPU block is missing (first read after
/// start, or a malformed payload); the collector skips that container.
pub(crate) fn extract_usage(s: &ContainerStatsResponse) -> Option<UsageSample> {
    let cpu_stats = s.cpu_stats.as_ref()?;
    let precpu_stats = s.precpu_stats.as_ref()?;

    let cpu_usage = cpu_stats.cpu_usage.as_ref()?;
    let precpu_usage = precpu_stats.cpu_usage.as_ref()?;

    let memory_usage_bytes = s.memory_stats.as_ref().and_then(|m| m.usage).unwrap_or(0);
    let memory_limit_bytes = s.memory_stats.as_ref().and_then(|m| m.limit).unwrap_or(0);

    Some(UsageSample {
        cpu_usage: cpu_usage.total_usage.unwrap_or(0),
        precpu_usage: precpu_usage.total_usage.unwrap_or(0),
        system_cpu_usage: cpu_stats.system_cpu_usage.unwrap_or(0),
        presystem_cpu_usage: precpu_stats.system_cpu_usage.unwrap_or(0),
        memory_usage_bytes,
        memory_limit_bytes,
    })
}

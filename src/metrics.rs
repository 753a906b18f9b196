// Pure metric math: percentages, group-key derivation, snapshot assembly.
// No I/O here; the collector feeds in resolved samples and host stats.

use crate::models::{ContainerMetrics, GroupMetrics, Snapshot, SystemMetrics};
use crate::runtime::{ContainerLimits, UsageSample};
use std::collections::BTreeMap;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Host-wide stats for one cycle, as read from the sysinfo repo.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HostStats {
    pub cpu_percent: f64,
    pub ram_percent: f64,
    pub total_ram_bytes: u64,
}

/// One container's raw sample with its grouping already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSample {
    pub name: String,
    /// Derived key: the segment after the last `-` in the container name.
    pub group_key: String,
    /// Display name from the name store, or `group_key` when unset.
    pub display_name: String,
    pub usage: UsageSample,
    pub limits: ContainerLimits,
}

/// Round to 2 decimals for display. Applied once, after all summation.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// CPU usage as a percentage of the host-wide counter delta.
///
/// The daemon's `system_cpu_usage` counter is already host-normalized, so the
/// quotient is not scaled by the core count. A non-positive system delta
/// (clock skew, first read) yields 0.0.
pub fn cpu_percent(usage: &UsageSample) -> f64 {
    let cpu_delta = usage.cpu_usage as i64 - usage.precpu_usage as i64;
    let system_delta = usage.system_cpu_usage as i64 - usage.presystem_cpu_usage as i64;
    if system_delta <= 0 {
        return 0.0;
    }
    (cpu_delta as f64 / system_delta as f64) * 100.0
}

/// Memory usage as a percentage of the cgroup limit; 0.0 when the runtime
/// reports no limit (rather than dividing by a bogus fallback).
pub fn memory_percent(usage_bytes: u64, limit_bytes: u64) -> f64 {
    if limit_bytes == 0 {
        return 0.0;
    }
    (usage_bytes as f64 / limit_bytes as f64) * 100.0
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Grouping key for a container name: the segment after the last `-`.
/// A separator-free name is its own group key.
pub fn group_key(name: &str) -> &str {
    match name.rfind('-') {
        Some(i) => &name[i + 1..],
        None => name,
    }
}

/// Per-container display metrics from one raw sample.
pub fn container_metrics(usage: &UsageSample, limits: &ContainerLimits) -> ContainerMetrics {
    ContainerMetrics {
        cpu_percent: round2(cpu_percent(usage)),
        cpu_limit: limits.cpu_cores,
        memory_percent: round2(memory_percent(
            usage.memory_usage_bytes,
            usage.memory_limit_bytes,
        )),
        memory_usage_mb: round2(bytes_to_mb(usage.memory_usage_bytes)),
        memory_limit_mb: limits.memory_bytes.map(|b| round2(bytes_to_mb(b))),
    }
}

/// Assemble the full snapshot for one cycle.
///
/// Group totals and the docker-wide aggregates accumulate unrounded
/// per-container values and round once at the end, so rounding error does not
/// compound across group members. Groups are keyed by display name and keep
/// the original key for reference.
pub fn build_snapshot(samples: &[ResolvedSample], host: &HostStats) -> Snapshot {
    let mut stats = BTreeMap::new();
    let mut groups: BTreeMap<String, GroupMetrics> = BTreeMap::new();
    let mut docker_cpu = 0.0f64;
    let mut docker_mem_bytes = 0u64;

    for sample in samples {
        let cpu = cpu_percent(&sample.usage);
        let mem_mb = bytes_to_mb(sample.usage.memory_usage_bytes);

        stats.insert(
            sample.name.clone(),
            container_metrics(&sample.usage, &sample.limits),
        );

        let group = groups
            .entry(sample.display_name.clone())
            .or_insert_with(|| GroupMetrics {
                containers: Vec::new(),
                total_cpu: 0.0,
                total_memory_mb: 0.0,
                original_name: sample.group_key.clone(),
            });
        group.containers.push(sample.name.clone());
        group.total_cpu += cpu;
        group.total_memory_mb += mem_mb;

        docker_cpu += cpu;
        docker_mem_bytes += sample.usage.memory_usage_bytes;
    }

    for group in groups.values_mut() {
        group.containers.sort();
        group.total_cpu = round2(group.total_cpu);
        group.total_memory_mb = round2(group.total_memory_mb);
    }

    let docker_ram_percent = if host.total_ram_bytes > 0 {
        (docker_mem_bytes as f64 / host.total_ram_bytes as f64) * 100.0
    } else {
        0.0
    };

    Snapshot {
        stats,
        groups,
        system_stats: SystemMetrics {
            cpu_percent: round2(host.cpu_percent),
            ram_percent: round2(host.ram_percent),
            total_ram: round2(host.total_ram_bytes as f64 / BYTES_PER_GB),
            docker_cpu_percent: round2(docker_cpu),
            docker_ram_percent: round2(docker_ram_percent),
        },
    }
}

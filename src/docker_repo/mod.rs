// Docker-backed ContainerRuntime via bollard

mod sample;

use crate::runtime::{ContainerHandle, ContainerLimits, ContainerRuntime, UsageSample};
use bollard::query_parameters::{InspectContainerOptions, ListContainersOptions, StatsOptions};
use bollard::{API_DEFAULT_VERSION, Docker};
use futures_util::StreamExt;
use std::collections::HashMap;

const CONNECT_TIMEOUT_SECS: u64 = 120;
const NANOS_PER_CPU: f64 = 1e9;

pub struct DockerRepo {
    docker: Docker,
}

impl DockerRepo {
    /// Connect to the daemon at the configured endpoint. Failure here is a
    /// startup error; the process must not begin polling without a runtime.
    pub fn connect(host: &str) -> anyhow::Result<Self> {
        let docker = if host.starts_with("unix://") {
            Docker::connect_with_unix(host, CONNECT_TIMEOUT_SECS, API_DEFAULT_VERSION)?
        } else if host.starts_with("tcp://") || host.starts_with("http://") {
            Docker::connect_with_http(host, CONNECT_TIMEOUT_SECS, API_DEFAULT_VERSION)?
        } else {
            anyhow::bail!(
                "unsupported docker host '{}' (expected unix:// or tcp://)",
                host
            );
        };
        Ok(Self { docker })
    }
}

impl ContainerRuntime for DockerRepo {
    async fn list_running(&self) -> anyhow::Result<Vec<ContainerHandle>> {
        let mut filters = HashMap::new();
        filters.insert("status".to_string(), vec!["running".to_string()]);

        let options = ListContainersOptions {
            all: false,
            filters: Some(filters),
            ..Default::default()
        };

        let containers = self.docker.list_containers(Some(options)).await?;
        let mut handles = Vec::with_capacity(containers.len());
        for c in &containers {
            let id = c.id.as_ref().cloned().unwrap_or_default();
            let name = c
                .names
                .as_ref()
                .and_then(|n| n.first())
                .cloned()
                .unwrap_or_else(|| id.clone());
            let name = name.trim_start_matches('/').to_string();
            handles.push(ContainerHandle { id, name });
        }
        Ok(handles)
    }

    async fn inspect(&self, handle: &ContainerHandle) -> anyhow::Result<ContainerLimits> {
        let inspect = self
            .docker
            .inspect_container(&handle.id, None::<InspectContainerOptions>)
            .await?;
        let host_config = inspect.host_config;
        let cpu_cores = host_config
            .as_ref()
            .and_then(|h| h.nano_cpus)
            .filter(|&n| n > 0)
            .map(|n| n as f64 / NANOS_PER_CPU);
        let memory_bytes = host_config
            .as_ref()
            .and_then(|h| h.memory)
            .filter(|&m| m > 0)
            .map(|m| m as u64);
        Ok(ContainerLimits {
            cpu_cores,
            memory_bytes,
        })
    }

    async fn sample_usage(&self, handle: &ContainerHandle) -> anyhow::Result<UsageSample> {
        // stream: false returns a single response carrying both the current
        // and the pre-read counters, so no state is kept across cycles.
        let options = StatsOptions {
            stream: false,
            ..Default::default()
        };
        let mut stream = self.docker.stats(&handle.id, Some(options));
        let response = stream
            .next()
            .await
            .ok_or_else(|| anyhow::anyhow!("stats stream ended for container {}", handle.name))??;
        sample::extract_usage(&response)
            .ok_or_else(|| anyhow::anyhow!("malformed stats payload for container {}", handle.name))
    }
}

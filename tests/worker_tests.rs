// Scheduler test: spawn, first tick collects, shutdown stops the task.

use dockboard::collector::SnapshotCollector;
use dockboard::name_store::NameStore;
use dockboard::runtime::{ContainerHandle, ContainerLimits, ContainerRuntime, UsageSample};
use dockboard::sysinfo_repo::SysinfoRepo;
use dockboard::worker::{WorkerConfig, spawn};
use std::sync::Arc;
use tempfile::TempDir;

struct OneContainerRuntime;

impl ContainerRuntime for OneContainerRuntime {
    async fn list_running(&self) -> anyhow::Result<Vec<ContainerHandle>> {
        Ok(vec![ContainerHandle {
            id: "id-0".to_string(),
            name: "app-web".to_string(),
        }])
    }

    async fn inspect(&self, _handle: &ContainerHandle) -> anyhow::Result<ContainerLimits> {
        Ok(ContainerLimits::default())
    }

    async fn sample_usage(&self, _handle: &ContainerHandle) -> anyhow::Result<UsageSample> {
        Ok(UsageSample {
            cpu_usage: 200,
            precpu_usage: 100,
            system_cpu_usage: 2_000,
            presystem_cpu_usage: 1_000,
            memory_usage_bytes: 1024 * 1024,
            memory_limit_bytes: 4 * 1024 * 1024,
        })
    }
}

#[tokio::test]
async fn worker_first_tick_collects_and_shutdown_stops() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("groups.db");
    let store = NameStore::connect(path.to_str().unwrap()).await.unwrap();
    store.init().await.unwrap();

    let collector = Arc::new(SnapshotCollector::new(
        Arc::new(OneContainerRuntime),
        Arc::new(store),
        Arc::new(SysinfoRepo::new()),
    ));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let handle = spawn(
        collector.clone(),
        WorkerConfig {
            poll_interval_secs: 60,
        },
        shutdown_rx,
    );

    // The interval's first tick fires immediately; wait for the publish.
    let deadline = tokio::time::Instant::now() + tokio::time::Duration::from_secs(3);
    loop {
        if !collector.snapshot().await.stats.is_empty() {
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for first cycle"
        );
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    }

    let snap = collector.snapshot().await;
    assert!(snap.stats.contains_key("app-web"));
    assert_eq!(snap.groups["web"].containers, vec!["app-web"]);

    shutdown_tx.send(()).unwrap();
    handle.await.unwrap();
}

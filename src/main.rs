use anyhow::Result;
use dockboard::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    // An unreachable daemon is fatal here; the poller must not start blind.
    let docker_repo = Arc::new(docker_repo::DockerRepo::connect(&app_config.docker.host)?);
    let name_store = Arc::new(name_store::NameStore::connect(&app_config.database.path).await?);
    name_store.init().await?;
    let sysinfo_repo = Arc::new(sysinfo_repo::SysinfoRepo::new());

    let collector = Arc::new(collector::SnapshotCollector::new(
        docker_repo,
        name_store.clone(),
        sysinfo_repo,
    ));

    // First cycle before serving so the first page load has data.
    collector.collect().await;

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let worker_handle = worker::spawn(
        collector.clone(),
        worker::WorkerConfig {
            poll_interval_secs: app_config.monitoring.poll_interval_secs,
        },
        shutdown_rx,
    );

    let app = routes::app(collector.published(), name_store);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            let _ = worker_handle.await;
        }
    }

    Ok(())
}

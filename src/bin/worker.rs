use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;

use cardia::{
    cli::config_path_from_args,
    config::Config,
    logging::init_tracing,
    store::InMemoryStore,
    worker::{HeadlineSummarizer, MaintenanceWorker, NoopExtractor},
};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = config_path_from_args()?;
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    let logging_guard = init_tracing(&config.logging)?;

    let store = Arc::new(InMemoryStore::new());
    let worker = MaintenanceWorker::new(
        store,
        Arc::new(HeadlineSummarizer),
        Arc::new(NoopExtractor),
        config.worker_config(),
    );

    let shutdown = CancellationToken::new();
    let worker_shutdown = shutdown.clone();
    let worker_task = tokio::spawn(async move { worker.run(worker_shutdown).await });

    tracing::info!(
        target: "worker",
        run_id = %logging_guard.run_id(),
        "cardia-worker started"
    );

    let mut sigint =
        signal(SignalKind::interrupt()).context("unable to listen for SIGINT (Ctrl+C)")?;
    let mut sigterm = signal(SignalKind::terminate()).context("unable to listen for SIGTERM")?;

    let signal_name = tokio::select! {
        _ = sigint.recv() => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
    };

    shutdown.cancel();
    worker_task.await.context("worker task join failed")?;

    eprintln!("cardia-worker stopped: received {signal_name}");
    Ok(())
}

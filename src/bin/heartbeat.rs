use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{
    signal::unix::{SignalKind, signal},
    sync::watch,
};
use tokio_util::sync::CancellationToken;

use cardia::{
    actions::ExecutorRegistry,
    cli::config_path_from_args,
    config::Config,
    heartbeat::{HeartbeatRunner, HeartbeatScheduler, SessionSignal},
    logging::init_tracing,
    oracle::{DecisionOraclePort, HttpDecisionOracle, RestingOracle},
    store::InMemoryStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = config_path_from_args()?;
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    let logging_guard = init_tracing(&config.logging)?;

    let store = Arc::new(InMemoryStore::with_state_path(
        config.heartbeat.state_path.clone(),
    ));

    let oracle: Arc<dyn DecisionOraclePort> = match config.http_oracle_config() {
        Some(oracle_config) => Arc::new(HttpDecisionOracle::new(oracle_config)),
        None => {
            tracing::info!(
                target: "heartbeat",
                "no oracle endpoint configured; running with the resting oracle"
            );
            Arc::new(RestingOracle)
        }
    };

    let scheduler = HeartbeatScheduler::new(
        store,
        oracle,
        ExecutorRegistry::with_defaults(),
        config.heartbeat_config(),
    );
    let runner = HeartbeatRunner::new(scheduler, config.runner_config());

    // The sender side stays alive for the process lifetime; a chat surface
    // would publish session transitions through it.
    let (_session_tx, session_rx) = watch::channel(SessionSignal::default());

    let shutdown = CancellationToken::new();
    let runner_shutdown = shutdown.clone();
    let runner_task = tokio::spawn(async move { runner.run(session_rx, runner_shutdown).await });

    tracing::info!(
        target: "heartbeat",
        run_id = %logging_guard.run_id(),
        "cardia-heartbeat started"
    );

    let mut sigint =
        signal(SignalKind::interrupt()).context("unable to listen for SIGINT (Ctrl+C)")?;
    let mut sigterm = signal(SignalKind::terminate()).context("unable to listen for SIGTERM")?;

    let signal_name = tokio::select! {
        _ = sigint.recv() => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
    };

    shutdown.cancel();
    runner_task
        .await
        .context("heartbeat runner task join failed")?
        .context("heartbeat runner exited with error")?;

    eprintln!("cardia-heartbeat stopped: received {signal_name}");
    Ok(())
}

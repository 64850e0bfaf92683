use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use jsonschema::{JSONSchema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Duration;

use crate::{
    heartbeat::{runner::RunnerConfig, scheduler::HeartbeatConfig},
    oracle::http::HttpOracleConfig,
    worker::runner::WorkerConfig,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub energy: EnergyRuntimeConfig,
    #[serde(default)]
    pub heartbeat: HeartbeatRuntimeConfig,
    #[serde(default)]
    pub worker: WorkerRuntimeConfig,
    #[serde(default)]
    pub oracle: OracleRuntimeConfig,
}

fn default_logging_dir() -> PathBuf {
    PathBuf::from("./logs/cardia")
}

fn default_logging_filter() -> String {
    "info".to_string()
}

fn default_logging_rotation() -> LoggingRotation {
    LoggingRotation::Daily
}

fn default_logging_retention_days() -> usize {
    14
}

fn default_enabled_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingRotation {
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default = "default_logging_rotation")]
    pub rotation: LoggingRotation,
    #[serde(default = "default_logging_retention_days")]
    pub retention_days: usize,
    #[serde(default = "default_enabled_true")]
    pub stderr_warn_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_logging_dir(),
            filter: default_logging_filter(),
            rotation: default_logging_rotation(),
            retention_days: default_logging_retention_days(),
            stderr_warn_enabled: true,
        }
    }
}

fn default_energy_max() -> f64 {
    100.0
}

fn default_energy_base_regen() -> f64 {
    10.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyRuntimeConfig {
    #[serde(default = "default_energy_max")]
    pub max: f64,
    #[serde(default = "default_energy_base_regen")]
    pub base_regen: f64,
}

impl Default for EnergyRuntimeConfig {
    fn default() -> Self {
        Self {
            max: default_energy_max(),
            base_regen: default_energy_base_regen(),
        }
    }
}

fn default_heartbeat_interval_secs() -> u64 {
    3_600
}

fn default_oracle_timeout_ms() -> u64 {
    60_000
}

fn default_recent_memory_window() -> usize {
    20
}

fn default_state_path() -> PathBuf {
    PathBuf::from("./state/scheduler.json")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatRuntimeConfig {
    #[serde(default = "default_heartbeat_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_oracle_timeout_ms")]
    pub oracle_timeout_ms: u64,
    #[serde(default = "default_recent_memory_window")]
    pub recent_memory_window: usize,
    #[serde(default = "default_enabled_true")]
    pub run_after_significant_session: bool,
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
}

impl Default for HeartbeatRuntimeConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_heartbeat_interval_secs(),
            oracle_timeout_ms: default_oracle_timeout_ms(),
            recent_memory_window: default_recent_memory_window(),
            run_after_significant_session: true,
            state_path: default_state_path(),
        }
    }
}

fn default_worker_cycle_interval_secs() -> u64 {
    30
}

fn default_worker_error_backoff_secs() -> u64 {
    60
}

fn default_neighborhood_batch() -> usize {
    50
}

fn default_episode_summary_batch() -> usize {
    5
}

fn default_concept_link_batch() -> usize {
    10
}

fn default_cleanup_interval_secs() -> u64 {
    3_600
}

fn default_cache_max_entries() -> usize {
    10_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRuntimeConfig {
    #[serde(default = "default_worker_cycle_interval_secs")]
    pub cycle_interval_secs: u64,
    #[serde(default = "default_worker_error_backoff_secs")]
    pub error_backoff_secs: u64,
    #[serde(default = "default_neighborhood_batch")]
    pub neighborhood_batch: usize,
    #[serde(default = "default_episode_summary_batch")]
    pub episode_summary_batch: usize,
    #[serde(default = "default_concept_link_batch")]
    pub concept_link_batch: usize,
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,
}

impl Default for WorkerRuntimeConfig {
    fn default() -> Self {
        Self {
            cycle_interval_secs: default_worker_cycle_interval_secs(),
            error_backoff_secs: default_worker_error_backoff_secs(),
            neighborhood_batch: default_neighborhood_batch(),
            episode_summary_batch: default_episode_summary_batch(),
            concept_link_batch: default_concept_link_batch(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
            cache_max_entries: default_cache_max_entries(),
        }
    }
}

fn default_oracle_model() -> String {
    "assistant-core".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleRuntimeConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_oracle_model")]
    pub model: String,
    #[serde(default)]
    pub api_key_env: Option<String>,
}

impl Default for OracleRuntimeConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: default_oracle_model(),
            api_key_env: None,
        }
    }
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config_value: Value = json5::from_str(&config_content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        let config_base = config_path.parent().unwrap_or_else(|| Path::new("."));
        let schema_path = resolve_schema_path(config_base, &config_value)?;
        validate_against_schema(&config_value, &schema_path)?;

        let mut config: Config =
            serde_json::from_value(config_value).context("failed to deserialize config")?;

        if !config.heartbeat.state_path.is_absolute() {
            config.heartbeat.state_path = config_base.join(&config.heartbeat.state_path);
        }

        Ok(config)
    }

    pub fn heartbeat_config(&self) -> HeartbeatConfig {
        HeartbeatConfig {
            energy_max: self.energy.max,
            energy_base_regen: self.energy.base_regen,
            recent_memory_window: self.heartbeat.recent_memory_window,
            oracle_timeout: Duration::from_millis(self.heartbeat.oracle_timeout_ms.max(1)),
        }
    }

    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            interval: Duration::from_secs(self.heartbeat.interval_secs.max(1)),
            run_after_significant_session: self.heartbeat.run_after_significant_session,
        }
    }

    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            cycle_interval: Duration::from_secs(self.worker.cycle_interval_secs.max(1)),
            error_backoff: Duration::from_secs(self.worker.error_backoff_secs.max(1)),
            neighborhood_batch: self.worker.neighborhood_batch.max(1),
            episode_summary_batch: self.worker.episode_summary_batch.max(1),
            concept_link_batch: self.worker.concept_link_batch.max(1),
            cleanup_interval: time::Duration::seconds(
                self.worker.cleanup_interval_secs.max(1) as i64
            ),
            cache_max_entries: self.worker.cache_max_entries.max(1),
        }
    }

    pub fn http_oracle_config(&self) -> Option<HttpOracleConfig> {
        self.oracle.endpoint.as_ref().map(|endpoint| HttpOracleConfig {
            endpoint: endpoint.clone(),
            model: self.oracle.model.clone(),
            api_key_env: self.oracle.api_key_env.clone(),
        })
    }
}

fn resolve_schema_path(config_base: &Path, config_value: &Value) -> Result<PathBuf> {
    if let Some(path_text) = config_value.get("$schema").and_then(|value| value.as_str()) {
        let configured = PathBuf::from(path_text);
        if configured.is_absolute() {
            return Ok(configured);
        }
        return Ok(config_base.join(&configured));
    }

    let local_default = config_base.join("cardia.schema.json");
    if local_default.exists() {
        return Ok(local_default);
    }

    Err(anyhow!(
        "unable to resolve schema path: expected $schema in config or cardia.schema.json next to it"
    ))
}

fn validate_against_schema(config_value: &Value, schema_path: &Path) -> Result<()> {
    let schema_content = fs::read_to_string(schema_path)
        .with_context(|| format!("failed to read schema {}", schema_path.display()))?;
    let schema: Value = serde_json::from_str(&schema_content)
        .with_context(|| format!("failed to parse schema {}", schema_path.display()))?;

    let compiled =
        JSONSchema::compile(&schema).map_err(|e| anyhow!("failed to compile schema: {e}"))?;

    match compiled.validate(config_value) {
        Ok(()) => Ok(()),
        Err(errors_iter) => {
            let validation_errors: Vec<ValidationError> = errors_iter.collect();
            let messages: Vec<String> = validation_errors
                .into_iter()
                .map(|error| error.to_string())
                .collect();
            Err(anyhow!("config validation failed: {}", messages.join("; ")))
        }
    }
}

use std::{
    fs,
    io::{BufWriter, Write},
    path::PathBuf,
};

use serde::{Deserialize, Serialize};

use crate::store::{
    error::{StoreError, io_error, serialization_error},
    types::SchedulerState,
};

const PERSISTENCE_VERSION: u64 = 1;

/// Atomic snapshot persistence for the scheduler-state singleton: write to a
/// temp file, fsync, rename over the target.
#[derive(Debug, Clone)]
pub struct StatePersistence {
    path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSchedulerState {
    version: u64,
    state: SchedulerState,
}

impl StatePersistence {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn load(&self) -> Result<Option<SchedulerState>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(io_error(format!(
                    "failed to read scheduler state '{}': {err}",
                    self.path.display()
                )));
            }
        };

        let parsed: PersistedSchedulerState = serde_json::from_str(&content).map_err(|err| {
            serialization_error(format!(
                "failed to parse scheduler state '{}': {err}",
                self.path.display()
            ))
        })?;
        if parsed.version != PERSISTENCE_VERSION {
            return Err(serialization_error(format!(
                "unsupported scheduler state version {} at '{}'",
                parsed.version,
                self.path.display()
            )));
        }

        Ok(Some(parsed.state))
    }

    pub fn save(&self, state: &SchedulerState) -> Result<(), StoreError> {
        let parent = self.path.parent().ok_or_else(|| {
            io_error(format!(
                "scheduler state path '{}' has no parent",
                self.path.display()
            ))
        })?;
        fs::create_dir_all(parent).map_err(|err| {
            io_error(format!(
                "failed to create state directory '{}': {err}",
                parent.display()
            ))
        })?;

        let persisted = PersistedSchedulerState {
            version: PERSISTENCE_VERSION,
            state: state.clone(),
        };

        let tmp_path = self.path.with_extension("tmp");
        let file = fs::File::create(&tmp_path).map_err(|err| {
            io_error(format!(
                "failed to create state temp file '{}': {err}",
                tmp_path.display()
            ))
        })?;
        {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &persisted).map_err(|err| {
                serialization_error(format!(
                    "failed to serialize scheduler state '{}': {err}",
                    tmp_path.display()
                ))
            })?;
            writer.write_all(b"\n").map_err(|err| {
                io_error(format!(
                    "failed to finalize scheduler state '{}': {err}",
                    tmp_path.display()
                ))
            })?;
            writer.flush().map_err(|err| {
                io_error(format!(
                    "failed to flush scheduler state '{}': {err}",
                    tmp_path.display()
                ))
            })?;
        }

        let tmp_file = fs::OpenOptions::new()
            .read(true)
            .open(&tmp_path)
            .map_err(|err| {
                io_error(format!(
                    "failed to reopen state temp file '{}': {err}",
                    tmp_path.display()
                ))
            })?;
        tmp_file.sync_all().map_err(|err| {
            io_error(format!(
                "failed to sync state temp file '{}': {err}",
                tmp_path.display()
            ))
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|err| {
            io_error(format!(
                "failed to replace scheduler state '{}' from '{}': {err}",
                self.path.display(),
                tmp_path.display()
            ))
        })?;

        Ok(())
    }
}

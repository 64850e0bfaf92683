use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::energy::types::EnergyState;

pub type EntityId = String;

/// Singleton persisted scheduler state: the energy pool and the monotonic
/// cycle counter. Owned by the one active scheduler instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerState {
    pub energy: EnergyState,
    pub cycle_counter: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryItem {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// An ordered episodic grouping. Closed episodes without a summary are the
/// worker's summarization backlog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub member_ids: Vec<EntityId>,
    pub closed: bool,
    #[serde(default)]
    pub summary_memory_id: Option<String>,
}

/// Derived neighbor cache for one subject. `neighbors` holds at most 20
/// entries after recompute; `stale` flips on any relationship-changing write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodEntry {
    pub subject_id: EntityId,
    pub neighbors: BTreeMap<EntityId, f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub computed_at: OffsetDateTime,
    pub stale: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptLink {
    pub concept: String,
}

/// Worker health gauge: how far behind each maintenance queue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MaintenanceBacklogGauge {
    pub stale_neighborhoods: usize,
    pub unsummarized_episodes: usize,
    pub unlinked_entities: usize,
}

/// Derives a stable memory id from a canonical seed document, so writing the
/// same derived memory twice is idempotent.
pub fn derive_memory_id(seed: &serde_json::Value) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(canonicalize_json(seed).to_string().as_bytes());
    let digest = hasher.finalize();
    let hex = format!("{:x}", digest);
    format!("mem:{}", &hex[..24])
}

fn canonicalize_json(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut keys = map.keys().cloned().collect::<Vec<_>>();
            keys.sort();
            let mut sorted = serde_json::Map::new();
            for key in keys {
                if let Some(item) = map.get(&key) {
                    sorted.insert(key, canonicalize_json(item));
                }
            }
            serde_json::Value::Object(sorted)
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(canonicalize_json).collect())
        }
        primitive => primitive.clone(),
    }
}

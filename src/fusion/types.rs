use std::collections::BTreeMap;

use crate::store::types::EntityId;

/// One ordered episodic grouping, reduced to the member sequence the temporal
/// signal needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EpisodeTrace {
    pub member_ids: Vec<EntityId>,
}

/// Snapshot of everything the fusion computation reads for one subject. The
/// engine itself is pure: identical inputs produce identical output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FusionInputs {
    /// Explicit relationship edges, as adjacency lists.
    pub edges: BTreeMap<EntityId, Vec<EntityId>>,
    pub subject_embedding: Option<Vec<f32>>,
    /// Embeddings of currently-active entities, candidates for the
    /// similarity signal.
    pub active_embeddings: BTreeMap<EntityId, Vec<f32>>,
    /// Episodes the subject appears in (others are irrelevant to the
    /// temporal signal but harmless).
    pub episodes: Vec<EpisodeTrace>,
}

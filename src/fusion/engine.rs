use std::collections::{BTreeMap, VecDeque};

use time::OffsetDateTime;

use crate::{
    fusion::types::FusionInputs,
    store::types::{EntityId, NeighborhoodEntry},
};

pub const MAX_NEIGHBORS: usize = 20;

const ONE_HOP_WEIGHT: f64 = 1.0;
const TWO_HOP_WEIGHT: f64 = 0.5;
const MAX_HOPS: usize = 2;
const SIMILARITY_TOP_K: usize = 10;
const SIMILARITY_FLOOR: f64 = 0.75;
const SIMILARITY_SCALE: f64 = 0.5;
const SIMILARITY_COMBINED_CAP: f64 = 1.5;
const TEMPORAL_WINDOW: usize = 3;
const TEMPORAL_WEIGHT: f64 = 0.3;

/// Fuses structural, similarity, and temporal signals into one capped
/// weighted neighbor map for a single subject entity.
pub struct NeighborhoodFusionEngine;

impl NeighborhoodFusionEngine {
    /// Recomputes the full entry: fused neighbors, fresh `computed_at`,
    /// staleness cleared.
    pub fn recompute(
        subject_id: &str,
        inputs: &FusionInputs,
        now: OffsetDateTime,
    ) -> NeighborhoodEntry {
        NeighborhoodEntry {
            subject_id: subject_id.to_string(),
            neighbors: Self::fuse(subject_id, inputs),
            computed_at: now,
            stale: false,
        }
    }

    pub fn fuse(subject_id: &str, inputs: &FusionInputs) -> BTreeMap<EntityId, f64> {
        let mut weights: BTreeMap<EntityId, f64> = BTreeMap::new();

        apply_structural(subject_id, inputs, &mut weights);
        apply_similarity(subject_id, inputs, &mut weights);
        apply_temporal(subject_id, inputs, &mut weights);

        truncate_top(weights, MAX_NEIGHBORS)
    }
}

/// Breadth-first over explicit edges, two hops out. First-visit depth wins.
fn apply_structural(
    subject_id: &str,
    inputs: &FusionInputs,
    weights: &mut BTreeMap<EntityId, f64>,
) {
    let mut depth: BTreeMap<&str, usize> = BTreeMap::new();
    depth.insert(subject_id, 0);
    let mut queue: VecDeque<&str> = VecDeque::new();
    queue.push_back(subject_id);

    while let Some(current) = queue.pop_front() {
        let current_depth = depth.get(current).copied().unwrap_or(0);
        if current_depth >= MAX_HOPS {
            continue;
        }
        let Some(adjacent) = inputs.edges.get(current) else {
            continue;
        };
        for neighbor in adjacent {
            if depth.contains_key(neighbor.as_str()) {
                continue;
            }
            depth.insert(neighbor.as_str(), current_depth + 1);
            queue.push_back(neighbor.as_str());

            let contribution = if current_depth + 1 == 1 {
                ONE_HOP_WEIGHT
            } else {
                TWO_HOP_WEIGHT
            };
            *weights.entry(neighbor.clone()).or_insert(0.0) += contribution;
        }
    }
}

/// Top-k cosine neighbors among currently-active entities, floored at 0.75.
/// The combined weight caps at 1.5 so an id that is both a structural and a
/// similarity neighbor is rewarded without dominating the ranking.
fn apply_similarity(
    subject_id: &str,
    inputs: &FusionInputs,
    weights: &mut BTreeMap<EntityId, f64>,
) {
    let Some(subject_embedding) = inputs.subject_embedding.as_ref() else {
        return;
    };

    let mut scored: Vec<(&EntityId, f64)> = inputs
        .active_embeddings
        .iter()
        .filter(|(entity_id, _)| entity_id.as_str() != subject_id)
        .map(|(entity_id, embedding)| (entity_id, cosine(subject_embedding, embedding)))
        .collect();

    scored.sort_by(|lhs, rhs| {
        rhs.1
            .partial_cmp(&lhs.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| lhs.0.cmp(rhs.0))
    });

    for (entity_id, similarity) in scored.into_iter().take(SIMILARITY_TOP_K) {
        if similarity <= SIMILARITY_FLOOR {
            continue;
        }
        let existing = weights.get(entity_id.as_str()).copied().unwrap_or(0.0);
        let combined = (existing + similarity * SIMILARITY_SCALE).min(SIMILARITY_COMBINED_CAP);
        weights.insert(entity_id.clone(), combined);
    }
}

/// +0.3 per co-occurrence within three sequence positions of the subject.
fn apply_temporal(subject_id: &str, inputs: &FusionInputs, weights: &mut BTreeMap<EntityId, f64>) {
    for episode in &inputs.episodes {
        let subject_positions: Vec<usize> = episode
            .member_ids
            .iter()
            .enumerate()
            .filter(|(_, member)| member.as_str() == subject_id)
            .map(|(index, _)| index)
            .collect();
        if subject_positions.is_empty() {
            continue;
        }

        for (index, member) in episode.member_ids.iter().enumerate() {
            if member.as_str() == subject_id {
                continue;
            }
            for subject_index in &subject_positions {
                if subject_index.abs_diff(index) <= TEMPORAL_WINDOW {
                    *weights.entry(member.clone()).or_insert(0.0) += TEMPORAL_WEIGHT;
                }
            }
        }
    }
}

/// Deterministic truncation: weight descending, id ascending on ties.
fn truncate_top(weights: BTreeMap<EntityId, f64>, cap: usize) -> BTreeMap<EntityId, f64> {
    let mut ranked: Vec<(EntityId, f64)> = weights.into_iter().collect();
    ranked.sort_by(|lhs, rhs| {
        rhs.1
            .partial_cmp(&lhs.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| lhs.0.cmp(&rhs.0))
    });
    ranked.into_iter().take(cap).collect()
}

fn cosine(lhs: &[f32], rhs: &[f32]) -> f64 {
    if lhs.is_empty() || lhs.len() != rhs.len() {
        return 0.0;
    }
    let mut dot = 0.0_f64;
    let mut lhs_norm = 0.0_f64;
    let mut rhs_norm = 0.0_f64;
    for (a, b) in lhs.iter().zip(rhs.iter()) {
        dot += f64::from(*a) * f64::from(*b);
        lhs_norm += f64::from(*a) * f64::from(*a);
        rhs_norm += f64::from(*b) * f64::from(*b);
    }
    if lhs_norm == 0.0 || rhs_norm == 0.0 {
        return 0.0;
    }
    dot / (lhs_norm.sqrt() * rhs_norm.sqrt())
}

pub mod engine;
pub mod types;

pub use engine::{MAX_NEIGHBORS, NeighborhoodFusionEngine};
pub use types::{EpisodeTrace, FusionInputs};

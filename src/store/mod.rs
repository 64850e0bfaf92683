pub mod error;
pub mod memory;
pub mod persistence;
pub mod ports;
pub mod types;

pub use error::{StoreError, StoreErrorKind};
pub use memory::InMemoryStore;
pub use persistence::StatePersistence;
pub use ports::{MaintenanceStore, SchedulerStore};
pub use types::{
    ConceptLink, EntityId, Episode, MaintenanceBacklogGauge, MemoryItem, NeighborhoodEntry,
    SchedulerState, derive_memory_id,
};

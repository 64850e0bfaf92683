pub mod error;
pub mod manager;
pub mod review;
pub mod types;

pub use error::{BacklogError, BacklogErrorKind};
pub use manager::GoalBacklog;
pub use review::{
    GoalFlag, GoalRelevanceProbe, GoalValidityProbe, NoopRelevanceProbe, NoopValidityProbe,
    ReviewReport, ReviewSuggestion, review,
};
pub use types::{
    Goal, GoalChange, GoalChangeRequest, GoalId, GoalPriority, GoalSource, NewGoal, ProgressNote,
};

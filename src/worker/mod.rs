pub mod error;
pub mod ports;
pub mod runner;

pub use error::{WorkerError, WorkerErrorKind};
pub use ports::{
    ConceptLinkExtractorPort, EpisodeSummarizerPort, HeadlineSummarizer, NoopExtractor,
};
pub use runner::{MaintenanceWorker, WorkerConfig, WorkerCycleReport};

//! Classification pipeline and its external collaborators

pub mod threshold;
pub mod scoring;
pub mod store;
pub mod classifier;
pub mod relay;

pub use threshold::{ThresholdConfig, DEFAULT_PHISHING_THRESHOLD};
pub use scoring::{OnnxScorer, Scorer};
pub use store::{MemoryResultStore, PgResultStore, ResultStore};
pub use classifier::ClassificationService;
pub use relay::{ChatRelay, OpenAiRelay};

//! State-flow analysis.
//!
//! Classifies tasks into lifecycle states and aggregates the variables,
//! include dependencies and tags that belong to each state.

mod aggregator;
mod classifier;
mod model;

pub use aggregator::{Aggregator, INCLUDE_KEYS};
pub use classifier::{normalize_guard, StateClassifier, StateRule};
pub use model::{AnalysisResult, LifecycleState, StateFlow, TaskRecord, UNNAMED_TASK};

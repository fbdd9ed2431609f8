//! # Roleflow
//!
//! State-flow analyzer for declarative task roles.
//!
//! Roleflow reads a role's task documents, classifies every task by the
//! lifecycle state its `when` guard targets (`present` or `absent`), and
//! reports the tasks, variables and include dependencies of each state as a
//! text tree and a Graphviz diagram.
//!
//! ## Quick Start
//!
//! ```bash
//! # Analyze a role; writes influxdb_role_analysis.txt and influxdb_role_state_flow.svg
//! roleflow roles/influxdb
//!
//! # Print the aggregated analysis as JSON instead of the text tree
//! roleflow --format json roles/influxdb
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::uninlined_format_args)]

pub mod analysis;
pub mod app;
pub mod core;
pub mod loader;
pub mod render;

// Re-export commonly used types
pub use crate::analysis::{Aggregator, AnalysisResult, LifecycleState, StateClassifier, StateFlow, TaskRecord};
pub use crate::app::{App, RunOutcome};
pub use crate::core::{AnalyzerError, AnalyzerResult, Config};
pub use crate::loader::{RoleDocuments, RoleLoader, TaskDocument};
pub use crate::render::{render_graph, render_text, DotGraph, GraphSink};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "roleflow";

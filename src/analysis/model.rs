//! State-flow data structures.
//!
//! Defines the records produced by classification and the per-state
//! aggregates consumed by the renderers.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name given to tasks that declare no `name`.
pub const UNNAMED_TASK: &str = "unnamed task";

/// Lifecycle state a task is presumed to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// The managed resource should exist
    Present,

    /// The managed resource should be removed
    Absent,

    /// Guard did not match any state rule; never stored in an aggregate
    Unknown,
}

impl LifecycleState {
    /// States that own a [`StateFlow`], in report order.
    pub const TRACKED: [Self; 2] = [Self::Present, Self::Absent];

    /// Lowercase name used in reports and graph identifiers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Unknown => "unknown",
        }
    }

    /// Whether tasks in this state are aggregated.
    pub fn is_tracked(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task name, or [`UNNAMED_TASK`]
    pub name: String,

    /// Normalized `when` expressions in declaration order
    pub guard_expressions: Vec<String>,

    /// File name of the document that declared the task
    pub source_file: String,

    /// Tags declared on the task
    pub tags: BTreeSet<String>,
}

impl TaskRecord {
    /// Create a record with no guards or tags.
    pub fn new(name: impl Into<String>, source_file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guard_expressions: Vec::new(),
            source_file: source_file.into(),
            tags: BTreeSet::new(),
        }
    }

    /// Set the guard expressions.
    #[must_use]
    pub fn with_guards(mut self, guards: Vec<String>) -> Self {
        self.guard_expressions = guards;
        self
    }

    /// Set the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }
}

/// Everything associated with one lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFlow {
    /// The state this flow describes
    pub state: LifecycleState,

    /// Tasks in encounter order across documents
    pub tasks: Vec<TaskRecord>,

    /// Variables referenced by the state's tasks
    pub variables: BTreeSet<String>,

    /// Documents pulled in by the state's include actions
    pub dependencies: BTreeSet<String>,
}

impl StateFlow {
    /// Create an empty flow.
    pub fn new(state: LifecycleState) -> Self {
        Self { state, tasks: Vec::new(), variables: BTreeSet::new(), dependencies: BTreeSet::new() }
    }

    /// Task names in encounter order.
    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.name.as_str()).collect()
    }

    /// Whether nothing was aggregated into this flow.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.variables.is_empty() && self.dependencies.is_empty()
    }
}

/// Terminal artifact of an analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Name of the analyzed role (its directory name)
    pub role_name: String,

    /// Flow for `present`
    pub present: StateFlow,

    /// Flow for `absent`
    pub absent: StateFlow,

    /// Tags declared by any task, classified or not
    pub tags: BTreeSet<String>,

    /// Handler names declared by the role
    pub handlers: BTreeSet<String>,
}

impl AnalysisResult {
    /// Create an empty result for a role.
    pub fn new(role_name: impl Into<String>) -> Self {
        Self {
            role_name: role_name.into(),
            present: StateFlow::new(LifecycleState::Present),
            absent: StateFlow::new(LifecycleState::Absent),
            tags: BTreeSet::new(),
            handlers: BTreeSet::new(),
        }
    }

    /// Flow for a tracked state.
    pub fn flow(&self, state: LifecycleState) -> Option<&StateFlow> {
        match state {
            LifecycleState::Present => Some(&self.present),
            LifecycleState::Absent => Some(&self.absent),
            LifecycleState::Unknown => None,
        }
    }

    /// Mutable flow for a tracked state.
    pub fn flow_mut(&mut self, state: LifecycleState) -> Option<&mut StateFlow> {
        match state {
            LifecycleState::Present => Some(&mut self.present),
            LifecycleState::Absent => Some(&mut self.absent),
            LifecycleState::Unknown => None,
        }
    }

    /// Both flows in report order.
    pub fn flows(&self) -> [&StateFlow; 2] {
        [&self.present, &self.absent]
    }

    /// Total number of classified tasks.
    pub fn task_count(&self) -> usize {
        self.present.tasks.len() + self.absent.tasks.len()
    }
}

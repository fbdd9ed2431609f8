//! Cross-reference aggregation.
//!
//! Walks the loaded documents once and builds the [`AnalysisResult`].

use serde_yaml::Value;

use super::classifier::{normalize_guard, StateClassifier};
use super::model::{AnalysisResult, LifecycleState, TaskRecord, UNNAMED_TASK};
use crate::loader::{scalar_text, RoleDocuments, TaskDocument};

/// Task keys whose string value names another task document.
pub const INCLUDE_KEYS: [&str; 4] = [
    "include_tasks",
    "import_tasks",
    "ansible.builtin.include_tasks",
    "ansible.builtin.import_tasks",
];

/// Builds per-state flows from task documents.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    classifier: StateClassifier,
}

impl Aggregator {
    /// Create an aggregator with the given classifier.
    pub fn new(classifier: StateClassifier) -> Self {
        Self { classifier }
    }

    /// Aggregate every document of a role, primary first.
    pub fn aggregate(&self, documents: &RoleDocuments) -> AnalysisResult {
        let mut result = AnalysisResult::new(documents.role_name.clone());
        result.handlers.extend(documents.handlers.iter().cloned());

        for document in documents.documents() {
            self.aggregate_document(&mut result, document, &documents.variable_registry);
        }

        tracing::debug!(
            prefix = self.classifier.variable_prefix(),
            present = result.present.tasks.len(),
            absent = result.absent.tasks.len(),
            tags = result.tags.len(),
            "Aggregated role"
        );

        result
    }

    /// Fold one document's tasks into `result`.
    pub fn aggregate_document(
        &self,
        result: &mut AnalysisResult,
        document: &TaskDocument,
        registry: &[String],
    ) {
        let mut classified = 0;
        for task in &document.tasks {
            if !task.is_mapping() {
                continue;
            }
            if self.aggregate_task(result, task, &document.file_name, registry).is_tracked() {
                classified += 1;
            }
        }

        tracing::debug!(
            file = %document.file_name,
            path = %document.path.display(),
            tasks = document.tasks.len(),
            classified,
            "Aggregated task document"
        );
    }

    /// Fold one task mapping into `result`, returning its state.
    fn aggregate_task(
        &self,
        result: &mut AnalysisResult,
        task: &Value,
        source_file: &str,
        registry: &[String],
    ) -> LifecycleState {
        let guards = normalize_guard(task.get("when"));
        let state = self.classifier.classify(&guards);
        let tags = string_list(task.get("tags"));

        result.tags.extend(tags.iter().cloned());

        let Some(flow) = result.flow_mut(state) else {
            return state;
        };

        flow.variables.extend(self.classifier.guard_variables(&guards).map(str::to_string));

        if let Some(target) = include_target(task) {
            flow.dependencies.insert(target.to_string());
        }

        if !registry.is_empty() {
            let text = task_text(task, source_file);
            flow.variables.extend(registry.iter().filter(|var| text.contains(var.as_str())).cloned());
        }

        let name = task.get("name").and_then(scalar_text).unwrap_or_else(|| UNNAMED_TASK.to_string());
        flow.tasks.push(TaskRecord::new(name, source_file).with_guards(guards).with_tags(tags));

        state
    }
}

/// Plain-string target of the task's include action, if any.
fn include_target(task: &Value) -> Option<&str> {
    INCLUDE_KEYS.iter().find_map(|key| task.get(*key).and_then(Value::as_str))
}

/// Serialized task body for the registry scan; empty when it cannot be rendered.
fn task_text(task: &Value, source_file: &str) -> String {
    match serde_yaml::to_string(task) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(file = %source_file, error = %e, "Failed to serialize task for variable scan");
            String::new()
        }
    }
}

/// A string or list-of-strings field as owned strings.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Sequence(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(other) => scalar_text(other).into_iter().collect(),
        None => Vec::new(),
    }
}

//! Role document loader.
//!
//! Reads the task documents of a role directory (`tasks/main.yml` plus every
//! sibling task file), the defaults variable registry, and handler names.
//! Missing documents are never errors; a malformed primary document is.

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use walkdir::WalkDir;

use crate::core::{AnalyzerError, AnalyzerResult};

/// Directory holding task documents.
pub const TASKS_DIR: &str = "tasks";

/// Directory holding the defaults document.
pub const DEFAULTS_DIR: &str = "defaults";

/// Directory holding handler documents.
pub const HANDLERS_DIR: &str = "handlers";

/// Candidate file names of the primary document of each directory.
const MAIN_CANDIDATES: [&str; 2] = ["main.yml", "main.yaml"];

/// A parsed task document.
#[derive(Debug, Clone)]
pub struct TaskDocument {
    /// File name shown in reports (e.g. `main.yml`)
    pub file_name: String,

    /// Full path of the document
    pub path: PathBuf,

    /// Task nodes in declaration order
    pub tasks: Vec<Value>,
}

/// Every input the aggregator needs from a role.
#[derive(Debug, Clone, Default)]
pub struct RoleDocuments {
    /// Role name (directory name)
    pub role_name: String,

    /// `tasks/main.yml`, if present
    pub primary: Option<TaskDocument>,

    /// Other task documents in lexical file-name order
    pub siblings: Vec<TaskDocument>,

    /// Variable names declared in `defaults/main.yml`
    pub variable_registry: Vec<String>,

    /// Handler names declared in `handlers/main.yml`
    pub handlers: Vec<String>,
}

impl RoleDocuments {
    /// Documents in visiting order: the primary first, then siblings.
    pub fn documents(&self) -> impl Iterator<Item = &TaskDocument> {
        self.primary.iter().chain(self.siblings.iter())
    }
}

/// Loads the documents of one role directory.
pub struct RoleLoader {
    /// Role root directory
    root: PathBuf,
}

impl RoleLoader {
    /// Create a loader for the given role directory.
    pub fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf() }
    }

    /// Load every document of the role.
    ///
    /// Only a malformed primary task document is fatal.
    pub fn load(&self) -> AnalyzerResult<RoleDocuments> {
        let primary = self.load_primary()?;
        let siblings = self.load_siblings();
        let variable_registry = self.load_variable_registry();
        let handlers = self.load_handlers();

        tracing::debug!(
            role = %self.root.display(),
            siblings = siblings.len(),
            variables = variable_registry.len(),
            handlers = handlers.len(),
            "Loaded role documents"
        );

        Ok(RoleDocuments { role_name: self.role_name(), primary, siblings, variable_registry, handlers })
    }

    /// Role name derived from the directory name.
    pub fn role_name(&self) -> String {
        let resolved = self.root.canonicalize().unwrap_or_else(|_| self.root.clone());
        resolved
            .file_name()
            .and_then(|n| n.to_str())
            .map_or_else(|| "role".to_string(), ToString::to_string)
    }

    /// Load the primary task document.
    pub fn load_primary(&self) -> AnalyzerResult<Option<TaskDocument>> {
        let Some(path) = find_main(&self.root.join(TASKS_DIR)) else {
            tracing::debug!(role = %self.root.display(), "No primary task document");
            return Ok(None);
        };

        load_task_document(&path).inspect_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to load primary task document");
        })
    }

    /// Load sibling task documents, skipping any that fail to parse.
    pub fn load_siblings(&self) -> Vec<TaskDocument> {
        let tasks_dir = self.root.join(TASKS_DIR);
        if !tasks_dir.is_dir() {
            return Vec::new();
        }

        let mut documents = Vec::new();
        for entry in WalkDir::new(&tasks_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if !entry.file_type().is_file() || !is_yaml(path) || is_main(path) {
                continue;
            }

            match load_task_document(path) {
                Ok(Some(document)) => documents.push(document),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping task document");
                }
            }
        }

        documents
    }

    /// Variable names declared in the defaults document.
    pub fn load_variable_registry(&self) -> Vec<String> {
        let Some(path) = find_main(&self.root.join(DEFAULTS_DIR)) else {
            return Vec::new();
        };

        match read_yaml(&path) {
            Ok(Value::Mapping(map)) => map.keys().filter_map(scalar_text).collect(),
            Ok(Value::Null) => Vec::new(),
            Ok(_) => {
                tracing::warn!(path = %path.display(), "Defaults document is not a mapping");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring defaults document");
                Vec::new()
            }
        }
    }

    /// Handler names declared in the handlers document.
    pub fn load_handlers(&self) -> Vec<String> {
        let Some(path) = find_main(&self.root.join(HANDLERS_DIR)) else {
            return Vec::new();
        };

        match load_task_document(&path) {
            Ok(Some(document)) => document
                .tasks
                .iter()
                .filter_map(|handler| handler.get("name").and_then(scalar_text))
                .collect(),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring handlers document");
                Vec::new()
            }
        }
    }
}

/// Load a task document from disk.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_task_document(path: &Path) -> AnalyzerResult<Option<TaskDocument>> {
    if !path.exists() {
        return Ok(None);
    }

    let value = read_yaml(path)?;
    let file_name =
        path.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string();

    Ok(Some(TaskDocument { file_name, path: path.to_path_buf(), tasks: task_nodes(path, value) }))
}

/// Parse a task document from a string.
pub fn parse_task_document(file_name: &str, content: &str) -> AnalyzerResult<TaskDocument> {
    let path = PathBuf::from(file_name);
    let value: Value = serde_yaml::from_str(content)
        .map_err(|source| AnalyzerError::Parse { path: path.clone(), source })?;

    Ok(TaskDocument { file_name: file_name.to_string(), tasks: task_nodes(&path, value), path })
}

/// Text of a scalar YAML value.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn read_yaml(path: &Path) -> AnalyzerResult<Value> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| AnalyzerError::Read { path: path.to_path_buf(), source })?;
    serde_yaml::from_str(&content)
        .map_err(|source| AnalyzerError::Parse { path: path.to_path_buf(), source })
}

/// Top-level task nodes of a document; anything but a sequence has none.
fn task_nodes(path: &Path, value: Value) -> Vec<Value> {
    match value {
        Value::Sequence(tasks) => tasks,
        Value::Null => Vec::new(),
        _ => {
            tracing::warn!(path = %path.display(), "Task document is not a list of tasks");
            Vec::new()
        }
    }
}

fn find_main(dir: &Path) -> Option<PathBuf> {
    MAIN_CANDIDATES.iter().map(|name| dir.join(name)).find(|path| path.is_file())
}

fn is_yaml(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "yml" || e == "yaml")
}

fn is_main(path: &Path) -> bool {
    path.file_stem().is_some_and(|s| s == "main")
}

//! State-flow graph rendering.
//!
//! [`render_graph`] describes the analysis as clusters, nodes and edges on a
//! [`GraphSink`]. [`DotGraph`] is the Graphviz-backed sink.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command as ProcessCommand, Stdio};

use crate::analysis::{AnalysisResult, StateFlow};
use crate::core::{AnalyzerError, AnalyzerResult};

/// Format that writes the DOT source without invoking Graphviz.
pub const DOT_SOURCE_FORMAT: &str = "dot";

/// Receiver of a graph description.
pub trait GraphSink {
    /// Declare a cluster; nodes and edges name the cluster they belong to.
    fn cluster(&mut self, id: &str, label: &str);

    /// Declare a node inside a cluster.
    fn node(&mut self, cluster: &str, id: &str, label: &str);

    /// Declare a directed edge inside a cluster.
    fn edge(&mut self, cluster: &str, from: &str, to: &str);

    /// Produce the artifact for `output_stem`, returning the written path.
    fn finish(&mut self, output_stem: &Path) -> AnalyzerResult<PathBuf>;
}

/// Describe `result` on `sink` and finalize it.
///
/// Each state gets a cluster holding one node per variable and a chain of
/// task nodes in declaration order. Task node ids are `<state>_<name>`, so
/// same-named tasks within a state share a node.
pub fn render_graph(
    result: &AnalysisResult,
    sink: &mut dyn GraphSink,
    output_stem: &Path,
) -> AnalyzerResult<PathBuf> {
    for flow in result.flows() {
        describe_flow(sink, flow);
    }

    sink.finish(output_stem)
}

fn describe_flow(sink: &mut dyn GraphSink, flow: &StateFlow) {
    let state = flow.state.as_str();
    let cluster = format!("cluster_{state}");
    sink.cluster(&cluster, &format!("State: {state}"));

    for var in &flow.variables {
        sink.node(&cluster, &format!("{state}_{var}"), var);
    }

    let mut prev_task: Option<String> = None;
    for task in &flow.tasks {
        let task_id = format!("{state}_{}", task.name);
        sink.node(&cluster, &task_id, &task.name);
        if let Some(prev) = &prev_task {
            sink.edge(&cluster, prev, &task_id);
        }
        prev_task = Some(task_id);
    }
}

/// A cluster collected by [`DotGraph`].
#[derive(Debug, Clone, Default)]
struct DotCluster {
    id: String,
    label: String,
    nodes: Vec<(String, String)>,
    edges: Vec<(String, String)>,
}

/// Graphviz sink: collects DOT statements and renders them with `dot`.
#[derive(Debug, Clone)]
pub struct DotGraph {
    /// Comment emitted at the top of the DOT source
    comment: String,

    /// Graphviz executable
    command: String,

    /// Output format passed as `-T<format>`
    format: String,

    clusters: Vec<DotCluster>,
}

impl DotGraph {
    /// Create a sink rendering SVG through `dot`.
    pub fn new(comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
            command: "dot".to_string(),
            format: "svg".to_string(),
            clusters: Vec::new(),
        }
    }

    /// Set the Graphviz executable.
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Set the output format.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// The DOT source for everything declared so far.
    pub fn to_dot(&self) -> String {
        let mut dot = String::new();
        let _ = writeln!(dot, "// {}", self.comment);
        dot.push_str("digraph {\n");
        dot.push_str("\trankdir=LR\n");

        for cluster in &self.clusters {
            let _ = writeln!(dot, "\tsubgraph {} {{", quote(&cluster.id));
            let _ = writeln!(dot, "\t\tlabel={}", quote(&cluster.label));
            for (id, label) in &cluster.nodes {
                let _ = writeln!(dot, "\t\t{} [label={}]", quote(id), quote(label));
            }
            for (from, to) in &cluster.edges {
                let _ = writeln!(dot, "\t\t{} -> {}", quote(from), quote(to));
            }
            dot.push_str("\t}\n");
        }

        dot.push_str("}\n");
        dot
    }

    fn cluster_mut(&mut self, id: &str) -> &mut DotCluster {
        let index = match self.clusters.iter().position(|c| c.id == id) {
            Some(index) => index,
            None => {
                self.clusters.push(DotCluster { id: id.to_string(), ..DotCluster::default() });
                self.clusters.len() - 1
            }
        };
        &mut self.clusters[index]
    }

    /// Pipe the DOT source through Graphviz into `output`.
    fn run_graphviz(&self, source: &str, output: &Path) -> AnalyzerResult<()> {
        let mut child = ProcessCommand::new(&self.command)
            .arg(format!("-T{}", self.format))
            .arg("-o")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| AnalyzerError::GraphBackend { command: self.command.clone(), source })?;

        // stdin is fed from its own thread so stderr keeps draining
        let stdin = child.stdin.take();
        let (written, waited) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(source.as_bytes()),
                None => Ok(()),
            });
            let waited = child.wait_with_output();
            (writer.join(), waited)
        });

        let output_status = waited.map_err(|source| AnalyzerError::GraphBackend {
            command: self.command.clone(),
            source,
        })?;

        if !output_status.status.success() {
            let stderr = String::from_utf8_lossy(&output_status.stderr);
            tracing::error!(
                command = %self.command,
                status = %output_status.status,
                stderr = %stderr.trim(),
                "Graphviz failed"
            );
            return Err(AnalyzerError::Render(format!(
                "{} exited with {}: {}",
                self.command,
                output_status.status,
                stderr.trim()
            )));
        }

        match written {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(AnalyzerError::Render(format!(
                "{} did not read the whole graph: {e}",
                self.command
            ))),
            Err(_) => Err(AnalyzerError::Render("graph writer thread panicked".to_string())),
        }
    }
}

impl GraphSink for DotGraph {
    fn cluster(&mut self, id: &str, label: &str) {
        self.cluster_mut(id).label = label.to_string();
    }

    fn node(&mut self, cluster: &str, id: &str, label: &str) {
        self.cluster_mut(cluster).nodes.push((id.to_string(), label.to_string()));
    }

    fn edge(&mut self, cluster: &str, from: &str, to: &str) {
        self.cluster_mut(cluster).edges.push((from.to_string(), to.to_string()));
    }

    fn finish(&mut self, output_stem: &Path) -> AnalyzerResult<PathBuf> {
        let output = output_stem.with_extension(&self.format);
        let source = self.to_dot();

        if self.format == DOT_SOURCE_FORMAT {
            std::fs::write(&output, source)
                .map_err(|source| AnalyzerError::Write { path: output.clone(), source })?;
        } else {
            self.run_graphviz(&source, &output)?;
        }

        tracing::debug!(path = %output.display(), format = %self.format, "Rendered state-flow graph");
        Ok(output)
    }
}

/// Quote a DOT identifier.
fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

//! Analysis pipeline.
//!
//! The `App` struct ties configuration, the document loader, the aggregator
//! and both renderers into one sequential run:
//! load, classify and aggregate, write the report, render the graph.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::analysis::{Aggregator, AnalysisResult, StateClassifier};
use crate::core::{AnalyzerError, AnalyzerResult, Config};
use crate::loader::RoleLoader;
use crate::render::{render_graph, render_text, DotGraph, GraphSink};

/// Comment written at the top of the generated DOT source.
pub const GRAPH_COMMENT: &str = "Role State Flow";

/// Artifacts of a completed run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The aggregated analysis
    pub analysis: AnalysisResult,

    /// Rendered text report
    pub report: String,

    /// Where the report was written
    pub report_path: PathBuf,

    /// Where the graph was written
    pub graph_path: PathBuf,
}

/// Role analyzer application.
#[derive(Debug, Clone)]
pub struct App {
    /// Role directory under analysis
    pub role_path: PathBuf,

    /// Application configuration
    pub config: Config,
}

impl App {
    /// Create an app for a role directory.
    pub fn new(role_path: impl Into<PathBuf>, config: Config) -> Self {
        Self { role_path: role_path.into(), config }
    }

    /// Classifier built from the analysis settings.
    pub fn classifier(&self) -> StateClassifier {
        StateClassifier::new(
            &self.config.analysis.state_variable,
            self.config.analysis.variable_prefix.clone(),
        )
    }

    /// Graph sink built from the output settings.
    pub fn graph_sink(&self) -> DotGraph {
        DotGraph::new(GRAPH_COMMENT)
            .with_command(self.config.output.dot_command.clone())
            .with_format(self.config.output.graph_format.clone())
    }

    /// Load and aggregate the role without writing anything.
    pub fn analyze(&self) -> AnalyzerResult<AnalysisResult> {
        tracing::info!(role = %self.role_path.display(), "Analyzing role");

        let documents = RoleLoader::new(&self.role_path).load().inspect_err(|e| {
            tracing::error!(path = ?e.path(), parse = e.is_parse_error(), error = %e, "Failed to load role");
        })?;
        Ok(Aggregator::new(self.classifier()).aggregate(&documents))
    }

    /// Run the whole pipeline with the configured graph sink.
    pub fn run(&self) -> anyhow::Result<RunOutcome> {
        let mut sink = self.graph_sink();
        self.run_with_sink(&mut sink)
    }

    /// Run the whole pipeline, describing the graph on `sink`.
    pub fn run_with_sink(&self, sink: &mut dyn GraphSink) -> anyhow::Result<RunOutcome> {
        let analysis = self
            .analyze()
            .with_context(|| format!("Error analyzing role at {}", self.role_path.display()))?;

        let report = render_text(&analysis);

        let output = &self.config.output;
        if !output.directory.as_os_str().is_empty() {
            std::fs::create_dir_all(&output.directory).with_context(|| {
                format!("Failed to create output directory {}", output.directory.display())
            })?;
        }

        let report_path = output.report_path();
        write_report(&report_path, &report)?;

        let graph_path = render_graph(&analysis, sink, &output.graph_stem()).inspect_err(|e| {
            tracing::error!(error = %e, "Failed to render state-flow graph");
        })?;

        Ok(RunOutcome { analysis, report, report_path, graph_path })
    }
}

fn write_report(path: &Path, report: &str) -> AnalyzerResult<()> {
    std::fs::write(path, report)
        .map_err(|source| AnalyzerError::Write { path: path.to_path_buf(), source })?;
    tracing::debug!(path = %path.display(), "Wrote text report");
    Ok(())
}

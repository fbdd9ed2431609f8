//! Report and graph renderers.
//!
//! Both consume a finished [`AnalysisResult`](crate::analysis::AnalysisResult)
//! and perform no classification of their own.

mod graph;
mod report;

pub use graph::{render_graph, DotGraph, GraphSink, DOT_SOURCE_FORMAT};
pub use report::render_text;

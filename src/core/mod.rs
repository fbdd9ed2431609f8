//! Core types shared across Roleflow.
//!
//! This module contains configuration loading and the analyzer error type.

mod config;
mod error;

pub use config::{AnalysisConfig, Config, OutputConfig, LOCAL_CONFIG_FILE};
pub use error::{AnalyzerError, AnalyzerResult};

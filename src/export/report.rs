use std::path::{Path, PathBuf};

use crate::config::platform::PlatformInfo;
use crate::config::settings::RenderSettings;
use crate::core::analyzer::Analyzer;
use crate::core::hierarchy::HierarchyGraph;
use crate::error::{Error, Result};
use crate::models::record::FileRecord;
use crate::models::summary::Summary;
use crate::render::canvas;

use super::csv::export_csv;
use super::json::export_summary;

pub const STRUCTURE_FILE: &str = "filesystem_structure.png";
pub const METADATA_FILE: &str = "filesystem_metadata.csv";
pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactStatus {
    Written(PathBuf),
    Skipped(String),
    Failed(String),
}

impl ArtifactStatus {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub structure: ArtifactStatus,
    pub metadata: ArtifactStatus,
    pub summary: ArtifactStatus,
    /// The summary that was (or would have been) written.
    pub stats: Summary,
}

/// Write the graph image, the metadata table and the summary into
/// `output_dir`, creating it if needed.
///
/// A failure in one artifact is logged and does not stop the others. Only a
/// failure to create the directory is returned as an error.
pub fn write_reports(
    records: &[FileRecord],
    output_dir: &Path,
    render: &RenderSettings,
    platform: &PlatformInfo,
) -> Result<ReportOutcome> {
    std::fs::create_dir_all(output_dir).map_err(|e| Error::io(output_dir, e))?;
    tracing::info!("Saving files to: {}", output_dir.display());

    let structure = write_structure(records, &output_dir.join(STRUCTURE_FILE), render);

    let metadata_path = output_dir.join(METADATA_FILE);
    let metadata = match export_csv(records, &metadata_path) {
        Ok(()) => {
            tracing::info!("CSV saved to: {}", metadata_path.display());
            ArtifactStatus::Written(metadata_path)
        }
        Err(e) => {
            tracing::error!("Error writing metadata table: {}", e);
            ArtifactStatus::Failed(e.to_string())
        }
    };

    let stats = Analyzer::summarize(records, platform);
    let summary_path = output_dir.join(SUMMARY_FILE);
    let summary = match export_summary(&stats, &summary_path) {
        Ok(()) => {
            tracing::info!("Summary saved to: {}", summary_path.display());
            ArtifactStatus::Written(summary_path)
        }
        Err(e) => {
            tracing::error!("Error writing summary: {}", e);
            ArtifactStatus::Failed(e.to_string())
        }
    };

    Ok(ReportOutcome {
        structure,
        metadata,
        summary,
        stats,
    })
}

fn write_structure(
    records: &[FileRecord],
    path: &Path,
    render: &RenderSettings,
) -> ArtifactStatus {
    if records.is_empty() {
        tracing::info!("No data to visualize.");
        return ArtifactStatus::Skipped(Error::EmptyGraph.to_string());
    }

    tracing::info!("Processing {} files for visualization...", records.len());
    let graph = HierarchyGraph::build(records);
    let result = canvas::render_hierarchy(&graph, render)
        .and_then(|img| canvas::save_png(&img, path));
    match result {
        Ok(()) => {
            tracing::info!("Visualization saved to: {}", path.display());
            ArtifactStatus::Written(path.to_path_buf())
        }
        Err(Error::EmptyGraph) => {
            tracing::info!("No data to visualize.");
            ArtifactStatus::Skipped(Error::EmptyGraph.to_string())
        }
        Err(e) => {
            tracing::error!("Error creating visualization: {}", e);
            ArtifactStatus::Failed(e.to_string())
        }
    }
}

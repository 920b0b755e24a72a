use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Directory names skipped at every depth unless overridden.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[".git", "node_modules", "__pycache__", "temp"];

/// Path fragments that mark a file as belonging to the OS.
/// Matched against the forward-slash form of the path, so one list covers
/// both Unix-like and Windows-like layouts.
pub const DEFAULT_SYSTEM_PREFIXES: &[&str] = &[
    "/System/",
    "/Windows/",
    "/Program Files/",
    "/Program Files (x86)/",
    "/Library/",
    "/bin/",
    "/etc/",
    "/var/",
    "/usr/",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub start_path: PathBuf,
    pub output_dir: PathBuf,
    pub exclude_dirs: Vec<String>,
    pub system_prefixes: Vec<String>,
    /// Run a counting pass first so progress can be reported as a fraction.
    pub count_first: bool,
    /// Number of processed files between two progress events.
    pub progress_every: usize,
    pub render: RenderSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_path: PathBuf::from("."),
            output_dir: PathBuf::from("fs_visualization"),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            system_prefixes: DEFAULT_SYSTEM_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            count_first: false,
            progress_every: 1000,
            render: RenderSettings::default(),
        }
    }
}

impl Settings {
    pub fn is_excluded(&self, dir_name: &str) -> bool {
        self.exclude_dirs.iter().any(|d| d == dir_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    /// Blank border kept around the laid-out graph, in pixels.
    pub margin: u32,
    pub node_radius: u32,
    pub layout_iterations: usize,
    pub background: [u8; 3],
    pub edge_color: [u8; 3],
    /// Opacity applied to nodes and edges when blending onto the background.
    pub alpha: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 4000,
            height: 4000,
            margin: 40,
            node_radius: 1,
            layout_iterations: 25,
            background: [0, 0, 0],
            edge_color: [0x30, 0x30, 0x30],
            alpha: 0.9,
        }
    }
}

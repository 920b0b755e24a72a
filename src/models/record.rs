use std::path::PathBuf;

use chrono::{DateTime, Local};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Metadata for one accessible file, produced once by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Display form of the path; `os_path` is the exact one.
    pub path: String,
    #[serde(skip)]
    pub os_path: PathBuf,
    pub filename: String,
    pub directory: String,
    pub size_bytes: u64,
    pub creation_time: DateTime<Local>,
    /// Lowercased final suffix including the dot (".txt"); empty when absent.
    pub file_extension: CompactString,
    pub is_system_file: bool,
}

impl FileRecord {
    /// ISO-8601 form of `creation_time` as written to the CSV table.
    /// The fraction is omitted when the microseconds are zero.
    pub fn creation_time_iso(&self) -> String {
        let format = if self.creation_time.timestamp_subsec_micros() == 0 {
            "%Y-%m-%dT%H:%M:%S"
        } else {
            "%Y-%m-%dT%H:%M:%S%.6f"
        };
        self.creation_time.format(format).to_string()
    }
}

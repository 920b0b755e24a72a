use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use super::record::FileRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub records: Vec<FileRecord>,
    pub total_size: u64,
    pub dirs_visited: usize,
    pub scan_duration: Duration,
    pub errors: Vec<ScanError>,
    pub timestamp: SystemTime,
    pub scan_path: PathBuf,
}

impl ScanResult {
    pub fn total_files(&self) -> usize {
        self.records.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanError {
    pub path: PathBuf,
    pub error_type: ScanErrorType,
    pub message: String,
}

impl ScanError {
    pub fn from_io(path: PathBuf, err: &std::io::Error) -> Self {
        Self {
            path,
            error_type: ScanErrorType::from_io(err),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanErrorType {
    PermissionDenied,
    NotFound,
    IoError,
    Other,
}

impl ScanErrorType {
    pub fn from_io(err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            std::io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::IoError,
        }
    }
}

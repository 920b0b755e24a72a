use std::fs::Metadata;
use std::path::Path;

use chrono::{DateTime, Local};
use compact_str::CompactString;

use crate::models::record::FileRecord;
use crate::models::scan_result::{ScanError, ScanErrorType};

/// Substring test against a fixed list of OS path fragments.
///
/// This is a naming heuristic only. Ownership and permission bits are never
/// consulted.
#[derive(Debug, Clone)]
pub struct SystemClassifier {
    prefixes: Vec<String>,
}

impl SystemClassifier {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    pub fn is_system_file(&self, path: &Path) -> bool {
        let normalized = path.to_string_lossy().replace('\\', "/");
        self.prefixes.iter().any(|p| normalized.contains(p.as_str()))
    }
}

/// Best-effort read permission probe for files and directories.
#[cfg(unix)]
pub fn is_readable(path: &Path) -> bool {
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = std::ffi::CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    unsafe { libc::access(c_path.as_ptr(), libc::R_OK) == 0 }
}

#[cfg(not(unix))]
pub fn is_readable(path: &Path) -> bool {
    if path.is_dir() {
        std::fs::read_dir(path).is_ok()
    } else {
        std::fs::File::open(path).is_ok()
    }
}

/// Build a [`FileRecord`] for `path`, or explain why none could be built.
pub fn extract(path: &Path, classifier: &SystemClassifier) -> Result<FileRecord, ScanError> {
    if !is_readable(path) {
        return Err(ScanError {
            path: path.to_path_buf(),
            error_type: ScanErrorType::PermissionDenied,
            message: format!("No read access to: {}", path.display()),
        });
    }

    let metadata =
        std::fs::metadata(path).map_err(|e| ScanError::from_io(path.to_path_buf(), &e))?;

    let creation_time = creation_time(&metadata).ok_or_else(|| ScanError {
        path: path.to_path_buf(),
        error_type: ScanErrorType::Other,
        message: "timestamp out of range".to_string(),
    })?;

    Ok(FileRecord {
        path: path.to_string_lossy().into_owned(),
        os_path: path.to_path_buf(),
        filename: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        directory: path
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default(),
        size_bytes: metadata.len(),
        creation_time,
        file_extension: file_extension(path),
        is_system_file: classifier.is_system_file(path),
    })
}

/// Lowercased last suffix with its dot. Leading-dot names such as `.bashrc`
/// have no extension.
pub fn file_extension(path: &Path) -> CompactString {
    match path.extension() {
        Some(ext) => {
            let mut out = CompactString::new(".");
            out.push_str(&ext.to_string_lossy().to_lowercase());
            out
        }
        None => CompactString::default(),
    }
}

#[cfg(unix)]
fn creation_time(metadata: &Metadata) -> Option<DateTime<Local>> {
    use chrono::TimeZone;
    use std::os::unix::fs::MetadataExt;

    Local
        .timestamp_opt(metadata.ctime(), metadata.ctime_nsec() as u32)
        .single()
}

#[cfg(not(unix))]
fn creation_time(metadata: &Metadata) -> Option<DateTime<Local>> {
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .ok()
        .map(DateTime::<Local>::from)
}

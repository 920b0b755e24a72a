use std::fmt::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::record::FileRecord;

const HEADER: &str =
    "path,filename,directory,size_bytes,creation_time,file_extension,is_system_file";

pub fn export_csv(records: &[FileRecord], output_path: &Path) -> Result<()> {
    let csv = render_csv(records);
    std::fs::write(output_path, csv).map_err(|e| Error::io(output_path, e))
}

pub fn render_csv(records: &[FileRecord]) -> String {
    let mut csv = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(csv, "{HEADER}");
    for record in records {
        let _ = writeln!(
            csv,
            "{},{},{},{},{},{},{}",
            escape_field(&record.path),
            escape_field(&record.filename),
            escape_field(&record.directory),
            record.size_bytes,
            record.creation_time_iso(),
            escape_field(&record.file_extension),
            if record.is_system_file { "True" } else { "False" },
        );
    }

    csv
}

/// Quote fields containing a delimiter, quote, or line break (RFC 4180).
fn escape_field(s: &str) -> std::borrow::Cow<'_, str> {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\"")).into()
    } else {
        s.into()
    }
}

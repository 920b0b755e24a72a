use std::path::Path;

use crate::error::{Error, Result};
use crate::models::summary::Summary;

pub fn export_summary(summary: &Summary, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(output_path, json).map_err(|e| Error::io(output_path, e))
}

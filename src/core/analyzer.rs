use std::collections::BTreeMap;

use chrono::Local;

use crate::config::platform::PlatformInfo;
use crate::models::record::FileRecord;
use crate::models::summary::Summary;

pub struct Analyzer;

impl Analyzer {
    pub fn summarize(records: &[FileRecord], platform: &PlatformInfo) -> Summary {
        let system_files_count = records.iter().filter(|r| r.is_system_file).count() as u64;

        Summary {
            total_files: records.len() as u64,
            total_size_bytes: records.iter().map(|r| r.size_bytes).sum(),
            file_types: Self::extension_counts(records),
            system_files_count,
            user_files_count: records.len() as u64 - system_files_count,
            scan_time: Local::now(),
            system_info: platform.clone(),
        }
    }

    pub fn extension_counts(records: &[FileRecord]) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        for record in records {
            *counts.entry(record.file_extension.to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Extensions ordered by descending count, ties broken by name.
    pub fn top_extensions(records: &[FileRecord], n: usize) -> Vec<(String, u64)> {
        let mut counts: Vec<(String, u64)> = Self::extension_counts(records).into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts.truncate(n);
        counts
    }
}

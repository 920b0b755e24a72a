pub mod record;
pub mod scan_result;
pub mod summary;

use crate::domain::model::{SortBy, UnzipJob};
use crate::utils::error::Result;
use crate::utils::logger::LogSettings;
use std::path::{Path, PathBuf};

/// A compressed format that knows how to expand one source file.
pub trait Decompressor: Send + Sync {
    fn name(&self) -> &'static str;

    fn handles(&self, source: &Path) -> bool;

    /// Expands `job.source` and returns the written output path.
    fn extract(&self, job: &UnzipJob) -> Result<PathBuf>;
}

pub trait ConfigProvider: Send + Sync {
    fn log_settings(&self) -> LogSettings;
    fn num_workers(&self) -> Option<usize>;
    fn default_sort_by(&self) -> SortBy;
    fn default_recursive(&self) -> bool;
}

use crate::utils::error::{BioxError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Name,
    Mtime,
    Size,
}

impl FromStr for SortBy {
    type Err = BioxError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(SortBy::Name),
            "mtime" => Ok(SortBy::Mtime),
            "size" => Ok(SortBy::Size),
            other => Err(BioxError::InvalidSortBy {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortBy::Name => "name",
            SortBy::Mtime => "mtime",
            SortBy::Size => "size",
        };
        f.write_str(name)
    }
}

/// Arguments for [`crate::core::finder::find_files`], kept so a search can be logged,
/// persisted and replayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindFilesArgs {
    pub dir: PathBuf,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    /// Extension without the leading dot, e.g. "parquet"
    pub file_format: Option<String>,
    pub recursive: bool,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub min_size_bytes: Option<u64>,
    pub max_files: Option<usize>,
    pub sort_by: SortBy,
    pub reverse: bool,
}

impl FindFilesArgs {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Default::default()
        }
    }

    pub fn with_file_format(mut self, format: impl Into<String>) -> Self {
        self.file_format = Some(format.into());
        self.normalized()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn sorted_by(mut self, sort_by: SortBy, reverse: bool) -> Self {
        self.sort_by = sort_by;
        self.reverse = reverse;
        self
    }

    /// Strips a leading dot from the extension; an empty extension means unset.
    pub fn normalized(mut self) -> Self {
        self.file_format = self
            .file_format
            .map(|f| f.trim_start_matches('.').to_string())
            .filter(|f| !f.is_empty());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindFilesResult {
    pub searched_dir: PathBuf,
    pub args: FindFilesArgs,
    pub files: Vec<PathBuf>,
    pub total_matched: usize,
    pub recursive: bool,
    pub notes: Option<String>,
    pub files_by_year: BTreeMap<i32, Vec<PathBuf>>,
}

impl FindFilesResult {
    pub fn new(searched_dir: PathBuf, args: FindFilesArgs, files: Vec<PathBuf>) -> Self {
        let files_by_year = crate::core::finder::sort_files_by_year(&files, SortBy::Name);
        Self {
            searched_dir,
            recursive: args.recursive,
            args,
            total_matched: files.len(),
            files,
            notes: None,
            files_by_year,
        }
    }

    pub fn group_by_year(&mut self, sort_by: SortBy) -> &BTreeMap<i32, Vec<PathBuf>> {
        self.files_by_year = crate::core::finder::sort_files_by_year(&self.files, sort_by);
        &self.files_by_year
    }
}

impl fmt::Display for FindFilesResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Search Directory: {}", self.searched_dir.display())?;
        writeln!(f, "Args: {:?}", self.args)?;
        writeln!(f, "Files:")?;
        for file in &self.files {
            writeln!(f, "  {}", file.display())?;
        }
        writeln!(f, "Total Matched: {}", self.total_matched)?;
        writeln!(f, "Recursive: {}", self.recursive)?;
        write!(f, "Notes: {}", self.notes.as_deref().unwrap_or("-"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnzipJob {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub overwrite: bool,
}

#[derive(Debug, Clone)]
pub enum UnzipSources {
    /// Plain archive paths; outputs are placed in a shared destination directory.
    Paths(Vec<PathBuf>),
    /// Fully specified jobs, used as given.
    Jobs(Vec<UnzipJob>),
}

#[derive(Debug, Clone, Serialize)]
pub struct UnzipOutcome {
    pub destination_dir: PathBuf,
    pub extracted: Vec<PathBuf>,
}

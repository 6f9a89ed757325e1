use crate::domain::model::{FindFilesArgs, FindFilesResult, SortBy};
use crate::utils::error::{BioxError, Result};
use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::SystemTime;
use walkdir::WalkDir;

// Tried in order: pubmed_sorted_YYYY, pubmed_YYYY, then any 19xx/20xx
static YEAR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"pubmed_sorted_(?P<year>[0-9]{4})",
        r"pubmed_(?P<year>[0-9]{4})",
        r"(?P<year>19[0-9]{2}|20[0-9]{2})",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2099;

/// Sort key for a path. Files whose metadata cannot be read compare greater than
/// everything else, so they end up last in ascending order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Name(String),
    Modified(SystemTime),
    Size(u64),
    Unknown,
}

fn sort_key(path: &Path, sort_by: SortBy) -> SortKey {
    match sort_by {
        SortBy::Name => path
            .file_name()
            .map(|n| SortKey::Name(n.to_string_lossy().into_owned()))
            .unwrap_or(SortKey::Unknown),
        SortBy::Mtime => path
            .metadata()
            .and_then(|m| m.modified())
            .map(SortKey::Modified)
            .unwrap_or(SortKey::Unknown),
        SortBy::Size => path
            .metadata()
            .map(|m| SortKey::Size(m.len()))
            .unwrap_or(SortKey::Unknown),
    }
}

/// Stable sort; equal keys keep their input order in both directions.
pub fn sort_paths(paths: Vec<PathBuf>, sort_by: SortBy, reverse: bool) -> Vec<PathBuf> {
    let mut keyed: Vec<(SortKey, PathBuf)> = paths
        .into_iter()
        .map(|p| (sort_key(&p, sort_by), p))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = a.cmp(b);
        if reverse {
            ordering.reverse()
        } else {
            ordering
        }
    });

    keyed.into_iter().map(|(_, p)| p).collect()
}

fn build_glob_set(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(Some(builder.build()?))
}

struct FileFilter<'a> {
    args: &'a FindFilesArgs,
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl<'a> FileFilter<'a> {
    fn new(args: &'a FindFilesArgs) -> Result<Self> {
        Ok(Self {
            args,
            include: build_glob_set(&args.include_patterns)?,
            exclude: build_glob_set(&args.exclude_patterns)?,
        })
    }

    fn extension_ok(&self, path: &Path) -> bool {
        let Some(format) = self.args.file_format.as_deref() else {
            return true;
        };
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(format))
            .unwrap_or(false)
    }

    fn prefix_suffix_ok(&self, name: &str, path: &Path) -> bool {
        if let Some(prefix) = self.args.prefix.as_deref() {
            if !name.starts_with(prefix) {
                return false;
            }
        }
        let Some(suffix) = self.args.suffix.as_deref() else {
            return true;
        };
        path.file_stem()
            .map(|stem| stem.to_string_lossy().ends_with(suffix))
            .unwrap_or(false)
    }

    fn patterns_ok(&self, name: &str) -> bool {
        if let Some(include) = &self.include {
            if !include.is_match(name) {
                return false;
            }
        }
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(name) {
                return false;
            }
        }
        true
    }

    fn size_ok(&self, path: &Path) -> bool {
        let Some(min_size) = self.args.min_size_bytes else {
            return true;
        };
        path.metadata()
            .map(|m| m.len() >= min_size)
            .unwrap_or(false)
    }

    fn passes(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };
        self.extension_ok(path)
            && self.prefix_suffix_ok(&name, path)
            && self.patterns_ok(&name)
            && self.size_ok(path)
    }
}

fn candidate_files(base: &Path, recursive: bool) -> impl Iterator<Item = PathBuf> {
    let walker = WalkDir::new(base).min_depth(1).sort_by_file_name();
    let walker = if recursive {
        walker
    } else {
        walker.max_depth(1)
    };

    walker
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file())
}

/// Find files in a directory with filtering and sorting.
///
/// Filters are applied to the basename (prefix, suffix, include/exclude globs), the
/// extension (case-insensitive) and the size on disk. Matched paths are canonicalized,
/// sorted, then truncated to `max_files`.
pub fn find_files(args: &FindFilesArgs) -> Result<FindFilesResult> {
    let args = args.clone().normalized();
    let base = args.dir.clone();

    if !base.exists() {
        return Err(BioxError::DirectoryNotFound { path: base });
    }
    if !base.is_dir() {
        return Err(BioxError::NotADirectory { path: base });
    }

    let filter = FileFilter::new(&args)?;

    let matched: Vec<PathBuf> = candidate_files(&base, args.recursive)
        .filter(|path| filter.passes(path))
        .map(|path| std::fs::canonicalize(&path).unwrap_or(path))
        .collect();

    let mut files = sort_paths(matched, args.sort_by, args.reverse);
    if let Some(max_files) = args.max_files {
        files.truncate(max_files);
    }

    tracing::debug!(
        "find_files: dir={}, recursive={}, total_matched={}",
        base.display(),
        args.recursive,
        files.len()
    );

    Ok(FindFilesResult::new(base, args, files))
}

/// Extract a 4-digit year (1900-2099) from a filename.
pub fn extract_year_from_filename(name: &str) -> Option<i32> {
    YEAR_PATTERNS.iter().find_map(|re| {
        re.captures(name)
            .and_then(|caps| caps.name("year"))
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .filter(|year| (MIN_YEAR..=MAX_YEAR).contains(year))
    })
}

/// Group files by the year found in their basename, dropping files without one.
pub fn sort_files_by_year(files: &[PathBuf], sort_by: SortBy) -> BTreeMap<i32, Vec<PathBuf>> {
    let mut buckets: BTreeMap<i32, Vec<PathBuf>> = BTreeMap::new();

    for file in files {
        let year = file
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(extract_year_from_filename);
        if let Some(year) = year {
            buckets.entry(year).or_default().push(file.clone());
        }
    }

    buckets
        .into_iter()
        .map(|(year, paths)| (year, sort_paths(paths, sort_by, false)))
        .collect()
}

fn build_rglob(pattern: &str) -> Result<GlobMatcher> {
    let glob = GlobBuilder::new(&format!("**/{}", pattern))
        .literal_separator(true)
        .build()?;
    Ok(glob.compile_matcher())
}

/// Recursively search for files under `root`.
///
/// `pattern` is a glob matched at any depth below `root`; `regex` is searched in the full
/// path. When both are set a file must satisfy both. A missing root yields no results.
pub fn search_files(
    root: &Path,
    pattern: Option<&str>,
    regex: Option<&str>,
    case_insensitive: bool,
    max_results: Option<usize>,
) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let glob = pattern.map(build_rglob).transpose()?;
    let rx = regex
        .map(|r| RegexBuilder::new(r).case_insensitive(case_insensitive).build())
        .transpose()?;
    let limit = max_results.filter(|&n| n > 0);

    let mut out = Vec::new();
    for path in candidate_files(root, true) {
        if let Some(glob) = &glob {
            let relative = path.strip_prefix(root).unwrap_or(&path);
            if !glob.is_match(relative) {
                continue;
            }
        }
        if let Some(rx) = &rx {
            if !rx.is_match(&path.to_string_lossy()) {
                continue;
            }
        }
        out.push(path);
        if limit.is_some_and(|n| out.len() >= n) {
            break;
        }
    }

    tracing::debug!(
        "search_files: root={}, pattern={:?}, regex={:?}, found={}",
        root.display(),
        pattern,
        regex,
        out.len()
    );

    Ok(out)
}

pub fn find_one(
    root: &Path,
    pattern: Option<&str>,
    regex: Option<&str>,
    case_insensitive: bool,
) -> Result<Option<PathBuf>> {
    let mut found = search_files(root, pattern, regex, case_insensitive, Some(1))?;
    Ok(if found.is_empty() {
        None
    } else {
        Some(found.swap_remove(0))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_year_priority() {
        assert_eq!(extract_year_from_filename("pubmed_sorted_2021.xml"), Some(2021));
        assert_eq!(extract_year_from_filename("pubmed_2018_part.xml"), Some(2018));
        assert_eq!(extract_year_from_filename("emb_1999_v2.h5"), Some(1999));
        assert_eq!(extract_year_from_filename("data_2150.csv"), None);
        assert_eq!(extract_year_from_filename("readme.txt"), None);
    }

    #[test]
    fn test_extract_year_skips_out_of_range_priority_match() {
        // pubmed_3000 is out of range, so the generic rule applies
        assert_eq!(extract_year_from_filename("pubmed_3000_2005.xml"), Some(2005));
    }

    #[test]
    fn test_sort_files_by_year_drops_unknown() {
        let files = vec![
            PathBuf::from("b_2020.xml"),
            PathBuf::from("a_2020.xml"),
            PathBuf::from("notes.txt"),
            PathBuf::from("pubmed_2019.xml"),
        ];
        let grouped = sort_files_by_year(&files, SortBy::Name);

        assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), vec![2019, 2020]);
        assert_eq!(
            grouped[&2020],
            vec![PathBuf::from("a_2020.xml"), PathBuf::from("b_2020.xml")]
        );
    }

    #[test]
    fn test_unknown_sort_key_is_last() {
        assert!(SortKey::Size(u64::MAX) < SortKey::Unknown);
        assert!(SortKey::Name("zzz".to_string()) < SortKey::Unknown);
    }
}

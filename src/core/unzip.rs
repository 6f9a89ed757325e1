use crate::core::parallel::run_parallel_with_progress;
use crate::domain::model::{UnzipJob, UnzipOutcome, UnzipSources};
use crate::domain::ports::Decompressor;
use crate::utils::error::{BioxError, Result};
use flate2::read::MultiGzDecoder;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "unzipped";

/// Streams every member of a `.gz` file into `job.destination`.
pub struct GzipDecompressor;

impl Decompressor for GzipDecompressor {
    fn name(&self) -> &'static str {
        "gzip"
    }

    fn handles(&self, source: &Path) -> bool {
        has_extension(source, "gz")
    }

    fn extract(&self, job: &UnzipJob) -> Result<PathBuf> {
        let input = File::open(&job.source)?;
        let mut decoder = MultiGzDecoder::new(BufReader::new(input));

        if let Some(parent) = job.destination.parent() {
            fs::create_dir_all(parent)?;
        }

        let written = File::create(&job.destination).and_then(|file| {
            let mut output = BufWriter::new(file);
            io::copy(&mut decoder, &mut output)?;
            output.flush()
        });

        if let Err(e) = written {
            // Drop the partial output
            let _ = fs::remove_file(&job.destination);
            return Err(e.into());
        }

        Ok(job.destination.clone())
    }
}

/// Expands every entry of a `.zip` archive below `job.destination`.
pub struct ZipDecompressor;

impl Decompressor for ZipDecompressor {
    fn name(&self) -> &'static str {
        "zip"
    }

    fn handles(&self, source: &Path) -> bool {
        has_extension(source, "zip")
    }

    fn extract(&self, job: &UnzipJob) -> Result<PathBuf> {
        let input = File::open(&job.source)?;
        let mut archive = zip::ZipArchive::new(BufReader::new(input))?;
        fs::create_dir_all(&job.destination)?;

        if let Err(e) = expand_archive(&mut archive, job) {
            // Drop the half-extracted directory
            let _ = fs::remove_dir_all(&job.destination);
            return Err(e);
        }

        Ok(job.destination.clone())
    }
}

fn expand_archive<R: io::Read + io::Seek>(
    archive: &mut zip::ZipArchive<R>,
    job: &UnzipJob,
) -> Result<()> {
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!(
                "Skipping unsafe entry '{}' in {}",
                entry.name(),
                job.source.display()
            );
            continue;
        };
        let target = job.destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut output = BufWriter::new(File::create(&target)?);
        io::copy(&mut entry, &mut output)?;
        output.flush()?;
    }
    Ok(())
}

static GZIP: GzipDecompressor = GzipDecompressor;
static ZIP: ZipDecompressor = ZipDecompressor;

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Picks the decompressor for a source; anything that is not a zip archive is read as gzip.
pub fn decompressor_for(source: &Path) -> &'static dyn Decompressor {
    if ZIP.handles(source) {
        &ZIP
    } else {
        &GZIP
    }
}

/// Extract one file. Returns the output path, or `None` when the job was skipped or failed.
pub fn unzip_file(job: &UnzipJob) -> Option<PathBuf> {
    if job.destination.exists() && !job.overwrite {
        tracing::info!("Skipping {}, already exists.", job.destination.display());
        return None;
    }

    let decompressor = decompressor_for(&job.source);
    match decompressor.extract(job) {
        Ok(path) => {
            tracing::info!("Extracted: {}", path.display());
            Some(path)
        }
        Err(e) => {
            tracing::error!(
                "Error extracting {} ({}): {}",
                job.source.display(),
                decompressor.name(),
                e
            );
            None
        }
    }
}

fn resolve(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Turns plain source paths into jobs writing `<destination>/<file stem>`.
pub fn plan_jobs(
    sources: &[PathBuf],
    destination_dir: Option<&Path>,
    overwrite: bool,
) -> Result<Vec<UnzipJob>> {
    let first = sources.first().ok_or_else(|| BioxError::ValidationError {
        message: "no source files given".to_string(),
    })?;

    let destination = match destination_dir {
        Some(dir) => dir.to_path_buf(),
        None => resolve(first)
            .parent()
            .map(|parent| parent.join(DEFAULT_OUTPUT_DIR))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
    };
    fs::create_dir_all(&destination)?;
    let destination = resolve(&destination);

    sources
        .iter()
        .map(|source| {
            let stem = source.file_stem().ok_or_else(|| BioxError::ValidationError {
                message: format!("'{}' has no file name", source.display()),
            })?;
            Ok(UnzipJob {
                source: resolve(source),
                destination: destination.join(stem),
                overwrite,
            })
        })
        .collect()
}

/// Extract a batch of compressed files in parallel.
///
/// `destination_dir` and `overwrite` only apply to [`UnzipSources::Paths`]; jobs carry
/// their own. Files that fail are logged and left out of `extracted`.
pub async fn unzip_gz_files(
    sources: UnzipSources,
    destination_dir: Option<&Path>,
    overwrite: bool,
    num_workers: Option<usize>,
) -> Result<UnzipOutcome> {
    let jobs = match sources {
        UnzipSources::Paths(paths) => plan_jobs(&paths, destination_dir, overwrite)?,
        UnzipSources::Jobs(jobs) => jobs,
    };

    let first = jobs.first().ok_or_else(|| BioxError::ValidationError {
        message: "no unzip jobs given".to_string(),
    })?;
    let destination_dir = first
        .destination
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let total = jobs.len();
    let results = run_parallel_with_progress(
        "Unzipping files",
        |job: UnzipJob| unzip_file(&job),
        jobs,
        num_workers,
    )
    .await?;
    let extracted: Vec<PathBuf> = results.into_iter().flatten().collect();

    tracing::info!(
        "Unzipped {}/{} files into {}",
        extracted.len(),
        total,
        destination_dir.display()
    );

    Ok(UnzipOutcome {
        destination_dir,
        extracted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::TempDir;

    fn write_gz(path: &Path, content: &[u8]) {
        let mut encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
        encoder.write_all(content).unwrap();
        encoder.finish().unwrap();
    }

    #[test]
    fn test_decompressor_selection() {
        assert_eq!(decompressor_for(Path::new("a.xml.gz")).name(), "gzip");
        assert_eq!(decompressor_for(Path::new("A.ZIP")).name(), "zip");
        assert_eq!(decompressor_for(Path::new("noext")).name(), "gzip");
    }

    #[test]
    fn test_unzip_file_skips_existing_without_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a.xml.gz");
        let destination = temp_dir.path().join("a.xml");
        write_gz(&source, b"<new/>");
        fs::write(&destination, b"<old/>").unwrap();

        let job = UnzipJob {
            source: source.clone(),
            destination: destination.clone(),
            overwrite: false,
        };
        assert_eq!(unzip_file(&job), None);
        assert_eq!(fs::read(&destination).unwrap(), b"<old/>");

        let job = UnzipJob {
            overwrite: true,
            ..job
        };
        assert_eq!(unzip_file(&job), Some(destination.clone()));
        assert_eq!(fs::read(&destination).unwrap(), b"<new/>");
    }

    #[test]
    fn test_unzip_file_corrupt_source_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("broken.gz");
        fs::write(&source, b"definitely not gzip").unwrap();

        let job = UnzipJob {
            source,
            destination: temp_dir.path().join("broken"),
            overwrite: false,
        };
        assert_eq!(unzip_file(&job), None);
        assert!(!temp_dir.path().join("broken").exists());
    }

    #[test]
    fn test_gzip_reads_every_member() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("reads.fastq.gz");
        let mut data = Vec::new();
        for member in [b"member-one\n".as_slice(), b"member-two\n".as_slice()] {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(member).unwrap();
            data.extend(encoder.finish().unwrap());
        }
        fs::write(&source, data).unwrap();

        let destination = temp_dir.path().join("reads.fastq");
        let job = UnzipJob {
            source,
            destination: destination.clone(),
            overwrite: false,
        };
        assert_eq!(unzip_file(&job), Some(destination.clone()));
        assert_eq!(
            fs::read_to_string(&destination).unwrap(),
            "member-one\nmember-two\n"
        );
    }

    #[test]
    fn test_zip_failure_removes_partial_directory() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("bundle.zip");

        let options =
            zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        let mut writer = zip::ZipWriter::new(io::Cursor::new(Vec::new()));
        writer.start_file("a.txt", options).unwrap();
        writer.write_all(b"alpha-content").unwrap();
        writer.start_file("b.txt", options).unwrap();
        writer.write_all(b"bravo-content").unwrap();
        let mut data = writer.finish().unwrap().into_inner();

        // Flip the stored bytes of b.txt so its CRC no longer matches
        let at = data
            .windows(b"bravo-content".len())
            .position(|w| w == b"bravo-content")
            .unwrap();
        data[at..at + 5].copy_from_slice(b"BRAVO");
        fs::write(&source, data).unwrap();

        let destination = temp_dir.path().join("bundle");
        let job = UnzipJob {
            source,
            destination: destination.clone(),
            overwrite: false,
        };
        assert_eq!(unzip_file(&job), None);
        assert!(!destination.exists());

        // Nothing left behind to be skipped as "already exists"
        assert_eq!(unzip_file(&job), None);
        assert!(!destination.exists());
    }

    #[test]
    fn test_plan_jobs_rejects_empty_input() {
        assert!(matches!(
            plan_jobs(&[], None, false),
            Err(BioxError::ValidationError { .. })
        ));
    }
}

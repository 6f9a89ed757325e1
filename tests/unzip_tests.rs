use anyhow::Result;
use bioxai::{run_parallel, unzip_gz_files, BioxError, UnzipJob, UnzipSources};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

fn write_gz(path: &Path, content: &str) -> Result<()> {
    let mut encoder = GzEncoder::new(File::create(path)?, Compression::default());
    encoder.write_all(content.as_bytes())?;
    encoder.finish()?;
    Ok(())
}

fn write_zip(path: &Path, entries: &[(&str, &str)]) -> Result<()> {
    let mut writer = zip::ZipWriter::new(File::create(path)?);
    for (name, content) in entries {
        writer.start_file(*name, SimpleFileOptions::default())?;
        writer.write_all(content.as_bytes())?;
    }
    writer.finish()?;
    Ok(())
}

#[tokio::test]
async fn test_paths_default_to_unzipped_next_to_first_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let a = temp_dir.path().join("pubmed24n0001.xml.gz");
    let b = temp_dir.path().join("pubmed24n0002.xml.gz");
    write_gz(&a, "<first/>")?;
    write_gz(&b, "<second/>")?;

    let outcome = unzip_gz_files(UnzipSources::Paths(vec![a, b]), None, false, Some(2)).await?;

    let expected_dir = fs::canonicalize(temp_dir.path())?.join("unzipped");
    assert_eq!(outcome.destination_dir, expected_dir);
    assert_eq!(outcome.extracted.len(), 2);
    assert_eq!(
        fs::read_to_string(expected_dir.join("pubmed24n0001.xml"))?,
        "<first/>"
    );
    assert_eq!(
        fs::read_to_string(expected_dir.join("pubmed24n0002.xml"))?,
        "<second/>"
    );
    Ok(())
}

#[tokio::test]
async fn test_overwrite_flag_controls_existing_outputs() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("a.xml.gz");
    let dest = temp_dir.path().join("out");
    write_gz(&source, "fresh")?;
    fs::create_dir_all(&dest)?;
    fs::write(dest.join("a.xml"), "stale")?;

    let skipped = unzip_gz_files(
        UnzipSources::Paths(vec![source.clone()]),
        Some(&dest),
        false,
        None,
    )
    .await?;
    assert!(skipped.extracted.is_empty());
    assert_eq!(fs::read_to_string(dest.join("a.xml"))?, "stale");

    let replaced =
        unzip_gz_files(UnzipSources::Paths(vec![source]), Some(&dest), true, None).await?;
    assert_eq!(replaced.extracted.len(), 1);
    assert_eq!(fs::read_to_string(dest.join("a.xml"))?, "fresh");
    Ok(())
}

#[tokio::test]
async fn test_bad_file_does_not_abort_batch() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let good = temp_dir.path().join("good.txt.gz");
    let bad = temp_dir.path().join("bad.txt.gz");
    let missing = temp_dir.path().join("missing.txt.gz");
    write_gz(&good, "ok")?;
    fs::write(&bad, "not gzip at all")?;

    let outcome = unzip_gz_files(
        UnzipSources::Paths(vec![bad, good, missing]),
        None,
        false,
        Some(3),
    )
    .await?;

    let names: Vec<_> = outcome
        .extracted
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["good.txt"]);
    Ok(())
}

#[tokio::test]
async fn test_explicit_jobs_are_used_as_given() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("x.gz");
    write_gz(&source, "payload")?;
    let destination = temp_dir.path().join("custom").join("renamed.dat");

    let outcome = unzip_gz_files(
        UnzipSources::Jobs(vec![UnzipJob {
            source,
            destination: destination.clone(),
            overwrite: false,
        }]),
        None,
        false,
        None,
    )
    .await?;

    assert_eq!(outcome.destination_dir, temp_dir.path().join("custom"));
    assert_eq!(outcome.extracted, vec![destination.clone()]);
    assert_eq!(fs::read_to_string(destination)?, "payload");
    Ok(())
}

#[tokio::test]
async fn test_zip_archives_extract_into_directory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let archive = temp_dir.path().join("bundle.zip");
    write_zip(
        &archive,
        &[("readme.txt", "hello"), ("nested/data_2020.csv", "a,b\n1,2\n")],
    )?;
    let dest = temp_dir.path().join("out");

    let outcome =
        unzip_gz_files(UnzipSources::Paths(vec![archive]), Some(&dest), false, None).await?;

    let bundle = fs::canonicalize(&dest)?.join("bundle");
    assert_eq!(outcome.extracted, vec![bundle.clone()]);
    assert_eq!(fs::read_to_string(bundle.join("readme.txt"))?, "hello");
    assert_eq!(
        fs::read_to_string(bundle.join("nested").join("data_2020.csv"))?,
        "a,b\n1,2\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_empty_sources_are_rejected() {
    let paths = unzip_gz_files(UnzipSources::Paths(Vec::new()), None, false, None).await;
    assert!(matches!(paths, Err(BioxError::ValidationError { .. })));

    let jobs = unzip_gz_files(UnzipSources::Jobs(Vec::new()), None, false, None).await;
    assert!(matches!(jobs, Err(BioxError::ValidationError { .. })));
}

#[tokio::test]
async fn test_run_parallel_over_paths() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let paths: Vec<PathBuf> = (0..8)
        .map(|i| temp_dir.path().join(format!("f{}.txt", i)))
        .collect();
    for (i, path) in paths.iter().enumerate() {
        fs::write(path, "x".repeat(i))?;
    }

    let sizes = run_parallel(
        |path: PathBuf| fs::metadata(path).map(|m| m.len()).unwrap_or(0),
        paths,
        Some(3),
    )
    .await?;
    assert_eq!(sizes, (0..8).collect::<Vec<u64>>());
    Ok(())
}

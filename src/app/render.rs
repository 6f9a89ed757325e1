use crate::config::OutputFormat;
use crate::core::finder::extract_year_from_filename;
use crate::domain::model::{FindFilesResult, UnzipOutcome};
use crate::utils::error::Result;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

fn year_of(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(extract_year_from_filename)
        .map(|y| y.to_string())
        .unwrap_or_default()
}

fn write_json<W: Write, T: serde::Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn render_paths<W: Write>(out: &mut W, paths: &[PathBuf], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for path in paths {
                writeln!(out, "{}", path.display())?;
            }
        }
        OutputFormat::Json => write_json(out, paths)?,
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            writer.write_record(["path"])?;
            for path in paths {
                writer.write_record([path.to_string_lossy().into_owned()])?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

pub fn render_year_groups<W: Write>(
    out: &mut W,
    groups: &BTreeMap<i32, Vec<PathBuf>>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for (year, files) in groups {
                writeln!(out, "{} ({} files)", year, files.len())?;
                for file in files {
                    writeln!(out, "  {}", file.display())?;
                }
            }
        }
        OutputFormat::Json => write_json(out, groups)?,
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            writer.write_record(["year", "path"])?;
            for (year, files) in groups {
                for file in files {
                    writer.write_record([year.to_string(), file.to_string_lossy().into_owned()])?;
                }
            }
            writer.flush()?;
        }
    }
    Ok(())
}

pub fn render_find_result<W: Write>(
    out: &mut W,
    result: &FindFilesResult,
    format: OutputFormat,
    by_year: bool,
) -> Result<()> {
    if by_year {
        return render_year_groups(out, &result.files_by_year, format);
    }

    match format {
        OutputFormat::Text => render_paths(out, &result.files, format),
        OutputFormat::Json => write_json(out, result),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            writer.write_record(["path", "size_bytes", "year"])?;
            for file in &result.files {
                let size = file
                    .metadata()
                    .map(|m| m.len().to_string())
                    .unwrap_or_default();
                writer.write_record([file.to_string_lossy().into_owned(), size, year_of(file)])?;
            }
            writer.flush()?;
            Ok(())
        }
    }
}

pub fn render_unzip_outcome<W: Write>(
    out: &mut W,
    outcome: &UnzipOutcome,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "Destination: {}", outcome.destination_dir.display())?;
            writeln!(out, "Extracted {} files", outcome.extracted.len())?;
            render_paths(out, &outcome.extracted, format)
        }
        OutputFormat::Json => write_json(out, outcome),
        OutputFormat::Csv => render_paths(out, &outcome.extracted, format),
    }
}

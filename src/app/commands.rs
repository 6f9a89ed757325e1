use crate::app::render;
use crate::config::cli::AppSettings;
use crate::config::{Command, FindArgs, OutputFormat, SearchArgs};
use crate::core::finder::{find_files, find_one, search_files, sort_files_by_year};
use crate::core::greeting::hello;
use crate::core::unzip::unzip_gz_files;
use crate::core::version::{self, release_tag, tag_matches_version};
use crate::domain::model::{FindFilesArgs, SortBy, UnzipSources};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{BioxError, Result};
use crate::utils::monitor::ResourceMonitor;
use std::io::Write;
use std::path::PathBuf;

fn resolve_sort_by(flag: Option<&str>, settings: &AppSettings) -> Result<SortBy> {
    match flag {
        Some(value) => value.parse(),
        None => Ok(settings.default_sort_by()),
    }
}

/// An explicit `--flag` or `--no-flag` wins over the config file value.
fn flag_or(on: bool, off: bool, default: bool) -> bool {
    match (on, off) {
        (true, _) => true,
        (_, true) => false,
        _ => default,
    }
}

/// Merges `find` flags with the config file defaults.
pub fn build_find_args(args: &FindArgs, settings: &AppSettings) -> Result<FindFilesArgs> {
    let file_format = args
        .file_format
        .clone()
        .or_else(|| settings.file.default_file_format().map(str::to_string));

    Ok(FindFilesArgs {
        dir: args.dir.clone(),
        prefix: args.prefix.clone(),
        suffix: args.suffix.clone(),
        file_format,
        recursive: flag_or(args.recursive, args.no_recursive, settings.default_recursive()),
        include_patterns: args.include_patterns.clone(),
        exclude_patterns: args.exclude_patterns.clone(),
        min_size_bytes: args.min_size,
        max_files: args.max_files,
        sort_by: resolve_sort_by(args.sort_by.as_deref(), settings)?,
        reverse: flag_or(
            args.reverse,
            args.no_reverse,
            settings.file.default_reverse(),
        ),
    }
    .normalized())
}

fn run_version<W: Write>(out: &mut W, tag: bool, check_tag: Option<&str>) -> Result<()> {
    if let Some(candidate) = check_tag {
        if !tag_matches_version(candidate) {
            return Err(BioxError::ValidationError {
                message: format!(
                    "tag '{}' does not match package version {} (expected {})",
                    candidate,
                    version::VERSION,
                    release_tag()
                ),
            });
        }
        writeln!(out, "✅ {} matches version {}", candidate, version::VERSION)?;
        return Ok(());
    }

    if tag {
        writeln!(out, "{}", release_tag())?;
    } else {
        writeln!(out, "{} {}", version::NAME, version::VERSION)?;
        writeln!(out, "Authors: {}", version::AUTHORS)?;
        writeln!(out, "License: {}", version::LICENSE)?;
        writeln!(out, "Repository: {}", version::REPOSITORY)?;
    }
    Ok(())
}

fn run_search<W: Write>(out: &mut W, args: &SearchArgs) -> Result<()> {
    let case_insensitive = !args.case_sensitive;
    let found: Vec<PathBuf> = if args.first {
        find_one(
            &args.root,
            args.pattern.as_deref(),
            args.regex.as_deref(),
            case_insensitive,
        )?
        .into_iter()
        .collect()
    } else {
        search_files(
            &args.root,
            args.pattern.as_deref(),
            args.regex.as_deref(),
            case_insensitive,
            args.max_results,
        )?
    };

    tracing::info!("🔎 Found {} files under {}", found.len(), args.root.display());
    render::render_paths(out, &found, args.output)
}

/// Executes the parsed subcommand, writing user-facing output to `out`.
pub async fn run<W: Write>(settings: &AppSettings, out: &mut W) -> Result<()> {
    let monitor = ResourceMonitor::new(settings.monitor_enabled());

    match &settings.cli.command {
        Command::Hello => {
            writeln!(out, "{}", hello())?;
        }
        Command::Version { tag, check_tag } => {
            run_version(out, *tag, check_tag.as_deref())?;
        }
        Command::Find(args) => {
            let find_args = build_find_args(args, settings)?;
            tracing::debug!("Find arguments: {:?}", find_args);
            monitor.log_phase("Before find");

            let result = find_files(&find_args)?;
            tracing::info!(
                "📁 Matched {} files in {}",
                result.total_matched,
                result.searched_dir.display()
            );
            monitor.log_phase("After find");

            render::render_find_result(out, &result, args.output, args.by_year)?;
        }
        Command::Search(args) => {
            run_search(out, args)?;
        }
        Command::GroupByYear {
            files,
            sort_by,
            output,
        } => {
            let sort_by = resolve_sort_by(sort_by.as_deref(), settings)?;
            let groups = sort_files_by_year(files, sort_by);
            render::render_year_groups(out, &groups, *output)?;
        }
        Command::Unzip {
            files,
            dest,
            overwrite,
            workers,
        } => {
            let num_workers = workers.or_else(|| settings.num_workers());
            monitor.log_phase("Before unzip");

            let outcome = unzip_gz_files(
                UnzipSources::Paths(files.clone()),
                dest.as_deref(),
                *overwrite,
                num_workers,
            )
            .await?;
            monitor.log_phase("After unzip");

            render::render_unzip_outcome(out, &outcome, OutputFormat::Text)?;
        }
    }

    Ok(())
}

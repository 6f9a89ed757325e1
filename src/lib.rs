#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::AppSettings, CliConfig};

pub use core::finder::{
    extract_year_from_filename, find_files, find_one, search_files, sort_files_by_year,
};
pub use core::greeting::hello;
pub use core::parallel::run_parallel;
pub use core::unzip::{unzip_file, unzip_gz_files};
pub use core::version::{release_tag, VERSION};
pub use domain::model::{
    FindFilesArgs, FindFilesResult, SortBy, UnzipJob, UnzipOutcome, UnzipSources,
};
pub use utils::error::{BioxError, Result};

#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "bioxai")]
#[command(version, about = "File discovery, year grouping and parallel decompression")]
pub struct CliConfig {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    /// Also write logs to a timestamped file
    #[arg(long, global = true)]
    pub log_file: bool,

    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the package greeting
    Hello,

    /// Print version information, or check a release tag against it
    Version {
        /// Print only the release tag (vX.Y.Z)
        #[arg(long)]
        tag: bool,

        /// Exit non-zero unless TAG matches the package version
        #[arg(long, value_name = "TAG")]
        check_tag: Option<String>,
    },

    /// Find files in a directory with filtering and sorting
    Find(FindArgs),

    /// Recursively search files by glob pattern and/or regex
    Search(SearchArgs),

    /// Group files by the year in their names
    GroupByYear {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(long)]
        sort_by: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Extract .gz (and .zip) files in parallel
    Unzip {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Destination directory (default: <first file's dir>/unzipped)
        #[arg(short, long)]
        dest: Option<PathBuf>,

        #[arg(long)]
        overwrite: bool,

        #[arg(short, long)]
        workers: Option<usize>,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct FindArgs {
    pub dir: PathBuf,

    #[arg(long)]
    pub prefix: Option<String>,

    #[arg(long)]
    pub suffix: Option<String>,

    /// Required extension, with or without the leading dot
    #[arg(long = "format")]
    pub file_format: Option<String>,

    #[arg(short, long, overrides_with = "no_recursive")]
    pub recursive: bool,

    /// Stay in the top directory even when the config file enables recursion
    #[arg(long, overrides_with = "recursive")]
    pub no_recursive: bool,

    #[arg(long = "include", value_delimiter = ',')]
    pub include_patterns: Vec<String>,

    #[arg(long = "exclude", value_delimiter = ',')]
    pub exclude_patterns: Vec<String>,

    #[arg(long)]
    pub min_size: Option<u64>,

    #[arg(long)]
    pub max_files: Option<usize>,

    /// name, mtime or size
    #[arg(long)]
    pub sort_by: Option<String>,

    #[arg(long, overrides_with = "no_reverse")]
    pub reverse: bool,

    #[arg(long, overrides_with = "reverse")]
    pub no_reverse: bool,

    /// Print the year grouping instead of the flat list
    #[arg(long)]
    pub by_year: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    pub root: PathBuf,

    /// Glob matched at any depth, e.g. "*.h5"
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Regex searched in the full path
    #[arg(long)]
    pub regex: Option<String>,

    #[arg(long)]
    pub case_sensitive: bool,

    #[arg(long)]
    pub max_results: Option<usize>,

    /// Stop at the first match
    #[arg(long)]
    pub first: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

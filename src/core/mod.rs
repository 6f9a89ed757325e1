pub mod finder;
pub mod greeting;
pub mod parallel;
pub mod unzip;
pub mod version;

pub use crate::domain::model::{FindFilesArgs, FindFilesResult, SortBy};
pub use crate::domain::ports::{ConfigProvider, Decompressor};
pub use crate::utils::error::Result;

use crate::utils::error::{BioxError, Result};

pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
pub const LICENSE: &str = env!("CARGO_PKG_LICENSE");
pub const REPOSITORY: &str = env!("CARGO_PKG_REPOSITORY");

/// Git tag used when releasing the current version, e.g. `v0.1.0`.
pub fn release_tag() -> String {
    format!("v{}", VERSION)
}

/// Version number from a `vX.Y.Z` tag; errors when the tag is malformed.
pub fn version_from_tag(tag: &str) -> Result<String> {
    let version = tag.strip_prefix('v').unwrap_or(tag);
    let parts: Vec<&str> = version.split('.').collect();

    let well_formed = parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));

    if !well_formed {
        return Err(BioxError::ValidationError {
            message: format!("'{}' is not a vMAJOR.MINOR.PATCH tag", tag),
        });
    }
    Ok(version.to_string())
}

pub fn tag_matches_version(tag: &str) -> bool {
    version_from_tag(tag).is_ok_and(|v| v == VERSION)
}

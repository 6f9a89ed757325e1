use bioxai::core::version::{release_tag, tag_matches_version, version_from_tag, VERSION};

fn manifest_version() -> String {
    let manifest = std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml"))
        .expect("Cargo.toml should be readable");
    let table: toml::Table = toml::from_str(&manifest).expect("Cargo.toml should be valid TOML");
    table["package"]["version"]
        .as_str()
        .expect("package.version should be a string")
        .to_string()
}

#[test]
fn test_manifest_version_matches_release_tag() {
    let version = manifest_version();
    assert_eq!(VERSION, version);
    assert_eq!(release_tag(), format!("v{}", version));
}

#[test]
fn test_release_tag_round_trip() {
    let tag = release_tag();
    assert_eq!(version_from_tag(&tag).unwrap(), manifest_version());
    assert!(tag_matches_version(&tag));
    assert!(!tag_matches_version("v0.0.0-rc1"));
}

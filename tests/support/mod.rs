//! Shared helpers for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const DESCRIPTOR: &str = "project.pbxproj";

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("xcode")
        .join("Sample.xcodeproj")
        .join(DESCRIPTOR)
}

pub fn fixture_source() -> String {
    fs::read_to_string(fixture_path()).expect("Failed to read fixture project")
}

/// Creates `<root>/<relative>` as a bundle holding a copy of the sample descriptor.
pub fn install_fixture(root: &Path, relative: &str) -> PathBuf {
    let bundle = root.join(relative);
    fs::create_dir_all(&bundle).expect("Failed to create bundle directory");
    fs::copy(fixture_path(), bundle.join(DESCRIPTOR)).expect("Failed to copy fixture");
    bundle
}

pub fn read_descriptor(bundle: &Path) -> String {
    fs::read_to_string(bundle.join(DESCRIPTOR)).expect("Failed to read descriptor")
}

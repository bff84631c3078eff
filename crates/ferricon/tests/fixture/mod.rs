#![allow(dead_code)]

use std::ffi::OsStr;
use std::path::Path;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::assert::Assert;
use temp_dir::TempDir;

// NOTE: We don't do any fancy error handling here because this is
// exclusively used for tests.

/// A fully red 2x2 SVG.
pub const RED_SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="2" height="2"><rect width="2" height="2" fill="#ff0000"/></svg>"##;

/// A 2x2 SVG whose left half is red and whose right half is transparent.
pub const LEFT_HALF_RED: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="2" height="2"><rect width="1" height="2" fill="#ff0000"/></svg>"##;

/// Bytes which do not parse as an SVG.
pub const MALFORMED: &str = "not an svg";

/// A test environment in which to execute ferricon.
#[derive(Debug)]
pub struct Environment {
    dir: TempDir,
}

impl Environment {
    /// Creates a new empty test environment.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Creates a new test environment containing `logo.svg` with the given
    /// content.
    pub fn with_logo(content: &str) -> Self {
        let this = Self::new();
        this.write("logo.svg", content);
        this
    }
}

impl Environment {
    /// The root of this environment.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Writes a file into the environment.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Reads a file from the environment.
    pub fn read(&self, name: &str) -> Vec<u8> {
        std::fs::read(self.root().join(name)).unwrap()
    }

    /// Whether a file exists in the environment.
    pub fn exists(&self, name: &str) -> bool {
        self.root().join(name).exists()
    }
}

impl Environment {
    /// Runs ferricon in the test environment with the given args.
    pub fn run_ferricon<I, T>(&self, args: I) -> Assert
    where
        I: IntoIterator<Item = T>,
        T: AsRef<OsStr>,
    {
        Command::cargo_bin("ferricon")
            .unwrap()
            .current_dir(self.root())
            .args(args)
            .assert()
    }
}

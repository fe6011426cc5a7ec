use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::MirrorConfig;
use crate::package::Package;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Newest,
    NeedUpdate,
    NotExist,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Newest => "newest",
            Status::NeedUpdate => "need update",
            Status::NotExist => "not exist",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The local package directory.
pub struct Inventory {
    dir: PathBuf,
    legacy_marker: String,
}

impl Inventory {
    pub fn new(dir: PathBuf, legacy_marker: String) -> Self {
        Self { dir, legacy_marker }
    }

    pub fn from_config(config: &MirrorConfig) -> Self {
        Self::new(config.packages_dir.clone(), config.legacy_marker.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, package: &Package) -> PathBuf {
        self.dir.join(&package.filename)
    }

    pub fn exists(&self, package: &Package) -> bool {
        self.path_of(package).exists()
    }

    /// A package missing locally counts as stale, not absent, as soon as the
    /// directory holds the legacy marker entry. The check does not look at
    /// which release the package belongs to.
    pub fn status(&self, package: &Package) -> io::Result<Status> {
        if self.exists(package) {
            return Ok(Status::Newest);
        }
        if self.has_legacy_release()? {
            Ok(Status::NeedUpdate)
        } else {
            Ok(Status::NotExist)
        }
    }

    fn has_legacy_release(&self) -> io::Result<bool> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };
        for entry in entries {
            if entry?.file_name() == OsStr::new(&self.legacy_marker) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

use std::fmt;
use std::sync::OnceLock;
use regex::Regex;

use crate::error::{MirrorError, Result};

const MEDIA_MARKER: &str = "android-cts-media";
const VERIFIER_MARKER: &str = "verifier";

static URL_RE: OnceLock<Regex> = OnceLock::new();
static TEST_VERSION_RE: OnceLock<Regex> = OnceLock::new();
static VERIFIER_VERSION_RE: OnceLock<Regex> = OnceLock::new();
static RELEASE_RE: OnceLock<Regex> = OnceLock::new();
static PLATFORM_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("package pattern is a valid regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Test,
    Verifier,
    Media,
}

impl Category {
    pub fn of(filename: &str) -> Self {
        if filename.contains(MEDIA_MARKER) {
            Category::Media
        } else if filename.contains(VERIFIER_MARKER) {
            Category::Verifier
        } else {
            Category::Test
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Test => "test",
            Category::Verifier => "verifier",
            Category::Media => "media",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One downloadable archive, described by what its filename encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub url: String,
    pub filename: String,
    pub category: Category,
    pub android_version: Option<String>,
    pub release: Option<String>,
    pub platform: Option<String>,
}

impl Package {
    /// Builds a package from its download URL.
    ///
    /// Media bundles carry no version fields. Any other filename must match
    /// the `android-cts[-verifier]-<version>_<release>-<platform>.zip` shape,
    /// otherwise [`MirrorError::UnrecognizedFilename`] is returned.
    pub fn from_url(url: &str) -> Result<Self> {
        let filename = url.rsplit('/').next().unwrap_or_default().to_string();
        let category = Category::of(&filename);

        let (android_version, release, platform) = match category {
            Category::Media => (None, None, None),
            Category::Test | Category::Verifier => {
                let version_re = if category == Category::Verifier {
                    compiled(&VERIFIER_VERSION_RE, r"android-cts-verifier-(.+?)_")
                } else {
                    compiled(&TEST_VERSION_RE, r"android-cts-(.+?)_")
                };
                (
                    Some(capture(version_re, &filename)?),
                    Some(capture(compiled(&RELEASE_RE, r"_(r\d*)-"), &filename)?),
                    Some(capture(compiled(&PLATFORM_RE, r"r\d{1,2}-(.+)\.zip"), &filename)?),
                )
            }
        };

        Ok(Self {
            url: url.to_string(),
            filename,
            category,
            android_version,
            release,
            platform,
        })
    }
}

fn capture(re: &Regex, filename: &str) -> Result<String> {
    re.captures(filename)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| MirrorError::UnrecognizedFilename {
            filename: filename.to_string(),
        })
}

/// Absolute `https://` links to `.zip` archives, in page order.
///
/// A link only counts when `.zip` is its last segment, so `.zip.sha1` or
/// `.zipx` links are skipped instead of being cut short.
pub fn extract_urls(body: &str) -> Vec<String> {
    compiled(&URL_RE, r#"(https://[^\s"'<>]+\.zip)(?:[\s"'<>]|$)"#)
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn parse_packages(body: &str) -> Result<Vec<Package>> {
    extract_urls(body)
        .iter()
        .map(|url| Package::from_url(url))
        .collect()
}

pub fn search<'a>(packages: &'a [Package], version: &str) -> Vec<&'a Package> {
    packages
        .iter()
        .filter(|p| p.android_version.as_deref() == Some(version))
        .collect()
}

pub fn select_by_filename(packages: &[Package], filename: &str) -> Vec<Package> {
    packages
        .iter()
        .filter(|p| p.filename == filename)
        .cloned()
        .collect()
}

use std::fs;
use std::path::{Path, PathBuf};
use serde::Deserialize;

use crate::error::{MirrorError, Result};

/// Settings read from `cos.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorConfig {
    pub app_id: u64,
    pub secret_id: String,
    pub secret_key: String,
    pub region: String,
    pub bucket: String,
    /// Public base URL the index page links point at.
    pub cos_url: String,
    /// Vendor download page to scrape.
    pub cts_url: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_packages_dir")]
    pub packages_dir: PathBuf,
    #[serde(default = "default_remote_prefix")]
    pub remote_prefix: String,
    #[serde(default = "default_legacy_marker")]
    pub legacy_marker: String,
    #[serde(default = "default_index_file")]
    pub index_file: PathBuf,
}

fn default_packages_dir() -> PathBuf {
    Path::new("packages").join("CTS")
}

fn default_remote_prefix() -> String {
    "cts/".to_string()
}

fn default_legacy_marker() -> String {
    "android-cts-7.1".to_string()
}

fn default_index_file() -> PathBuf {
    PathBuf::from("index.html")
}

impl MirrorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| MirrorError::Config {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: MirrorConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("secret_id", &self.secret_id),
            ("secret_key", &self.secret_key),
            ("region", &self.region),
            ("bucket", &self.bucket),
            ("cos_url", &self.cos_url),
            ("cts_url", &self.cts_url),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(MirrorError::Config {
                    message: format!("`{}` must not be empty", name),
                });
            }
        }
        Ok(())
    }

    /// Bucket names on COS carry the app id as a suffix.
    pub fn bucket_name(&self) -> String {
        let suffix = format!("-{}", self.app_id);
        if self.bucket.ends_with(&suffix) {
            self.bucket.clone()
        } else {
            format!("{}{}", self.bucket, suffix)
        }
    }

    pub fn endpoint(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://cos.{}.myqcloud.com", self.region),
        }
    }

    pub fn remote_key(&self, filename: &str) -> String {
        let prefix = self.remote_prefix.trim_matches('/');
        if prefix.is_empty() {
            filename.to_string()
        } else {
            format!("{}/{}", prefix, filename)
        }
    }
}

use std::fmt;
use std::path::PathBuf;

use crate::config::MirrorConfig;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::index::{self, INDEX_OBJECT};
use crate::inventory::{Inventory, Status};
use crate::package::{self, Package};
use crate::report;
use crate::store::{ObjectStore, S3Store};

const ZIP_CONTENT_TYPE: &str = "application/zip";
const HTML_CONTENT_TYPE: &str = "text/html";

/// Outcome counts of one sync run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    pub downloaded: u64,
    pub skipped: u64,
    /// Missing locally while an older release is present; left untouched.
    pub stale: u64,
    pub uploaded: u64,
    pub already_remote: u64,
    pub failed: u64,
}

impl fmt::Display for SyncStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} downloaded, {} skipped, {} need update, {} uploaded, {} already in bucket, {} failed",
            self.downloaded, self.skipped, self.stale, self.uploaded, self.already_remote, self.failed
        )
    }
}

pub struct Mirror<S> {
    store: S,
    fetcher: Fetcher,
    inventory: Inventory,
    config: MirrorConfig,
}

impl Mirror<S3Store> {
    pub fn new_with_config(config: &MirrorConfig, proxy: Option<&str>) -> Result<Self> {
        let store = S3Store::from_config(config)?;
        let fetcher = Fetcher::new(proxy)?;
        log::debug!("mirroring into bucket {} at {}", store.bucket(), config.endpoint());
        Ok(Self::with_store(config.clone(), store, fetcher))
    }
}

impl<S: ObjectStore> Mirror<S> {
    pub fn with_store(config: MirrorConfig, store: S, fetcher: Fetcher) -> Self {
        let inventory = Inventory::from_config(&config);
        Self {
            store,
            fetcher,
            inventory,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Scrapes the download page into packages.
    pub async fn retrieve_packages(&self) -> Result<Vec<Package>> {
        let body = self.fetcher.fetch_page(&self.config.cts_url).await?;
        let packages = package::parse_packages(&body)?;
        log::info!("found {} packages on {}", packages.len(), self.config.cts_url);
        Ok(packages)
    }

    pub fn list(&self, packages: &[Package]) -> Result<String> {
        report::render(packages, &self.inventory)
    }

    pub fn search<'a>(&self, packages: &'a [Package], version: &str) -> Vec<&'a Package> {
        package::search(packages, version)
    }

    /// Brings each package into the local directory, then into the bucket.
    ///
    /// Packages reported as `need update` are only logged; nothing is fetched
    /// for them. The bucket is checked for every package regardless of the
    /// local outcome, and a missing object is uploaded from the local copy.
    /// Storage failures are logged and counted, never retried.
    pub async fn sync(&self, packages: &[Package]) -> Result<SyncStats> {
        if !self.inventory.dir().exists() {
            std::fs::create_dir_all(self.inventory.dir())?;
        }

        let mut stats = SyncStats::default();
        for package in packages {
            println!("{}", package.filename);
            let local_path = self.inventory.path_of(package);

            match self.inventory.status(package)? {
                Status::NeedUpdate => {
                    println!("update");
                    log::warn!("{} needs update, leaving local copy as is", package.filename);
                    stats.stale += 1;
                }
                Status::NotExist => {
                    println!("downloading {}", package.filename);
                    let bytes = self.fetcher.download(&package.url, &local_path).await?;
                    log::info!("downloaded {} ({} bytes)", package.filename, bytes);
                    stats.downloaded += 1;
                }
                Status::Newest => {
                    println!("skip {}", package.filename);
                    stats.skipped += 1;
                }
            }

            let key = self.config.remote_key(&package.filename);
            match self.store.stat(&key).await {
                Ok(Some(info)) => {
                    log::debug!("{} already in bucket ({} bytes)", info.key, info.size);
                    stats.already_remote += 1;
                }
                Ok(None) => {
                    match self.store.upload(&key, &local_path, Some(ZIP_CONTENT_TYPE)).await {
                        Ok(()) => {
                            log::info!("uploaded {}", key);
                            stats.uploaded += 1;
                        }
                        Err(e) => {
                            log::error!("{}", e);
                            stats.failed += 1;
                        }
                    }
                }
                Err(e) => {
                    log::error!("{}", e);
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }

    /// Writes the index page locally and uploads it next to the packages.
    ///
    /// A failed upload is logged; the local page is kept either way.
    pub async fn publish_index(&self, packages: &[Package]) -> Result<PathBuf> {
        let html = index::render(packages, &self.config.cos_url);
        let path = self.config.index_file.clone();
        tokio::fs::write(&path, html).await?;

        let key = self.config.remote_key(INDEX_OBJECT);
        match self.store.upload(&key, &path, Some(HTML_CONTENT_TYPE)).await {
            Ok(()) => log::info!("published index of {} packages to {}", packages.len(), key),
            Err(e) => log::error!("{}", e),
        }
        Ok(path)
    }
}

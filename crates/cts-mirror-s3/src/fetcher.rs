use std::fs;
use std::path::Path;
use std::time::Duration;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Proxy};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use crate::error::{MirrorError, Result};

pub const PAGE_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP side of the mirror: the download page and the archives it links to.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(proxy: Option<&str>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(proxy) = proxy {
            let proxy = Proxy::https(proxy).map_err(|e| MirrorError::Config {
                message: format!("invalid proxy {}: {}", proxy, e),
            })?;
            builder = builder.proxy(proxy);
        }
        let client = builder.build().map_err(|e| MirrorError::Client {
            message: e.to_string(),
        })?;
        Ok(Self { client })
    }

    /// Uses an already configured client, e.g. one that ignores proxy
    /// environment variables.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        log::debug!("fetching {}", url);
        let response = self
            .client
            .get(url)
            .timeout(PAGE_TIMEOUT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| MirrorError::http(url, e))?;
        response.text().await.map_err(|e| MirrorError::http(url, e))
    }

    /// Streams `url` into `destination` behind a progress bar.
    ///
    /// Bytes land in a temporary file next to the destination, which is only
    /// renamed into place once the body has been read completely.
    pub async fn download(&self, url: &str, destination: &Path) -> Result<u64> {
        let dir = match destination.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| MirrorError::http(url, e))?;
        let progress = progress_bar(response.content_length());

        let temp_file = NamedTempFile::new_in(dir)?;
        let mut file = tokio::fs::File::from_std(temp_file.as_file().try_clone()?);
        let mut stream = response.bytes_stream();
        let mut received = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| MirrorError::http(url, e))?;
            file.write_all(&chunk).await?;
            received += chunk.len() as u64;
            progress.inc(chunk.len() as u64);
        }
        file.flush().await?;
        progress.finish();

        temp_file.persist(destination).map_err(|e| e.error)?;
        Ok(received)
    }
}

fn progress_bar(total: Option<u64>) -> ProgressBar {
    match total.filter(|t| *t > 0) {
        Some(total) => {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::with_template("{percent}% complete  {bytes}/{total_bytes}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("{spinner} {bytes} received")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        }
    }
}

use std::path::Path;
use async_trait::async_trait;
use futures::TryStreamExt;
use rusoto_core::{ByteStream, RusotoError};
use rusoto_s3::{HeadObjectError, HeadObjectRequest, PutObjectRequest, S3Client, S3};
use tokio_util::codec::{BytesCodec, FramedRead};

use crate::client::create_s3_client_with_config;
use crate::config::MirrorConfig;
use crate::error::{MirrorError, Result};

/// Metadata returned by a successful stat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub key: String,
    pub size: u64,
    pub etag: Option<String>,
}

/// The two bucket operations the mirror needs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Returns `None` when the object does not exist.
    async fn stat(&self, key: &str) -> Result<Option<ObjectInfo>>;

    async fn upload(&self, key: &str, path: &Path, content_type: Option<&str>) -> Result<()>;
}

pub struct S3Store {
    client: S3Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    pub fn from_config(config: &MirrorConfig) -> Result<Self> {
        let client = create_s3_client_with_config(config)?;
        Ok(Self::new(client, config.bucket_name()))
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn stat(&self, key: &str) -> Result<Option<ObjectInfo>> {
        let head_req = HeadObjectRequest {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            ..Default::default()
        };

        match self.client.head_object(head_req).await {
            Ok(output) => Ok(Some(ObjectInfo {
                key: key.to_string(),
                size: output.content_length.unwrap_or(0).max(0) as u64,
                etag: output.e_tag,
            })),
            Err(RusotoError::Service(HeadObjectError::NoSuchKey(_))) => Ok(None),
            // HEAD responses carry no body, so a missing key usually arrives
            // as an unparsed 404.
            Err(RusotoError::Unknown(ref response)) if response.status.as_u16() == 404 => Ok(None),
            Err(e) => Err(MirrorError::Head {
                bucket: self.bucket.clone(),
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn upload(&self, key: &str, path: &Path, content_type: Option<&str>) -> Result<()> {
        let upload_error = |message: String| MirrorError::Upload {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            path: path.display().to_string(),
            message,
        };

        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| upload_error(e.to_string()))?;
        let size = file
            .metadata()
            .await
            .map_err(|e| upload_error(e.to_string()))?
            .len();

        let stream = FramedRead::new(file, BytesCodec::new()).map_ok(|chunk| chunk.freeze());
        let put_req = PutObjectRequest {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            body: Some(ByteStream::new_with_size(stream, size as usize)),
            content_length: Some(size as i64),
            content_type: content_type.map(str::to_string),
            ..Default::default()
        };

        let output = self.client.put_object(put_req).await
            .map_err(|e| upload_error(e.to_string()))?;
        log::debug!(
            "uploaded {} bytes to s3://{}/{} (etag {:?})",
            size, self.bucket, key, output.e_tag
        );
        Ok(())
    }
}

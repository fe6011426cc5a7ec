use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to create storage client: {message}")]
    Client { message: String },

    #[error("Request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    /// A package link whose filename carries none of the expected
    /// version/release/platform fields.
    #[error("Unrecognized package filename: {filename}")]
    UnrecognizedFilename { filename: String },

    #[error("Failed to stat s3://{bucket}/{key}: {message}")]
    Head {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("Failed to upload {path} to s3://{bucket}/{key}: {message}")]
    Upload {
        bucket: String,
        key: String,
        path: String,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MirrorError {
    pub(crate) fn http(url: &str, source: reqwest::Error) -> Self {
        MirrorError::Http {
            url: url.to_string(),
            source,
        }
    }
}

pub type Result<T, E = MirrorError> = std::result::Result<T, E>;

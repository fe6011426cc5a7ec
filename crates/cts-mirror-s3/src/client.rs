use rusoto_core::{Region, HttpClient};
use rusoto_credential::StaticProvider;
use rusoto_s3::S3Client;

use crate::config::MirrorConfig;
use crate::error::{MirrorError, Result};

pub fn region_for(config: &MirrorConfig) -> Region {
    Region::Custom {
        name: config.region.clone(),
        endpoint: config.endpoint(),
    }
}

pub fn create_s3_client_with_config(config: &MirrorConfig) -> Result<S3Client> {
    let provider = StaticProvider::new_minimal(
        config.secret_id.clone(),
        config.secret_key.clone(),
    );

    let dispatcher = HttpClient::new()
        .map_err(|e| MirrorError::Client { message: e.to_string() })?;

    Ok(S3Client::new_with(
        dispatcher,
        provider,
        region_for(config),
    ))
}

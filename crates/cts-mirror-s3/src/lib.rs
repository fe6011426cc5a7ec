mod client;
mod config;
mod error;
mod fetcher;
mod index;
mod inventory;
mod mirror;
mod package;
mod report;
mod store;


pub use client::{create_s3_client_with_config, region_for};
pub use config::MirrorConfig;
pub use error::{MirrorError, Result};
pub use fetcher::Fetcher;
pub use inventory::{Inventory, Status};
pub use mirror::{Mirror, SyncStats};
pub use package::{extract_urls, parse_packages, search, select_by_filename, Category, Package};
pub use store::{ObjectInfo, ObjectStore, S3Store};

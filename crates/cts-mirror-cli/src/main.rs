use std::io::Write;
use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser};
use cts_mirror_s3::{select_by_filename, Mirror, MirrorConfig};
use log::LevelFilter;

/// Mirrors Android CTS package archives into a COS bucket.
#[derive(Parser, Debug)]
#[command(name = "cts-mirror", version, disable_help_flag = true)]
struct Cli {
    /// List packages with their local status
    #[arg(short, long)]
    list: bool,

    /// Download missing packages and upload them to the bucket
    #[arg(short, long)]
    update: bool,

    /// Sync a single package by filename
    #[arg(short, long, value_name = "FILENAME")]
    download: Option<String>,

    /// Print packages for an Android version, e.g. 7.1
    #[arg(short, long, value_name = "VERSION")]
    search: Option<String>,

    /// Generate index.html and upload it to the bucket
    #[arg(short = 'h', long)]
    html: bool,

    /// HTTPS proxy for the download page
    #[arg(short, long)]
    proxy: Option<String>,

    #[arg(short, long, default_value = "cos.yaml")]
    config: PathBuf,

    #[arg(short, long)]
    verbose: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Cli {
    fn has_action(&self) -> bool {
        self.list || self.update || self.download.is_some() || self.search.is_some() || self.html
    }
}

fn init_logger(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_module(env!("CARGO_CRATE_NAME"), LevelFilter::Debug);
        builder.filter_module("cts_mirror_s3", LevelFilter::Debug);
    }
    builder.format(|buf, record| {
        writeln!(buf, "{} - {}: {}", buf.timestamp(), record.level(), record.args())
    });
    let _ = builder.try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if !cli.has_action() {
        Cli::command().print_help()?;
        return Ok(());
    }

    let config = MirrorConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let mirror = Mirror::new_with_config(&config, cli.proxy.as_deref())
        .context("setting up mirror")?;

    if cli.list {
        let packages = mirror.retrieve_packages().await?;
        print!("{}", mirror.list(&packages)?);
    }

    if cli.update {
        let packages = mirror.retrieve_packages().await?;
        let stats = mirror.sync(&packages).await?;
        log::info!("update finished: {}", stats);
    }

    if let Some(filename) = &cli.download {
        let packages = mirror.retrieve_packages().await?;
        let selected = select_by_filename(&packages, filename);
        if selected.is_empty() {
            log::warn!("no package named {} on {}", filename, config.cts_url);
        }
        let stats = mirror.sync(&selected).await?;
        log::info!("download finished: {}", stats);
    }

    if let Some(version) = &cli.search {
        let packages = mirror.retrieve_packages().await?;
        for package in mirror.search(&packages, version) {
            println!("{}", package.filename);
        }
    }

    if cli.html {
        let packages = mirror.retrieve_packages().await?;
        let path = mirror.publish_index(&packages).await?;
        log::info!("wrote {}", path.display());
    }

    Ok(())
}

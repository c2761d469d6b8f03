use crate::{models::object::PublicUrl, services::s3_store::S3Settings};
use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use std::env;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Which object store the gateway talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    /// An S3 (or S3-compatible) bucket.
    S3,
    /// Process-local store; contents vanish on exit.
    Memory,
}

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub backend: StorageBackend,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub public_base_url: Option<String>,
    pub max_upload_bytes: usize,
    pub force_path_style: bool,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Image dashboard gateway for an object-storage bucket")]
pub struct Args {
    /// Host to bind to (overrides IMAGE_DASHBOARD_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides IMAGE_DASHBOARD_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Storage backend (overrides IMAGE_DASHBOARD_BACKEND)
    #[arg(long, value_enum)]
    pub backend: Option<StorageBackend>,

    /// Bucket holding the images (overrides AWS_S3_BUCKET_NAME)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Bucket region (overrides AWS_REGION)
    #[arg(long)]
    pub region: Option<String>,

    /// Base URL used for image links instead of the S3 virtual-host URL
    /// (overrides IMAGE_DASHBOARD_PUBLIC_BASE_URL)
    #[arg(long)]
    pub public_base_url: Option<String>,

    /// Largest accepted upload in bytes (overrides IMAGE_DASHBOARD_MAX_UPLOAD_BYTES)
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    /// Use path-style bucket addressing (overrides IMAGE_DASHBOARD_FORCE_PATH_STYLE)
    #[arg(long)]
    pub force_path_style: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        let args = Args::parse();
        Self::resolve(args, |name| env::var(name).ok())
    }

    /// Merge parsed CLI args over values looked up by `lookup` (normally
    /// the process environment).
    pub fn resolve(args: Args, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // --- Environment fallback ---
        let env_host = lookup("IMAGE_DASHBOARD_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let env_port = match lookup("IMAGE_DASHBOARD_PORT") {
            Some(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing IMAGE_DASHBOARD_PORT value `{}`", value))?,
            None => 3000,
        };
        let env_backend = match lookup("IMAGE_DASHBOARD_BACKEND") {
            Some(value) => StorageBackend::from_str(&value, true)
                .map_err(|e| anyhow::anyhow!(e))
                .with_context(|| format!("parsing IMAGE_DASHBOARD_BACKEND value `{}`", value))?,
            None => StorageBackend::S3,
        };
        let env_max_upload = match lookup("IMAGE_DASHBOARD_MAX_UPLOAD_BYTES") {
            Some(value) => value.parse::<usize>().with_context(|| {
                format!("parsing IMAGE_DASHBOARD_MAX_UPLOAD_BYTES value `{}`", value)
            })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };
        let env_path_style = lookup("IMAGE_DASHBOARD_FORCE_PATH_STYLE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            backend: args.backend.unwrap_or(env_backend),
            bucket: args.bucket.or_else(|| lookup("AWS_S3_BUCKET_NAME")).filter(|b| !b.is_empty()),
            region: args.region.or_else(|| lookup("AWS_REGION")).filter(|r| !r.is_empty()),
            public_base_url: args
                .public_base_url
                .or_else(|| lookup("IMAGE_DASHBOARD_PUBLIC_BASE_URL"))
                .filter(|u| !u.is_empty()),
            max_upload_bytes: args.max_upload_bytes.unwrap_or(env_max_upload),
            force_path_style: args.force_path_style || env_path_style,
        };

        if cfg.backend == StorageBackend::S3 {
            cfg.s3_settings()?;
        }

        Ok(cfg)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Host to put in self-served links. Wildcard bind addresses are not
    /// reachable from a browser.
    fn link_host(&self) -> &str {
        match self.host.as_str() {
            "0.0.0.0" | "::" | "[::]" => "localhost",
            host => host,
        }
    }

    /// Settings for the S3 client; bucket and region are mandatory.
    pub fn s3_settings(&self) -> Result<S3Settings> {
        let Some(bucket) = self.bucket.clone() else {
            bail!("bucket name missing: set AWS_S3_BUCKET_NAME or --bucket");
        };
        let Some(region) = self.region.clone() else {
            bail!("region missing: set AWS_REGION or --region");
        };
        Ok(S3Settings {
            bucket,
            region,
            force_path_style: self.force_path_style,
        })
    }

    /// How image URLs are built for responses.
    ///
    /// Without a public base URL or an S3 bucket, links point at this
    /// server's own `/objects` route.
    pub fn public_urls(&self) -> PublicUrl {
        if let Some(base) = &self.public_base_url {
            return PublicUrl::Base(base.clone());
        }
        match (&self.bucket, &self.region) {
            (Some(bucket), Some(region)) => PublicUrl::S3 {
                bucket: bucket.clone(),
                region: region.clone(),
            },
            _ => PublicUrl::Base(format!("http://{}:{}/objects", self.link_host(), self.port)),
        }
    }
}

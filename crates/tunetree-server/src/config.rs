use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tunetree_store::S3Config;
use tunetree_types::Namespace;

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory holding `index.html` and the browser assets.
    pub static_dir: PathBuf,
    /// Upper bound on one `/api` request, in seconds.
    pub request_timeout_secs: u64,
    /// Prefix under which all catalog keys live.
    pub root_prefix: Namespace,
    pub store: S3Config,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            static_dir: PathBuf::from("static"),
            request_timeout_secs: 30,
            root_prefix: Namespace::unrooted(),
            store: S3Config::default(),
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read a TOML config file.
    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Defaults, overlaid with `path` (if given), overlaid with the process
    /// environment.
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(std::env::vars())?;
        Ok(config)
    }

    /// Overlay recognized environment variables.
    ///
    /// `BUCKET`, `AWS_REGION`, `S3_PREFIX`, `AWS_ENDPOINT_URL`,
    /// `TUNETREE_BIND`. Empty values are ignored.
    pub fn apply_env<I>(&mut self, vars: I) -> ServerResult<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            if value.is_empty() {
                continue;
            }
            match name.as_str() {
                "BUCKET" => self.store.bucket = value,
                "AWS_REGION" => self.store.region = Some(value),
                "S3_PREFIX" => self.root_prefix = Namespace::new(value),
                "AWS_ENDPOINT_URL" => self.store.endpoint = Some(value),
                "TUNETREE_BIND" => {
                    self.bind_addr = value.parse().map_err(|_| {
                        ServerError::Config(format!("invalid TUNETREE_BIND address: {value}"))
                    })?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Bucket and region are required to reach the store.
    pub fn validate(&self) -> ServerResult<()> {
        if self.store.bucket.is_empty() || self.store.region.is_none() {
            return Err(ServerError::Config(
                "BUCKET and AWS_REGION environment variables must be set".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ServerError::Config("request timeout must be positive".into()));
        }
        Ok(())
    }
}

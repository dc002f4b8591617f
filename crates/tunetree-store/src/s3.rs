//! Amazon S3 backend.

use async_stream::try_stream;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::types::Object;
use aws_sdk_s3::Client;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::object::{GroupedListing, ObjectBody, ObjectStream, ObjectSummary};
use crate::traits::ObjectStore;

/// Connection settings for an S3 bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Config {
    /// Bucket name.
    pub bucket: String,
    /// AWS region.
    pub region: Option<String>,
    /// Custom endpoint URL (MinIO, LocalStack, ...).
    pub endpoint: Option<String>,
    /// Explicit access key; the default credential chain is used otherwise.
    pub access_key: Option<String>,
    /// Explicit secret key.
    pub secret_key: Option<String>,
    /// Named AWS profile.
    pub profile: Option<String>,
}

impl S3Config {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}

/// [`ObjectStore`] over one S3 bucket.
#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Load AWS configuration and build a client for `config.bucket`.
    pub async fn connect(config: &S3Config) -> StoreResult<Self> {
        if config.bucket.is_empty() {
            return Err(StoreError::Unavailable("no bucket configured".into()));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
            let credentials = aws_sdk_s3::config::Credentials::new(
                access_key, secret_key, None, None, "tunetree",
            );
            loader = loader.credentials_provider(credentials);
        }
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;

        // Custom endpoints are usually MinIO/LocalStack, which need path-style.
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint.is_some())
            .build();

        Ok(Self::from_client(Client::from_conf(s3_config), &config.bucket))
    }

    /// Wrap an existing client.
    pub fn from_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    fn unavailable(&self, op: &str, target: &str, err: impl std::error::Error) -> StoreError {
        StoreError::Unavailable(format!(
            "{op} s3://{}/{target}: {}",
            self.bucket,
            DisplayErrorContext(err)
        ))
    }
}

fn summarize(obj: &Object) -> Option<ObjectSummary> {
    let key = obj.key()?;
    Some(ObjectSummary {
        key: key.to_string(),
        size: obj.size().unwrap_or(0).max(0) as u64,
        content_type: None,
    })
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_grouped(&self, prefix: &str, delimiter: &str) -> StoreResult<GroupedListing> {
        let mut listing = GroupedListing::default();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut req = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .delimiter(delimiter);
            if let Some(token) = &continuation_token {
                req = req.continuation_token(token);
            }

            let resp = req
                .send()
                .await
                .map_err(|e| self.unavailable("list", prefix, e))?;

            listing.common_prefixes.extend(
                resp.common_prefixes()
                    .iter()
                    .filter_map(|cp| cp.prefix().map(str::to_owned)),
            );
            listing
                .objects
                .extend(resp.contents().iter().filter_map(summarize));

            debug!(
                bucket = %self.bucket,
                prefix,
                groups = listing.common_prefixes.len(),
                objects = listing.objects.len(),
                "grouped listing page"
            );

            continuation_token = match resp.is_truncated() {
                Some(true) => resp.next_continuation_token().map(str::to_owned),
                _ => None,
            };
            if continuation_token.is_none() {
                break;
            }
        }

        Ok(listing)
    }

    fn list_flat<'a>(&'a self, prefix: &'a str) -> ObjectStream<'a> {
        Box::pin(try_stream! {
            let mut continuation_token: Option<String> = None;

            loop {
                let mut req = self.client.list_objects_v2().bucket(&self.bucket).prefix(prefix);
                if let Some(token) = &continuation_token {
                    req = req.continuation_token(token);
                }

                let resp = req
                    .send()
                    .await
                    .map_err(|e| self.unavailable("list", prefix, e))?;

                debug!(
                    bucket = %self.bucket,
                    prefix,
                    keys = resp.contents().len(),
                    "flat listing page"
                );

                for obj in resp.contents().iter().filter_map(summarize) {
                    yield obj;
                }

                continuation_token = match resp.is_truncated() {
                    Some(true) => resp.next_continuation_token().map(str::to_owned),
                    _ => None,
                };
                if continuation_token.is_none() {
                    break;
                }
            }
        })
    }

    async fn get_object(&self, key: &str) -> StoreResult<ObjectBody> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|s| s.is_no_such_key()) {
                    StoreError::NotFound(key.to_string())
                } else {
                    self.unavailable("get", key, e)
                }
            })?;

        let length = resp.content_length().unwrap_or(0).max(0) as u64;
        let content_type = resp.content_type().map(str::to_owned);
        debug!(bucket = %self.bucket, key, length, "opened object");

        let body = ReaderStream::new(resp.body.into_async_read())
            .map(|chunk| chunk.map_err(StoreError::from))
            .boxed();

        Ok(ObjectBody {
            body,
            length,
            content_type,
        })
    }
}

use anyhow::{anyhow, Context};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde_json::json;
use url::Url;

/// Timestamp format of the `X-Amz-Date` query parameter.
const AMZ_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Validity window of a pre-signed S3 URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresignWindow {
    pub generated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PresignWindow {
    /// Read `X-Amz-Date` and `X-Amz-Expires` from a pre-signed URL.
    pub fn from_url(raw: &str) -> anyhow::Result<Self> {
        let url = Url::parse(raw).context("invalid URL")?;
        let param = |name: &str| {
            url.query_pairs()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned())
        };
        let (date, expires) = match (param("X-Amz-Date"), param("X-Amz-Expires")) {
            (Some(date), Some(expires)) => (date, expires),
            _ => return Err(anyhow!("could not find X-Amz-Date or X-Amz-Expires in the URL")),
        };

        let generated_at = NaiveDateTime::parse_from_str(&date, AMZ_DATE_FORMAT)
            .with_context(|| format!("invalid X-Amz-Date {date:?}"))?
            .and_utc();
        let seconds: u32 = expires
            .parse()
            .with_context(|| format!("invalid X-Amz-Expires {expires:?}"))?;
        let expires_at = generated_at
            .checked_add_signed(Duration::seconds(i64::from(seconds)))
            .ok_or_else(|| anyhow!("expiry time out of range"))?;

        Ok(Self {
            generated_at,
            expires_at,
        })
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn to_json(&self, now: DateTime<Utc>) -> serde_json::Value {
        json!({
            "generated_at": self.generated_at.to_rfc3339(),
            "expires_at": self.expires_at.to_rfc3339(),
            "now": now.to_rfc3339(),
            "valid": self.is_valid_at(now),
        })
    }
}

use std::fmt;

use colored::Colorize;
use tunetree_server::ServerConfig;

/// Characters of a credential shown in diagnostics.
const CREDENTIAL_PREFIX_LEN: usize = 4;

/// Version information baked in at compile time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: Option<&'static str>,
    pub build_date: Option<&'static str>,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            commit: option_env!("TUNETREE_COMMIT"),
            build_date: option_env!("TUNETREE_BUILD_DATE"),
        }
    }
}

/// Startup report printed before the server binds.
#[derive(Debug)]
pub struct Diagnostics {
    pub build: BuildInfo,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
    pub prefix: String,
}

impl Diagnostics {
    /// Collect from `config`, falling back to the standard AWS variables for
    /// credentials the config does not carry.
    pub fn collect(config: &ServerConfig) -> Self {
        let access_key = config
            .store
            .access_key
            .clone()
            .or_else(|| std::env::var("AWS_ACCESS_KEY_ID").ok());
        let secret_key = config
            .store
            .secret_key
            .clone()
            .or_else(|| std::env::var("AWS_SECRET_ACCESS_KEY").ok());
        Self::new(BuildInfo::current(), config, access_key.as_deref(), secret_key.as_deref())
    }

    pub fn new(
        build: BuildInfo,
        config: &ServerConfig,
        access_key: Option<&str>,
        secret_key: Option<&str>,
    ) -> Self {
        Self {
            build,
            access_key: credential_prefix(access_key),
            secret_key: credential_prefix(secret_key),
            bucket: config.store.bucket.clone(),
            region: config.store.region.clone().unwrap_or_default(),
            prefix: config.root_prefix.root().to_string(),
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", "tunetree".bold(), self.build.version.cyan())?;
        writeln!(f, "  commit:      {}", self.build.commit.unwrap_or("unknown"))?;
        writeln!(f, "  build date:  {}", self.build.build_date.unwrap_or("unknown"))?;
        writeln!(f, "  AWS_ACCESS_KEY_ID (first 4):     {}", self.access_key)?;
        writeln!(f, "  AWS_SECRET_ACCESS_KEY (first 4): {}", self.secret_key)?;
        writeln!(f, "  BUCKET:     {}", self.bucket.yellow())?;
        writeln!(f, "  AWS_REGION: {}", self.region)?;
        write!(f, "  S3_PREFIX:  {}", self.prefix)
    }
}

/// The first few characters of a credential, or nothing when it is too short
/// to reveal only a prefix.
pub fn credential_prefix(value: Option<&str>) -> String {
    match value {
        Some(v) if v.chars().count() >= CREDENTIAL_PREFIX_LEN => {
            v.chars().take(CREDENTIAL_PREFIX_LEN).collect()
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunetree_types::Namespace;

    fn build() -> BuildInfo {
        BuildInfo {
            version: "1.2.3",
            commit: Some("abc1234"),
            build_date: None,
        }
    }

    #[test]
    fn prefix_of_long_credential() {
        assert_eq!(credential_prefix(Some("AKIAEXAMPLE")), "AKIA");
    }

    #[test]
    fn short_or_missing_credentials_are_hidden() {
        assert_eq!(credential_prefix(Some("abc")), "");
        assert_eq!(credential_prefix(Some("")), "");
        assert_eq!(credential_prefix(None), "");
    }

    #[test]
    fn prefix_counts_characters() {
        assert_eq!(credential_prefix(Some("ééééé")), "éééé");
    }

    #[test]
    fn current_build_has_version() {
        assert_eq!(BuildInfo::current().version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn report_never_contains_full_secret() {
        colored::control::set_override(false);
        let mut config = ServerConfig::default();
        config.store.bucket = "music".into();
        config.store.region = Some("eu-west-1".into());
        config.root_prefix = Namespace::new("library");

        let report = Diagnostics::new(build(), &config, Some("AKIAEXAMPLE"), Some("s3cr3tvalue"))
            .to_string();
        assert!(report.contains("tunetree 1.2.3"));
        assert!(report.contains("commit:      abc1234"));
        assert!(report.contains("build date:  unknown"));
        assert!(report.contains("(first 4):     AKIA"));
        assert!(report.contains("(first 4): s3cr"));
        assert!(!report.contains("s3cr3tvalue"));
        assert!(report.contains("BUCKET:     music"));
        assert!(report.contains("AWS_REGION: eu-west-1"));
        assert!(report.contains("S3_PREFIX:  library/"));
    }
}

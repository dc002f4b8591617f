use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tunetree",
    about = "Browse and search an S3 music library as a directory tree",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Key prefix under which the library lives (overrides S3_PREFIX)
    #[arg(long, global = true)]
    pub prefix: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// List one directory level
    Browse(PathArgs),
    /// Find audio files whose path contains a string
    SearchTitles(QueryArgs),
    /// Find directories whose path contains a string
    SearchDirs(QueryArgs),
    /// List every audio file, optionally under one directory
    Files(PathArgs),
    /// List every directory
    Dirs,
    /// Union of the audio files in several directories
    Aggregate(AggregateArgs),
    /// Report whether a pre-signed S3 URL has expired
    PresignCheck(PresignArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct PathArgs {
    pub path: Option<String>,
}

#[derive(Args)]
pub struct QueryArgs {
    pub query: String,
}

#[derive(Args)]
pub struct AggregateArgs {
    /// JSON array of directory paths, e.g. '["jazz","rock"]'
    pub folders: String,
}

#[derive(Args)]
pub struct PresignArgs {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve() {
        let cli = Cli::try_parse_from(["tunetree", "serve", "--bind", "127.0.0.1:9000"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.bind, Some("127.0.0.1:9000".parse().unwrap()));
            assert!(args.static_dir.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_serve_bad_bind() {
        assert!(Cli::try_parse_from(["tunetree", "serve", "--bind", "nowhere"]).is_err());
    }

    #[test]
    fn parse_browse_root() {
        let cli = Cli::try_parse_from(["tunetree", "browse"]).unwrap();
        if let Command::Browse(args) = cli.command {
            assert!(args.path.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_search_titles() {
        let cli = Cli::try_parse_from(["tunetree", "search-titles", "miles"]).unwrap();
        if let Command::SearchTitles(args) = cli.command {
            assert_eq!(args.query, "miles");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_search_requires_query() {
        assert!(Cli::try_parse_from(["tunetree", "search-dirs"]).is_err());
    }

    #[test]
    fn parse_aggregate() {
        let cli = Cli::try_parse_from(["tunetree", "aggregate", r#"["jazz","rock"]"#]).unwrap();
        if let Command::Aggregate(args) = cli.command {
            assert_eq!(args.folders, r#"["jazz","rock"]"#);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tunetree", "dirs", "--format", "json", "--prefix", "music", "-v",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Dirs));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.prefix.as_deref(), Some("music"));
        assert!(cli.verbose);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::try_parse_from(["tunetree", "--config", "/etc/tunetree.toml", "files", "jazz"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/tunetree.toml")));
        if let Command::Files(args) = cli.command {
            assert_eq!(args.path.as_deref(), Some("jazz"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn default_format_is_text() {
        let cli = Cli::try_parse_from(["tunetree", "presign-check", "https://x"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Text);
    }
}

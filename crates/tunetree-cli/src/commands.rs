use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use tunetree_catalog::{Catalog, CatalogRequest, CatalogResponse, Payload};
use tunetree_server::{ServerConfig, TunetreeServer};
use tunetree_store::S3ObjectStore;
use tunetree_types::Namespace;

use crate::cli::*;
use crate::diagnostics::Diagnostics;
use crate::presign::PresignWindow;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        format,
        config,
        prefix,
        ..
    } = cli;

    if let Command::PresignCheck(args) = &command {
        return cmd_presign_check(&args.url, format);
    }

    let mut config = ServerConfig::load(config.as_deref())?;
    if let Some(prefix) = prefix {
        config.root_prefix = Namespace::new(prefix);
    }

    match command {
        Command::Serve(args) => cmd_serve(config, args).await,
        other => match catalog_request(&other) {
            Some(request) => cmd_query(&config, &request, format).await,
            None => bail!("command does not query the catalog"),
        },
    }
}

/// The catalog request a one-shot query command stands for.
pub fn catalog_request(command: &Command) -> Option<CatalogRequest> {
    let path = |args: &PathArgs| args.path.clone().unwrap_or_default();
    let request = match command {
        Command::Browse(args) => CatalogRequest::Browse { path: path(args) },
        Command::SearchTitles(args) => CatalogRequest::SearchTitles {
            query: args.query.clone(),
        },
        Command::SearchDirs(args) => CatalogRequest::SearchDirs {
            query: args.query.clone(),
        },
        Command::Files(args) => match args.path.as_deref() {
            None | Some("") => CatalogRequest::AllAudioFiles,
            Some(p) => CatalogRequest::AllAudioFilesUnder { path: p.to_string() },
        },
        Command::Dirs => CatalogRequest::AllDirectories,
        Command::Aggregate(args) => CatalogRequest::AggregateFiles {
            payload: args.folders.clone(),
        },
        Command::Serve(_) | Command::PresignCheck(_) => return None,
    };
    Some(request)
}

async fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(dir) = args.static_dir {
        config.static_dir = dir;
    }
    println!("{}", Diagnostics::collect(&config));

    let server = TunetreeServer::connect(config).await?;
    server.serve().await?;
    Ok(())
}

async fn cmd_query(
    config: &ServerConfig,
    request: &CatalogRequest,
    format: OutputFormat,
) -> anyhow::Result<()> {
    config.validate()?;
    let store = S3ObjectStore::connect(&config.store)
        .await
        .with_context(|| format!("connecting to bucket {}", config.store.bucket))?;
    let catalog = Catalog::new(Arc::new(store), config.root_prefix.clone());
    tracing::debug!(function = request.function_name(), "running query");

    let response = catalog.dispatch(request).await;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Text => {
            if let Some(text) = render_text(&response) {
                print!("{text}");
            }
        }
    }

    if let CatalogResponse::Error { message, path, .. } = &response {
        match path {
            Some(path) => bail!("{message} ({path})"),
            None => bail!("{message}"),
        }
    }
    Ok(())
}

/// Human-readable rendering of a successful response.
pub fn render_text(response: &CatalogResponse) -> Option<String> {
    let mut out = String::new();
    match response.payload()? {
        Payload::Listing { path, dirs, files } => {
            let shown = if path.is_empty() { "/" } else { path.as_str() };
            out.push_str(&format!("{}\n", shown.bold()));
            for dir in dirs {
                out.push_str(&format!("  {}\n", format!("{dir}/").blue()));
            }
            for file in files {
                out.push_str(&format!("  {file}\n"));
            }
            out.push_str(&format!(
                "{}\n",
                format!("{} directories, {} files", dirs.len(), files.len()).dimmed()
            ));
        }
        Payload::Titles(entries) | Payload::Files(entries) => {
            for entry in entries {
                out.push_str(&format!("{entry}\n"));
            }
            out.push_str(&format!("{}\n", format!("{} files", entries.len()).dimmed()));
        }
        Payload::Directories(entries) => {
            for entry in entries {
                let shown = if entry.is_empty() { "/" } else { entry.as_str() };
                out.push_str(&format!("{}\n", shown.blue()));
            }
            out.push_str(&format!(
                "{}\n",
                format!("{} directories", entries.len()).dimmed()
            ));
        }
    }
    Some(out)
}

fn cmd_presign_check(url: &str, format: OutputFormat) -> anyhow::Result<()> {
    let window = PresignWindow::from_url(url)?;
    let now = chrono::Utc::now();
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&window.to_json(now))?);
        }
        OutputFormat::Text => {
            println!("URL generated at: {} UTC", window.generated_at.format("%Y-%m-%d %H:%M:%S"));
            println!("Expires at:       {} UTC", window.expires_at.format("%Y-%m-%d %H:%M:%S"));
            println!("Current time:     {} UTC", now.format("%Y-%m-%d %H:%M:%S"));
            if window.is_valid_at(now) {
                println!("{} The pre-signed URL is still valid.", "✓".green().bold());
            } else {
                println!("{} The pre-signed URL has expired.", "✗".red().bold());
            }
        }
    }
    Ok(())
}

//! Cirrus CLI - Command line access to drive items.
//!
//! This tool exposes the remote item layer directly: look up items, list
//! folders, download content and change the remote tree.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cirrus_common::{AccessToken, DrivePath};
use cirrus_graph::{DriveItem, GraphClient, GraphConfig, HttpTransport, ItemKind, StaticToken};

#[derive(Parser)]
#[command(name = "cirrus")]
#[command(about = "Cirrus - Remote drive item access")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Bearer token for the Graph API.
    #[arg(long, env = "CIRRUS_TOKEN", hide_env_values = true)]
    token: String,

    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show an item's metadata.
    Stat {
        /// Item ID ("root" for the drive root).
        id: String,
    },

    /// List the children of a folder.
    Ls {
        /// Folder ID.
        #[arg(long, conflicts_with = "path")]
        id: Option<String>,

        /// Folder path (default: root).
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Download an item's content.
    Get {
        /// Item ID.
        id: String,

        /// Destination file. Must not exist yet.
        dest: PathBuf,
    },

    /// Create a folder.
    Mkdir {
        /// Parent folder ID.
        parent_id: String,

        /// Name of the new folder.
        name: String,
    },

    /// Rename and/or move an item.
    Mv {
        /// Item ID.
        id: String,

        /// New name.
        new_name: String,

        /// ID of the destination folder.
        new_parent_id: String,
    },

    /// Delete an item.
    Rm {
        /// Item ID.
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let client = build_client(&cli.token, cli.config.as_deref())?;

    match cli.command {
        Commands::Stat { id } => cmd_stat(&client, &id).await,
        Commands::Ls { id, path } => cmd_ls(&client, id.as_deref(), path.as_deref()).await,
        Commands::Get { id, dest } => cmd_get(&client, &id, &dest).await,
        Commands::Mkdir { parent_id, name } => cmd_mkdir(&client, &parent_id, &name).await,
        Commands::Mv {
            id,
            new_name,
            new_parent_id,
        } => cmd_mv(&client, &id, &new_name, &new_parent_id).await,
        Commands::Rm { id } => cmd_rm(&client, &id).await,
    }
}

fn build_client(token: &str, config: Option<&Path>) -> Result<GraphClient<HttpTransport>> {
    let config = match config {
        Some(path) => GraphConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GraphConfig::default(),
    };
    let token = AccessToken::new(token).context("Invalid token")?;
    let transport = HttpTransport::new(&config, Arc::new(StaticToken::new(token)))
        .context("Failed to create transport")?;
    Ok(GraphClient::new(transport, config))
}

fn kind_label(item: &DriveItem) -> &'static str {
    match item.kind {
        Some(ItemKind::Folder(_)) => "dir",
        Some(ItemKind::File(_)) => "file",
        Some(ItemKind::Deleted(_)) => "deleted",
        None => "-",
    }
}

fn print_item(item: &DriveItem) {
    let modified = item
        .modified
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{:<8} {:>12} {:<16} {}  {}",
        kind_label(item),
        item.size,
        modified,
        item.id,
        item.name
    );
}

/// Show an item's metadata.
async fn cmd_stat(client: &GraphClient<HttpTransport>, id: &str) -> Result<()> {
    let item = client.get_item(id).await.context("Failed to fetch item")?;

    println!("ID:       {}", item.id);
    println!("Name:     {}", item.name);
    println!("Kind:     {}", kind_label(&item));
    println!("Size:     {} bytes", item.size);
    if let Some(parent) = item.parent_id() {
        println!("Parent:   {}", parent);
    }
    if let Some(modified) = item.modified {
        println!("Modified: {}", modified.to_rfc3339());
    }
    if let Some(hashes) = item.hashes() {
        if let Some(h) = &hashes.quick_xor {
            println!("QuickXor: {}", h);
        }
        if let Some(h) = &hashes.sha1 {
            println!("SHA1:     {}", h);
        }
        if let Some(h) = &hashes.sha256 {
            println!("SHA256:   {}", h);
        }
    }
    Ok(())
}

/// List a folder. Items from pages fetched before a failure are still printed.
async fn cmd_ls(
    client: &GraphClient<HttpTransport>,
    id: Option<&str>,
    path: Option<&str>,
) -> Result<()> {
    let listing = match (id, path) {
        (Some(id), _) => client.get_item_children(id).await,
        (None, path) => {
            let path = DrivePath::parse(path.unwrap_or("/")).context("Invalid path")?;
            client.get_item_children_path(&path).await
        }
    };

    match listing {
        Ok(items) => {
            for item in &items {
                print_item(item);
            }
            Ok(())
        }
        Err(partial) => {
            let (items, err) = partial.into_parts();
            for item in &items {
                print_item(item);
            }
            warn!(fetched = items.len(), "Listing incomplete");
            Err(err).context("Failed to list folder")
        }
    }
}

/// Download an item to a new local file.
async fn cmd_get(client: &GraphClient<HttpTransport>, id: &str, dest: &Path) -> Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)
        .await
        .with_context(|| format!("Failed to create {}", dest.display()))?;

    match client.get_item_content_stream(id, &mut file).await {
        Ok(written) => {
            info!("Downloaded {} bytes to {}", written, dest.display());
            Ok(())
        }
        Err(partial) => {
            let (written, err) = partial.into_parts();
            warn!(
                written,
                "Download failed, partial content left in {}",
                dest.display()
            );
            Err(err).context("Failed to download item")
        }
    }
}

/// Create a folder.
async fn cmd_mkdir(client: &GraphClient<HttpTransport>, parent_id: &str, name: &str) -> Result<()> {
    let folder = client.create_folder(name, parent_id).await?;
    info!("Created folder {} ({})", folder.name, folder.id);
    Ok(())
}

/// Rename and/or move an item.
async fn cmd_mv(
    client: &GraphClient<HttpTransport>,
    id: &str,
    new_name: &str,
    new_parent_id: &str,
) -> Result<()> {
    client.rename(id, new_name, new_parent_id).await?;
    info!("Moved {} to {}/{}", id, new_parent_id, new_name);
    Ok(())
}

/// Delete an item.
async fn cmd_rm(client: &GraphClient<HttpTransport>, id: &str) -> Result<()> {
    client.remove(id).await?;
    info!("Deleted {}", id);
    Ok(())
}

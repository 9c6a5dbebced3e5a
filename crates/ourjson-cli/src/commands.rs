use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use ourjson_server::{BinServer, ServerConfig, StorageConfig};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(cli.config.as_deref(), &args.overrides).await,
        Command::Config(args) => cmd_config(cli.config.as_deref(), &args.overrides),
    }
}

/// Load the config file (if any) and apply command-line overrides.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: &ServerOverrides,
) -> anyhow::Result<ServerConfig> {
    let mut config = match path {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = overrides.bind {
        config.bind_addr = bind;
    }
    if let Some(host) = &overrides.public_host {
        config.public_host = Some(host.clone());
    }
    if let Some(protocol) = &overrides.protocol {
        config.protocol = protocol.clone();
    }
    if let Some(limit) = overrides.max_body_bytes {
        config.max_body_bytes = limit;
    }
    if let Some(dir) = &overrides.data_dir {
        config.storage = StorageConfig::Directory { path: dir.clone() };
    } else if overrides.memory {
        config.storage = StorageConfig::Memory;
    }
    Ok(config)
}

async fn cmd_serve(path: Option<&Path>, overrides: &ServerOverrides) -> anyhow::Result<()> {
    let config = resolve_config(path, overrides)?;
    let storage = match &config.storage {
        StorageConfig::Memory => "memory".to_string(),
        StorageConfig::Directory { path } => path.display().to_string(),
    };
    println!(
        "{} OurJSON on {} (storage: {}, uris: {})",
        "✓".green().bold(),
        config.bind_addr.to_string().bold(),
        storage.cyan(),
        config.base_uri().yellow(),
    );
    let server = BinServer::open(config)
        .await
        .context("failed to open bin store")?;
    server.serve().await?;
    Ok(())
}

fn cmd_config(path: Option<&Path>, overrides: &ServerOverrides) -> anyhow::Result<()> {
    let config = resolve_config(path, overrides)?;
    print!("{}", config.to_toml()?);
    Ok(())
}

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ourjson",
    about = "OurJSON — store, fetch and export JSON bins over HTTP",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML config file; flags override its values
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the bin server
    Serve(ServeArgs),
    /// Print the effective configuration as TOML
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServerOverrides,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub overrides: ServerOverrides,
}

#[derive(Args, Default)]
pub struct ServerOverrides {
    /// Address to listen on
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Host used in returned bin URIs
    #[arg(long)]
    pub public_host: Option<String>,
    /// Scheme used in returned bin URIs
    #[arg(long)]
    pub protocol: Option<String>,
    /// Keep bins as JSON files under this directory
    #[arg(long, conflicts_with = "memory")]
    pub data_dir: Option<PathBuf>,
    /// Keep bins in memory only
    #[arg(long)]
    pub memory: bool,
    #[arg(long)]
    pub max_body_bytes: Option<usize>,
}

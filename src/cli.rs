use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Address to bind, overrides the configuration file
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overrides the configuration file
    #[arg(short, long)]
    pub port: Option<u16>,
}

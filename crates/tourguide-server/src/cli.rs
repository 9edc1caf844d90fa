use std::path::PathBuf;

use clap::Parser;

/// Tây Ninh tour guide: WebSocket chat backend for the guide widget.
#[derive(Parser, Debug)]
#[command(name = "tourguide", version, about)]
pub struct Args {
    /// Port to listen on (overrides `server.port`).
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the tourism text and image index (overrides `data.dir`).
    #[arg(short = 'd', long)]
    pub data_dir: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

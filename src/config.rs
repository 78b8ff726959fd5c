//! Command-line options for the game client.

use clap::Parser;
use std::path::PathBuf;

/// Play a game of gomoku against a remote opponent
#[derive(Parser, Debug)]
#[command(name = "gomoku-client")]
#[command(about = "Console client for a gomoku game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Game server host
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Game server port
    #[arg(short, long, default_value = "8189")]
    pub port: u16,

    /// Directory for the daily rolling log file
    #[arg(long, default_value = "./logs")]
    pub log_dir: PathBuf,

    /// Play random empty cells instead of reading moves from stdin
    #[arg(long)]
    pub auto: bool,
}

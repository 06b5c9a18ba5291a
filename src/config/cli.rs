use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "access-relay")]
#[command(about = "Run one access-request submission through the registration handler")]
pub struct CliConfig {
    /// Path to TOML configuration file (RELAY_* environment variables when absent)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// HTTP method of the simulated request
    #[arg(long, default_value = "POST")]
    pub method: String,

    /// JSON submission body (read from stdin when absent)
    #[arg(long)]
    pub body_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

use clap::Parser;
use std::path::PathBuf;

/// Trip planner crew - LLM agents that research and draft travel itineraries
#[derive(Parser, Debug, Clone)]
#[command(name = "trip-planner", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "TRIP_PLANNER_CONFIG", default_value = "trip_planner.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// LLM model used by every agent without its own override
    #[arg(long, env = "TRIP_PLANNER_MODEL")]
    pub model: Option<String>,

    /// Path to a .env file loaded before reading configuration
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,
}

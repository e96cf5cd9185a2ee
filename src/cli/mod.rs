pub mod auth;
pub mod clear;
pub mod config;
pub mod create;
pub mod info;
pub mod logs;
pub mod output;
pub mod publish;
pub mod start;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "trends",
    version,
    about = "trends.earth CLI - publish, run and follow scripts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (defaults to ~/.tecli.yml)
    #[arg(long = "config-file", env = "TECLI_CONFIG", global = true)]
    pub config_file: Option<PathBuf>,

    /// Verbose output (debug logging of HTTP requests and docker calls)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Authenticate with the scripts API
    Login,

    /// End the current session and clear stored tokens
    Logout {
        /// Log out from every session of this account
        #[arg(long)]
        all: bool,
    },

    /// Read or change a stored setting
    Config {
        #[arg(value_enum)]
        action: config::ConfigAction,
        /// Setting name, e.g. url_api
        key: String,
        /// New value (for `set`)
        value: Option<String>,
    },

    /// Show the published state of the project in the current directory
    Info,

    /// Show recent logs and follow them while the script builds or runs
    Logs {
        /// Lookback window in hours
        #[arg(long, default_value_t = 1.0)]
        since: f64,
    },

    /// Upload the project in the current directory
    Publish {
        /// Also make the script public
        #[arg(long)]
        public: bool,
        /// Replace an already published script without asking
        #[arg(long)]
        overwrite: bool,
    },

    /// Build and run the project locally in docker
    Start {
        /// Run parameters as a query string, e.g. "year=2020&country=ESP"
        #[arg(long, default_value = "")]
        param: String,
        /// JSON file with additional run parameters
        #[arg(long)]
        payload: Option<PathBuf>,
    },

    /// Remove local docker containers and images created by `start`
    Clear,

    /// Create a new project skeleton
    Create {
        /// Project name; also the directory created
        name: String,
    },
}

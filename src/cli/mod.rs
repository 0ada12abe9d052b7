use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "petdiag")]
#[command(author = "Petdiag Team")]
#[command(version)]
#[command(about = "Pet symptom triage service backed by OpenRouter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to a config file (default: platform config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Directory holding index.html, scripts.js, styles.css and images/
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Show current configuration
    Config {
        /// Write the defaults to the config file if none exists yet
        #[arg(long)]
        init: bool,
    },

    /// Diagnose a pet profile read from a JSON file and print the result
    Diagnose {
        /// JSON object of pet attributes
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Fetch veterinary details for a diagnosis and print them
    Details {
        /// Diagnosis name
        #[arg(required = true)]
        diagnosis: String,

        #[arg(long, default_value = "Unknown")]
        species: String,

        #[arg(long, default_value = "Mixed")]
        breed: String,
    },
}

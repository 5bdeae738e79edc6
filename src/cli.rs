//! Command-line interface.

use clap::{Parser, Subcommand};

/// kinarow - Multiplayer K-in-a-row tic-tac-toe server
#[derive(Parser, Debug)]
#[command(name = "kinarow")]
#[command(about = "Multiplayer K-in-a-row server with accounts and stats", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API server
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long, default_value = "kinarow.db")]
        db_path: String,
    },

    /// Seed the guest accounts and exit
    Seed {
        /// Path to the database file (created if it doesn't exist)
        #[arg(long, default_value = "kinarow.db")]
        db_path: String,
    },
}

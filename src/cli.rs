use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hydrotime", version, about = "HydroTime - track your water intake")]
pub struct Cli {
    /// Directory holding the local data files
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the HydroTime API
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Keep everything local and never contact the API
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Today's progress against the goal
    Status,
    /// Record an intake
    Add {
        amount_ml: u32,
        #[arg(short, long, default_value_t = 0)]
        duration: u32,
    },
    /// Record one of the preset amounts (1-4)
    Quick { slot: usize },
    History,
    Stats,
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommand>,
    },
    /// Switch between en-US and pt-BR
    Language,
    Login { email: String, password: String },
    Register {
        name: String,
        email: String,
        password: String,
    },
    Logout,
    /// Delete a synced entry by id
    Delete { id: String },
    /// Write the history to a CSV file
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check that the API is reachable
    Health,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    Show,
    Set {
        #[arg(long)]
        goal: Option<u32>,
        #[arg(long)]
        interval: Option<u32>,
        #[arg(long)]
        notifications: Option<bool>,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        theme: Option<String>,
    },
}

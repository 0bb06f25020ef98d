//! CLI interface for Weft

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MIDI events from wearable fabric sensors
#[derive(Parser)]
#[command(name = "weft")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the sensors and send MIDI events
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "weft.yaml")]
        config: PathBuf,

        /// Frame script to replay instead of live hardware
        #[arg(short, long)]
        replay: Option<PathBuf>,

        /// MIDI output port name (substring match, first port if omitted)
        #[arg(short, long)]
        port: Option<String>,

        /// Milliseconds between sample ticks
        #[arg(short, long, default_value = "10")]
        tick: u64,
    },

    /// Replay a frame script and show calibration state and events
    Monitor {
        /// Configuration file path
        #[arg(short, long, default_value = "weft.yaml")]
        config: PathBuf,

        /// Frame script to replay
        #[arg(short, long)]
        replay: Option<PathBuf>,
    },

    /// List available MIDI output ports
    Ports,

    /// Reset the persisted calibration store
    Wipe {
        /// Configuration file path
        #[arg(short, long, default_value = "weft.yaml")]
        config: PathBuf,
    },

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "weft.yaml")]
        config: PathBuf,
    },

    /// Generate an example configuration file
    Init,
}

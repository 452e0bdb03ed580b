// Command-line interface
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(name = "torque-dashboard")]
#[command(about = "Monitoring client for torque and auxiliary sensors")]
#[command(version)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level, overridden by RUST_LOG
    #[arg(short, long, global = true, default_value = "warn")]
    pub log_level: Level,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List torque sensors
    Sensors,

    /// List a sensor's events and trends
    Events {
        sensor_id: String,

        /// Only the last N events
        #[arg(long)]
        last: Option<u32>,
    },

    /// Show one event's telemetry and torque signature
    Event {
        sensor_id: String,
        event_id: String,

        /// Include packets the server marks as duplicates
        #[arg(long)]
        all: bool,

        /// Keep refreshing while the event is still streaming
        #[arg(short, long)]
        watch: bool,
    },

    /// Save an event as event_{sensor}_{event}.csv
    Download {
        sensor_id: String,
        event_id: String,

        /// Include packets the server marks as duplicates
        #[arg(long)]
        all: bool,

        /// Output directory (overrides config file)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// List auxiliary sensors
    AuxSensors,

    /// Show an auxiliary sensor's samples
    AuxData { sensor_id: String },
}

//! hidscript CLI: record input sessions and compile them into HID device programs.
//!
//! Usage:
//!   hidscript record [OPTIONS]      Record a session (live or from a raw script)
//!   hidscript compile <PATH>        Compile a recording into device artifacts
//!   hidscript info <PATH>           Show recording information
//!   hidscript events <PATH>         List the events of a recording

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use hidscript_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "hidscript",
    about = "Record keyboard and mouse input and replay it from a USB HID microcontroller",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new session
    Record {
        /// Replay a JSONL file of raw input events instead of capturing live
        #[arg(long)]
        raw: Option<PathBuf>,

        /// Output recording path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minimum pointer displacement (px) for a move to be recorded
        #[arg(long)]
        min_move: Option<u32>,

        /// Minimum time (ms) between two recorded moves
        #[arg(long)]
        move_interval: Option<u64>,

        /// Do not record pointer moves
        #[arg(long)]
        no_moves: bool,

        /// Capture screen width
        #[arg(long)]
        width: Option<u32>,

        /// Capture screen height
        #[arg(long)]
        height: Option<u32>,
    },

    /// Compile a recording into `<base>_arduino.json` and `<base>_arduino.ino`
    Compile {
        /// Path to the recording
        path: PathBuf,

        /// Artifact base path (defaults to the recording path without extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Largest pointer step per instruction (1-127)
        #[arg(long)]
        max_step: Option<i32>,

        /// Delays below this many ms become zero
        #[arg(long)]
        noise_ms: Option<u64>,

        /// Scroll amplification factor
        #[arg(long)]
        scroll_factor: Option<i32>,

        /// Grace delay (ms) before the program starts replaying
        #[arg(long)]
        startup_delay: Option<u64>,
    },

    /// Show recording information
    Info {
        /// Path to the recording
        path: PathBuf,
    },

    /// List recorded events
    Events {
        /// Path to the recording
        path: PathBuf,

        /// Events shown from each end when the recording is long
        #[arg(long, default_value = "10")]
        sample: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load();

    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if cli.json_logs {
        config.logging.json = true;
    }
    hidscript_common::logging::init_logging(&config.logging);
    tracing::debug!(recordings_dir = %config.recordings_dir.display(), "Configuration loaded");

    match cli.command {
        Commands::Record {
            raw,
            output,
            min_move,
            move_interval,
            no_moves,
            width,
            height,
        } => {
            commands::record::run(
                &config,
                commands::record::RecordArgs {
                    raw,
                    output,
                    min_move,
                    move_interval,
                    no_moves,
                    width,
                    height,
                },
            )
            .await
        }
        Commands::Compile {
            path,
            output,
            max_step,
            noise_ms,
            scroll_factor,
            startup_delay,
        } => commands::compile::run(
            &config,
            path,
            output,
            max_step,
            noise_ms,
            scroll_factor,
            startup_delay,
        ),
        Commands::Info { path } => commands::info::run(path),
        Commands::Events { path, sample } => commands::events::run(path, sample),
    }
}

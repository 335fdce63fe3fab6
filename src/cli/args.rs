//! Command-line argument definitions
//!
//! This module defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Helpers for Canon cameras driven through the EDSDK
#[derive(Parser, Debug)]
#[command(name = "eds-bridge")]
#[command(version)]
#[command(
    about = "Property access, downloads and live view for Canon EDSDK cameras",
    long_about = "Property access, downloads and live view for Canon EDSDK cameras.\n\n\
                  Camera discovery is outside the scope of this tool: the describe, download \
                  and live-view commands run against a simulated camera, check-sdk loads the \
                  real vendor library."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace (overrides config)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the values a property accepts, with their names
    Describe {
        /// Property name (e.g. ImageQuality) or numeric id (e.g. 0x100)
        #[arg(default_value = "ImageQuality")]
        property: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Download files from the camera's card
    Download {
        /// File names to download (default: every file on the card)
        names: Vec<String>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Delete each file from the card after a confirmed transfer (overrides config)
        #[arg(long)]
        delete: bool,
    },

    /// Stream live view frames to disk until stopped
    LiveView {
        /// Number of frames to save (0 = until Ctrl+C, overrides config)
        #[arg(short = 'n', long)]
        frames: Option<u32>,

        /// Output directory for frames (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Delay between frame requests in milliseconds (overrides config)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Frame format (overrides config)
        #[arg(long, value_parser = ["jpeg", "png"])]
        format: Option<String>,

        /// Percentage of frame requests the simulated camera answers "not ready"
        #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=100))]
        not_ready_rate: u8,
    },

    /// Load the vendor library, initialize and terminate it
    CheckSdk {
        /// Path to the EDSDK library (overrides config)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Look up the name of a status code
    StatusName {
        /// Status code, decimal or 0x-prefixed hex
        code: String,
    },

    /// Look up a property by numeric id or by name
    PropertyName {
        /// Property id (decimal or 0x-prefixed hex) or name
        property: String,
    },

    /// Describe image quality short names (all of them if none given)
    Quality {
        /// Short names such as LJF or LRLJN
        names: Vec<String>,
    },

    /// Show current configuration
    ShowConfig,

    /// Generate a configuration file at a specific location
    GenerateConfig {
        /// Output path for the config file (defaults to standard location)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Open the configuration file in your default editor
    ///
    /// The config file is stored at:
    /// - Windows: %APPDATA%\eds_bridge\config.toml
    /// - Linux/macOS: ~/.config/eds_bridge/config.toml
    ///
    /// If no config file exists, a default one will be created.
    Config {
        /// Show the config file path without opening it
        #[arg(long)]
        path: bool,

        /// Reset config to defaults (creates a fresh config file)
        #[arg(long)]
        reset: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_live_view() {
        let args = Args::parse_from([
            "eds-bridge",
            "live-view",
            "-n",
            "5",
            "--format",
            "png",
            "--log-level",
            "debug",
        ]);

        assert_eq!(args.log_level.as_deref(), Some("debug"));
        match args.command {
            Commands::LiveView { frames, format, .. } => {
                assert_eq!(frames, Some(5));
                assert_eq!(format.as_deref(), Some("png"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_describe_defaults_to_image_quality() {
        let args = Args::parse_from(["eds-bridge", "describe"]);
        match args.command {
            Commands::Describe { property, json } => {
                assert_eq!(property, "ImageQuality");
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_not_ready_rate_is_bounded() {
        let result =
            Args::try_parse_from(["eds-bridge", "live-view", "--not-ready-rate", "150"]);
        assert!(result.is_err());
    }
}

//! CLI argument definitions using Clap

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use crate::domain::notification::AccentColor;
use crate::domain::time::Duration;

/// Toastline - desktop notifications that report back
#[derive(Parser, Debug)]
#[command(name = "toastline")]
#[command(version)]
#[command(about = "Post desktop notifications and report whether they were clicked, dismissed, or timed out")]
#[command(long_about = None)]
pub struct Cli {
    /// Log lifecycle details to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Post a notification and print the outcome
    Send(SendArgs),
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    /// Notification title
    pub title: String,

    /// Notification body
    pub body: Option<String>,

    /// Report a click as `clicked` (otherwise clicks count as dismissals)
    #[arg(short = 'c', long)]
    pub clickable: bool,

    /// Remove the notification when it times out
    #[arg(long)]
    pub clear: bool,

    /// Extra KEY=VALUE delivered with the click event
    #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub args: Vec<(String, String)>,

    /// Icon name from the desktop icon theme
    #[arg(short = 'i', long, value_name = "NAME")]
    pub icon: Option<String>,

    /// Accent color (#RRGGBB or #AARRGGBB)
    #[arg(long, value_name = "HEX")]
    pub color: Option<AccentColor>,

    /// Post after a delay (e.g., 30s, 5m, 1h30m)
    #[arg(long = "in", value_name = "TIME", conflicts_with = "at")]
    pub delay: Option<Duration>,

    /// Post at a moment (RFC 3339, e.g., 2030-01-02T09:00:00Z)
    #[arg(long, value_name = "RFC3339")]
    pub at: Option<DateTime<Utc>>,

    /// How long to wait for a click or dismiss
    #[arg(short = 'g', long, value_name = "TIME", value_parser = parse_grace_period)]
    pub grace_period: Option<String>,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["app_name", "default_icon", "default_color", "grace_period"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

fn parse_grace_period(s: &str) -> Result<String, String> {
    s.parse::<Duration>().map_err(|e| e.to_string())?;
    Ok(s.to_string())
}

//! Clap derive structures for the `goodtop` CLI.
//!
//! Defines the command tree, global flags, and shared types. Stdout carries
//! pure JSON so the tool can be embedded (Home Assistant command-line
//! platform, shell pipelines); everything else goes to stderr.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// goodtop -- status and per-port PoE control for Goodtop switches
#[derive(Debug, Parser)]
#[command(
    name = "goodtop",
    version,
    about = "Read status and toggle port power on Goodtop PoE switches",
    long_about = "Talks to the switch's HTML/CGI web management interface.\n\n\
        There is no documented API on these devices; this tool scrapes the\n\
        same pages the browser UI renders and posts the same forms.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Switch address (bare IP/hostname or http:// URL)
    #[arg(long, short = 'H', env = "GOODTOP_HOST", global = true)]
    pub host: Option<String>,

    /// Management username
    #[arg(
        long,
        short = 'u',
        env = "GOODTOP_USER",
        default_value = "admin",
        global = true
    )]
    pub username: String,

    /// Management password
    #[arg(long, env = "GOODTOP_PASS", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "GOODTOP_TIMEOUT", default_value = "10", global = true)]
    pub timeout: u64,

    /// Output format
    #[arg(long, short = 'o', default_value = "json", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON (scripting)
    JsonCompact,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a full device snapshot and print it as JSON
    #[command(alias = "st")]
    Status,

    /// Toggle PoE power on a port
    Poe {
        /// Port number (1-indexed, as printed by `status`)
        #[arg(value_name = "PORT", value_parser = clap::value_parser!(u32).range(1..))]
        port: u32,

        /// 1 to power on, 0 to power off
        #[arg(value_name = "0|1", value_parser = clap::value_parser!(u8).range(0..=1))]
        state: u8,
    },

    /// Enable or disable a port administratively
    Port {
        /// Port number (1-indexed, as printed by `status`)
        #[arg(value_name = "PORT", value_parser = clap::value_parser!(u32).range(1..))]
        port: u32,

        /// 1 to enable, 0 to disable
        #[arg(value_name = "0|1", value_parser = clap::value_parser!(u8).range(0..=1))]
        state: u8,

        /// Speed/duplex code to preserve (0=Auto .. 5=1000M Full);
        /// the form resets the port to defaults if this is omitted wrongly
        #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=5))]
        speed_duplex: u8,

        /// Flow-control code to preserve (0=off, 1=on)
        #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=1))]
        flow: u8,
    },

    /// Persist the running configuration to NVRAM
    Save,
}

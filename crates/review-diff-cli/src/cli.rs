//! Command-line interface for review-diff.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// review-diff - render review diffs with expandable context and inline comments
#[derive(Parser)]
#[command(name = "review-diff")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set debug log level (overrides RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a diff (and its comments) to a standalone HTML page
    Render(RenderArgs),

    /// Mark files as viewed at their current content
    MarkViewed {
        #[command(flatten)]
        review: ReviewArgs,

        /// Diff the hashes are computed from (JSON or unified diff text)
        #[arg(long, value_name = "PATH")]
        diff: PathBuf,

        /// Files to mark (new paths as they appear in the diff)
        #[arg(required = true)]
        files: Vec<String>,

        /// Clear the viewed mark instead
        #[arg(long)]
        unmark: bool,
    },

    /// Show the viewed status of every file in a diff
    Status {
        #[command(flatten)]
        review: ReviewArgs,

        #[arg(long, value_name = "PATH")]
        diff: PathBuf,
    },
}

/// Identifies the review task whose viewed state is persisted.
#[derive(Args, Debug, Clone)]
pub struct ReviewArgs {
    #[arg(long)]
    pub project: String,

    #[arg(long)]
    pub task: String,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Diff to render: JSON in the review API shape or unified diff text
    #[arg(value_name = "DIFF")]
    pub diff: PathBuf,

    /// Comments JSON (`{"comments": [...], ...}`)
    #[arg(long, value_name = "PATH")]
    pub comments: Option<PathBuf>,

    /// Checkout of the reviewed revision, used to fill in hidden context
    #[arg(long, value_name = "DIR")]
    pub repo: Option<PathBuf>,

    /// Render old and new side by side
    #[arg(long)]
    pub split: bool,

    /// Reveal every unchanged region
    #[arg(long)]
    pub expand_all: bool,

    /// Number search matches of this text across all files
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Viewed state to show next to each file
    #[arg(long, requires = "task")]
    pub project: Option<String>,

    #[arg(long, requires = "project")]
    pub task: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

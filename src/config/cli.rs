use crate::config::Settings;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "happy-poster")]
#[command(about = "Generates a prompt, turns it into an image and posts it to a Facebook page on a schedule")]
pub struct CliConfig {
    /// Path to a TOML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Minutes between scheduled posts
    #[arg(long)]
    pub interval_minutes: Option<u64>,

    /// Seconds between scheduler polls
    #[arg(long)]
    pub poll_seconds: Option<u64>,

    /// Run a single job and exit
    #[arg(long)]
    pub once: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// 命令列參數優先於設定檔
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(minutes) = self.interval_minutes {
            settings.schedule.interval_minutes = minutes;
        }
        if let Some(seconds) = self.poll_seconds {
            settings.schedule.poll_seconds = seconds;
        }
    }
}

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FacebookPublisher, GeminiPromptGenerator, ImageApiGenerator};
pub use config::{BotConfig, Credentials, Settings};
pub use crate::core::{
    job::JobRunner,
    scheduler::{Scheduler, SchedulerHandle},
};
pub use utils::error::{BotError, Result};

/// The production pipeline wired to the real services.
pub type BotJob = JobRunner<GeminiPromptGenerator, ImageApiGenerator, FacebookPublisher>;

/// Builds the job from configuration, sharing one HTTP client between the stages.
pub fn build_job(config: &BotConfig) -> Result<BotJob> {
    let client = adapters::http::build_client(&config.settings)?;
    Ok(JobRunner::new(
        GeminiPromptGenerator::new(client.clone(), config),
        ImageApiGenerator::new(client.clone(), config),
        FacebookPublisher::new(client, config),
    ))
}

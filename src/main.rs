use clap::Parser;
use happy_poster::utils::{logger, validation::Validate};
use happy_poster::{build_job, BotConfig, BotError, CliConfig, Scheduler};

fn exit_with(stage: &str, e: BotError) -> ! {
    tracing::error!("❌ {}: {}", stage, e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // .env 先載入，RUST_LOG 也可以寫在裡面
    let dotenv = dotenvy::dotenv();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("⚠️ Could not read .env file: {}", e),
    }

    tracing::info!("Starting happy-poster");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let mut config = match BotConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with("Failed to load configuration", e),
    };
    cli.apply_overrides(&mut config.settings);

    if let Err(e) = config.validate() {
        exit_with("Configuration validation failed", e);
    }
    tracing::debug!("Settings: {:?}", config.settings);

    let job = match build_job(&config) {
        Ok(job) => job,
        Err(e) => exit_with("Failed to build HTTP client", e),
    };

    if cli.once {
        let report = job.run_job().await;
        tracing::info!(
            "Single run {} finished in {}s (published: {})",
            report.run_id,
            report.duration().num_seconds(),
            report.outcome.is_published()
        );
        return Ok(());
    }

    let scheduler = Scheduler::from_settings(job, &config.settings);
    let handle = scheduler.handle();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("🛑 Ctrl-C received, stopping after the current run");
            handle.shutdown();
        }
    });

    scheduler
        .run_forever(config.settings.schedule.run_immediately)
        .await;

    Ok(())
}

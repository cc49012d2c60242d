#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = issuelog::config::Config::from_env()?;
    let api = issuelog::github::api::GithubClient::new(config.token.clone())?;
    let store = issuelog::snapshot::FileSnapshotStore::new(&config.snapshot_path);

    match issuelog::run::run(&api, &store, &config).await? {
        issuelog::run::RunOutcome::FirstRun { tracked } => {
            log::info!("Saved initial snapshot of {tracked} issues");
        }
        issuelog::run::RunOutcome::NoChanges { tracked } => {
            log::info!("No issue activity since the last run ({tracked} tracked)");
        }
        issuelog::run::RunOutcome::Published { tracked } => {
            log::info!(
                "Changelog posted to {}#{} ({tracked} tracked)",
                config.target_repo,
                config.target_issue
            );
        }
        issuelog::run::RunOutcome::TargetLocked { tracked } => {
            log::warn!(
                "Changelog withheld: {}#{} is locked ({tracked} tracked)",
                config.target_repo,
                config.target_issue
            );
        }
    }
    Ok(())
}

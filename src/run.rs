use anyhow::Result;
use chrono::Utc;

use crate::changelog;
use crate::config::Config;
use crate::diff;
use crate::github::api::IssueApi;
use crate::github::fetch::{self, PER_PAGE};
use crate::github::issues::StateFilter;
use crate::github::publish::{self, PublishOutcome};
use crate::snapshot::{SnapshotStore, build_mapping};

/// How a run ended. Every variant is a successful completion; failures
/// propagate as errors instead.
#[derive(Debug, PartialEq)]
pub enum RunOutcome {
    /// No usable previous snapshot; the fetched state became the baseline
    /// and no changelog was produced.
    FirstRun { tracked: usize },
    /// Snapshots were compared and nothing changed.
    NoChanges { tracked: usize },
    /// A changelog was posted to the target issue.
    Published { tracked: usize },
    /// A changelog was produced but the target issue is locked.
    TargetLocked { tracked: usize },
}

/// One complete notifier run: fetch, diff, report, persist.
///
/// The fresh snapshot is saved exactly once, after comparison and publishing
/// have finished, so an aborted run leaves the previous baseline in place for
/// the next one. The first-run guard fires when the previous snapshot is
/// absent or empty; without it, the initial run would flood the target issue
/// with every existing issue listed as new.
pub async fn run(
    api: &impl IssueApi,
    store: &impl SnapshotStore,
    config: &Config,
) -> Result<RunOutcome> {
    let issues = fetch::fetch_all_issues(async |page| {
        api.list_issues(&config.repo, StateFilter::All, page, PER_PAGE)
            .await
    })
    .await?;
    let current = build_mapping(issues);
    let tracked = current.len();
    log::info!("Fetched {tracked} issues from {}", config.repo);

    let previous = match store.load()? {
        Some(previous) if !previous.is_empty() => previous,
        _ => {
            log::info!("No usable previous snapshot; saving baseline and skipping changelog");
            store.save(&current)?;
            return Ok(RunOutcome::FirstRun { tracked });
        }
    };

    let changes = diff::diff(&previous, &current);
    log::debug!(
        "Change set: {} new, {} closed, {} commented, {} relabeled",
        changes.new_issues.len(),
        changes.closed_issues.len(),
        changes.comment_growth.len(),
        changes.label_changes.len()
    );

    let outcome = match changelog::render(&changes, Utc::now()) {
        None => RunOutcome::NoChanges { tracked },
        Some(body) => {
            let published = publish::publish_changelog(
                &body,
                async || api.get_issue(&config.target_repo, config.target_issue).await,
                async |text| {
                    api.create_comment(&config.target_repo, config.target_issue, text)
                        .await
                },
            )
            .await?;
            match published {
                PublishOutcome::Posted => RunOutcome::Published { tracked },
                PublishOutcome::SkippedLocked => RunOutcome::TargetLocked { tracked },
            }
        }
    };

    store.save(&current)?;
    Ok(outcome)
}

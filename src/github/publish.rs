use anyhow::Result;
use serde_json::Value;

/// How handing the changelog to the target issue ended
#[derive(Debug, PartialEq)]
pub enum PublishOutcome {
    /// Comment created on the target issue
    Posted,
    /// Target issue is locked; nothing was posted
    SkippedLocked,
}

/// Posts `body` as a comment unless the target issue is locked.
///
/// The target's metadata is fetched first and its `locked` flag decides the
/// outcome; a locked target is a normal skip, not an error. A missing flag
/// counts as unlocked. Failures from either injected operation propagate.
pub async fn publish_changelog<F, G>(
    body: &str,
    fetch_target: F,
    post_comment: G,
) -> Result<PublishOutcome>
where
    F: AsyncFn() -> Result<Value>,
    G: AsyncFn(&str) -> Result<()>,
{
    let target = fetch_target().await?;

    if target["locked"].as_bool().unwrap_or(false) {
        log::warn!("Target issue is locked; skipping comment");
        return Ok(PublishOutcome::SkippedLocked);
    }

    post_comment(body).await?;
    Ok(PublishOutcome::Posted)
}

use chrono::{DateTime, Utc};

use crate::diff::ChangeSet;

/// Renders the change set as the markdown comment body.
///
/// Returns `None` when there is nothing to report, so callers can tell "no
/// changelog" apart from "post an empty comment". `now` becomes the header
/// timestamp; the run loop passes the wall clock, tests pass a fixture.
pub fn render(changes: &ChangeSet, now: DateTime<Utc>) -> Option<String> {
    if changes.is_empty() {
        return None;
    }

    let mut lines = vec![format!(
        "### Issue Activity Summary ({} UTC)\n",
        now.format("%Y-%m-%dT%H:%M:%S")
    )];

    if !changes.new_issues.is_empty() {
        lines.push("#### 🆕 New Issues".to_string());
        for issue in &changes.new_issues {
            lines.push(format!("- #{} {} (@{})", issue.number, issue.title, issue.author));
        }
    }

    if !changes.closed_issues.is_empty() {
        lines.push("#### ✅ Closed Issues".to_string());
        for issue in &changes.closed_issues {
            lines.push(format!("- #{} {}", issue.number, issue.title));
        }
    }

    if !changes.comment_growth.is_empty() {
        lines.push("#### 💬 New Comments".to_string());
        for issue in &changes.comment_growth {
            lines.push(format!(
                "- #{} {} ({} comments)",
                issue.number, issue.title, issue.comments
            ));
        }
    }

    if !changes.label_changes.is_empty() {
        lines.push("#### 🏷️ Label Changes".to_string());
        for issue in &changes.label_changes {
            lines.push(format!(
                "- #{} {} (Labels: {})",
                issue.number,
                issue.title,
                issue.labels.join(", ")
            ));
        }
    }

    Some(lines.join("\n"))
}

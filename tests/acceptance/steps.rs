use crate::NotifierWorld;
use anyhow::Result;
use cucumber::{given, then, when};
use issuelog::config::Config;
use issuelog::github::api::IssueApi;
use issuelog::github::issues::{StateFilter, parse_issue};
use issuelog::run::RunOutcome;
use issuelog::snapshot::{FileSnapshotStore, SNAPSHOT_FILE, SnapshotStore, build_mapping};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

/// In-memory stand-in for the GitHub API: serves the scenario's issue
/// listing and records every comment the notifier tries to post.
struct FakeApi {
    issues: Vec<Value>,
    target: Value,
    posted: Mutex<Vec<String>>,
}

impl IssueApi for FakeApi {
    async fn list_issues(
        &self,
        _repo: &str,
        _state: StateFilter,
        page: u32,
        _per_page: u32,
    ) -> Result<Vec<Value>> {
        if page == 1 {
            Ok(self.issues.clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn get_issue(&self, _repo: &str, _number: u64) -> Result<Value> {
        Ok(self.target.clone())
    }

    async fn create_comment(&self, _repo: &str, _number: u64, body: &str) -> Result<()> {
        self.posted
            .lock()
            .expect("Posted comment log poisoned")
            .push(body.to_string());
        Ok(())
    }
}

fn snapshot_path(world: &mut NotifierWorld) -> PathBuf {
    let dir = world
        .workdir
        .get_or_insert_with(|| TempDir::new().expect("Failed to create scenario workdir"));
    dir.path().join(SNAPSHOT_FILE)
}

fn raw_issue(number: u64, title: &str, author: &str, comments: u64) -> Value {
    json!({
        "number": number,
        "title": title,
        "state": "open",
        "comments": comments,
        "labels": [],
        "updated_at": "2024-06-01T10:00:00Z",
        "user": {"login": author},
    })
}

fn label_objects(raw: &str) -> Value {
    let labels: Vec<Value> = raw
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(|label| json!({"name": label}))
        .collect();
    Value::Array(labels)
}

fn issue_mut(world: &mut NotifierWorld, number: u64) -> &mut Value {
    world
        .issues
        .iter_mut()
        .find(|issue| issue["number"].as_u64() == Some(number))
        .unwrap_or_else(|| panic!("No issue #{} in the scenario listing", number))
}

#[given(regex = r#"^the tracked repository has an open issue #(\d+) titled "([^"]+)" with (\d+) comments$"#)]
async fn given_open_issue(world: &mut NotifierWorld, number: u64, title: String, comments: u64) {
    world
        .issues
        .push(raw_issue(number, &title, "octocat", comments));
}

#[given(regex = r#"^issue #(\d+) is labeled "([^"]*)"$"#)]
async fn given_issue_labeled(world: &mut NotifierWorld, number: u64, labels: String) {
    issue_mut(world, number)["labels"] = label_objects(&labels);
}

#[given(regex = r#"^the listing also contains a pull request #(\d+)$"#)]
async fn given_pull_request(world: &mut NotifierWorld, number: u64) {
    let url = format!("https://api.github.com/repos/octo/tracked/pulls/{}", number);
    let mut item = raw_issue(number, "Speed up CI", "octocat", 0);
    item["pull_request"] = json!({ "url": url });
    world.issues.push(item);
}

#[given("no previous snapshot exists")]
async fn given_no_snapshot(world: &mut NotifierWorld) {
    let path = snapshot_path(world);
    let _ = std::fs::remove_file(path);
}

#[given("a previous run recorded the current state")]
async fn given_previous_run_recorded(world: &mut NotifierWorld) {
    let path = snapshot_path(world);
    let mapping = build_mapping(world.issues.iter().filter_map(parse_issue).collect());
    FileSnapshotStore::new(path)
        .save(&mapping)
        .expect("Failed to seed the previous snapshot");
}

#[given(regex = r#"^issue #(\d+) has since gained (\d+) comments?$"#)]
async fn given_issue_gained_comments(world: &mut NotifierWorld, number: u64, gained: u64) {
    let issue = issue_mut(world, number);
    let current = issue["comments"]
        .as_u64()
        .expect("Scenario issue has no comment count");
    issue["comments"] = json!(current + gained);
}

#[given(regex = r#"^issue #(\d+) has since been relabeled "([^"]*)"$"#)]
async fn given_issue_relabeled(world: &mut NotifierWorld, number: u64, labels: String) {
    issue_mut(world, number)["labels"] = label_objects(&labels);
}

#[given(regex = r#"^a new issue #(\d+) titled "([^"]+)" by "([^"]+)" has since been opened$"#)]
async fn given_new_issue(world: &mut NotifierWorld, number: u64, title: String, author: String) {
    world.issues.push(raw_issue(number, &title, &author, 0));
}

#[given(regex = r#"^issue #(\d+) no longer appears in the listing$"#)]
async fn given_issue_disappeared(world: &mut NotifierWorld, number: u64) {
    world
        .issues
        .retain(|issue| issue["number"].as_u64() != Some(number));
}

#[given("the target issue is locked")]
async fn given_target_locked(world: &mut NotifierWorld) {
    world.target_locked = true;
}

#[when("the notifier runs")]
async fn when_notifier_runs(world: &mut NotifierWorld) {
    let path = snapshot_path(world);
    let api = FakeApi {
        issues: world.issues.clone(),
        target: json!({"number": 1, "locked": world.target_locked}),
        posted: Mutex::new(Vec::new()),
    };
    let store = FileSnapshotStore::new(&path);
    let config = Config {
        token: "acceptance-token".to_string(),
        repo: "octo/tracked".to_string(),
        target_repo: "octo/tracked".to_string(),
        target_issue: 1,
        snapshot_path: path,
    };

    let outcome = issuelog::run::run(&api, &store, &config)
        .await
        .expect("Notifier run failed");

    world.outcome = Some(outcome);
    world.posted_comments = api
        .posted
        .into_inner()
        .expect("Posted comment log poisoned");
}

#[then("the run records a first baseline")]
async fn then_first_baseline(world: &mut NotifierWorld) {
    assert!(
        matches!(world.outcome, Some(RunOutcome::FirstRun { .. })),
        "Expected a first-run outcome, got: {:?}",
        world.outcome
    );
}

#[then("the run reports no changes")]
async fn then_no_changes(world: &mut NotifierWorld) {
    assert!(
        matches!(world.outcome, Some(RunOutcome::NoChanges { .. })),
        "Expected a no-changes outcome, got: {:?}",
        world.outcome
    );
}

#[then("the changelog is withheld because the target is locked")]
async fn then_target_locked(world: &mut NotifierWorld) {
    assert!(
        matches!(world.outcome, Some(RunOutcome::TargetLocked { .. })),
        "Expected a locked-target outcome, got: {:?}",
        world.outcome
    );
}

#[then("no comment is posted")]
async fn then_no_comment_posted(world: &mut NotifierWorld) {
    assert!(
        world.posted_comments.is_empty(),
        "Expected no comments, but these were posted:\n{:?}",
        world.posted_comments
    );
}

#[then(regex = r#"^a comment is posted containing "(.+)"$"#)]
async fn then_comment_contains(world: &mut NotifierWorld, expected: String) {
    assert_eq!(
        world.posted_comments.len(),
        1,
        "Expected exactly one posted comment, got: {:?}",
        world.posted_comments
    );
    assert!(
        world.posted_comments[0].contains(&expected),
        "Expected the comment to contain '{}', but got:\n---\n{}\n---",
        expected,
        world.posted_comments[0]
    );
}

#[then(regex = r#"^the snapshot file records (\d+) issues?$"#)]
async fn then_snapshot_records(world: &mut NotifierWorld, expected: usize) {
    let path = snapshot_path(world);
    let mapping = FileSnapshotStore::new(path)
        .load()
        .expect("Failed to load the saved snapshot")
        .expect("Expected a snapshot file after the run");
    assert_eq!(
        mapping.len(),
        expected,
        "Snapshot records the wrong issues: {:?}",
        mapping.keys().collect::<Vec<_>>()
    );
}

#[then(regex = r#"^the snapshot now shows (\d+) comments for issue #(\d+)$"#)]
async fn then_snapshot_comment_count(world: &mut NotifierWorld, comments: u64, number: u64) {
    let path = snapshot_path(world);
    let mapping = FileSnapshotStore::new(path)
        .load()
        .expect("Failed to load the saved snapshot")
        .expect("Expected a snapshot file after the run");
    assert_eq!(
        mapping[&number].comments, comments,
        "Snapshot comment count for issue #{} is wrong",
        number
    );
}

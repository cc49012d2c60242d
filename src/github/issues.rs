use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One tracked issue as captured at fetch time.
///
/// Instances are built fresh each run from the listing response and compared
/// against the records deserialized from the previous run's snapshot, so the
/// field names here are also the persisted snapshot format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub number: u64,
    pub author: String,
    pub title: String,
    pub state: IssueState,
    pub comments: u64,
    /// Sorted at construction so label sets compare by value regardless of
    /// the order the API returned them in.
    pub labels: Vec<String>,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// State filter for the issue listing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StateFilter {
    Open,
    Closed,
    #[default]
    All,
}

impl StateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateFilter::Open => "open",
            StateFilter::Closed => "closed",
            StateFilter::All => "all",
        }
    }
}

/// Extracts a record from one raw listing item.
///
/// Returns `None` for pull requests (the listing endpoint conflates them
/// with issues), for items missing a required field, and for states other
/// than `open`/`closed`.
pub fn parse_issue(value: &Value) -> Option<IssueRecord> {
    if !value["pull_request"].is_null() {
        return None;
    }

    let state = match value["state"].as_str()? {
        "open" => IssueState::Open,
        "closed" => IssueState::Closed,
        _ => return None,
    };

    let mut labels: Vec<String> = value["labels"]
        .as_array()?
        .iter()
        .filter_map(|label| label["name"].as_str().map(String::from))
        .collect();
    labels.sort();

    Some(IssueRecord {
        number: value["number"].as_u64()?,
        author: value["user"]["login"].as_str()?.to_string(),
        title: value["title"].as_str()?.to_string(),
        state,
        comments: value["comments"].as_u64()?,
        labels,
        updated_at: value["updated_at"].as_str()?.to_string(),
    })
}

pub fn parse_issue_page(items: &[Value]) -> Vec<IssueRecord> {
    items.iter().filter_map(parse_issue).collect()
}

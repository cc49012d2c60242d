use anyhow::Result;
use serde_json::Value;

use crate::github::issues::{IssueRecord, parse_issue_page};

/// Fixed page size for the issue listing.
pub const PER_PAGE: u32 = 100;

/// Fetches every issue of the repository through the injected page fetcher.
///
/// Pages are requested in increasing order starting at 1 until one comes back
/// empty. Pull requests and malformed items are dropped during parsing; a page
/// that contained only such items still counts as non-empty, so pagination
/// continues past it. The first fetch error aborts the whole run.
pub async fn fetch_all_issues<F>(fetch_page: F) -> Result<Vec<IssueRecord>>
where
    F: AsyncFn(u32) -> Result<Vec<Value>>,
{
    let mut all_issues = Vec::new();
    let mut page = 1;

    loop {
        let items = fetch_page(page).await?;

        if items.is_empty() {
            break;
        }

        all_issues.extend(parse_issue_page(&items));
        page += 1;
    }

    log::debug!("Fetched {} issues across {} pages", all_issues.len(), page - 1);
    Ok(all_issues)
}

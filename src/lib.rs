//! Changelog notifier for GitHub issues: compares the freshly fetched issue
//! state of a repository against the snapshot persisted by the previous run
//! and posts a markdown summary comment to a designated issue when something
//! changed.

pub mod changelog;
pub mod config;
pub mod diff;
pub mod github;
pub mod run;
pub mod snapshot;

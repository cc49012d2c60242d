use crate::github::issues::IssueRecord;
use crate::snapshot::StateMapping;

/// Differences between two snapshots, one sequence per change category.
///
/// The last two categories are not mutually exclusive: an issue that gained
/// comments and changed labels in the same run appears in both.
#[derive(Debug, Default, PartialEq)]
pub struct ChangeSet {
    /// Present now, absent from the previous snapshot.
    pub new_issues: Vec<IssueRecord>,
    /// Present in the previous snapshot, absent now. Disappearance is taken
    /// literally: closing, deletion and transfer all land here.
    pub closed_issues: Vec<IssueRecord>,
    /// Comment count grew. Decreases are not reported.
    pub comment_growth: Vec<IssueRecord>,
    /// Canonicalized label list differs.
    pub label_changes: Vec<IssueRecord>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.new_issues.is_empty()
            && self.closed_issues.is_empty()
            && self.comment_growth.is_empty()
            && self.label_changes.is_empty()
    }
}

/// Classifies the differences between the previous and the current mapping.
///
/// New and disappeared issues report the record from the side that has it;
/// comment and label changes report the current record. Ordering inside every
/// category is ascending issue number, so a fixed input pair always produces
/// the same change set.
pub fn diff(old: &StateMapping, new: &StateMapping) -> ChangeSet {
    let mut changes = ChangeSet::default();

    for (number, record) in new {
        match old.get(number) {
            None => changes.new_issues.push(record.clone()),
            Some(previous) => {
                if record.comments > previous.comments {
                    changes.comment_growth.push(record.clone());
                }
                if record.labels != previous.labels {
                    changes.label_changes.push(record.clone());
                }
            }
        }
    }

    for (number, record) in old {
        if !new.contains_key(number) {
            changes.closed_issues.push(record.clone());
        }
    }

    changes
}

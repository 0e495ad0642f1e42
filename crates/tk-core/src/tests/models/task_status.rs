use crate::TaskStatus;

use std::str::FromStr;

#[test]
fn test_task_status_as_str() {
    assert_eq!(TaskStatus::Pending.as_str(), "pending");
    assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
    assert_eq!(TaskStatus::Completed.as_str(), "completed");
}

#[test]
fn test_task_status_from_str() {
    assert_eq!(
        TaskStatus::from_str("pending").unwrap(),
        TaskStatus::Pending
    );
    assert_eq!(
        TaskStatus::from_str("in_progress").unwrap(),
        TaskStatus::InProgress
    );
    assert_eq!(
        TaskStatus::from_str("completed").unwrap(),
        TaskStatus::Completed
    );
    assert!(TaskStatus::from_str("invalid").is_err());
}

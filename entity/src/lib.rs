pub mod pr_reviewers;
pub mod pull_requests;
pub mod teams;
pub mod users;

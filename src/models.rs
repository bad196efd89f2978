use chrono::{DateTime, Utc};
use entity::{pull_requests, users};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub use entity::pull_requests::PullRequestStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TeamMember {
    #[validate(length(min = 1, max = 255))]
    pub user_id: String,
    #[validate(length(min = 1, max = 255))]
    pub username: String,
    pub is_active: bool,
}

impl From<users::Model> for TeamMember {
    fn from(user: users::Model) -> Self {
        Self {
            user_id: user.id,
            username: user.name,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Team {
    #[validate(length(min = 1, max = 255))]
    pub team_name: String,
    #[validate(nested)]
    pub members: Vec<TeamMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

impl User {
    pub fn new(user: users::Model, team_name: String) -> Self {
        Self {
            user_id: user.id,
            username: user.name,
            team_name,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequest {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
    pub assigned_reviewers: Vec<String>,
    pub need_more_reviewers: bool,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    pub fn new(model: pull_requests::Model, assigned_reviewers: Vec<String>) -> Self {
        Self {
            pull_request_id: model.id,
            pull_request_name: model.name,
            author_id: model.author_id,
            status: model.status,
            assigned_reviewers,
            need_more_reviewers: model.need_more_reviewers,
            created_at: model.created_at,
            merged_at: model.merged_at,
        }
    }

    #[inline]
    pub fn is_merged(&self) -> bool {
        self.status == PullRequestStatus::Merged
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestShort {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
}

impl From<pull_requests::Model> for PullRequestShort {
    fn from(model: pull_requests::Model) -> Self {
        Self {
            pull_request_id: model.id,
            pull_request_name: model.name,
            author_id: model.author_id,
            status: model.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct NewPullRequest {
    #[validate(length(min = 1, max = 255))]
    pub pull_request_id: String,
    #[validate(length(min = 1, max = 255))]
    pub pull_request_name: String,
    #[validate(length(min = 1, max = 255))]
    pub author_id: String,
}

/// One step of a deactivation plan. `new_reviewer_id == None` removes the
/// old reviewer without a replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reassignment {
    pub pull_request_id: String,
    pub old_reviewer_id: String,
    pub new_reviewer_id: Option<String>,
}

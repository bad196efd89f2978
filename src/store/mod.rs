//! Storage capabilities used by the review workflow.
//!
//! Every method that mutates more than one row is atomic: either all of its
//! writes become visible or none of them do.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::{
    models::{NewPullRequest, PullRequest, PullRequestShort, Reassignment, Team, User},
    Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait TeamStore {
    /// Inserts the team and upserts its members. Fails with `TEAM_EXISTS` if
    /// the name is taken.
    async fn create_team(&self, team: &Team) -> Result<Team>;

    /// Members are ordered by username, then id.
    async fn find_team(&self, team_name: &str) -> Result<Option<Team>>;

    /// Returns `false` when there was no such team.
    async fn delete_team(&self, team_name: &str) -> Result<bool>;

    async fn find_user(&self, user_id: &str) -> Result<Option<User>>;

    async fn set_user_active(&self, user_id: &str, is_active: bool) -> Result<Option<User>>;

    /// Marks `user_ids` of the team inactive and applies `plan` in the same
    /// transaction. Returns the ids whose flag actually changed.
    async fn deactivate_team_members(
        &self,
        team_name: &str,
        user_ids: &[String],
        plan: &[Reassignment],
    ) -> Result<Vec<String>>;
}

#[async_trait]
pub trait PullRequestStore {
    /// Inserts the pull request with its reviewers. Fails with `PR_EXISTS` if
    /// the id is taken.
    async fn create_pull_request(
        &self,
        pull_request: &NewPullRequest,
        reviewers: &[String],
        need_more_reviewers: bool,
    ) -> Result<PullRequest>;

    async fn find_pull_request(&self, pull_request_id: &str) -> Result<Option<PullRequest>>;

    /// Marks an open pull request as merged at `merged_at`. An already merged
    /// pull request is returned untouched. The flag is true when this call
    /// changed the status.
    async fn merge_pull_request(
        &self,
        pull_request_id: &str,
        merged_at: DateTime<Utc>,
    ) -> Result<Option<(PullRequest, bool)>>;

    async fn set_need_more_reviewers(&self, pull_request_id: &str, value: bool) -> Result;
}

#[async_trait]
pub trait ReviewerStore {
    /// Reviewers in assignment order.
    async fn assigned_reviewers(&self, pull_request_id: &str) -> Result<Vec<String>>;

    /// Open pull requests the user currently reviews, with their reviewers.
    async fn open_pull_requests_by_reviewer(&self, reviewer_id: &str) -> Result<Vec<PullRequest>>;

    /// Every pull request the user reviews, newest first.
    async fn pull_requests_by_reviewer(&self, reviewer_id: &str) -> Result<Vec<PullRequestShort>>;

    /// Swaps `old_reviewer_id` for `new_reviewer_id` in one transaction.
    /// Fails with `NOT_ASSIGNED` if the old pairing no longer exists.
    async fn reassign_reviewer(
        &self,
        pull_request_id: &str,
        old_reviewer_id: &str,
        new_reviewer_id: &str,
    ) -> Result;
}

#[async_trait]
pub trait Store:
    TeamStore + PullRequestStore + ReviewerStore + Clone + Send + Sync + 'static
{
    async fn ping(&self) -> Result;
}

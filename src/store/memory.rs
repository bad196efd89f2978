//! In-memory store used when no database is configured and by the tests.
//!
//! Mutations run against a copy of the tables under the write lock; the copy
//! replaces the live tables only when the whole operation succeeded.

use super::{PullRequestStore, ReviewerStore, Store, TeamStore};
use crate::{
    error,
    models::{
        NewPullRequest, PullRequest, PullRequestShort, PullRequestStatus, Reassignment, Team,
        TeamMember, User,
    },
    Result,
};
use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use entity::{pr_reviewers, pull_requests, teams, users};
use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
struct Tables {
    teams: BTreeMap<String, teams::Model>,
    users: BTreeMap<String, users::Model>,
    pull_requests: BTreeMap<String, pull_requests::Model>,
    /// Kept in assignment order.
    reviewers: Vec<pr_reviewers::Model>,
}

impl Tables {
    fn team_name(&self, team_id: Uuid) -> Option<&str> {
        self.teams
            .values()
            .find(|team| team.id == team_id)
            .map(|team| team.name.as_str())
    }

    fn members(&self, team_id: Uuid) -> Vec<TeamMember> {
        let mut members: Vec<_> = self
            .users
            .values()
            .filter(|user| user.team_id == team_id)
            .cloned()
            .collect();

        members.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        members.into_iter().map(TeamMember::from).collect()
    }

    fn user(&self, user_id: &str) -> Option<User> {
        let user = self.users.get(user_id)?;
        let team_name = self.team_name(user.team_id)?;

        Some(User::new(user.clone(), team_name.to_owned()))
    }

    fn reviewers_of(&self, pull_request_id: &str) -> Vec<String> {
        self.reviewers
            .iter()
            .filter(|row| row.pull_request_id == pull_request_id)
            .map(|row| row.reviewer_id.clone())
            .collect()
    }

    fn is_assigned(&self, pull_request_id: &str, reviewer_id: &str) -> bool {
        self.reviewers
            .iter()
            .any(|row| row.pull_request_id == pull_request_id && row.reviewer_id == reviewer_id)
    }

    fn pull_request(&self, pull_request_id: &str) -> Option<PullRequest> {
        let model = self.pull_requests.get(pull_request_id)?;

        Some(PullRequest::new(
            model.clone(),
            self.reviewers_of(pull_request_id),
        ))
    }

    fn assign(&mut self, pull_request_id: &str, reviewer_id: &str) -> Result {
        if !self.users.contains_key(reviewer_id) {
            return Err(error::USER_NOT_FOUND);
        }

        if self.is_assigned(pull_request_id, reviewer_id) {
            return Err(error::NOT_ASSIGNED
                .with_message("reviewer is already assigned to this pull request"));
        }

        self.reviewers.push(pr_reviewers::Model {
            pull_request_id: pull_request_id.to_owned(),
            reviewer_id: reviewer_id.to_owned(),
            assigned_at: Utc::now(),
        });

        Ok(())
    }

    fn unassign(&mut self, pull_request_id: &str, reviewer_id: &str) -> bool {
        let before = self.reviewers.len();
        self.reviewers
            .retain(|row| !(row.pull_request_id == pull_request_id && row.reviewer_id == reviewer_id));

        self.reviewers.len() != before
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn read<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&Tables) -> T,
    {
        let tables = self.tables.read().await;
        f(&tables)
    }

    async fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Tables) -> Result<T> + Send,
        T: Send,
    {
        let mut tables = self.tables.write().await;

        let mut working = tables.clone();
        let value = f(&mut working)?;
        *tables = working;

        Ok(value)
    }
}

#[async_trait]
impl TeamStore for MemoryStore {
    async fn create_team(&self, team: &Team) -> Result<Team> {
        self.transaction(|tables| {
            if tables.teams.contains_key(&team.team_name) {
                return Err(error::TEAM_EXISTS);
            }

            let id = Uuid::new_v4();
            tables.teams.insert(
                team.team_name.clone(),
                teams::Model {
                    id,
                    name: team.team_name.clone(),
                },
            );

            for member in &team.members {
                tables.users.insert(
                    member.user_id.clone(),
                    users::Model {
                        id: member.user_id.clone(),
                        name: member.username.clone(),
                        team_id: id,
                        is_active: member.is_active,
                    },
                );
            }

            Ok(Team {
                team_name: team.team_name.clone(),
                members: tables.members(id),
            })
        })
        .await
    }

    async fn find_team(&self, team_name: &str) -> Result<Option<Team>> {
        Ok(self
            .read(|tables| {
                let team = tables.teams.get(team_name)?;

                Some(Team {
                    team_name: team.name.clone(),
                    members: tables.members(team.id),
                })
            })
            .await)
    }

    async fn delete_team(&self, team_name: &str) -> Result<bool> {
        self.transaction(|tables| {
            let Some(team) = tables.teams.remove(team_name) else {
                return Ok(false);
            };

            let removed_users: HashSet<String> = tables
                .users
                .values()
                .filter(|user| user.team_id == team.id)
                .map(|user| user.id.clone())
                .collect();
            tables.users.retain(|id, _| !removed_users.contains(id));

            let removed_pull_requests: HashSet<String> = tables
                .pull_requests
                .values()
                .filter(|pr| removed_users.contains(&pr.author_id))
                .map(|pr| pr.id.clone())
                .collect();
            tables
                .pull_requests
                .retain(|id, _| !removed_pull_requests.contains(id));

            tables.reviewers.retain(|row| {
                !removed_pull_requests.contains(&row.pull_request_id)
                    && !removed_users.contains(&row.reviewer_id)
            });

            Ok(true)
        })
        .await
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.read(|tables| tables.user(user_id)).await)
    }

    async fn set_user_active(&self, user_id: &str, is_active: bool) -> Result<Option<User>> {
        self.transaction(|tables| {
            let Some(user) = tables.users.get_mut(user_id) else {
                return Ok(None);
            };
            user.is_active = is_active;

            Ok(tables.user(user_id))
        })
        .await
    }

    async fn deactivate_team_members(
        &self,
        team_name: &str,
        user_ids: &[String],
        plan: &[Reassignment],
    ) -> Result<Vec<String>> {
        self.transaction(|tables| {
            let team_id = tables
                .teams
                .get(team_name)
                .map(|team| team.id)
                .ok_or(error::TEAM_NOT_FOUND)?;

            let mut deactivated = Vec::new();
            for user in tables.users.values_mut() {
                if user.team_id == team_id && user.is_active && user_ids.contains(&user.id) {
                    user.is_active = false;
                    deactivated.push(user.id.clone());
                }
            }

            for step in plan {
                if !tables.unassign(&step.pull_request_id, &step.old_reviewer_id) {
                    return Err(error::NOT_ASSIGNED.with_message(format!(
                        "reviewer {} is no longer assigned to pull request {}",
                        step.old_reviewer_id, step.pull_request_id
                    )));
                }

                if let Some(new_reviewer_id) = &step.new_reviewer_id {
                    tables.assign(&step.pull_request_id, new_reviewer_id)?;
                }
            }

            Ok(deactivated)
        })
        .await
    }
}

#[async_trait]
impl PullRequestStore for MemoryStore {
    async fn create_pull_request(
        &self,
        pull_request: &NewPullRequest,
        reviewers: &[String],
        need_more_reviewers: bool,
    ) -> Result<PullRequest> {
        self.transaction(|tables| {
            if tables
                .pull_requests
                .contains_key(&pull_request.pull_request_id)
            {
                return Err(error::PR_EXISTS);
            }

            if !tables.users.contains_key(&pull_request.author_id) {
                return Err(error::AUTHOR_NOT_FOUND);
            }

            let model = pull_requests::Model {
                id: pull_request.pull_request_id.clone(),
                name: pull_request.pull_request_name.clone(),
                author_id: pull_request.author_id.clone(),
                status: PullRequestStatus::Open,
                need_more_reviewers,
                created_at: Utc::now().trunc_subsecs(6),
                merged_at: None,
            };
            tables.pull_requests.insert(model.id.clone(), model.clone());

            for reviewer_id in reviewers {
                tables.assign(&model.id, reviewer_id)?;
            }

            Ok(PullRequest::new(model, reviewers.to_vec()))
        })
        .await
    }

    async fn find_pull_request(&self, pull_request_id: &str) -> Result<Option<PullRequest>> {
        Ok(self.read(|tables| tables.pull_request(pull_request_id)).await)
    }

    async fn merge_pull_request(
        &self,
        pull_request_id: &str,
        merged_at: DateTime<Utc>,
    ) -> Result<Option<(PullRequest, bool)>> {
        self.transaction(|tables| {
            let Some(model) = tables.pull_requests.get_mut(pull_request_id) else {
                return Ok(None);
            };

            let merged = model.status == PullRequestStatus::Open;
            if merged {
                model.status = PullRequestStatus::Merged;
                model.merged_at = Some(merged_at.max(model.created_at));
            }

            Ok(tables
                .pull_request(pull_request_id)
                .map(|pull_request| (pull_request, merged)))
        })
        .await
    }

    async fn set_need_more_reviewers(&self, pull_request_id: &str, value: bool) -> Result {
        self.transaction(|tables| {
            let model = tables
                .pull_requests
                .get_mut(pull_request_id)
                .ok_or(error::PR_NOT_FOUND)?;
            model.need_more_reviewers = value;

            Ok(())
        })
        .await
    }
}

#[async_trait]
impl ReviewerStore for MemoryStore {
    async fn assigned_reviewers(&self, pull_request_id: &str) -> Result<Vec<String>> {
        Ok(self.read(|tables| tables.reviewers_of(pull_request_id)).await)
    }

    async fn open_pull_requests_by_reviewer(&self, reviewer_id: &str) -> Result<Vec<PullRequest>> {
        Ok(self
            .read(|tables| {
                tables
                    .pull_requests
                    .values()
                    .filter(|pr| pr.status == PullRequestStatus::Open)
                    .filter(|pr| tables.is_assigned(&pr.id, reviewer_id))
                    .filter_map(|pr| tables.pull_request(&pr.id))
                    .collect()
            })
            .await)
    }

    async fn pull_requests_by_reviewer(&self, reviewer_id: &str) -> Result<Vec<PullRequestShort>> {
        Ok(self
            .read(|tables| {
                let mut models: Vec<_> = tables
                    .pull_requests
                    .values()
                    .filter(|pr| tables.is_assigned(&pr.id, reviewer_id))
                    .cloned()
                    .collect();

                models.sort_by(|a, b| {
                    b.created_at
                        .cmp(&a.created_at)
                        .then_with(|| b.id.cmp(&a.id))
                });

                models.into_iter().map(PullRequestShort::from).collect()
            })
            .await)
    }

    async fn reassign_reviewer(
        &self,
        pull_request_id: &str,
        old_reviewer_id: &str,
        new_reviewer_id: &str,
    ) -> Result {
        self.transaction(|tables| {
            if !tables.unassign(pull_request_id, old_reviewer_id) {
                return Err(error::NOT_ASSIGNED);
            }

            tables.assign(pull_request_id, new_reviewer_id)
        })
        .await
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result {
        Ok(())
    }
}

use super::{PullRequestStore, ReviewerStore, Store, TeamStore};
use crate::{
    error::{self, DatabaseError},
    models::{
        NewPullRequest, PullRequest, PullRequestShort, PullRequestStatus, Reassignment, Team,
        TeamMember, User,
    },
    Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use entity::{
    pr_reviewers::{self, constraints::*},
    pull_requests::{self, constraints::*},
    teams::{self, constraints::*},
    users,
};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, Database, DbConn, DbErr,
    EntityTrait, IntoActiveModel, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Set, TransactionTrait,
};
use std::collections::HashMap;
use tracing::log::LevelFilter;
use uuid::Uuid;

#[derive(Clone)]
pub struct PgStore {
    db: DbConn,
}

impl PgStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn connect(url: &str) -> std::result::Result<Self, DbErr> {
        info!("Trying to connect to database");

        let mut opts = ConnectOptions::new(url.to_owned());
        opts.sqlx_logging_level(LevelFilter::Debug);

        let db = Database::connect(opts).await?;

        info!("Connected to database");

        Ok(Self::new(db))
    }

    pub fn db(&self) -> &DbConn {
        &self.db
    }
}

async fn load_members<C: ConnectionTrait>(
    conn: &C,
    team_id: Uuid,
) -> std::result::Result<Vec<TeamMember>, DbErr> {
    let members = users::Entity::find_in_team(team_id).all(conn).await?;

    Ok(members.into_iter().map(TeamMember::from).collect())
}

async fn load_user<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
) -> std::result::Result<Option<User>, DbErr> {
    let user = users::Entity::find_by_id(user_id)
        .find_also_related(teams::Entity)
        .one(conn)
        .await?;

    Ok(user.and_then(|(user, team)| team.map(|team| User::new(user, team.name))))
}

async fn load_reviewers<C: ConnectionTrait>(
    conn: &C,
    pull_request_id: &str,
) -> std::result::Result<Vec<String>, DbErr> {
    let reviewers = pr_reviewers::Entity::find_for_pull_request(pull_request_id)
        .all(conn)
        .await?;

    Ok(reviewers.into_iter().map(|row| row.reviewer_id).collect())
}

async fn with_reviewers<C: ConnectionTrait>(
    conn: &C,
    models: Vec<pull_requests::Model>,
) -> std::result::Result<Vec<PullRequest>, DbErr> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let rows = pr_reviewers::Entity::find()
        .filter(pr_reviewers::Column::PullRequestId.is_in(models.iter().map(|pr| pr.id.as_str())))
        .order_by_asc(pr_reviewers::Column::AssignedAt)
        .order_by_asc(pr_reviewers::Column::ReviewerId)
        .all(conn)
        .await?;

    let mut reviewers: HashMap<String, Vec<String>> = HashMap::with_capacity(models.len());
    for row in rows {
        reviewers
            .entry(row.pull_request_id)
            .or_default()
            .push(row.reviewer_id);
    }

    Ok(models
        .into_iter()
        .map(|model| {
            let assigned = reviewers.remove(&model.id).unwrap_or_default();
            PullRequest::new(model, assigned)
        })
        .collect())
}

/// Consecutive microsecond stamps keep the insertion order visible through
/// `assigned_at`.
async fn assign_reviewers<C: ConnectionTrait>(
    conn: &C,
    pull_request_id: &str,
    reviewers: &[String],
) -> std::result::Result<(), DbErr> {
    if reviewers.is_empty() {
        return Ok(());
    }

    let now = Utc::now();
    let rows = reviewers
        .iter()
        .zip(0..)
        .map(|(reviewer_id, offset)| pr_reviewers::ActiveModel {
            pull_request_id: Set(pull_request_id.to_owned()),
            reviewer_id: Set(reviewer_id.clone()),
            assigned_at: Set(now + Duration::microseconds(offset)),
        });

    pr_reviewers::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;

    Ok(())
}

fn reviewer_insert_error(err: DbErr) -> error::Error {
    if err.foreign_key_violation(FK_PR_REVIEWERS_REVIEWER_ID) {
        error::USER_NOT_FOUND
    } else if err.unique_violation(PK_PR_REVIEWERS) {
        error::NOT_ASSIGNED.with_message("reviewer is already assigned to this pull request")
    } else {
        err.into()
    }
}

#[async_trait]
impl TeamStore for PgStore {
    async fn create_team(&self, team: &Team) -> Result<Team> {
        let txn = self.db.begin().await?;

        let id = Uuid::new_v4();
        let result = teams::Entity::insert(teams::ActiveModel {
            id: Set(id),
            name: Set(team.team_name.clone()),
        })
        .exec_without_returning(&txn)
        .await;

        match result {
            Err(err) if err.unique_violation(UC_TEAMS_NAME) => return Err(error::TEAM_EXISTS),
            Err(err) => return Err(err.into()),
            Ok(_) => {}
        }

        if !team.members.is_empty() {
            let members = team.members.iter().map(|member| users::ActiveModel {
                id: Set(member.user_id.clone()),
                name: Set(member.username.clone()),
                team_id: Set(id),
                is_active: Set(member.is_active),
            });

            users::Entity::insert_many(members)
                .on_conflict(
                    OnConflict::column(users::Column::Id)
                        .update_columns([
                            users::Column::Name,
                            users::Column::TeamId,
                            users::Column::IsActive,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await?;
        }

        let members = load_members(&txn, id).await?;

        txn.commit().await?;

        Ok(Team {
            team_name: team.team_name.clone(),
            members,
        })
    }

    async fn find_team(&self, team_name: &str) -> Result<Option<Team>> {
        let txn = self.db.begin().await?;

        let Some(team) = teams::Entity::find_by_name(team_name).one(&txn).await? else {
            return Ok(None);
        };

        let members = load_members(&txn, team.id).await?;

        txn.commit().await?;

        Ok(Some(Team {
            team_name: team.name,
            members,
        }))
    }

    async fn delete_team(&self, team_name: &str) -> Result<bool> {
        let result = teams::Entity::delete_many()
            .filter(teams::Column::Name.eq(team_name))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<User>> {
        Ok(load_user(&self.db, user_id).await?)
    }

    async fn set_user_active(&self, user_id: &str, is_active: bool) -> Result<Option<User>> {
        let txn = self.db.begin().await?;

        let result = users::Entity::update_many()
            .col_expr(users::Column::IsActive, Expr::value(is_active))
            .filter(users::Column::Id.eq(user_id))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let user = load_user(&txn, user_id).await?;

        txn.commit().await?;

        Ok(user)
    }

    async fn deactivate_team_members(
        &self,
        team_name: &str,
        user_ids: &[String],
        plan: &[Reassignment],
    ) -> Result<Vec<String>> {
        let txn = self.db.begin().await?;

        let team = teams::Entity::find_by_name(team_name)
            .one(&txn)
            .await?
            .ok_or(error::TEAM_NOT_FOUND)?;

        let deactivated = users::Entity::update_many()
            .col_expr(users::Column::IsActive, Expr::value(false))
            .filter(users::Column::TeamId.eq(team.id))
            .filter(users::Column::Id.is_in(user_ids.iter().map(String::as_str)))
            .filter(users::Column::IsActive.eq(true))
            .exec_with_returning(&txn)
            .await?;

        for step in plan {
            let deleted = pr_reviewers::Entity::delete_by_id((
                step.pull_request_id.clone(),
                step.old_reviewer_id.clone(),
            ))
            .exec(&txn)
            .await?;

            if deleted.rows_affected == 0 {
                return Err(error::NOT_ASSIGNED.with_message(format!(
                    "reviewer {} is no longer assigned to pull request {}",
                    step.old_reviewer_id, step.pull_request_id
                )));
            }

            if let Some(new_reviewer_id) = &step.new_reviewer_id {
                assign_reviewers(&txn, &step.pull_request_id, &[new_reviewer_id.clone()])
                    .await
                    .map_err(reviewer_insert_error)?;
            }
        }

        txn.commit().await?;

        Ok(deactivated.into_iter().map(|user| user.id).collect())
    }
}

#[async_trait]
impl PullRequestStore for PgStore {
    async fn create_pull_request(
        &self,
        pull_request: &NewPullRequest,
        reviewers: &[String],
        need_more_reviewers: bool,
    ) -> Result<PullRequest> {
        let txn = self.db.begin().await?;

        let model = pull_requests::Model {
            id: pull_request.pull_request_id.clone(),
            name: pull_request.pull_request_name.clone(),
            author_id: pull_request.author_id.clone(),
            status: PullRequestStatus::Open,
            need_more_reviewers,
            created_at: Utc::now().trunc_subsecs(6),
            merged_at: None,
        };

        let result = pull_requests::Entity::insert(pull_requests::ActiveModel {
            id: Set(model.id.clone()),
            name: Set(model.name.clone()),
            author_id: Set(model.author_id.clone()),
            status: Set(model.status),
            need_more_reviewers: Set(model.need_more_reviewers),
            created_at: Set(model.created_at),
            merged_at: Set(model.merged_at),
        })
        .exec_without_returning(&txn)
        .await;

        match result {
            Err(err) if err.unique_violation(PK_PULL_REQUESTS) => {
                return Err(error::PR_EXISTS)
            }
            Err(err) if err.foreign_key_violation(FK_PULL_REQUESTS_AUTHOR_ID) => {
                return Err(error::AUTHOR_NOT_FOUND)
            }
            Err(err) => return Err(err.into()),
            Ok(_) => {}
        }

        assign_reviewers(&txn, &model.id, reviewers)
            .await
            .map_err(reviewer_insert_error)?;

        txn.commit().await?;

        Ok(PullRequest::new(model, reviewers.to_vec()))
    }

    async fn find_pull_request(&self, pull_request_id: &str) -> Result<Option<PullRequest>> {
        let Some(model) = pull_requests::Entity::find_by_id(pull_request_id)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let reviewers = load_reviewers(&self.db, &model.id).await?;

        Ok(Some(PullRequest::new(model, reviewers)))
    }

    async fn merge_pull_request(
        &self,
        pull_request_id: &str,
        merged_at: DateTime<Utc>,
    ) -> Result<Option<(PullRequest, bool)>> {
        let txn = self.db.begin().await?;

        let Some(model) = pull_requests::Entity::find_by_id(pull_request_id)
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        let merged = model.status == PullRequestStatus::Open;

        let model = if merged {
            let created_at = model.created_at;

            let mut active_model = model.into_active_model();
            active_model.status = Set(PullRequestStatus::Merged);
            active_model.merged_at = Set(Some(merged_at.max(created_at)));

            active_model.update(&txn).await?
        } else {
            model
        };

        let reviewers = load_reviewers(&txn, &model.id).await?;

        txn.commit().await?;

        Ok(Some((PullRequest::new(model, reviewers), merged)))
    }

    async fn set_need_more_reviewers(&self, pull_request_id: &str, value: bool) -> Result {
        let result = pull_requests::Entity::update_many()
            .col_expr(pull_requests::Column::NeedMoreReviewers, Expr::value(value))
            .filter(pull_requests::Column::Id.eq(pull_request_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(error::PR_NOT_FOUND);
        }

        Ok(())
    }
}

#[async_trait]
impl ReviewerStore for PgStore {
    async fn assigned_reviewers(&self, pull_request_id: &str) -> Result<Vec<String>> {
        Ok(load_reviewers(&self.db, pull_request_id).await?)
    }

    async fn open_pull_requests_by_reviewer(&self, reviewer_id: &str) -> Result<Vec<PullRequest>> {
        let txn = self.db.begin().await?;

        let models = pull_requests::Entity::find()
            .join(JoinType::InnerJoin, pull_requests::Relation::Reviewers.def())
            .filter(pr_reviewers::Column::ReviewerId.eq(reviewer_id))
            .filter(pull_requests::Column::Status.eq(PullRequestStatus::Open))
            .order_by_asc(pull_requests::Column::Id)
            .all(&txn)
            .await?;

        let pull_requests = with_reviewers(&txn, models).await?;

        txn.commit().await?;

        Ok(pull_requests)
    }

    async fn pull_requests_by_reviewer(&self, reviewer_id: &str) -> Result<Vec<PullRequestShort>> {
        let models = pull_requests::Entity::find()
            .join(JoinType::InnerJoin, pull_requests::Relation::Reviewers.def())
            .filter(pr_reviewers::Column::ReviewerId.eq(reviewer_id))
            .order_by_desc(pull_requests::Column::CreatedAt)
            .order_by_desc(pull_requests::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(PullRequestShort::from).collect())
    }

    async fn reassign_reviewer(
        &self,
        pull_request_id: &str,
        old_reviewer_id: &str,
        new_reviewer_id: &str,
    ) -> Result {
        let txn = self.db.begin().await?;

        let deleted =
            pr_reviewers::Entity::delete_by_id((pull_request_id.to_owned(), old_reviewer_id.to_owned()))
                .exec(&txn)
                .await?;

        if deleted.rows_affected == 0 {
            return Err(error::NOT_ASSIGNED);
        }

        assign_reviewers(&txn, pull_request_id, &[new_reviewer_id.to_owned()])
            .await
            .map_err(reviewer_insert_error)?;

        txn.commit().await?;

        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result {
        self.db.execute_unprepared("select 1").await?;
        Ok(())
    }
}

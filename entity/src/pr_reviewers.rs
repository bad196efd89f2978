use super::{pull_requests, users};
use sea_orm::{entity::prelude::*, QueryOrder};

pub mod constraints {
    pub const PK_PR_REVIEWERS: &str = "PK_pr_reviewers";
    pub const FK_PR_REVIEWERS_PULL_REQUEST_ID: &str = "FK_pr_reviewers_pull_request_id";
    pub const FK_PR_REVIEWERS_REVIEWER_ID: &str = "FK_pr_reviewers_reviewer_id";
}

/// One (pull request, reviewer) pairing. The composite primary key is what
/// keeps a reviewer from being assigned twice.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pr_reviewers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub pull_request_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub reviewer_id: String,
    pub assigned_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    PullRequest,
    Reviewer,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::PullRequest => Entity::belongs_to(pull_requests::Entity)
                .from(Column::PullRequestId)
                .to(pull_requests::Column::Id)
                .into(),
            Self::Reviewer => Entity::belongs_to(users::Entity)
                .from(Column::ReviewerId)
                .to(users::Column::Id)
                .into(),
        }
    }
}

impl Related<pull_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PullRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    /// Reviewers of a pull request in assignment order.
    #[inline]
    pub fn find_for_pull_request(pull_request_id: &str) -> Select<Entity> {
        Self::find()
            .filter(Column::PullRequestId.eq(pull_request_id))
            .order_by_asc(Column::AssignedAt)
            .order_by_asc(Column::ReviewerId)
    }
}

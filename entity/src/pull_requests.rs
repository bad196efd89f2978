use super::pr_reviewers;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub mod constraints {
    pub const PK_PULL_REQUESTS: &str = "PK_pull_requests";
    pub const FK_PULL_REQUESTS_AUTHOR_ID: &str = "FK_pull_requests_author_id";
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pull_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
    pub need_more_reviewers: bool,
    pub created_at: DateTimeUtc,
    pub merged_at: Option<DateTimeUtc>,
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
pub enum PullRequestStatus {
    #[sea_orm(string_value = "OPEN")]
    #[serde(rename = "OPEN")]
    Open,
    #[sea_orm(string_value = "MERGED")]
    #[serde(rename = "MERGED")]
    Merged,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Reviewers,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Reviewers => Entity::has_many(pr_reviewers::Entity).into(),
        }
    }
}

impl Related<pr_reviewers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviewers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

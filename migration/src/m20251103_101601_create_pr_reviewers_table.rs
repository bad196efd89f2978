use entity::{
    pr_reviewers::{self, constraints::*},
    pull_requests, users,
};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(pr_reviewers::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(pr_reviewers::Column::PullRequestId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(pr_reviewers::Column::ReviewerId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(pr_reviewers::Column::AssignedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .name(PK_PR_REVIEWERS)
                            .col(pr_reviewers::Column::PullRequestId)
                            .col(pr_reviewers::Column::ReviewerId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_PR_REVIEWERS_PULL_REQUEST_ID)
                            .from(pr_reviewers::Entity, pr_reviewers::Column::PullRequestId)
                            .to(pull_requests::Entity, pull_requests::Column::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_PR_REVIEWERS_REVIEWER_ID)
                            .from(pr_reviewers::Entity, pr_reviewers::Column::ReviewerId)
                            .to(users::Entity, users::Column::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("IDX_pr_reviewers_reviewer_id")
                    .table(pr_reviewers::Entity)
                    .col(pr_reviewers::Column::ReviewerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(pr_reviewers::Entity).to_owned())
            .await
    }
}

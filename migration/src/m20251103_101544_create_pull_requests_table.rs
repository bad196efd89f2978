use entity::{
    pull_requests::{self, constraints::*},
    users,
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
                    .table(pull_requests::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(pull_requests::Column::Id)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(pull_requests::Column::Name)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(pull_requests::Column::AuthorId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(pull_requests::Column::Status)
                            .string_len(16)
                            .not_null()
                            .default("OPEN"),
                    )
                    .col(
                        ColumnDef::new(pull_requests::Column::NeedMoreReviewers)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(pull_requests::Column::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(pull_requests::Column::MergedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .primary_key(
                        Index::create()
                            .name(PK_PULL_REQUESTS)
                            .col(pull_requests::Column::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_PULL_REQUESTS_AUTHOR_ID)
                            .from(pull_requests::Entity, pull_requests::Column::AuthorId)
                            .to(users::Entity, users::Column::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(pull_requests::Entity).to_owned())
            .await
    }
}

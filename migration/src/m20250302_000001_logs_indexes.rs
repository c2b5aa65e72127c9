//! logs 表索引
//!
//! 所有读取路径都按 link_id 过滤，并按 timestamp 排序

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_logs_link_id")
                    .table(Logs::Table)
                    .col(Logs::LinkId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_logs_link_time")
                    .table(Logs::Table)
                    .col(Logs::LinkId)
                    .col(Logs::Timestamp)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_logs_link_time")
                    .table(Logs::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_logs_link_id")
                    .table(Logs::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Logs {
    #[sea_orm(iden = "logs")]
    Table,
    LinkId,
    Timestamp,
}

//! 为旧版 logs 表补充坐标列
//!
//! 初始迁移在 `logs` 已存在时会跳过建表，旧部署留下的表可能缺少
//! `latitude`/`longitude`。缺哪列补哪列，已有的列保持不变。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, column) in [("latitude", Logs::Latitude), ("longitude", Logs::Longitude)] {
            if manager.has_column("logs", name).await? {
                continue;
            }

            manager
                .alter_table(
                    Table::alter()
                        .table(Logs::Table)
                        .add_column(ColumnDef::new(column).double().null())
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // 坐标列属于基础表结构，回滚时保留
        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Logs {
    #[sea_orm(iden = "logs")]
    Table,
    Latitude,
    Longitude,
}

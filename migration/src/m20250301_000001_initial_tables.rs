use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Logs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Logs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Logs::LinkId).string_len(64).not_null())
                    .col(ColumnDef::new(Logs::Ip).string_len(45).null())
                    .col(ColumnDef::new(Logs::Country).string_len(100).null())
                    .col(ColumnDef::new(Logs::Platform).string_len(32).null())
                    .col(ColumnDef::new(Logs::Browser).string_len(32).null())
                    .col(ColumnDef::new(Logs::Referrer).text().null())
                    .col(ColumnDef::new(Logs::Latitude).double().null())
                    .col(ColumnDef::new(Logs::Longitude).double().null())
                    .col(
                        ColumnDef::new(Logs::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Links::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Links::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Links::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Links::TargetUrl).text().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Links::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Logs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Links {
    #[sea_orm(iden = "links")]
    Table,
    Id,
    CreatedAt,
    TargetUrl,
}

#[derive(DeriveIden)]
enum Logs {
    #[sea_orm(iden = "logs")]
    Table,
    Id,
    LinkId,
    Ip,
    Country,
    Platform,
    Browser,
    Referrer,
    Latitude,
    Longitude,
    Timestamp,
}

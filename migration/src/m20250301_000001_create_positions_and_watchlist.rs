use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Held positions, one row per stock code
        manager
            .create_table(
                Table::create()
                    .table(Positions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Positions::Code).string().not_null().primary_key())
                    .col(ColumnDef::new(Positions::Name).string().not_null())
                    .col(ColumnDef::new(Positions::Cost).double().not_null().default(0.0))
                    .col(ColumnDef::new(Positions::Shares).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Positions::StopLoss).double().null())
                    .col(ColumnDef::new(Positions::StopProfit).double().null())
                    .col(ColumnDef::new(Positions::Industry).string().null())
                    .col(ColumnDef::new(Positions::BuyDate).string().null())
                    .col(ColumnDef::new(Positions::CreatedAt).timestamp().null())
                    .col(ColumnDef::new(Positions::UpdatedAt).timestamp().null())
                    .to_owned(),
            )
            .await?;

        // Watchlist candidates
        manager
            .create_table(
                Table::create()
                    .table(Watchlist::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Watchlist::Code).string().not_null().primary_key())
                    .col(ColumnDef::new(Watchlist::Name).string().not_null())
                    .col(ColumnDef::new(Watchlist::TargetPrice).double().null())
                    .col(ColumnDef::new(Watchlist::Reason).text().null())
                    .col(ColumnDef::new(Watchlist::Industry).string().null())
                    .col(ColumnDef::new(Watchlist::CreatedAt).timestamp().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Watchlist::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Positions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Positions {
    Table,
    Code,
    Name,
    Cost,
    Shares,
    StopLoss,
    StopProfit,
    Industry,
    BuyDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Watchlist {
    Table,
    Code,
    Name,
    TargetPrice,
    Reason,
    Industry,
    CreatedAt,
}
